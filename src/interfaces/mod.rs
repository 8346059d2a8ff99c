//! Adapters for external collaborators: the storefront REST API.

pub mod http;
