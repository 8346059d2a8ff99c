//! Client-side cart and checkout core of an education storefront.
//!
//! The cart is a reducer-driven state machine mirrored to durable local
//! storage; checkout is a three-step wizard across credit card, PIX, and
//! boleto; asynchronous settlement is reconciled by a cancellable polling
//! watcher.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
