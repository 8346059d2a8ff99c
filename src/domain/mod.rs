//! Domain types: the cart and its reducer, checkout vocabulary, payment
//! results, and the collaborator ports.

pub mod cart;
pub mod checkout;
pub mod payment;
pub mod ports;
