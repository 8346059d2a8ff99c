//! Application layer containing the core orchestration.
//!
//! `CartStore` owns the cart and its persistence side effect, `CheckoutFlow`
//! drives the three-step wizard against the payment gateway, and
//! `PaymentWatcher` reconciles asynchronous settlement through polling.

pub mod cart_store;
pub mod checkout;
pub mod watcher;
