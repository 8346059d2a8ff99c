use async_trait::async_trait;
use std::sync::Arc;

use super::checkout::CheckoutRequest;
use super::payment::{PaymentResult, PaymentStatus};
use crate::error::Result;

/// Durable key-value string storage for the cart.
///
/// The port is synchronous: persistence must complete inside `dispatch`, and
/// the only backing stores are local (memory, file, embedded DB).
pub trait CartStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub type CartStorageBox = Box<dyn CartStorage>;

/// The payment backend as seen by the checkout flow and the watcher.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submits a checkout and returns the rail-specific result.
    async fn submit_checkout(&self, request: &CheckoutRequest) -> Result<PaymentResult>;

    /// Fetches the settlement status of an order.
    async fn payment_status(&self, order_id: &str) -> Result<PaymentStatus>;
}

pub type SharedPaymentGateway = Arc<dyn PaymentGateway>;
