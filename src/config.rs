use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the storefront REST API.
pub const DEFAULT_API_BASE: &str = "http://localhost:3333";

/// Storage key the serialized cart items live under.
pub const CART_STORAGE_KEY: &str = "cart-items";

/// Delay between payment status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Timeout applied to every gateway request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest installment count offered for credit card payments.
pub const MAX_INSTALLMENTS: u32 = 12;

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("coursecart")
    } else {
        PathBuf::from(".coursecart")
    }
}
