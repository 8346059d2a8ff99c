use serde::{Deserialize, Serialize};

/// Settlement status reported by the payment status endpoint.
///
/// The backend grows statuses over time; anything unrecognized lands on
/// `Unknown` and is treated as inconclusive by the watcher.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Declined,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

/// What the gateway answered to a checkout submission, tagged by rail.
///
/// One variant per payment method keeps inconsistent combinations (a response
/// carrying both PIX and boleto data) unrepresentable.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "paymentMethod")]
pub enum PaymentResult {
    #[serde(rename = "CREDIT_CARD", rename_all = "camelCase")]
    CreditCard {
        order_id: String,
        status: PaymentStatus,
    },
    #[serde(rename = "PIX", rename_all = "camelCase")]
    Pix {
        order_id: String,
        /// Copy-paste payload of the PIX charge.
        payload: String,
        /// Base64-encoded QR code image.
        qr_code_image: String,
        expiration_date: String,
    },
    #[serde(rename = "BOLETO", rename_all = "camelCase")]
    Boleto {
        order_id: String,
        url: String,
        barcode: String,
    },
}

impl PaymentResult {
    pub fn order_id(&self) -> &str {
        match self {
            PaymentResult::CreditCard { order_id, .. }
            | PaymentResult::Pix { order_id, .. }
            | PaymentResult::Boleto { order_id, .. } => order_id,
        }
    }
}
