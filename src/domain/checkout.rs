use serde::{Deserialize, Serialize};
use std::fmt;

use super::cart::{CartItem, Money, ProductKind};
use crate::config;

/// Buyer identification collected in the first wizard step.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub tax_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Customer {
    /// Names of the required fields that are blank after trimming.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.tax_id.trim().is_empty() {
            missing.push("taxId");
        }
        missing
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    Pix,
    Boleto,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::CreditCard => write!(f, "credit card"),
            PaymentMethod::Pix => write!(f, "PIX"),
            PaymentMethod::Boleto => write!(f, "boleto"),
        }
    }
}

/// Card data held only for the lifetime of a checkout session.
///
/// Never written to storage. `Debug` redacts the number and CCV so the session
/// can be logged without leaking card data.
#[derive(Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub holder_name: String,
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub ccv: String,
}

impl CreditCard {
    /// Names of the card fields that are blank after trimming.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.holder_name.trim().is_empty() {
            missing.push("holderName");
        }
        if self.number.trim().is_empty() {
            missing.push("number");
        }
        if self.expiry_month.trim().is_empty() {
            missing.push("expiryMonth");
        }
        if self.expiry_year.trim().is_empty() {
            missing.push("expiryYear");
        }
        if self.ccv.trim().is_empty() {
            missing.push("ccv");
        }
        missing
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("holder_name", &self.holder_name)
            .field("number", &"<redacted>")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("ccv", &"<redacted>")
            .finish()
    }
}

/// The three wizard states: customer data, payment method, result.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CheckoutStep {
    Customer,
    Payment,
    Result,
}

/// A cart line as submitted to the gateway.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub title: String,
    pub price: Money,
    pub quantity: u32,
    pub kind: ProductKind,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            price: item.price,
            quantity: item.quantity,
            kind: item.kind,
        }
    }
}

/// The checkout submission payload.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<OrderItem>,
    pub amount: Money,
    pub customer: Customer,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
}

/// One entry in the installment selector.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InstallmentPlan {
    pub installments: u32,
    /// Per-installment amount, rounded to the nearest cent.
    pub amount: Money,
}

/// The 1..=MAX_INSTALLMENTS plans for a given total.
pub fn installment_options(total: Money) -> Vec<InstallmentPlan> {
    (1..=config::MAX_INSTALLMENTS)
        .map(|n| InstallmentPlan {
            installments: n,
            amount: Money((total.cents() + u64::from(n) / 2) / u64::from(n)),
        })
        .collect()
}
