use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config;
use crate::domain::checkout::CheckoutRequest;
use crate::domain::payment::{PaymentResult, PaymentStatus};
use crate::domain::ports::PaymentGateway;
use crate::error::{Result, StoreError};

/// `PaymentGateway` implementation against the storefront REST API.
///
/// Requests carry the session cookie jar (the backend authenticates checkout
/// calls) and a fixed timeout. Non-2xx responses of the backend's
/// `{"message": …}` shape become `StoreError::Gateway`.
pub struct ApiGateway {
    client: Client,
    base_url: String,
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config::REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    payment_status: PaymentStatus,
}

async fn gateway_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message: Some(message),
        }) => message,
        _ => "request failed".to_string(),
    };
    StoreError::Gateway { status, message }
}

#[async_trait]
impl PaymentGateway for ApiGateway {
    async fn submit_checkout(&self, request: &CheckoutRequest) -> Result<PaymentResult> {
        let response = self
            .client
            .post(self.url("/checkout"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(gateway_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn payment_status(&self, order_id: &str) -> Result<PaymentStatus> {
        let response = self
            .client
            .get(self.url(&format!("/checkout/status/{order_id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(gateway_error(response).await);
        }
        let body: StatusResponse = response.json().await?;
        Ok(body.payment_status)
    }
}
