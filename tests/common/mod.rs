#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use coursecart::domain::cart::{Money, NewCartItem, ProductKind};
use coursecart::domain::checkout::CheckoutRequest;
use coursecart::domain::payment::{PaymentResult, PaymentStatus};
use coursecart::domain::ports::{CartStorage, PaymentGateway};
use coursecart::error::{Result, StoreError};

pub fn course(id: &str, price: u64) -> NewCartItem {
    NewCartItem {
        id: id.to_string(),
        title: format!("Course {id}"),
        description: None,
        price: Money(price),
        kind: ProductKind::Course,
        thumbnail_url: None,
    }
}

pub fn pix_result(order_id: &str) -> PaymentResult {
    PaymentResult::Pix {
        order_id: order_id.to_string(),
        payload: "00020126580014br.gov.bcb.pix".to_string(),
        qr_code_image: "aGVsbG8=".to_string(),
        expiration_date: "2026-08-05T12:00:00Z".to_string(),
    }
}

pub fn card_result(order_id: &str, status: PaymentStatus) -> PaymentResult {
    PaymentResult::CreditCard {
        order_id: order_id.to_string(),
        status,
    }
}

pub fn boleto_result(order_id: &str) -> PaymentResult {
    PaymentResult::Boleto {
        order_id: order_id.to_string(),
        url: format!("https://bank.example/{order_id}.pdf"),
        barcode: "34191790010104351004791020150008291070026000".to_string(),
    }
}

/// A gateway that replays scripted responses and records every submission.
#[derive(Default)]
pub struct ScriptedGateway {
    submit_script: Mutex<VecDeque<Result<PaymentResult>>>,
    status_script: Mutex<VecDeque<Result<PaymentStatus>>>,
    submissions: Mutex<Vec<CheckoutRequest>>,
    status_delay: Option<Duration>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submit(self, result: Result<PaymentResult>) -> Self {
        self.submit_script.lock().unwrap().push_back(result);
        self
    }

    pub fn with_statuses(self, statuses: Vec<Result<PaymentStatus>>) -> Self {
        self.status_script.lock().unwrap().extend(statuses);
        self
    }

    /// Makes every status poll take `delay` before resolving.
    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = Some(delay);
        self
    }

    pub fn submissions(&self) -> Vec<CheckoutRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn status_polls_remaining(&self) -> usize {
        self.status_script.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn submit_checkout(&self, request: &CheckoutRequest) -> Result<PaymentResult> {
        self.submissions.lock().unwrap().push(request.clone());
        self.submit_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(StoreError::Validation(
                    "no scripted submit response".to_string(),
                ))
            })
    }

    async fn payment_status(&self, _order_id: &str) -> Result<PaymentStatus> {
        if let Some(delay) = self.status_delay {
            tokio::time::sleep(delay).await;
        }
        self.status_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(PaymentStatus::Pending))
    }
}

/// Storage whose every operation fails, for exercising the swallow paths.
pub struct FailingStorage;

impl CartStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(StoreError::Io(io::Error::other("storage offline")))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StoreError::Io(io::Error::other("storage offline")))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(StoreError::Io(io::Error::other("storage offline")))
    }
}
