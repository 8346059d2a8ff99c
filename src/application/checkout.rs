use crate::application::cart_store::CartStore;
use crate::config;
use crate::domain::checkout::{
    CheckoutRequest, CheckoutStep, CreditCard, Customer, OrderItem, PaymentMethod,
};
use crate::domain::payment::{PaymentResult, PaymentStatus};
use crate::domain::ports::SharedPaymentGateway;
use crate::error::{Result, StoreError};

/// The three-step checkout wizard.
///
/// Linear with one branch: customer data, then payment method, then the
/// rail-specific result. The session lives only as long as the wizard; closing
/// it discards everything, card fields included.
///
/// Submission cannot race itself: `submit_payment` takes `&mut self`, so a
/// second submission can only start after the first returned.
pub struct CheckoutFlow {
    gateway: SharedPaymentGateway,
    step: CheckoutStep,
    customer: Customer,
    payment_method: Option<PaymentMethod>,
    credit_card: Option<CreditCard>,
    installments: u32,
    result: Option<PaymentResult>,
}

impl CheckoutFlow {
    pub fn new(gateway: SharedPaymentGateway) -> Self {
        Self {
            gateway,
            step: CheckoutStep::Customer,
            customer: Customer::default(),
            payment_method: None,
            credit_card: None,
            installments: 1,
            result: None,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn result(&self) -> Option<&PaymentResult> {
        self.result.as_ref()
    }

    /// Step 1: validate and store the customer, then advance.
    ///
    /// Required fields must be non-blank; validation failures keep the wizard
    /// in the customer step and never reach the network.
    pub fn submit_customer(&mut self, customer: Customer) -> Result<()> {
        if self.step != CheckoutStep::Customer {
            return Err(StoreError::Validation(
                "customer data was already submitted".to_string(),
            ));
        }

        let missing = customer.missing_fields();
        if !missing.is_empty() {
            return Err(StoreError::Validation(format!(
                "required customer fields are blank: {}",
                missing.join(", ")
            )));
        }

        self.customer = customer;
        self.step = CheckoutStep::Payment;
        tracing::debug!("checkout advanced to payment step");
        Ok(())
    }

    pub fn select_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
    }

    pub fn set_credit_card(&mut self, card: CreditCard) {
        self.credit_card = Some(card);
    }

    /// Chooses the installment count for credit card payments.
    pub fn set_installments(&mut self, installments: u32) -> Result<()> {
        if installments == 0 || installments > config::MAX_INSTALLMENTS {
            return Err(StoreError::Validation(format!(
                "installments must be between 1 and {}",
                config::MAX_INSTALLMENTS
            )));
        }
        self.installments = installments;
        Ok(())
    }

    /// Step 2: package the cart and submit it to the gateway, exactly once.
    ///
    /// On success the wizard advances to the result step; a confirmed credit
    /// card payment also clears the cart. On gateway failure the wizard stays
    /// in the payment step with the session intact, and the caller decides
    /// whether to resubmit.
    pub async fn submit_payment(&mut self, cart: &mut CartStore) -> Result<&PaymentResult> {
        if self.step != CheckoutStep::Payment {
            return Err(StoreError::Validation(
                "checkout is not in the payment step".to_string(),
            ));
        }
        if cart.items().is_empty() {
            return Err(StoreError::Validation("the cart is empty".to_string()));
        }
        let Some(method) = self.payment_method else {
            return Err(StoreError::Validation(
                "no payment method selected".to_string(),
            ));
        };

        let request = self.build_request(cart, method)?;
        let result = self.gateway.submit_checkout(&request).await?;

        tracing::debug!(order_id = result.order_id(), %method, "checkout submitted");
        self.step = CheckoutStep::Result;

        if let PaymentResult::CreditCard {
            status: PaymentStatus::Confirmed,
            ..
        } = result
        {
            cart.clear();
        }

        Ok(self.result.insert(result))
    }

    fn build_request(&self, cart: &CartStore, method: PaymentMethod) -> Result<CheckoutRequest> {
        let credit_card = match method {
            PaymentMethod::CreditCard => {
                let Some(card) = self.credit_card.clone() else {
                    return Err(StoreError::Validation(
                        "credit card data is required".to_string(),
                    ));
                };
                let missing = card.missing_fields();
                if !missing.is_empty() {
                    return Err(StoreError::Validation(format!(
                        "required card fields are blank: {}",
                        missing.join(", ")
                    )));
                }
                Some(card)
            }
            PaymentMethod::Pix | PaymentMethod::Boleto => None,
        };

        Ok(CheckoutRequest {
            items: cart.items().iter().map(OrderItem::from).collect(),
            amount: cart.total(),
            customer: self.customer.clone(),
            payment_method: method,
            credit_card,
            installments: match method {
                PaymentMethod::CreditCard => Some(self.installments),
                _ => None,
            },
        })
    }

    /// Cancels the wizard: back to step 1, session discarded.
    pub fn close(&mut self) {
        self.step = CheckoutStep::Customer;
        self.customer = Customer::default();
        self.payment_method = None;
        self.credit_card = None;
        self.installments = 1;
        self.result = None;
    }
}
