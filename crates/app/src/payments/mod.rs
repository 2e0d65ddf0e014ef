//! Payment Gateway
//!
//! Hosted payment sessions for orders paid online. The gateway is opaque:
//! only the redirect URL of a created session is interpreted.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{customers::records::CustomerRecord, orders::records::OrderRecord};

mod http;

pub use http::{HttpPaymentGateway, PaymentGatewayConfig};

/// A hosted payment session the customer is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Where to send the customer to pay
    pub redirect_url: String,
}

/// Errors that can occur when creating a payment session.
#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response or an unexpected body.
    #[error("unexpected response from payment gateway: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment session for `amount_due` minor units of the order's currency.
    async fn create_payment_session(
        &self,
        order: &OrderRecord,
        customer: &CustomerRecord,
        amount_due: i64,
    ) -> Result<PaymentSession, PaymentGatewayError>;
}
