//! HTTP payment gateway client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{customers::records::CustomerRecord, orders::records::OrderRecord},
    payments::{PaymentGateway, PaymentGatewayError, PaymentSession},
};

/// Configuration for connecting to the payment gateway.
#[derive(Debug, Clone)]
pub struct PaymentGatewayConfig {
    /// Gateway base URL, e.g. `"https://pay.example.com"`.
    pub base_url: String,

    /// Merchant API key, sent as a bearer token.
    pub api_key: String,

    /// Where the gateway sends the customer after paying.
    pub return_url: String,
}

/// Payment gateway reached over its JSON API.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    config: PaymentGatewayConfig,
    http: Client,
}

impl HttpPaymentGateway {
    #[must_use]
    pub fn new(config: PaymentGatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/sessions", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    order_uuid: String,
    customer_uuid: String,
    customer_name: &'a str,
    currency: &'a str,
    amount: i64,
    return_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    redirect_url: Option<String>,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[tracing::instrument(
        name = "payments.gateway.create_payment_session",
        skip(self, order, customer),
        fields(order_uuid = %order.uuid),
        err
    )]
    async fn create_payment_session(
        &self,
        order: &OrderRecord,
        customer: &CustomerRecord,
        amount_due: i64,
    ) -> Result<PaymentSession, PaymentGatewayError> {
        let body = SessionRequest {
            order_uuid: order.uuid.to_string(),
            customer_uuid: customer.uuid.to_string(),
            customer_name: &customer.name,
            currency: &order.currency,
            amount: amount_due,
            return_url: &self.config.return_url,
        };

        let response = self
            .http
            .post(self.sessions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PaymentGatewayError::UnexpectedResponse(format!(
                "session request failed with status {status}: {text}"
            )));
        }

        let parsed: SessionResponse = response.json().await?;

        let redirect_url = parsed.redirect_url.filter(|url| !url.is_empty()).ok_or_else(|| {
            PaymentGatewayError::UnexpectedResponse("session has no redirect url".to_string())
        })?;

        Ok(PaymentSession { redirect_url })
    }
}
