//! Payments Config

use clap::Args;

use storefront_app::payments::PaymentGatewayConfig;

/// Hosted payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment gateway base URL
    #[arg(long, env = "PAYMENT_GATEWAY_URL")]
    pub payment_gateway_url: String,

    /// Merchant API key
    #[arg(long, env = "PAYMENT_GATEWAY_API_KEY", hide_env_values = true)]
    pub payment_gateway_api_key: String,

    /// Where the gateway returns customers after paying
    #[arg(long, env = "PAYMENT_RETURN_URL")]
    pub payment_return_url: String,
}

impl PaymentsConfig {
    #[must_use]
    pub fn gateway_config(&self) -> PaymentGatewayConfig {
        PaymentGatewayConfig {
            base_url: self.payment_gateway_url.clone(),
            api_key: self.payment_gateway_api_key.clone(),
            return_url: self.payment_return_url.clone(),
        }
    }
}
