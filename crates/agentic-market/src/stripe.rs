//! Stripe PaymentIntents client.
//!
//! Only the single call the biller needs is implemented: create a payment
//! intent for an amount in minor units, tagged with usage metadata.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::provider::{ChargeRequest, PaymentProvider, ProviderCharge};

#[derive(Deserialize)]
struct PaymentIntent {
    id: String,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl StripeClient {
    pub fn new(secret_key: &str, api_base: &str) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProviderError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    fn form(request: &ChargeRequest) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("amount", request.amount_minor.to_string()),
            ("currency", request.currency.clone()),
            ("metadata[service_id]", request.metadata.service_id.clone()),
            ("metadata[units]", request.metadata.units.to_string()),
        ];
        if let Some(agent_id) = &request.metadata.agent_id {
            form.push(("metadata[agent_id]", agent_id.clone()));
        }
        form
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_charge(&self, request: &ChargeRequest) -> Result<ProviderCharge, ProviderError> {
        let url = format!("{}/v1/payment_intents", self.api_base);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&Self::form(request))
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("payment intent request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(ProviderCharge { id: intent.id })
    }
}
