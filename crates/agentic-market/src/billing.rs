//! Per-unit usage billing.
//!
//! A charge is priced from the vector's fixed unit price and, depending on
//! the [`Settlement`] strategy chosen at startup, either confirmed at the
//! payment provider or accepted optimistically as `pending`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::Authorizer;
use crate::capability::authorize;
use crate::constants::{AMOUNT_SCALE, MINOR_UNIT_DIVISOR};
use crate::error::ErrorCode;
use crate::provider::{ChargeMetadata, ChargeRequest, PaymentProvider};
use crate::response::{ChargeBody, ChargeResponse};
use crate::validation::parse_units;
use crate::vector::Vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// Priced but not confirmed by a provider.
    Pending,
    /// Confirmed by the payment provider.
    Billed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Echoed exactly as the caller sent it; `null` when absent.
    pub agent_id: Value,
    pub service_id: String,
    pub units: u64,
    pub amount_usd: f64,
    pub status: ChargeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}

/// `units * unit_price` in ten-thousandths of a dollar, `None` on overflow.
///
/// Both factors are integers at 4-decimal scale, so the product is already
/// rounded to 4 decimal places.
pub fn charge_amount(units: u64, unit_price: u64) -> Option<u64> {
    units.checked_mul(unit_price)
}

/// Dollar value of an amount held in ten-thousandths.
pub fn to_usd(amount: u64) -> f64 {
    amount as f64 / AMOUNT_SCALE as f64
}

/// Minor currency units (cents) of an amount held in ten-thousandths, truncating.
pub fn to_minor_units(amount: u64) -> u64 {
    amount / MINOR_UNIT_DIVISOR
}

/// Provider metadata form of an agent id: strings as-is, other non-null
/// values as their JSON text.
pub fn agent_label(agent_id: &Value) -> Option<String> {
    match agent_id {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// How charges are confirmed. Resolved once at startup.
#[derive(Clone)]
pub enum Settlement {
    /// No provider configured: charges are returned `pending`.
    Optimistic,
    /// Every charge is created at the provider before it is returned.
    Provider(Arc<dyn PaymentProvider>),
}

impl Settlement {
    pub fn label(&self) -> &'static str {
        match self {
            Settlement::Optimistic => "optimistic",
            Settlement::Provider(_) => "provider",
        }
    }
}

impl std::fmt::Debug for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Settlement::Optimistic => f.write_str("Optimistic"),
            Settlement::Provider(p) => f.debug_tuple("Provider").field(&p.name()).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UsageBiller {
    vector: Vector,
    authorizer: Authorizer,
    settlement: Settlement,
    currency: String,
}

impl UsageBiller {
    pub fn new(
        vector: Vector,
        authorizer: Authorizer,
        settlement: Settlement,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            vector,
            authorizer,
            settlement,
            currency: currency.into(),
        }
    }

    pub fn settlement(&self) -> &Settlement {
        &self.settlement
    }

    /// Price a usage event and, when a provider is configured, bill it.
    ///
    /// A provider failure yields `STRIPE_ERROR` and no charge at all.
    pub async fn create_usage_charge(
        &self,
        agent_id: &Value,
        service_id: Option<&str>,
        units: &Value,
        credential: Option<&str>,
    ) -> ChargeResponse {
        self.charge(agent_id, service_id, units, credential)
            .await
            .into()
    }

    async fn charge(
        &self,
        agent_id: &Value,
        service_id: Option<&str>,
        units: &Value,
        credential: Option<&str>,
    ) -> Result<ChargeBody, ErrorCode> {
        authorize(&self.authorizer, credential)?;
        let service_id = service_id
            .filter(|s| self.vector.allows_service(s))
            .ok_or(ErrorCode::UnknownService)?;
        let units = parse_units(units)?;
        let amount =
            charge_amount(units, self.vector.unit_price()).ok_or(ErrorCode::InvalidUnits)?;

        let mut charge = Charge {
            agent_id: agent_id.clone(),
            service_id: service_id.to_string(),
            units,
            amount_usd: to_usd(amount),
            status: ChargeStatus::Pending,
            payment_intent_id: None,
        };

        if let Settlement::Provider(provider) = &self.settlement {
            let request = ChargeRequest {
                amount_minor: to_minor_units(amount),
                currency: self.currency.clone(),
                metadata: ChargeMetadata {
                    agent_id: agent_label(&charge.agent_id),
                    service_id: charge.service_id.clone(),
                    units,
                },
            };
            match provider.create_charge(&request).await {
                Ok(remote) => {
                    charge.status = ChargeStatus::Billed;
                    charge.payment_intent_id = Some(remote.id);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        service_id,
                        units,
                        error = %e,
                        "provider charge failed"
                    );
                    return Err(ErrorCode::StripeError);
                }
            }
        }

        tracing::info!(
            vector = %self.vector,
            service_id,
            units,
            amount_usd = charge.amount_usd,
            status = ?charge.status,
            "usage charge created"
        );
        Ok(ChargeBody {
            charge: Some(charge),
        })
    }
}
