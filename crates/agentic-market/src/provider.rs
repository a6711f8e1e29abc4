//! The external payment provider seam used by the usage biller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Metadata attached to every remote charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeMetadata {
    pub agent_id: Option<String>,
    pub service_id: String,
    pub units: u64,
}

/// A charge to create at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount in minor currency units (cents for `usd`).
    pub amount_minor: u64,
    /// Lowercase ISO 4217 code.
    pub currency: String,
    pub metadata: ChargeMetadata,
}

/// A charge the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCharge {
    pub id: String,
}

/// Creates charges at an external payment provider.
///
/// Implementations make a single attempt per call and never retry.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn create_charge(&self, request: &ChargeRequest) -> Result<ProviderCharge, ProviderError>;
}
