use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire-level error codes returned in the `error` field of every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    #[error("UNAUTHORIZED")]
    Unauthorized,

    #[error("INVALID_URL")]
    InvalidUrl,

    #[error("INVALID_DOMAIN")]
    InvalidDomain,

    #[error("INVALID_PAYLOAD")]
    InvalidPayload,

    #[error("INVALID_SERVICE")]
    InvalidService,

    #[error("UNKNOWN_SERVICE")]
    UnknownService,

    #[error("UNKNOWN_SKILL")]
    UnknownSkill,

    #[error("INVALID_UNITS")]
    InvalidUnits,

    #[error("EXTRACTION_FAILED")]
    ExtractionFailed,

    #[error("CRAWL_FAILED")]
    CrawlFailed,

    #[error("SKILL_FAILED")]
    SkillFailed,

    #[error("STRIPE_ERROR")]
    StripeError,
}

/// Errors returned by a payment provider when creating a charge.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(String),

    #[error("provider rejected charge ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while building configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
