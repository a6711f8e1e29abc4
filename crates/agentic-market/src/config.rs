use std::sync::Arc;

use url::Url;

use crate::auth::Authorizer;
use crate::billing::{Settlement, UsageBiller};
use crate::constants::{DEFAULT_CURRENCY, DEFAULT_RATE_LIMIT_RPM, DEFAULT_STRIPE_API_BASE};
use crate::error::{ConfigError, ProviderError};
use crate::stripe::StripeClient;
use crate::vector::Vector;

/// Immutable process configuration for one vector, read once at startup.
#[derive(Clone)]
pub struct MarketConfig {
    pub vector: Vector,
    /// Shared auth secret (None = permissive dev mode)
    pub auth_token: Option<String>,
    /// Stripe secret key (None = charges are accepted optimistically)
    pub stripe_secret_key: Option<String>,
    /// Lowercase ISO 4217 currency for provider charges
    pub currency: String,
    pub stripe_api_base: String,
    pub port: u16,
    pub rate_limit_rpm: u64,
    /// CORS allowed origins (empty = localhost only)
    pub allowed_origins: Vec<String>,
    /// Bearer token required for /metrics
    pub metrics_token: Option<String>,
    /// Serve /metrics without a token
    pub public_metrics: bool,
}

impl std::fmt::Debug for MarketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketConfig")
            .field("vector", &self.vector)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "stripe_secret_key",
                &self.stripe_secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("currency", &self.currency)
            .field("stripe_api_base", &self.stripe_api_base)
            .field("port", &self.port)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field("allowed_origins", &self.allowed_origins)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("public_metrics", &self.public_metrics)
            .finish()
    }
}

impl MarketConfig {
    /// Defaults for a vector: permissive auth, optimistic billing, no metrics access.
    pub fn new(vector: Vector) -> Self {
        Self {
            vector,
            auth_token: None,
            stripe_secret_key: None,
            currency: DEFAULT_CURRENCY.to_string(),
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            port: vector.default_port(),
            rate_limit_rpm: DEFAULT_RATE_LIMIT_RPM,
            allowed_origins: Vec::new(),
            metrics_token: None,
            public_metrics: false,
        }
    }

    pub fn from_env(vector: Vector) -> Result<Self, ConfigError> {
        Self::from_lookup(vector, |name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(
        vector: Vector,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|s| !s.is_empty());
        let defaults = Self::new(vector);

        let auth_token = non_empty("API_AUTH_TOKEN");
        let stripe_secret_key = non_empty("STRIPE_SECRET_KEY");

        let currency = match non_empty("STRIPE_CURRENCY") {
            Some(c) => parse_currency(&c)?,
            None => defaults.currency,
        };

        let stripe_api_base = non_empty("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base);
        let parsed =
            Url::parse(&stripe_api_base).map_err(|_| ConfigError::InvalidUrl(stripe_api_base.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(stripe_api_base));
        }

        let port = non_empty("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let rate_limit_rpm = match non_empty("RATE_LIMIT_RPM") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(rpm) if rpm > 0 => rpm,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "RATE_LIMIT_RPM",
                        value: raw,
                    })
                }
            },
            None => defaults.rate_limit_rpm,
        };

        let allowed_origins: Vec<String> = non_empty("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        if let Some(wildcard) = allowed_origins.iter().find(|o| o.as_str() == "*") {
            return Err(ConfigError::InvalidValue {
                name: "ALLOWED_ORIGINS",
                value: wildcard.clone(),
            });
        }

        let metrics_token = non_empty("METRICS_TOKEN");
        let public_metrics = lookup("MARKET_PUBLIC_METRICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if auth_token.is_none() {
            tracing::warn!(
                "API_AUTH_TOKEN not set; any non-empty credential is accepted. \
                 Do not run like this in production."
            );
        }
        if stripe_secret_key.is_none() {
            tracing::warn!("STRIPE_SECRET_KEY not set; usage charges are accepted as pending");
        }

        Ok(Self {
            vector,
            auth_token,
            stripe_secret_key,
            currency,
            stripe_api_base,
            port,
            rate_limit_rpm,
            allowed_origins,
            metrics_token,
            public_metrics,
        })
    }

    pub fn authorizer(&self) -> Authorizer {
        Authorizer::new(self.vector.auth_scheme(), self.auth_token.clone())
    }

    /// Resolve the settlement strategy: Stripe when a key is configured.
    pub fn settlement(&self) -> Result<Settlement, ProviderError> {
        match &self.stripe_secret_key {
            Some(key) => Ok(Settlement::Provider(Arc::new(StripeClient::new(
                key,
                &self.stripe_api_base,
            )?))),
            None => Ok(Settlement::Optimistic),
        }
    }

    pub fn biller(&self) -> Result<UsageBiller, ProviderError> {
        Ok(UsageBiller::new(
            self.vector,
            self.authorizer(),
            self.settlement()?,
            self.currency.clone(),
        ))
    }
}

fn parse_currency(raw: &str) -> Result<String, ConfigError> {
    let code = raw.trim().to_ascii_lowercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_lowercase()) {
        Ok(code)
    } else {
        Err(ConfigError::InvalidCurrency(raw.to_string()))
    }
}
