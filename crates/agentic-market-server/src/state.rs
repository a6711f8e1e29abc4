use market::{Authorizer, MarketConfig, ProviderError, Settlement, UsageBiller};
use std::sync::Arc;

/// Read-only state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MarketConfig>,
    pub authorizer: Authorizer,
    pub biller: UsageBiller,
}

impl AppState {
    /// Resolve the settlement strategy from the configuration.
    pub fn new(config: MarketConfig) -> Result<Self, ProviderError> {
        let settlement = config.settlement()?;
        Ok(Self::with_settlement(config, settlement))
    }

    pub fn with_settlement(config: MarketConfig, settlement: Settlement) -> Self {
        let authorizer = config.authorizer();
        let biller = UsageBiller::new(
            config.vector,
            authorizer.clone(),
            settlement,
            config.currency.clone(),
        );
        Self {
            config: Arc::new(config),
            authorizer,
            biller,
        }
    }
}
