//! HTTP surface for the agentic market vectors.
//!
//! Each vector binary mounts its own capability route next to the shared
//! usage-billing, listing, service-info, health and metrics routes.

pub mod cors;
pub mod metrics;
pub mod routes;
pub mod state;

pub use state::AppState;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use market::{MarketConfig, Vector};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load configuration for `vector` from the environment and serve until shutdown.
pub async fn run(vector: Vector) -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    init_tracing();

    let config = MarketConfig::from_env(vector).map_err(|e| {
        tracing::error!("invalid configuration: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();
    let rate_limit_rpm = config.rate_limit_rpm;

    let state = AppState::new(config).map_err(std::io::Error::other)?;

    tracing::info!("Starting {} on port {}", vector.title(), port);
    tracing::info!("Capability route: POST {}", vector.capability_path());
    tracing::info!(
        "Auth: {}",
        if state.authorizer.is_permissive() {
            "disabled (dev mode)"
        } else {
            "enabled"
        }
    );
    tracing::info!("Settlement: {}", state.biller.settlement().label());

    metrics::register_metrics();

    let state_data = web::Data::new(state);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_minute(rate_limit_rpm)
        .finish()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid rate limiter configuration",
            )
        })?;

    HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .app_data(routes::json_config())
            .wrap(Logger::default())
            .wrap(cors::build_cors(&allowed_origins))
            .wrap(Governor::new(&governor_conf))
            .configure(|cfg| routes::configure(cfg, vector))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
