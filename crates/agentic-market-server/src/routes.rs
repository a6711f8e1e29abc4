use actix_web::{http::header, web, HttpRequest, HttpResponse};
use market::billing::to_usd;
use market::constants::SERVICE_VERSION;
use market::security::constant_time_eq;
use market::{ChargeStatus, Envelope, ErrorCode, Vector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metrics;
use crate::state::AppState;

/// Request fields are kept as raw JSON so the core can report its own error
/// codes for missing or wrongly-typed values.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Value,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    #[serde(default)]
    pub skill_id: Value,
    #[serde(default)]
    pub payload_b64: Value,
}

#[derive(Debug, Deserialize)]
pub struct LlmTxtRequest {
    #[serde(default)]
    pub domain: Value,
}

#[derive(Debug, Deserialize)]
pub struct UsageRequest {
    #[serde(default)]
    pub agent_id: Value,
    #[serde(default)]
    pub service_id: Value,
    #[serde(default)]
    pub units: Value,
}

#[derive(Debug, Deserialize)]
pub struct ListingRequest {
    #[serde(default)]
    pub service_id: Value,
    #[serde(default)]
    pub openapi_url: Value,
    #[serde(default)]
    pub llm_txt_url: Value,
}

/// Raw `Authorization` header; normalization is the authorizer's job.
fn credential(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

fn outcome(error: Option<ErrorCode>) -> String {
    error.map_or_else(|| "success".to_string(), |e| e.to_string())
}

/// Envelopes are always HTTP 200; the outcome lives in `success` and `error`.
fn respond<T: Serialize>(endpoint: &str, envelope: Envelope<T>) -> HttpResponse {
    metrics::REQUESTS
        .with_label_values(&[endpoint, outcome(envelope.error).as_str()])
        .inc();
    HttpResponse::Ok().json(envelope)
}

/// JSON body config: 64 KiB limit, malformed bodies become a plain 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(65_536)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "rejected request body");
            let resp = HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_request_body"
            }));
            actix_web::error::InternalError::from_response(err, resp).into()
        })
}

/// POST /v1/extract
pub async fn extract(
    req: HttpRequest,
    body: web::Json<ExtractRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let resp = market::extract_markdown(
        &state.authorizer,
        body.url.as_str(),
        &body.options,
        credential(&req),
    );
    respond("extract", resp)
}

/// POST /v1/skills/run
pub async fn run_skill(
    req: HttpRequest,
    body: web::Json<SkillRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let resp = market::run_skill(
        &state.authorizer,
        body.skill_id.as_str(),
        body.payload_b64.as_str(),
        credential(&req),
    );
    respond("run_skill", resp)
}

/// POST /v1/llm-txt
pub async fn llm_txt(
    req: HttpRequest,
    body: web::Json<LlmTxtRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let resp = market::generate_llm_txt(&state.authorizer, body.domain.as_str(), credential(&req));
    respond("llm_txt", resp)
}

/// POST /v1/billing/usage
pub async fn usage(
    req: HttpRequest,
    body: web::Json<UsageRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let resp = state
        .biller
        .create_usage_charge(
            &body.agent_id,
            body.service_id.as_str(),
            &body.units,
            credential(&req),
        )
        .await;

    let charge_status = match (&resp.body.charge, resp.error) {
        (Some(c), _) if c.status == ChargeStatus::Billed => Some("billed"),
        (Some(_), _) => Some("pending"),
        (None, Some(ErrorCode::StripeError)) => Some("failed"),
        (None, _) => None,
    };
    if let Some(status) = charge_status {
        metrics::CHARGES.with_label_values(&[status]).inc();
    }

    respond("usage", resp)
}

/// POST /v1/listing: no credential required.
pub async fn listing(body: web::Json<ListingRequest>) -> HttpResponse {
    let resp = market::publish_listing(
        body.service_id.as_str(),
        body.openapi_url.as_str(),
        body.llm_txt_url.as_str(),
    );
    respond("listing", resp)
}

/// GET /v1/service: what this vector sells and at what price.
pub async fn service_info(state: web::Data<AppState>) -> HttpResponse {
    let vector = state.config.vector;
    HttpResponse::Ok().json(serde_json::json!({
        "title": vector.title(),
        "version": SERVICE_VERSION,
        "capability": vector.capability(),
        "unit_price_usd": to_usd(vector.unit_price()),
        "currency": &state.config.currency,
        "services": vector.allowed_services(),
        "settlement": state.biller.settlement().label(),
    }))
}

/// GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": format!("vector-{}", state.config.vector),
        "version": SERVICE_VERSION,
    }))
}

/// GET /metrics: bearer-gated Prometheus output.
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match &state.config.metrics_token {
        Some(expected) => {
            let authorized = credential(&req)
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|token| constant_time_eq(token.as_bytes(), expected.as_bytes()))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None => {
            if !state.config.public_metrics {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "forbidden",
                    "message": "Set METRICS_TOKEN or MARKET_PUBLIC_METRICS=true to access /metrics"
                }));
            }
        }
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}

/// Mount the routes served by `vector`.
pub fn configure(cfg: &mut web::ServiceConfig, vector: Vector) {
    let capability = match vector {
        Vector::Extract => web::post().to(extract),
        Vector::Skills => web::post().to(run_skill),
        Vector::LlmTxt => web::post().to(llm_txt),
    };

    cfg.route(vector.capability_path(), capability)
        .route("/v1/billing/usage", web::post().to(usage))
        .route("/v1/listing", web::post().to(listing))
        .route("/v1/service", web::get().to(service_info))
        .route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics_endpoint));
}
