use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{test, web, App};
use async_trait::async_trait;
use market::{
    ChargeRequest, MarketConfig, PaymentProvider, ProviderCharge, ProviderError, Settlement,
    Vector,
};
use serde_json::{json, Value};

use market_server::{routes, AppState};

const SECRET: &str = "test-secret";

#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
    fail: bool,
    last: Mutex<Option<ChargeRequest>>,
}

#[async_trait]
impl PaymentProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn create_charge(&self, request: &ChargeRequest) -> Result<ProviderCharge, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        if self.fail {
            return Err(ProviderError::Api {
                status: 402,
                message: "card declined".to_string(),
            });
        }
        Ok(ProviderCharge {
            id: "pi_test_123".to_string(),
        })
    }
}

fn config(vector: Vector) -> MarketConfig {
    let mut config = MarketConfig::new(vector);
    config.auth_token = Some(SECRET.to_string());
    config
}

fn make_state(config: MarketConfig, settlement: Settlement) -> web::Data<AppState> {
    web::Data::new(AppState::with_settlement(config, settlement))
}

macro_rules! app {
    ($state:expr, $vector:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .app_data(routes::json_config())
                .configure(|cfg| routes::configure(cfg, $vector)),
        )
        .await
    };
}

fn post(uri: &str, body: Value, auth: Option<&str>) -> test::TestRequest {
    let req = test::TestRequest::post().uri(uri).set_json(body);
    match auth {
        Some(auth) => req.insert_header(("Authorization", auth.to_string())),
        None => req,
    }
}

#[actix_rt::test]
async fn test_extract_returns_markdown_for_example_site() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = post(
        "/v1/extract",
        json!({"url": "https://example.com/page"}),
        Some("Bearer test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["markdown"], "# Example Site\n\nExtracted content.");
    assert_eq!(body["metadata"]["title"], "Example Site");
    assert_eq!(body["metadata"]["source_url"], "https://example.com/page");
}

#[actix_rt::test]
async fn test_extract_failure_is_still_http_200() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = post(
        "/v1/extract",
        json!({"url": "https://site-que-falla.com"}),
        Some("Bearer test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "EXTRACTION_FAILED");
    assert_eq!(body["markdown"], Value::Null);
    assert_eq!(body["metadata"], Value::Null);
}

#[actix_rt::test]
async fn test_extract_requires_bearer_prefix() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = post(
        "/v1/extract",
        json!({"url": "https://example.com"}),
        Some("test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[actix_rt::test]
async fn test_skills_accept_bare_token() {
    let state = make_state(config(Vector::Skills), Settlement::Optimistic);
    let app = app!(state, Vector::Skills);

    let req = post(
        "/v1/skills/run",
        json!({"skill_id": "pdf_financials", "payload_b64": "aGVsbG8="}),
        Some("test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["tables"], 1);
    assert_eq!(body["result"]["rows"], 10);
}

#[actix_rt::test]
async fn test_llm_txt_lowercase_bearer_accepted() {
    let state = make_state(config(Vector::LlmTxt), Settlement::Optimistic);
    let app = app!(state, Vector::LlmTxt);

    let req = post(
        "/v1/llm-txt",
        json!({"domain": "example.com"}),
        Some("bearer test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["llm_txt"], "site: example.com\nsummary: agentic-ready");
}

#[actix_rt::test]
async fn test_other_vector_capability_is_not_mounted() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = post(
        "/v1/llm-txt",
        json!({"domain": "example.com"}),
        Some("Bearer test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_usage_charge_optimistic_is_pending() {
    let state = make_state(config(Vector::Skills), Settlement::Optimistic);
    let app = app!(state, Vector::Skills);

    let req = post(
        "/v1/billing/usage",
        json!({"agent_id": "agent-1", "service_id": "run_skill", "units": 333}),
        Some("Bearer test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["charge"]["status"], "pending");
    assert_eq!(body["charge"]["amount_usd"], 16.65);
    assert_eq!(body["charge"]["units"], 333);
    assert!(body["charge"].get("payment_intent_id").is_none());
}

#[actix_rt::test]
async fn test_usage_charge_billed_through_provider() {
    let provider = Arc::new(CountingProvider::default());
    let state = make_state(config(Vector::Extract), Settlement::Provider(provider.clone()));
    let app = app!(state, Vector::Extract);

    let req = post(
        "/v1/billing/usage",
        json!({"service_id": "extract_markdown", "units": 10}),
        Some("Bearer test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["charge"]["status"], "billed");
    assert_eq!(body["charge"]["payment_intent_id"], "pi_test_123");
    assert_eq!(body["charge"]["agent_id"], Value::Null);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[actix_rt::test]
async fn test_usage_charge_echoes_numeric_agent_id() {
    let provider = Arc::new(CountingProvider::default());
    let state = make_state(config(Vector::Skills), Settlement::Provider(provider.clone()));
    let app = app!(state, Vector::Skills);

    let req = post(
        "/v1/billing/usage",
        json!({"agent_id": 42, "service_id": "run_skill", "units": 2}),
        Some("test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["charge"]["agent_id"], 42);
    assert_eq!(body["charge"]["status"], "billed");

    let sent = provider.last.lock().unwrap().clone().unwrap();
    assert_eq!(sent.metadata.agent_id.as_deref(), Some("42"));
    assert_eq!(sent.metadata.units, 2);
    assert_eq!(sent.amount_minor, 10);
}

#[actix_rt::test]
async fn test_usage_charge_provider_failure_hides_details() {
    let provider = Arc::new(CountingProvider {
        fail: true,
        ..Default::default()
    });
    let state = make_state(config(Vector::LlmTxt), Settlement::Provider(provider.clone()));
    let app = app!(state, Vector::LlmTxt);

    let req = post(
        "/v1/billing/usage",
        json!({"service_id": "generate_llm_txt", "units": 1}),
        Some("test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "STRIPE_ERROR");
    assert_eq!(body["charge"], Value::Null);
    assert!(!body.to_string().contains("card declined"));
}

#[actix_rt::test]
async fn test_unauthorized_charge_never_reaches_provider() {
    let provider = Arc::new(CountingProvider::default());
    let state = make_state(config(Vector::Skills), Settlement::Provider(provider.clone()));
    let app = app!(state, Vector::Skills);

    let req = post(
        "/v1/billing/usage",
        json!({"service_id": "run_skill", "units": 1}),
        Some("Bearer wrong"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[actix_rt::test]
async fn test_usage_rejects_foreign_service() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = post(
        "/v1/billing/usage",
        json!({"service_id": "run_skill", "units": 1}),
        Some("Bearer test-secret"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNKNOWN_SERVICE");
}

#[actix_rt::test]
async fn test_listing_needs_no_credential() {
    let state = make_state(config(Vector::LlmTxt), Settlement::Optimistic);
    let app = app!(state, Vector::LlmTxt);

    let req = post(
        "/v1/listing",
        json!({
            "service_id": "svc-1",
            "openapi_url": "https://example.com/openapi.json",
            "llm_txt_url": "https://example.com/llm.txt"
        }),
        None,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["listing"]["service_id"], "svc-1");
}

#[actix_rt::test]
async fn test_listing_blank_service_wins_over_bad_urls() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = post(
        "/v1/listing",
        json!({"service_id": "   ", "openapi_url": "http://x", "llm_txt_url": "ftp://y"}),
        None,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_SERVICE");
    assert_eq!(body["listing"], Value::Null);
}

#[actix_rt::test]
async fn test_malformed_json_is_rejected() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = test::TestRequest::post()
        .uri("/v1/extract")
        .set_payload("{not json")
        .insert_header(("Content-Type", "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_request_body");
}

#[actix_rt::test]
async fn test_service_info_describes_vector() {
    let state = make_state(config(Vector::LlmTxt), Settlement::Optimistic);
    let app = app!(state, Vector::LlmTxt);

    let req = test::TestRequest::get().uri("/v1/service").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Vector 3 - LLM.TXT Generator");
    assert_eq!(body["version"], "1.1");
    assert_eq!(body["capability"], "generate_llm_txt");
    assert_eq!(body["unit_price_usd"], 0.03);
    assert_eq!(body["currency"], "usd");
    assert_eq!(body["settlement"], "optimistic");
    assert_eq!(
        body["services"],
        json!(["generate_llm_txt", "create_usage_charge", "publish_listing"])
    );
}

#[actix_rt::test]
async fn test_health() {
    let state = make_state(config(Vector::Skills), Settlement::Optimistic);
    let app = app!(state, Vector::Skills);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "vector-skills");
}

#[actix_rt::test]
async fn test_metrics_forbidden_without_token_or_opt_in() {
    let state = make_state(config(Vector::Extract), Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn test_metrics_requires_matching_token() {
    let mut cfg = config(Vector::Extract);
    cfg.metrics_token = Some("scrape-me".to_string());
    let state = make_state(cfg, Settlement::Optimistic);
    let app = app!(state, Vector::Extract);

    let req = test::TestRequest::get()
        .uri("/metrics")
        .insert_header(("Authorization", "Bearer nope"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // Generate at least one sample before scraping.
    let req = post(
        "/v1/extract",
        json!({"url": "https://example.com"}),
        Some("Bearer test-secret"),
    )
    .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/metrics")
        .insert_header(("Authorization", "Bearer scrape-me"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("market_requests_total"));
}

#[actix_rt::test]
async fn test_public_metrics_opt_in() {
    let mut cfg = config(Vector::Skills);
    cfg.public_metrics = true;
    let state = make_state(cfg, Settlement::Optimistic);
    let app = app!(state, Vector::Skills);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
}
