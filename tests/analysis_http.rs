use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use doc_analyzer::analysis::{
    analysis_router, AnalysisRules, DocumentAnalysisService, GenerationError, ScriptedGenerator,
    TextGenerator,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn reference_router() -> axum::Router {
    analysis_router(Arc::new(DocumentAnalysisService::new(
        AnalysisRules::default(),
        ScriptedGenerator::reference(),
    )))
}

#[tokio::test]
async fn analyze_returns_camel_case_response() {
    let response = reference_router()
        .oneshot(post_json(
            "/api/v1/analyze",
            json!({
                "text": "Non-Disclosure Agreement protecting confidential information",
                "fileName": "nda.txt"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["documentType"], "Non-Disclosure Agreement");
    assert_eq!(body["riskCategory"], "Data Privacy");
    assert_eq!(body["keyPoints"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["risks"][0]["level"], "HIGH");
    assert_eq!(body["metadata"]["analyzerVersion"], "1.0.0");
}

#[tokio::test]
async fn oversized_text_is_a_client_error() {
    let response = reference_router()
        .oneshot(post_json(
            "/api/v1/analyze",
            json!({ "text": "a".repeat(50_001) }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(
        body["message"],
        "Text exceeds maximum length of 50000 characters"
    );
}

#[tokio::test]
async fn binary_text_is_a_client_error() {
    let response = reference_router()
        .oneshot(post_json(
            "/api/v1/analyze",
            json!({ "text": "PK\u{3}\u{4} zipped contract" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("binary content detected"));
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

struct HangingGenerator {
    started: Arc<AtomicBool>,
    dropped: Arc<AtomicBool>,
}

impl TextGenerator for HangingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        let _flag = DropFlag(self.dropped.clone());
        self.started.store(true, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(String::new())
    }
}

async fn wait_for(flag: &AtomicBool) -> bool {
    for _ in 0..200 {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn dropping_the_request_aborts_generation() {
    let started = Arc::new(AtomicBool::new(false));
    let dropped = Arc::new(AtomicBool::new(false));
    let service = DocumentAnalysisService::with_timeout(
        AnalysisRules::default(),
        HangingGenerator {
            started: started.clone(),
            dropped: dropped.clone(),
        },
        Duration::from_secs(300),
    );
    let router = analysis_router(Arc::new(service));

    let in_flight = tokio::spawn(router.oneshot(post_json(
        "/api/v1/analyze",
        json!({ "text": "Vendor contract under negotiation" }),
    )));

    assert!(wait_for(&started).await, "generation never started");
    assert!(!dropped.load(Ordering::SeqCst));

    in_flight.abort();
    assert!(
        wait_for(&dropped).await,
        "generation kept running after the request was dropped"
    );
}
