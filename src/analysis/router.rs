use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::task::{JoinError, JoinHandle};
use tracing::error;

use super::domain::AnalysisRequest;
use super::service::{AnalysisServiceError, DocumentAnalysisService};
use super::synthesis::TextGenerator;
use crate::assessment::AnalysisFramework;

pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Router builder exposing the analysis and assessment endpoints.
pub fn analysis_router<G>(service: Arc<DocumentAnalysisService<G>>) -> Router
where
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/api/v1/analyze", post(analyze_handler::<G>))
        .route("/api/v1/analyze/raw", post(analyze_raw_handler::<G>))
        .route("/api/v1/risk/assess", post(assess_handler::<G>))
        .route("/api/v1/classify", post(classify_handler::<G>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    #[serde(flatten)]
    pub document: AnalysisRequest,
    #[serde(default)]
    pub framework: AnalysisFramework,
}

pub(crate) async fn analyze_handler<G>(
    State(service): State<Arc<DocumentAnalysisService<G>>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response
where
    G: TextGenerator + 'static,
{
    match payload {
        Ok(Json(request)) => run_pipeline(service, request).await,
        Err(rejection) => malformed_body(rejection),
    }
}

pub(crate) async fn analyze_raw_handler<G>(
    State(service): State<Arc<DocumentAnalysisService<G>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    G: TextGenerator + 'static,
{
    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let request = AnalysisRequest::from_bytes(&body, file_name);
    run_pipeline(service, request).await
}

pub(crate) async fn assess_handler<G>(
    State(service): State<Arc<DocumentAnalysisService<G>>>,
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Response
where
    G: TextGenerator + 'static,
{
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.assess(&payload.document, payload.framework) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn classify_handler<G>(
    State(service): State<Arc<DocumentAnalysisService<G>>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response
where
    G: TextGenerator + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.categorize(&request) {
        Ok(classification) => (StatusCode::OK, Json(classification)).into_response(),
        Err(err) => service_error(err),
    }
}

/// Runs the pipeline on its own task. A panicking stage surfaces as a 500; dropping the
/// guard when the client goes away aborts the task.
async fn run_pipeline<G>(
    service: Arc<DocumentAnalysisService<G>>,
    request: AnalysisRequest,
) -> Response
where
    G: TextGenerator + 'static,
{
    let task = AbortOnDrop(tokio::spawn(async move { service.analyze(request).await }));
    match task.await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(err)) => service_error(err),
        Err(join_error) => task_failure(join_error),
    }
}

fn service_error(err: AnalysisServiceError) -> Response {
    let status = match err {
        AnalysisServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        AnalysisServiceError::Analysis { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.kind(),
        "message": err.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn malformed_body(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": "Validation Error",
        "message": rejection.body_text(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn task_failure(join_error: JoinError) -> Response {
    error!(panicked = join_error.is_panic(), "analysis task did not complete");
    let payload = json!({
        "error": "Internal Server Error",
        "message": "An unexpected error occurred",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Future for AbortOnDrop<T> {
    type Output = Result<T, JoinError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().0).poll(cx)
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
