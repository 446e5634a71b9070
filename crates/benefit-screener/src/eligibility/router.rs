use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::ApplicantInput;
use super::repository::ScreenerRepository;
use super::service::{EvaluateCheckRequest, ScreenerEvaluationService, ScreenerServiceError};

/// Header carrying the authenticated requester, set by the upstream identity layer.
pub const REQUESTER_HEADER: &str = "x-user-id";

/// Router builder exposing the evaluation and catalog endpoints.
pub fn screener_router<R>(service: Arc<ScreenerEvaluationService<R>>) -> Router
where
    R: ScreenerRepository + 'static,
{
    Router::new()
        .route(
            "/api/published/:screener_id/evaluate",
            post(published_handler::<R>),
        )
        .route("/api/decision/v2", post(working_screener_handler::<R>))
        .route(
            "/api/decision/working-check",
            post(working_check_handler::<R>),
        )
        .route("/api/library-checks", get(library_checks_handler::<R>))
        .route(
            "/api/library-checks/:check_id",
            get(library_check_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScreenerQuery {
    #[serde(rename = "screenerId")]
    pub(crate) screener_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CheckQuery {
    #[serde(rename = "checkId")]
    pub(crate) check_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ModuleQuery {
    pub(crate) module: Option<String>,
}

fn requester(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUESTER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) async fn published_handler<R>(
    State(service): State<Arc<ScreenerEvaluationService<R>>>,
    Path(screener_id): Path<String>,
    axum::Json(input): axum::Json<ApplicantInput>,
) -> Response
where
    R: ScreenerRepository + 'static,
{
    match service.evaluate_published(&screener_id, &input).await {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn working_screener_handler<R>(
    State(service): State<Arc<ScreenerEvaluationService<R>>>,
    headers: HeaderMap,
    Query(query): Query<ScreenerQuery>,
    axum::Json(input): axum::Json<ApplicantInput>,
) -> Response
where
    R: ScreenerRepository + 'static,
{
    let screener_id = query.screener_id.unwrap_or_default();
    match service
        .evaluate_working(requester(&headers), &screener_id, &input)
        .await
    {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn working_check_handler<R>(
    State(service): State<Arc<ScreenerEvaluationService<R>>>,
    headers: HeaderMap,
    Query(query): Query<CheckQuery>,
    axum::Json(request): axum::Json<EvaluateCheckRequest>,
) -> Response
where
    R: ScreenerRepository + 'static,
{
    match service
        .evaluate_working_check(requester(&headers), query.check_id.as_deref(), request)
        .await
    {
        Ok(result) => (StatusCode::OK, axum::Json(json!({ "result": result }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn library_checks_handler<R>(
    State(service): State<Arc<ScreenerEvaluationService<R>>>,
    Query(query): Query<ModuleQuery>,
) -> Response
where
    R: ScreenerRepository + 'static,
{
    let catalog = service.catalog();
    let checks = match query.module.as_deref() {
        Some(module) => catalog.by_module(module),
        None => catalog.all().iter().collect(),
    };
    (StatusCode::OK, axum::Json(checks)).into_response()
}

pub(crate) async fn library_check_handler<R>(
    State(service): State<Arc<ScreenerEvaluationService<R>>>,
    Path(check_id): Path<String>,
) -> Response
where
    R: ScreenerRepository + 'static,
{
    match service.catalog().by_id(&check_id) {
        Some(check) => (StatusCode::OK, axum::Json(check)).into_response(),
        None => error_response(ScreenerServiceError::NotFound("check")),
    }
}

fn error_response(err: ScreenerServiceError) -> Response {
    match err {
        ScreenerServiceError::NotFound(_) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ScreenerServiceError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        ScreenerServiceError::BadRequest(message) => {
            let payload = json!({ "error": message });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        ScreenerServiceError::Evaluation(_) | ScreenerServiceError::Repository(_) => {
            error!(error = %err, "screener evaluation failed");
            let payload = json!({ "error": "internal server error" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
