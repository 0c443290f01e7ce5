use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::domain::{parse_instant, CsmFilter, PendingKind};
use super::repository::{PortfolioRepository, RepositoryError};
use super::service::{PendencyQuery, PendencyService, PendencyServiceError};
use crate::workflows::intake::SnapshotImporter;

/// Router builder exposing the pendency report over HTTP.
pub fn pendency_router<R>(service: Arc<PendencyService<R>>) -> Router
where
    R: PortfolioRepository + 'static,
{
    Router::new()
        .route("/api/v1/pendencies", get(report_handler::<R>))
        .route("/api/v1/pendencies/evaluate", post(evaluate_handler::<R>))
        .route("/api/v1/portfolio", put(replace_handler::<R>))
        .route("/api/v1/csms", get(csms_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PendencyParams {
    #[serde(default)]
    pub(crate) csm: Option<String>,
    #[serde(default)]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) now: Option<String>,
}

impl PendencyParams {
    fn into_query(self) -> Result<PendencyQuery, String> {
        let kind = self
            .kind
            .as_deref()
            .filter(|raw| !raw.trim().is_empty() && raw.trim() != "all")
            .map(|raw| PendingKind::parse(raw).ok_or_else(|| format!("unknown pendency type '{raw}'")))
            .transpose()?;
        let now = self.now.as_deref().map(parse_instant).transpose()?;

        Ok(PendencyQuery {
            csm: CsmFilter::parse(self.csm.as_deref()),
            kind,
            now,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    pub(crate) portfolio: Value,
    #[serde(flatten)]
    pub(crate) params: PendencyParams,
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<PendencyService<R>>>,
    Query(params): Query<PendencyParams>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    let query = match params.into_query() {
        Ok(query) => query,
        Err(message) => return bad_request(message),
    };

    match service.report(&query) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<PendencyService<R>>>,
    body: Result<axum::Json<EvaluateRequest>, JsonRejection>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    let axum::Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let query = match request.params.into_query() {
        Ok(query) => query,
        Err(message) => return bad_request(message),
    };
    let snapshot = match SnapshotImporter::from_value(request.portfolio) {
        Ok(snapshot) => snapshot,
        Err(err) => return bad_request(err.to_string()),
    };

    let listing = service.evaluate(&snapshot, &query);
    (StatusCode::OK, axum::Json(listing)).into_response()
}

pub(crate) async fn replace_handler<R>(
    State(service): State<Arc<PendencyService<R>>>,
    body: Result<axum::Json<Value>, JsonRejection>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    let axum::Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let snapshot = match SnapshotImporter::from_value(payload) {
        Ok(snapshot) => snapshot,
        Err(err) => return bad_request(err.to_string()),
    };

    match service.replace_snapshot(snapshot) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn csms_handler<R>(State(service): State<Arc<PendencyService<R>>>) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.csms() {
        Ok(csms) => (StatusCode::OK, axum::Json(json!({ "csms": csms }))).into_response(),
        Err(err) => service_error(err),
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn service_error(err: PendencyServiceError) -> Response {
    warn!(error = %err, "pendency request failed");
    let status = match err {
        PendencyServiceError::Repository(RepositoryError::NotLoaded) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        PendencyServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
