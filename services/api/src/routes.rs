use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use radar_cs::workflows::pendencies::{pendency_router, PendencyService, PortfolioRepository};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_pendency_routes<R>(service: Arc<PendencyService<R>>) -> axum::Router
where
    R: PortfolioRepository + 'static,
{
    pendency_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryPortfolioRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use radar_cs::workflows::intake::SnapshotImporter;
    use radar_cs::workflows::pendencies::PendencyConfig;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(repository: InMemoryPortfolioRepository, ready: bool) -> axum::Router {
        let service = Arc::new(PendencyService::new(
            Arc::new(repository),
            PendencyConfig::default(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_pendency_routes(service).layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        let response = app(InMemoryPortfolioRepository::default(), false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "initializing");

        let response = app(InMemoryPortfolioRepository::default(), true)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_metrics_respond() {
        let response = app(InMemoryPortfolioRepository::default(), true)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));

        let response = app(InMemoryPortfolioRepository::default(), true)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn pendencies_are_unavailable_until_a_portfolio_is_loaded() {
        let response = app(InMemoryPortfolioRepository::default(), true)
            .oneshot(Request::get("/api/v1/pendencies").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let snapshot = SnapshotImporter::from_value(json!({
            "accounts": [{ "id": "acc-1", "name": "Acme", "csm": "Ana", "health_score": 0 }]
        }))
        .expect("portfolio parses");
        let response = app(InMemoryPortfolioRepository::with_snapshot(snapshot), true)
            .oneshot(
                Request::get("/api/v1/pendencies?csm=Ana")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["summary"]["totalAccountsWithPending"], 1);
        assert_eq!(payload["accountsWithPendencies"][0]["urgencyLevel"], "red");
    }
}
