use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPortfolioRepository};
use crate::routes::with_pendency_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use radar_cs::config::AppConfig;
use radar_cs::error::AppError;
use radar_cs::telemetry;
use radar_cs::workflows::intake::SnapshotImporter;
use radar_cs::workflows::pendencies::PendencyService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = match &config.portfolio.snapshot_path {
        Some(path) => {
            let snapshot = SnapshotImporter::from_path(path)?;
            info!(
                path = %path.display(),
                accounts = snapshot.accounts.len(),
                activities = snapshot.activities.len(),
                tasks = snapshot.tasks.len(),
                "portfolio snapshot loaded"
            );
            InMemoryPortfolioRepository::with_snapshot(snapshot)
        }
        None => {
            warn!("APP_SNAPSHOT_PATH not set; waiting for PUT /api/v1/portfolio");
            InMemoryPortfolioRepository::default()
        }
    };
    let pendency_service = Arc::new(PendencyService::new(
        Arc::new(repository),
        config.portfolio.pendencies.clone(),
    ));

    let app = with_pendency_routes(pendency_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "pendency radar ready");

    axum::serve(listener, app).await?;
    Ok(())
}
