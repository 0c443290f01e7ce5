use metrics_exporter_prometheus::PrometheusHandle;
use radar_cs::workflows::pendencies::{
    PendingKind, PortfolioRepository, PortfolioSnapshot, RepositoryError,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Holds the portfolio the server scores; `None` until one is loaded.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPortfolioRepository {
    snapshot: Arc<RwLock<Option<PortfolioSnapshot>>>,
}

impl InMemoryPortfolioRepository {
    pub(crate) fn with_snapshot(snapshot: PortfolioSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(snapshot))),
        }
    }
}

impl PortfolioRepository for InMemoryPortfolioRepository {
    fn snapshot(&self) -> Result<PortfolioSnapshot, RepositoryError> {
        let guard = self
            .snapshot
            .read()
            .map_err(|_| RepositoryError::Unavailable("portfolio lock poisoned".to_string()))?;
        guard.clone().ok_or(RepositoryError::NotLoaded)
    }

    fn replace(&self, snapshot: PortfolioSnapshot) -> Result<(), RepositoryError> {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| RepositoryError::Unavailable("portfolio lock poisoned".to_string()))?;
        *guard = Some(snapshot);
        Ok(())
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<PendingKind, String> {
    PendingKind::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = PendingKind::ordered().iter().map(|kind| kind.key()).collect();
        format!("unknown pendency type '{raw}' (expected one of: {})", known.join(", "))
    })
}
