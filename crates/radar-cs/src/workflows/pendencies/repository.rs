use super::snapshot::PortfolioSnapshot;

/// Source of the portfolio collections, so the service can be exercised in
/// isolation from the CS resource API.
pub trait PortfolioRepository: Send + Sync {
    fn snapshot(&self) -> Result<PortfolioSnapshot, RepositoryError>;
    fn replace(&self, snapshot: PortfolioSnapshot) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("portfolio snapshot not loaded")]
    NotLoaded,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
