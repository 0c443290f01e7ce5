//! Pendency radar for Customer Success portfolios.
//!
//! Every account is run through a fixed set of rules; accounts with at least
//! one pending item are ranked by their worst urgency and then by how much is
//! pending, and the report carries per-tier counts for dashboard badges.

mod config;
pub mod domain;
mod engine;
pub mod onboarding;
pub mod report;
pub mod repository;
pub mod router;
pub(crate) mod rules;
pub mod service;
mod snapshot;

#[cfg(test)]
mod tests;

pub use config::PendencyConfig;
pub use domain::{
    days_between, parse_instant, start_of_day, Account, Activity, CsmFilter, InternalKickoff,
    OnboardingStats, PendingItem, PendingKind, Task, Urgency, ALL_CSMS, CRITICAL_STATUS,
};
pub use engine::PendencyEngine;
pub use onboarding::{
    ChecklistCategory, ChecklistItem, ChecklistProgress, OnboardingChecklist, OnboardingProgress,
};
pub use report::{AccountWithPendencies, PendenciesSummary, PendencyReport};
pub use repository::{PortfolioRepository, RepositoryError};
pub use router::pendency_router;
pub use service::{
    PendencyListing, PendencyQuery, PendencyService, PendencyServiceError, PortfolioSummary,
};
pub use snapshot::{PortfolioSnapshot, PortfolioView};
