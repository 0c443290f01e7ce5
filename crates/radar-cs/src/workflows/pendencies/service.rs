use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::config::PendencyConfig;
use super::domain::{CsmFilter, PendingKind};
use super::engine::PendencyEngine;
use super::report::views::{KindBreakdownEntry, UrgencyBreakdownEntry};
use super::report::{AccountWithPendencies, PendenciesSummary, PendencyReport};
use super::repository::{PortfolioRepository, RepositoryError};
use super::snapshot::PortfolioSnapshot;

/// Filters applied when listing pendencies.
#[derive(Debug, Clone, Default)]
pub struct PendencyQuery {
    pub csm: CsmFilter,
    pub kind: Option<PendingKind>,
    /// Evaluation instant; the current time when absent.
    pub now: Option<DateTime<Utc>>,
}

/// Report as exposed to callers: the kind filter narrows the account list
/// while the summary still covers every account matching the owner filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendencyListing {
    pub evaluated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PendingKind>,
    pub accounts_with_pendencies: Vec<AccountWithPendencies>,
    pub summary: PendenciesSummary,
    pub urgency_breakdown: Vec<UrgencyBreakdownEntry>,
    pub kind_breakdown: Vec<KindBreakdownEntry>,
}

impl PendencyListing {
    pub fn from_report(report: &PendencyReport, kind: Option<PendingKind>) -> Self {
        let accounts_with_pendencies = match kind {
            Some(kind) => report.with_kind(kind).into_iter().cloned().collect(),
            None => report.accounts_with_pendencies.clone(),
        };

        Self {
            evaluated_at: report.evaluated_at,
            kind,
            accounts_with_pendencies,
            summary: report.summary,
            urgency_breakdown: report.urgency_breakdown(),
            kind_breakdown: report.kind_breakdown(),
        }
    }
}

/// Service composing the portfolio repository with the pendency engine.
pub struct PendencyService<R> {
    repository: Arc<R>,
    engine: Arc<PendencyEngine>,
}

impl<R> PendencyService<R>
where
    R: PortfolioRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: PendencyConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(PendencyEngine::new(config)),
        }
    }

    /// Evaluate the stored portfolio.
    pub fn report(&self, query: &PendencyQuery) -> Result<PendencyListing, PendencyServiceError> {
        let snapshot = self.repository.snapshot()?;
        Ok(self.evaluate(&snapshot, query))
    }

    /// Evaluate a caller-supplied portfolio without touching the repository.
    pub fn evaluate(&self, snapshot: &PortfolioSnapshot, query: &PendencyQuery) -> PendencyListing {
        let now = query.now.unwrap_or_else(Utc::now);
        let report = self.engine.evaluate(snapshot.view(), &query.csm, now);
        info!(
            accounts = report.summary.total_accounts_with_pending,
            urgent = report.summary.urgent_count,
            due_soon = report.summary.due_soon_count,
            attention = report.summary.attention_count,
            clean = report.is_empty(),
            "pendency report generated"
        );
        PendencyListing::from_report(&report, query.kind)
    }

    /// Swap in a fresh portfolio; later reports never mix old and new data.
    pub fn replace_snapshot(
        &self,
        snapshot: PortfolioSnapshot,
    ) -> Result<PortfolioSummary, PendencyServiceError> {
        let summary = PortfolioSummary::of(&snapshot);
        self.repository.replace(snapshot)?;
        info!(
            accounts = summary.accounts,
            activities = summary.activities,
            tasks = summary.tasks,
            "portfolio snapshot replaced"
        );
        Ok(summary)
    }

    pub fn csms(&self) -> Result<Vec<String>, PendencyServiceError> {
        Ok(self.repository.snapshot()?.csms())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub accounts: usize,
    pub activities: usize,
    pub tasks: usize,
}

impl PortfolioSummary {
    pub fn of(snapshot: &PortfolioSnapshot) -> Self {
        Self {
            accounts: snapshot.accounts.len(),
            activities: snapshot.activities.len(),
            tasks: snapshot.tasks.len(),
        }
    }
}

/// Error raised by the pendency service.
#[derive(Debug, thiserror::Error)]
pub enum PendencyServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
