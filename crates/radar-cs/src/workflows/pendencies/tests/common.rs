use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::pendencies::domain::{Account, Activity, InternalKickoff, Task};
use crate::workflows::pendencies::repository::{PortfolioRepository, RepositoryError};
use crate::workflows::pendencies::rules::AccountScope;
use crate::workflows::pendencies::snapshot::PortfolioSnapshot;
use crate::workflows::pendencies::{pendency_router, PendencyConfig, PendencyService};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub(super) fn date_in(days: i64) -> DateTime<Utc> {
    now() + Duration::days(days)
}

pub(super) fn full_kickoff() -> InternalKickoff {
    InternalKickoff {
        sales_rep: Some("Rafael".to_string()),
        customer_situation: Some("Controle de estoque em planilhas".to_string()),
        pain_points: Some("Rupturas frequentes".to_string()),
        expected_outcomes: Some("Reduzir rupturas em 30%".to_string()),
        business_impact: Some("R$ 40k/mês em vendas perdidas".to_string()),
        decision_criteria: Some("Integração com ERP".to_string()),
        ..InternalKickoff::default()
    }
}

/// An account that trips no rule as long as it has a recent activity.
pub(super) fn clean_account(id: &str, csm: &str) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Conta {id}"),
        csm: Some(csm.to_string()),
        industry: Some("Varejo".to_string()),
        website: Some(format!("https://{id}.example.com")),
        employees: Some(120),
        health_score: Some(88.0),
        status: Some("Ativo".to_string()),
        created_at: Some(days_ago(400)),
        updated_at: Some(days_ago(1)),
        internal_kickoff: Some(full_kickoff()),
        ..Account::default()
    }
}

pub(super) fn activity(account_id: &str, days: i64) -> Activity {
    Activity {
        id: Some(format!("act-{account_id}-{days}")),
        account_id: account_id.to_string(),
        status: Some("completed".to_string()),
        activity_date: Some(days_ago(days)),
        created_at: Some(days_ago(days)),
        ..Activity::default()
    }
}

pub(super) fn task(account_id: &str, created_days_ago: i64) -> Task {
    Task {
        id: Some(format!("task-{account_id}-{created_days_ago}")),
        account_id: Some(account_id.to_string()),
        status: Some("pending".to_string()),
        created_at: Some(days_ago(created_days_ago)),
        ..Task::default()
    }
}

pub(super) fn scope<'a>(
    account: &'a Account,
    activities: &'a [Activity],
    tasks: &'a [Task],
) -> AccountScope<'a> {
    AccountScope {
        account,
        activities: activities.iter().collect(),
        tasks: tasks.iter().collect(),
        now: now(),
    }
}

pub(super) fn snapshot(
    accounts: Vec<Account>,
    activities: Vec<Activity>,
    tasks: Vec<Task>,
) -> PortfolioSnapshot {
    PortfolioSnapshot {
        accounts,
        activities,
        tasks,
        ..PortfolioSnapshot::default()
    }
}

/// Ana's account has two red items; Bruno's only lacks a website.
pub(super) fn two_owner_snapshot() -> PortfolioSnapshot {
    let mut stale = clean_account("acc-ana", "Ana");
    stale.health_score = Some(75.0);
    let mut clean = clean_account("acc-bruno", "Bruno");
    clean.website = None;

    snapshot(
        vec![clean, stale],
        vec![activity("acc-ana", 30), activity("acc-bruno", 2)],
        Vec::new(),
    )
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) snapshot: Arc<Mutex<Option<PortfolioSnapshot>>>,
}

impl MemoryRepository {
    pub(super) fn with(snapshot: PortfolioSnapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(Some(snapshot))),
        }
    }
}

impl PortfolioRepository for MemoryRepository {
    fn snapshot(&self) -> Result<PortfolioSnapshot, RepositoryError> {
        self.snapshot
            .lock()
            .expect("lock")
            .clone()
            .ok_or(RepositoryError::NotLoaded)
    }

    fn replace(&self, snapshot: PortfolioSnapshot) -> Result<(), RepositoryError> {
        *self.snapshot.lock().expect("lock") = Some(snapshot);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl PortfolioRepository for UnavailableRepository {
    fn snapshot(&self) -> Result<PortfolioSnapshot, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn replace(&self, _snapshot: PortfolioSnapshot) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn build_service<R: PortfolioRepository + 'static>(
    repository: R,
) -> Arc<PendencyService<R>> {
    Arc::new(PendencyService::new(
        Arc::new(repository),
        PendencyConfig::default(),
    ))
}

pub(super) fn router_with(snapshot: PortfolioSnapshot) -> axum::Router {
    pendency_router(build_service(MemoryRepository::with(snapshot)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
