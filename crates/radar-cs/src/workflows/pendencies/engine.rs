use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::config::PendencyConfig;
use super::domain::{Activity, CsmFilter, Task};
use super::report::{AccountWithPendencies, PendencyReport};
use super::rules::{self, AccountScope};
use super::snapshot::PortfolioView;

/// Stateless evaluator that runs every pendency rule over a portfolio.
#[derive(Debug, Clone, Default)]
pub struct PendencyEngine {
    config: PendencyConfig,
}

impl PendencyEngine {
    pub fn new(config: PendencyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PendencyConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        portfolio: PortfolioView<'_>,
        filter: &CsmFilter,
        now: DateTime<Utc>,
    ) -> PendencyReport {
        let activities = index_activities(portfolio.activities);
        let tasks = index_tasks(portfolio.tasks);

        let entries: Vec<AccountWithPendencies> = portfolio
            .accounts
            .iter()
            .filter(|account| filter.matches(account))
            .filter_map(|account| {
                let scope = AccountScope {
                    account,
                    activities: activities.get(account.id.as_str()).cloned().unwrap_or_default(),
                    tasks: tasks.get(account.id.as_str()).cloned().unwrap_or_default(),
                    now,
                };
                let items = rules::evaluate_account(&scope, portfolio.onboarding, &self.config);
                debug!(
                    account_id = %account.id,
                    pending = items.len(),
                    "evaluated account pendencies"
                );
                AccountWithPendencies::from_items(account.clone(), items)
            })
            .collect();

        PendencyReport::new(now, entries)
    }
}

fn index_activities(activities: &[Activity]) -> HashMap<&str, Vec<&Activity>> {
    let mut index: HashMap<&str, Vec<&Activity>> = HashMap::new();
    for activity in activities {
        index
            .entry(activity.account_id.as_str())
            .or_default()
            .push(activity);
    }
    index
}

fn index_tasks(tasks: &[Task]) -> HashMap<&str, Vec<&Task>> {
    let mut index: HashMap<&str, Vec<&Task>> = HashMap::new();
    for task in tasks {
        if let Some(account_id) = task.account_id.as_deref() {
            index.entry(account_id).or_default().push(task);
        }
    }
    index
}
