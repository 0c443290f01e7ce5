use serde::{Deserialize, Serialize};

use super::domain::{Account, Activity, Task};
use super::onboarding::{OnboardingChecklist, OnboardingProgress};

/// Borrowed collections the engine evaluates in a single pass.
#[derive(Clone, Copy)]
pub struct PortfolioView<'a> {
    pub accounts: &'a [Account],
    pub activities: &'a [Activity],
    pub tasks: &'a [Task],
    pub onboarding: &'a dyn OnboardingProgress,
}

/// Owned copy of the resource collections served by the CS API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioSnapshot {
    pub accounts: Vec<Account>,
    pub activities: Vec<Activity>,
    pub tasks: Vec<Task>,
    pub onboarding: OnboardingChecklist,
}

impl PortfolioSnapshot {
    pub fn view(&self) -> PortfolioView<'_> {
        PortfolioView {
            accounts: &self.accounts,
            activities: &self.activities,
            tasks: &self.tasks,
            onboarding: &self.onboarding,
        }
    }

    /// Distinct CSM names, sorted, for building owner filters.
    pub fn csms(&self) -> Vec<String> {
        let mut owners: Vec<String> = self
            .accounts
            .iter()
            .filter_map(|account| account.csm.clone())
            .filter(|csm| !csm.trim().is_empty())
            .collect();
        owners.sort();
        owners.dedup();
        owners
    }
}
