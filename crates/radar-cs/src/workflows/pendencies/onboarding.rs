//! Onboarding checklist progress per account.
//!
//! The engine only needs `{percentage, completed, total}` for an account id, so
//! the accessor is a trait: callers can hand in precomputed stats, a closure, or
//! the checklist model below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::domain::{days_between, OnboardingStats};

pub trait OnboardingProgress {
    fn stats(&self, account_id: &str) -> OnboardingStats;
}

impl OnboardingProgress for HashMap<String, OnboardingStats> {
    fn stats(&self, account_id: &str) -> OnboardingStats {
        self.get(account_id).copied().unwrap_or_default()
    }
}

impl<F> OnboardingProgress for F
where
    F: Fn(&str) -> OnboardingStats,
{
    fn stats(&self, account_id: &str) -> OnboardingStats {
        self(account_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    Setup,
    Training,
    Integration,
    Adoption,
}

impl ChecklistCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::Setup, Self::Training, Self::Integration, Self::Adoption]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Setup => "Configuração",
            Self::Training => "Treinamento",
            Self::Integration => "Integração",
            Self::Adoption => "Adoção",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub category: ChecklistCategory,
}

/// Detailed progress for one account, including time-to-value once complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistProgress {
    #[serde(flatten)]
    pub stats: OnboardingStats,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_value: Option<i64>,
}

/// Onboarding template plus the completion log of every account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingChecklist {
    #[serde(default = "standard_template")]
    template: Vec<ChecklistItem>,
    /// account id -> (item id -> completion time)
    #[serde(default)]
    completions: HashMap<String, BTreeMap<String, DateTime<Utc>>>,
    #[serde(default)]
    contract_starts: HashMap<String, DateTime<Utc>>,
}

impl Default for OnboardingChecklist {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_template() -> Vec<ChecklistItem> {
    const ITEMS: &[(&str, &str, ChecklistCategory)] = &[
        ("setup_account", "Configurar conta e usuários", ChecklistCategory::Setup),
        ("setup_permissions", "Definir permissões e perfis", ChecklistCategory::Setup),
        ("training_admins", "Treinar administradores", ChecklistCategory::Training),
        ("training_users", "Treinar usuários finais", ChecklistCategory::Training),
        ("integration_data", "Importar dados iniciais", ChecklistCategory::Integration),
        ("integration_tools", "Conectar ferramentas existentes", ChecklistCategory::Integration),
        ("adoption_first_use", "Primeiro uso em produção", ChecklistCategory::Adoption),
        ("adoption_review", "Revisão de adoção com o cliente", ChecklistCategory::Adoption),
    ];

    ITEMS
        .iter()
        .map(|(id, title, category)| ChecklistItem {
            id: (*id).to_string(),
            title: (*title).to_string(),
            category: *category,
        })
        .collect()
}

impl OnboardingChecklist {
    pub fn new(template: Vec<ChecklistItem>) -> Self {
        Self {
            template,
            completions: HashMap::new(),
            contract_starts: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(standard_template())
    }

    pub fn template(&self) -> &[ChecklistItem] {
        &self.template
    }

    pub fn items_in(&self, category: ChecklistCategory) -> Vec<&ChecklistItem> {
        self.template
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    pub fn set_contract_start(&mut self, account_id: &str, start: DateTime<Utc>) {
        self.contract_starts.insert(account_id.to_string(), start);
    }

    /// Marks a template item done. Unknown item ids are ignored.
    pub fn complete(&mut self, account_id: &str, item_id: &str, at: DateTime<Utc>) -> bool {
        if !self.template.iter().any(|item| item.id == item_id) {
            return false;
        }

        self.completions
            .entry(account_id.to_string())
            .or_default()
            .insert(item_id.to_string(), at);
        true
    }

    pub fn uncomplete(&mut self, account_id: &str, item_id: &str) {
        if let Some(done) = self.completions.get_mut(account_id) {
            done.remove(item_id);
        }
    }

    pub fn is_item_complete(&self, account_id: &str, item_id: &str) -> bool {
        self.completions
            .get(account_id)
            .is_some_and(|done| done.contains_key(item_id))
    }

    pub fn progress(&self, account_id: &str) -> ChecklistProgress {
        let done = self.completions.get(account_id);
        let completed = done.map_or(0, |done| {
            self.template
                .iter()
                .filter(|item| done.contains_key(&item.id))
                .count()
        });
        let stats = OnboardingStats::from_counts(completed, self.template.len());
        let is_complete = stats.is_complete();

        let time_to_value = if is_complete {
            let finished_at = done.and_then(|done| done.values().max().copied());
            let started = self.contract_starts.get(account_id).copied();
            match (started, finished_at) {
                (Some(started), Some(finished_at)) => Some(days_between(started, finished_at)),
                _ => None,
            }
        } else {
            None
        };

        ChecklistProgress {
            stats,
            is_complete,
            time_to_value,
        }
    }
}

impl OnboardingProgress for OnboardingChecklist {
    fn stats(&self, account_id: &str) -> OnboardingStats {
        self.progress(account_id).stats
    }
}
