use super::super::domain::{Account, PendingItem, PendingKind, Urgency};
use super::views::{KindBreakdownEntry, UrgencyBreakdownEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWithPendencies {
    pub account: Account,
    pub pending_items: Vec<PendingItem>,
    pub urgency_level: Urgency,
    pub total_pending: usize,
}

impl AccountWithPendencies {
    /// `None` when the account has nothing pending.
    pub fn from_items(account: Account, pending_items: Vec<PendingItem>) -> Option<Self> {
        let urgency_level = pending_items.iter().map(|item| item.urgency).min()?;
        let total_pending = pending_items.len();

        Some(Self {
            account,
            pending_items,
            urgency_level,
            total_pending,
        })
    }

    pub fn has_kind(&self, kind: PendingKind) -> bool {
        self.pending_items.iter().any(|item| item.kind == kind)
    }
}

/// Item counts per urgency tier across every listed account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendenciesSummary {
    pub total_accounts_with_pending: usize,
    pub urgent_count: usize,
    pub due_soon_count: usize,
    pub attention_count: usize,
}

impl PendenciesSummary {
    pub fn from_accounts(accounts: &[AccountWithPendencies]) -> Self {
        let mut summary = Self {
            total_accounts_with_pending: accounts.len(),
            ..Self::default()
        };

        for item in accounts.iter().flat_map(|entry| &entry.pending_items) {
            match item.urgency {
                Urgency::Red => summary.urgent_count += 1,
                Urgency::Orange => summary.due_soon_count += 1,
                Urgency::Yellow => summary.attention_count += 1,
            }
        }

        summary
    }

    pub fn total_items(&self) -> usize {
        self.urgent_count + self.due_soon_count + self.attention_count
    }

    pub fn count_for(&self, urgency: Urgency) -> usize {
        match urgency {
            Urgency::Red => self.urgent_count,
            Urgency::Orange => self.due_soon_count,
            Urgency::Yellow => self.attention_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendencyReport {
    pub evaluated_at: DateTime<Utc>,
    pub accounts_with_pendencies: Vec<AccountWithPendencies>,
    pub summary: PendenciesSummary,
}

impl PendencyReport {
    /// Sorts red before orange before yellow, then by descending item count.
    /// The sort is stable so equal entries keep their input order.
    pub fn new(evaluated_at: DateTime<Utc>, mut accounts: Vec<AccountWithPendencies>) -> Self {
        accounts.sort_by(|a, b| {
            a.urgency_level
                .cmp(&b.urgency_level)
                .then_with(|| b.total_pending.cmp(&a.total_pending))
        });
        let summary = PendenciesSummary::from_accounts(&accounts);

        Self {
            evaluated_at,
            accounts_with_pendencies: accounts,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts_with_pendencies.is_empty()
    }

    /// Accounts carrying at least one item of `kind`, in report order.
    /// The summary is left untouched, matching the dashboard tab filter.
    pub fn with_kind(&self, kind: PendingKind) -> Vec<&AccountWithPendencies> {
        self.accounts_with_pendencies
            .iter()
            .filter(|entry| entry.has_kind(kind))
            .collect()
    }

    pub fn urgency_breakdown(&self) -> Vec<UrgencyBreakdownEntry> {
        Urgency::ordered()
            .into_iter()
            .map(|urgency| UrgencyBreakdownEntry {
                urgency,
                urgency_label: urgency.label(),
                items: self.summary.count_for(urgency),
                accounts: self
                    .accounts_with_pendencies
                    .iter()
                    .filter(|entry| entry.urgency_level == urgency)
                    .count(),
            })
            .collect()
    }

    pub fn kind_breakdown(&self) -> Vec<KindBreakdownEntry> {
        PendingKind::ordered()
            .into_iter()
            .filter_map(|kind| {
                let accounts = self.with_kind(kind).len();
                (accounts > 0).then(|| KindBreakdownEntry {
                    kind,
                    kind_label: kind.label(),
                    accounts,
                })
            })
            .collect()
    }
}
