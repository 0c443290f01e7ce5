use super::super::domain::{PendingKind, Urgency};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyBreakdownEntry {
    pub urgency: Urgency,
    pub urgency_label: &'static str,
    pub items: usize,
    pub accounts: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindBreakdownEntry {
    pub kind: PendingKind,
    pub kind_label: &'static str,
    pub accounts: usize,
}
