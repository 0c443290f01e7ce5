use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const CRITICAL_STATUS: &str = "Crítico";
pub const ALL_CSMS: &str = "all";
const COMPLETED_STATUS: &str = "completed";

/// Canonical account record consumed by the pendency engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub csm: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub employees: Option<u32>,
    #[serde(default)]
    pub health_score: Option<f64>,
    #[serde(default)]
    pub health_evaluated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contract_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contract_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub internal_kickoff: Option<InternalKickoff>,
}

impl Account {
    pub fn is_owned_by(&self, csm: &str) -> bool {
        self.csm.as_deref() == Some(csm)
    }

    /// Most recent update marker, falling back to the creation time.
    pub fn last_touched_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    pub fn deep_link(&self, tab: Option<&str>) -> String {
        match tab {
            Some(tab) => format!("/accounts/{}?tab={}", self.id, tab),
            None => format!("/accounts/{}", self.id),
        }
    }
}

/// Sales-to-CS handoff captured with the SPICED framework.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InternalKickoff {
    pub sales_rep: Option<String>,
    pub sale_origin: Option<String>,
    pub negotiated_with: Option<String>,
    pub customer_situation: Option<String>,
    pub existing_tools: Option<String>,
    pub pain_points: Option<String>,
    pub previous_attempts: Option<String>,
    pub expected_outcomes: Option<String>,
    pub success_criteria: Option<String>,
    pub business_impact: Option<String>,
    pub critical_deadline: Option<String>,
    pub urgency_reason: Option<String>,
    pub why_chose_us: Option<String>,
    pub competitors_considered: Option<String>,
    pub decision_criteria: Option<String>,
    pub negotiation_details: Option<String>,
    pub promises_made: Option<String>,
    pub red_flags: Option<String>,
    pub champion_identified: Option<String>,
    pub communication_preferences: Option<String>,
}

impl InternalKickoff {
    /// Mandatory SPICED components (Situation, Pain, Impact) still empty.
    pub fn missing_spi(&self) -> Vec<&'static str> {
        [
            (&self.customer_situation, "Situation"),
            (&self.pain_points, "Pain"),
            (&self.expected_outcomes, "Impact"),
        ]
        .into_iter()
        .filter(|(value, _)| is_blank(value.as_deref()))
        .map(|(_, label)| label)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub id: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub activity_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Activity {
    /// When the interaction happened, or when it was logged.
    pub fn contact_at(&self) -> Option<DateTime<Utc>> {
        self.activity_date.or(self.created_at)
    }

    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(COMPLETED_STATUS)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn belongs_to(&self, account_id: &str) -> bool {
        self.account_id.as_deref() == Some(account_id)
    }

    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(COMPLETED_STATUS)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStats {
    pub percentage: u8,
    pub completed: usize,
    pub total: usize,
}

impl OnboardingStats {
    pub fn from_counts(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((completed.min(total) as f64 * 100.0) / total as f64).round() as u8
        };

        Self {
            percentage,
            completed,
            total,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// Priority tier of a pendency. Ordering follows display priority: red first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Red,
    Orange,
    Yellow,
}

impl Urgency {
    pub const fn ordered() -> [Self; 3] {
        [Self::Red, Self::Orange, Self::Yellow]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Urgente",
            Self::Orange => "Em breve",
            Self::Yellow => "Atenção",
        }
    }

    /// Red above `red_after`, orange above `orange_after`, yellow otherwise.
    pub(crate) fn tiered(days: i64, red_after: i64, orange_after: i64) -> Self {
        if days > red_after {
            Self::Red
        } else if days > orange_after {
            Self::Orange
        } else {
            Self::Yellow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    HealthScore,
    Onboarding,
    Activity,
    Spiced,
    Overdue,
    CriticalContact,
    Renewal,
    MissingData,
}

impl PendingKind {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::HealthScore,
            Self::Onboarding,
            Self::Activity,
            Self::Spiced,
            Self::Overdue,
            Self::CriticalContact,
            Self::Renewal,
            Self::MissingData,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::HealthScore => "health_score",
            Self::Onboarding => "onboarding",
            Self::Activity => "activity",
            Self::Spiced => "spiced",
            Self::Overdue => "overdue",
            Self::CriticalContact => "critical_contact",
            Self::Renewal => "renewal",
            Self::MissingData => "missing_data",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HealthScore => "Health Score",
            Self::Onboarding => "Onboarding",
            Self::Activity => "Atividades",
            Self::Spiced => "SPICED",
            Self::Overdue => "Atrasados",
            Self::CriticalContact => "Contas Críticas",
            Self::Renewal => "Renovações",
            Self::MissingData => "Dados Incompletos",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered().into_iter().find(|kind| kind.key() == wanted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    #[serde(rename = "type")]
    pub kind: PendingKind,
    pub urgency: Urgency,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// CSM ownership filter; `"all"` (or nothing) disables filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CsmFilter {
    #[default]
    All,
    Owner(String),
}

impl CsmFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_CSMS) => Self::All,
            Some(owner) => Self::Owner(owner.to_string()),
        }
    }

    pub fn matches(&self, account: &Account) -> bool {
        match self {
            Self::All => true,
            Self::Owner(owner) => account.is_owned_by(owner),
        }
    }
}

/// Absent or empty. Whitespace is content; intake trims before it gets here.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Whole days from `from` to `to`, floored like the millisecond arithmetic
/// the dashboard uses.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(86_400_000)
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Evaluation instant from a query or flag: RFC 3339, or `YYYY-MM-DD` taken
/// as midnight UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| format!("invalid instant '{raw}' (expected RFC 3339 or YYYY-MM-DD)"))
}
