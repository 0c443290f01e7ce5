//! Shapes of the CS resource API as it actually arrives: camelCase from the
//! web client, snake_case straight from the database layer, numbers that are
//! sometimes strings. Every field is kept as a raw JSON value and coerced in
//! one place.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use super::normalizer::{count, score, text, timestamp};
use crate::workflows::pendencies::domain::{Account, Activity, InternalKickoff, Task};
use crate::workflows::pendencies::onboarding::ChecklistItem;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireSnapshot {
    pub accounts: Vec<WireAccount>,
    pub activities: Vec<WireActivity>,
    pub tasks: Vec<WireTask>,
    pub onboarding: Option<WireOnboarding>,
}

/// Raw JSON object; a record may carry both spellings of a key, and the
/// camelCase one wins unless it is null.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct WireAccount(Map<String, Value>);

impl WireAccount {
    /// `None` when the record has no usable id.
    pub(crate) fn into_account(self) -> Option<Account> {
        let fields = &self.0;
        let id = text(fields.get("id"))?;
        let name = text(fields.get("name")).unwrap_or_else(|| id.clone());

        Some(Account {
            id,
            name,
            csm: text(fields.get("csm")),
            industry: text(fields.get("industry")),
            website: text(fields.get("website")),
            employees: count(fields.get("employees")),
            health_score: score(field(fields, &["healthScore", "health_score"])),
            health_evaluated_at: timestamp(field(
                fields,
                &["healthEvaluatedAt", "health_evaluated_at", "lastEvaluationDate"],
            )),
            status: text(fields.get("status")),
            contract_start: timestamp(field(fields, &["contractStart", "contract_start"])),
            contract_end: timestamp(field(fields, &["contractEnd", "contract_end"])),
            created_at: timestamp(field(fields, &["createdAt", "created_at"])),
            updated_at: timestamp(field(fields, &["updatedAt", "updated_at"])),
            internal_kickoff: field(fields, &["internalKickoff", "internal_kickoff"])
                .and_then(kickoff),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct WireActivity(Map<String, Value>);

impl WireActivity {
    pub(crate) fn into_activity(self) -> Option<Activity> {
        let fields = &self.0;
        Some(Activity {
            id: text(fields.get("id")),
            account_id: text(field(fields, &["accountId", "account_id"]))?,
            status: text(fields.get("status")),
            due_date: timestamp(field(fields, &["dueDate", "due_date"])),
            activity_date: timestamp(field(fields, &["activityDate", "activity_date"])),
            created_at: timestamp(field(fields, &["createdAt", "created_at"])),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct WireTask(Map<String, Value>);

impl WireTask {
    pub(crate) fn into_task(self) -> Task {
        let fields = &self.0;
        Task {
            id: text(fields.get("id")),
            account_id: text(field(fields, &["accountId", "account_id"])),
            status: text(fields.get("status")),
            due_date: timestamp(field(fields, &["dueDate", "due_date"])),
            created_at: timestamp(field(fields, &["createdAt", "created_at"])),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireOnboarding {
    pub template: Option<Vec<ChecklistItem>>,
    /// account id -> item id -> completion timestamp
    pub completions: HashMap<String, BTreeMap<String, Value>>,
}

/// Kickoff payloads are JSON columns that default to `{}`; an empty object
/// still counts as a kickoff that was started.
fn kickoff(value: &Value) -> Option<InternalKickoff> {
    let fields = value.as_object()?;

    Some(InternalKickoff {
        sales_rep: pick(fields, "salesRep", "sales_rep"),
        sale_origin: pick(fields, "saleOrigin", "sale_origin"),
        negotiated_with: pick(fields, "negotiatedWith", "negotiated_with"),
        customer_situation: pick(fields, "customerSituation", "customer_situation"),
        existing_tools: pick(fields, "existingTools", "existing_tools"),
        pain_points: pick(fields, "painPoints", "pain_points"),
        previous_attempts: pick(fields, "previousAttempts", "previous_attempts"),
        expected_outcomes: pick(fields, "expectedOutcomes", "expected_outcomes"),
        success_criteria: pick(fields, "successCriteria", "success_criteria"),
        business_impact: pick(fields, "businessImpact", "business_impact"),
        critical_deadline: pick(fields, "criticalDeadline", "critical_deadline"),
        urgency_reason: pick(fields, "urgencyReason", "urgency_reason"),
        why_chose_us: pick(fields, "whyChoseUs", "why_chose_us"),
        competitors_considered: pick(fields, "competitorsConsidered", "competitors_considered"),
        decision_criteria: pick(fields, "decisionCriteria", "decision_criteria"),
        negotiation_details: pick(fields, "negotiationDetails", "negotiation_details"),
        promises_made: pick(fields, "promisesMade", "promises_made"),
        red_flags: pick(fields, "redFlags", "red_flags"),
        champion_identified: pick(fields, "championIdentified", "champion_identified"),
        communication_preferences: pick(
            fields,
            "communicationPreferences",
            "communication_preferences",
        ),
    })
}

fn pick(fields: &Map<String, Value>, camel: &str, snake: &str) -> Option<String> {
    text(fields.get(camel)).or_else(|| text(fields.get(snake)))
}

/// First non-null value among `keys`.
fn field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}
