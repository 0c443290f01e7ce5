//! Boundary adapter between the CS resource API and the pendency engine.
//!
//! Field-name fallbacks, number coercion and date parsing happen here and
//! nowhere else; the engine only ever sees canonical types.

mod accounts_csv;
mod normalizer;
mod wire;

pub use accounts_csv::AccountCsvImport;

use crate::workflows::pendencies::onboarding::OnboardingChecklist;
use crate::workflows::pendencies::PortfolioSnapshot;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use wire::WireSnapshot;

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    MissingColumns(Vec<String>),
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read portfolio export: {}", err),
            SnapshotImportError::Json(err) => write!(f, "invalid portfolio JSON: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid accounts CSV data: {}", err),
            SnapshotImportError::MissingColumns(columns) => write!(
                f,
                "accounts CSV is missing required columns: {} (expected ';' or ',' delimiter)",
                columns.join(", ")
            ),
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Json(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::MissingColumns(_) => None,
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PortfolioSnapshot, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PortfolioSnapshot, SnapshotImportError> {
        let wire: WireSnapshot = serde_json::from_reader(reader)?;
        Ok(normalize(wire))
    }

    pub fn from_value(value: Value) -> Result<PortfolioSnapshot, SnapshotImportError> {
        let wire: WireSnapshot = serde_json::from_value(value)?;
        Ok(normalize(wire))
    }
}

pub struct AccountCsvImporter;

impl AccountCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<AccountCsvImport, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<AccountCsvImport, SnapshotImportError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        accounts_csv::parse_accounts(&data)
    }
}

fn normalize(wire: WireSnapshot) -> PortfolioSnapshot {
    let WireSnapshot {
        accounts,
        activities,
        tasks,
        onboarding,
    } = wire;

    let account_count = accounts.len();
    let accounts: Vec<_> = accounts
        .into_iter()
        .filter_map(|account| account.into_account())
        .collect();
    if accounts.len() < account_count {
        warn!(
            skipped = account_count - accounts.len(),
            "dropped account records without an id"
        );
    }

    let activity_count = activities.len();
    let activities: Vec<_> = activities
        .into_iter()
        .filter_map(|activity| activity.into_activity())
        .collect();
    if activities.len() < activity_count {
        warn!(
            skipped = activity_count - activities.len(),
            "dropped activity records without an account"
        );
    }

    let tasks = tasks.into_iter().map(|task| task.into_task()).collect();

    let mut checklist = match onboarding.as_ref().and_then(|wire| wire.template.clone()) {
        Some(template) => OnboardingChecklist::new(template),
        None => OnboardingChecklist::standard(),
    };
    for account in &accounts {
        if let Some(start) = account.contract_start {
            checklist.set_contract_start(&account.id, start);
        }
    }
    if let Some(onboarding) = onboarding {
        for (account_id, items) in onboarding.completions {
            for (item_id, completed_at) in items {
                match normalizer::timestamp(Some(&completed_at)) {
                    Some(at) => {
                        checklist.complete(&account_id, &item_id, at);
                    }
                    None => warn!(%account_id, %item_id, "ignoring onboarding completion without a timestamp"),
                }
            }
        }
    }

    PortfolioSnapshot {
        accounts,
        activities,
        tasks,
        onboarding: checklist,
    }
}
