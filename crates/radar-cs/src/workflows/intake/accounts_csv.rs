use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::normalizer::{clean_text, header_key, parse_number, parse_timestamp};
use super::SnapshotImportError;
use crate::workflows::pendencies::domain::Account;

const REQUIRED_COLUMNS: &[&str] = &["id", "name"];
const DELIMITERS: &[u8] = b";,";

/// Outcome of an accounts CSV import; bad rows are reported, not fatal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountCsvImport {
    pub accounts: Vec<Account>,
    pub imported: usize,
    pub errors: usize,
    pub duplicates: usize,
    pub details: Vec<String>,
}

pub(crate) fn parse_accounts(data: &[u8]) -> Result<AccountCsvImport, SnapshotImportError> {
    let mut missing = Vec::new();

    for delimiter in DELIMITERS {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(*delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data);
        let columns = column_index(reader.headers()?);

        missing = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !columns.contains_key(**column))
            .map(|column| column.to_string())
            .collect();
        if missing.is_empty() {
            return read_rows(reader, &columns);
        }
    }

    Err(SnapshotImportError::MissingColumns(missing))
}

fn column_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| (header_key(header), index))
        .collect()
}

fn read_rows(
    mut reader: csv::Reader<&[u8]>,
    columns: &HashMap<String, usize>,
) -> Result<AccountCsvImport, SnapshotImportError> {
    let mut outcome = AccountCsvImport::default();
    let mut seen = HashSet::new();

    for (offset, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = offset + 2;
        let record = record?;
        let cell = |name: &str| {
            columns
                .get(name)
                .and_then(|index| record.get(*index))
                .and_then(clean_text)
        };

        let (Some(id), Some(name)) = (cell("id"), cell("name")) else {
            outcome.errors += 1;
            outcome.details.push(format!("Linha {line}: id ou nome ausente"));
            continue;
        };

        if !seen.insert(id.clone()) {
            outcome.duplicates += 1;
            outcome
                .details
                .push(format!("Linha {line}: conta {id} duplicada"));
            continue;
        }

        outcome.accounts.push(Account {
            id,
            name,
            csm: cell("csm"),
            industry: cell("industry"),
            website: cell("website"),
            employees: cell("employees")
                .as_deref()
                .and_then(parse_number)
                .map(|value| value.trunc().min(u32::MAX as f64) as u32),
            health_score: cell("healthscore")
                .as_deref()
                .and_then(parse_number)
                .filter(|value| value.is_finite() && *value >= 0.0)
                .map(|value| value.trunc().min(100.0)),
            health_evaluated_at: cell("healthevaluatedat")
                .as_deref()
                .and_then(parse_timestamp),
            status: cell("status"),
            contract_start: cell("contractstart").as_deref().and_then(parse_timestamp),
            contract_end: cell("contractend").as_deref().and_then(parse_timestamp),
            created_at: cell("createdat").as_deref().and_then(parse_timestamp),
            updated_at: cell("updatedat").as_deref().and_then(parse_timestamp),
            internal_kickoff: None,
        });
        outcome.imported += 1;
    }

    Ok(outcome)
}
