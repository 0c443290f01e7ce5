use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn clean_text(value: &str) -> Option<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(raw) => clean_text(raw),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Loose numeric coercion: JSON numbers or numeric strings. `NaN`, negatives
/// and garbage collapse to `None`.
pub(crate) fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => parse_number(raw),
        _ => None,
    }?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().or_else(|| {
        // Leading-integer parse, e.g. "120 funcionários".
        let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<f64>().ok()
    })
}

pub(crate) fn count(value: Option<&Value>) -> Option<u32> {
    number(value).map(|value| value.trunc().min(u32::MAX as f64) as u32)
}

/// JSON numbers keep their fraction; numeric strings read as integers.
pub(crate) fn score(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => parse_number(raw).map(f64::trunc),
        _ => None,
    }?;
    (parsed.is_finite() && parsed >= 0.0).then(|| parsed.min(100.0))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(raw) => parse_timestamp(raw),
        Value::Number(millis) => millis
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Lowercased header with separators stripped, so `Health Score`,
/// `health_score` and `healthScore` all compare equal.
pub(crate) fn header_key(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamps_accept_rfc3339_naive_and_plain_dates() {
        let rfc = parse_timestamp("2025-09-24T10:00:00-03:00").expect("rfc3339");
        assert_eq!(rfc, Utc.with_ymd_and_hms(2025, 9, 24, 13, 0, 0).unwrap());

        let naive = parse_timestamp("2025-09-24T10:00:00.123456").expect("naive");
        assert_eq!(naive.date_naive(), NaiveDate::from_ymd_opt(2025, 9, 24).unwrap());

        let date = parse_timestamp("2025-09-30").expect("date");
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap());

        assert!(parse_timestamp("  ").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn numbers_are_coerced_loosely() {
        assert_eq!(score(Some(&json!("75"))), Some(75.0));
        assert_eq!(score(Some(&json!("75.9"))), Some(75.0));
        assert_eq!(score(Some(&json!(75.9))), Some(75.9));
        assert_eq!(score(Some(&json!(0.4))), Some(0.4));
        assert_eq!(score(Some(&json!(140))), Some(100.0));
        assert_eq!(score(Some(&json!("NaN"))), None);
        assert_eq!(score(Some(&json!(""))), None);
        assert_eq!(score(Some(&json!(null))), None);
        assert_eq!(count(Some(&json!("120 funcionários"))), Some(120));
        assert_eq!(count(Some(&json!(-4))), None);
    }

    #[test]
    fn contract_dates_keep_their_time_of_day() {
        assert_eq!(
            timestamp(Some(&json!("2025-12-31T18:00:00Z"))),
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 18, 0, 0).unwrap())
        );
        assert_eq!(
            timestamp(Some(&json!("2025-12-31"))),
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(timestamp(Some(&json!("15/01/2025"))), None);
    }

    #[test]
    fn header_keys_ignore_case_and_separators() {
        assert_eq!(header_key("\u{feff}Health Score"), "healthscore");
        assert_eq!(header_key("health_score"), "healthscore");
        assert_eq!(header_key("contractEnd"), "contractend");
    }
}
