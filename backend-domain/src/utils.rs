use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Accepts RFC 3339 strings, epoch milliseconds (number or numeric string)
/// and `YYYY-MM-DD` dates as exported by the document store.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => number.as_i64().and_then(millis_to_utc),
        Value::String(raw) => parse_timestamp_str(raw),
        _ => None,
    }
}

pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(millis) = trimmed.parse::<i64>() {
        return millis_to_utc(millis);
    }
    chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Amounts arrive as JSON numbers or as numeric strings.
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if amount.is_finite() && amount >= 0.0 {
        Some(amount)
    } else {
        None
    }
}

pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    }
}

/// Renders a 0..=1 ratio the way the dashboard shows it, e.g. `100.0%`.
pub fn format_rate(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
