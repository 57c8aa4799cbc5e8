//! Display helpers for field labels and dates

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Turn a field name into a label: `application_reason` → `Application Reason`.
pub fn title_case(field: &str) -> String {
    field
        .to_lowercase()
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Format a date for display as a UK short date (`dd/mm/yyyy`).
///
/// Missing or empty input is shown as `None`; text that is not a date is
/// shown as `Invalid Date`.
pub fn format_date(date: Option<&str>) -> String {
    let raw = match date.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return "None".to_string(),
    };

    match parse_date(raw) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// [`format_date`] for a raw document value
pub fn format_date_value(value: &Value) -> String {
    match value {
        Value::String(raw) => format_date(Some(raw)),
        Value::Null | Value::Bool(false) => format_date(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => format_date(None),
        _ => "Invalid Date".to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|datetime| datetime.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_case_labels() {
        assert_eq!(title_case("application_reason"), "Application Reason");
        assert_eq!(title_case("dob"), "Dob");
        assert_eq!(title_case("DATE_OF_MEMBERSHIP"), "Date Of Membership");
        assert_eq!(title_case("_id"), " Id");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn format_date_none_for_missing() {
        assert_eq!(format_date(None), "None");
        assert_eq!(format_date(Some("")), "None");
        assert_eq!(format_date_value(&Value::Null), "None");
    }

    #[test]
    fn format_date_uk_short_date() {
        assert_eq!(format_date(Some("2023-01-15")), "15/01/2023");
        assert_eq!(format_date(Some("2023-01-15T00:00:00.000Z")), "15/01/2023");
        assert_eq!(format_date(Some("2023-07-04T09:30:00")), "04/07/2023");
        assert_eq!(format_date_value(&json!("1990-05-17")), "17/05/1990");
    }

    #[test]
    fn format_date_invalid_input() {
        assert_eq!(format_date(Some("yesterday")), "Invalid Date");
        assert_eq!(format_date_value(&json!(true)), "Invalid Date");
    }
}
