//! Generic detail forms
//!
//! Both the member detail view and the health application view render every
//! field of a document, labelled with [`title_case`].

use mb_core::health::HealthApplication;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::format::{format_date_value, title_case};

/// Fields rendered with the read-only date control
pub const DATE_FIELDS: &[&str] = &["dob", "date_of_membership"];

/// Hidden from the member detail form
pub const MEMBER_FORM_EXCLUDED: &[&str] = &["__v", "account_balance"];

/// Hidden from the health application form
pub const HEALTH_FORM_EXCLUDED: &[&str] = &["__v"];

/// Stripped from a member form before it is sent as an update.
/// The balance is changed by funding only.
pub const MEMBER_UPDATE_STRIPPED: &[&str] = &["_id", "__v", "account_balance"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub read_only: bool,
}

/// Project every non-excluded field of `document` into a form field
pub fn form_fields(document: &Map<String, Value>, excluded: &[&str]) -> Vec<FormField> {
    document
        .iter()
        .filter(|(key, _)| !excluded.contains(&key.as_str()))
        .map(|(key, value)| {
            let is_date = DATE_FIELDS.contains(&key.as_str());
            FormField {
                key: key.clone(),
                label: title_case(key),
                kind: if is_date { FieldKind::Date } else { FieldKind::Text },
                value: if is_date {
                    format_date_value(value)
                } else {
                    display_value(value)
                },
                read_only: is_date,
            }
        })
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Serialize a record into the object the forms work on
pub fn to_document<T: Serialize>(record: &T) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Copy of a member form without the fields an update may not carry
pub fn update_payload(form: &Map<String, Value>) -> Map<String, Value> {
    form.iter()
        .filter(|(key, _)| !MEMBER_UPDATE_STRIPPED.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Content of the health application modal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthApplicationView {
    pub fields: Vec<FormField>,
    /// Only unlinked applications can be approved
    pub approve_visible: bool,
}

impl HealthApplicationView {
    pub fn new(application: &HealthApplication) -> Self {
        Self {
            fields: form_fields(&to_document(application), HEALTH_FORM_EXCLUDED),
            approve_visible: !application.linked,
        }
    }
}
