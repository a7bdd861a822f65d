/// Generic field validation driven by the per-kind rule tables.
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::kind::EntityKind;
use super::model::Fields;
use super::rules::{rules_for, Check, FieldRule};

static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+").expect("valid URL pattern"));

/// A single rejected field, shaped the way the admin UI reads `errors[]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub path: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub location: &'static str,
}

impl FieldViolation {
    fn new(rule: &FieldRule, msg: &str, value: Option<&Value>) -> Self {
        Self {
            path: rule.field.to_string(),
            msg: msg.to_string(),
            value: value.filter(|v| !v.is_null()).cloned(),
            location: "body",
        }
    }
}

/// Whether a body creates a document or replaces the writable fields of a
/// stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Validate a request body against the rules for `kind`, using the current
/// calendar year as the release-year ceiling.
pub fn validate_fields(
    kind: EntityKind,
    body: &Value,
    mode: WriteMode,
) -> Result<Fields, Vec<FieldViolation>> {
    validate_fields_at(kind, body, mode, i64::from(Utc::now().year()))
}

/// Validate a request body against the rules for `kind`.
///
/// Every rule is evaluated; all violations are returned together. On
/// success the result holds only the known fields, strings trimmed.
///
/// Absent fields with a default get it on create and are left out on
/// update, so the stored value survives. An optional field sent as null or
/// blank on update comes back as `Value::Null`, which the store treats as
/// removal.
pub fn validate_fields_at(
    kind: EntityKind,
    body: &Value,
    mode: WriteMode,
    current_year: i64,
) -> Result<Fields, Vec<FieldViolation>> {
    let empty = Fields::new();
    let input = body.as_object().unwrap_or(&empty);

    let mut accepted = Fields::new();
    let mut violations = Vec::new();

    for rule in rules_for(kind) {
        let raw = input.get(rule.field);
        match check_field(rule, raw, mode, current_year) {
            Ok(Some(value)) => {
                accepted.insert(rule.field.to_string(), value);
            }
            Ok(None) => {}
            Err(msg) => violations.push(FieldViolation::new(rule, msg, raw)),
        }
    }

    if violations.is_empty() {
        Ok(accepted)
    } else {
        Err(violations)
    }
}

fn check_field(
    rule: &FieldRule,
    raw: Option<&Value>,
    mode: WriteMode,
    current_year: i64,
) -> Result<Option<Value>, &'static str> {
    let Some(raw) = present(raw) else {
        return missing_field(rule, mode, raw.is_some());
    };
    let missing = rule.required.unwrap_or("Valor inválido");

    match &rule.check {
        Check::Text {
            min,
            max,
            too_short,
            too_long,
        } => {
            let text = as_text(raw).ok_or(missing)?;
            let len = text.chars().count();
            if len < *min {
                Err(*too_short)
            } else if len > *max {
                Err(*too_long)
            } else {
                Ok(Some(Value::String(text)))
            }
        }
        Check::Url { invalid } => {
            let text = as_text(raw).ok_or(*invalid)?;
            if HTTP_URL.is_match(&text) {
                Ok(Some(Value::String(text)))
            } else {
                Err(*invalid)
            }
        }
        Check::OneOf {
            values, invalid, ..
        } => match raw.as_str().map(str::trim) {
            Some(value) if values.iter().any(|allowed| *allowed == value) => {
                Ok(Some(Value::from(value)))
            }
            _ => Err(*invalid),
        },
        Check::Year {
            min,
            invalid,
            too_early,
            too_late,
        } => {
            let year = as_integer(raw).ok_or(*invalid)?;
            if year < *min {
                Err(*too_early)
            } else if year > current_year {
                Err(*too_late)
            } else {
                Ok(Some(Value::from(year)))
            }
        }
        Check::Reference(_) => {
            let id = raw.as_str().map(str::trim).ok_or(missing)?;
            Ok(Some(Value::from(id)))
        }
    }
}

/// Outcome for a field that is absent, null or blank. `sent` is false only
/// when the key is missing from the body.
fn missing_field(
    rule: &FieldRule,
    mode: WriteMode,
    sent: bool,
) -> Result<Option<Value>, &'static str> {
    if let Check::OneOf {
        default: Some(default),
        ..
    } = rule.check
    {
        return match mode {
            WriteMode::Create => Ok(Some(Value::from(default))),
            WriteMode::Update => Ok(None),
        };
    }
    match (rule.required, mode) {
        (Some(msg), _) => Err(msg),
        (None, WriteMode::Update) if sent => Ok(Some(Value::Null)),
        (None, _) => Ok(None),
    }
}

/// `None` for absent, null, or blank-string values.
fn present(raw: Option<&Value>) -> Option<&Value> {
    match raw? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other),
    }
}

fn as_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
