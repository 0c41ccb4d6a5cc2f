//! Explicit field schemas for request payloads.
//!
//! A [`Schema`] is an ordered list of [`FieldRule`]s. Each rule runs its
//! constraints in order (presence, type, enum membership, range, date
//! coercion) and stops at the first failure for that field; the schema keeps
//! going so every violating field is reported at once.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};
use validator::{ValidationError, ValidationErrors};

/// Raw request body as a field map.
pub type Payload = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Type and format constraint of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string
    Text,
    /// JSON string from a fixed set
    OneOf(&'static [&'static str]),
    /// JSON integer within `min..=max`
    Integer { min: i64, max: i64 },
    /// Date-like value, coerced to an RFC 3339 UTC string
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    name: &'static str,
    presence: Presence,
    kind: FieldKind,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            presence: Presence::Required,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            presence: Presence::Optional,
            kind,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check one raw value. `Ok(None)` means an absent optional field.
    fn check(&self, raw: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        let value = match raw {
            None | Some(Value::Null) => {
                return match self.presence {
                    Presence::Optional => Ok(None),
                    Presence::Required => Err(self.violation("required", "should not be empty")),
                };
            }
            Some(value) => value,
        };

        match self.kind {
            FieldKind::Text => self.check_text(value).map(Some),
            FieldKind::OneOf(allowed) => {
                let text = self.check_text(value)?;
                if value.as_str().is_some_and(|s| allowed.contains(&s)) {
                    Ok(Some(text))
                } else {
                    Err(self.violation(
                        "enum",
                        &format!("must be one of the following values: {}", allowed.join(", ")),
                    ))
                }
            }
            FieldKind::Integer { min, max } => {
                let n = integer_value(value)
                    .ok_or_else(|| self.violation("integer", "must be an integer number"))?;
                if n < min {
                    return Err(self.violation("range", &format!("must not be less than {}", min)));
                }
                if n > max {
                    return Err(self.violation(
                        "range",
                        &format!("must not be greater than {}", max),
                    ));
                }
                Ok(Some(Value::Number(Number::from(n))))
            }
            FieldKind::Date => coerce_date(value)
                .map(|date| Some(Value::String(date.to_rfc3339())))
                .ok_or_else(|| self.violation("date", "must be a Date instance")),
        }
    }

    fn check_text(&self, value: &Value) -> Result<Value, ValidationError> {
        match value {
            Value::String(s) if s.is_empty() && self.presence == Presence::Required => {
                Err(self.violation("required", "should not be empty"))
            }
            Value::String(_) => Ok(value.clone()),
            _ => Err(self.violation("string", "must be a string")),
        }
    }

    fn violation(&self, code: &'static str, detail: &str) -> ValidationError {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Owned(format!("{} {}", self.name, detail)));
        error
    }
}

/// Ordered set of field rules for one request shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Validate and coerce a payload.
    ///
    /// Returns a new map holding only the declared fields, with dates
    /// normalized and absent optionals dropped, or every field violation.
    pub fn validate(&self, payload: &Payload) -> Result<Payload, ValidationErrors> {
        let mut coerced = Payload::new();
        let mut errors = ValidationErrors::new();

        for rule in &self.fields {
            match rule.check(payload.get(rule.name)) {
                Ok(Some(value)) => {
                    coerced.insert(rule.name.to_string(), value);
                }
                Ok(None) => {}
                Err(error) => errors.add(rule.name, error),
            }
        }

        if errors.is_empty() {
            Ok(coerced)
        } else {
            Err(errors)
        }
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    // 3.0 is an integer too; whole values past i64 saturate so they fail the range check
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn coerce_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
}
