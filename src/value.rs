// 🧾 Field Values - Raw values as they arrive from forms and client records
// Every shape the host can hand us, as one sum type

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// FIELD VALUE
// ============================================================================

/// FieldValue - One raw field value, before any display formatting
///
/// `Absent` is a key that was never filled; `Null` is an explicit blank.
/// Both stringify to "".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Absent,
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// A form draft or a client record: field key -> raw value
pub type FieldValues = HashMap<String, FieldValue>;

impl FieldValue {
    /// Absent or Null
    pub fn is_nullish(&self) -> bool {
        matches!(self, FieldValue::Absent | FieldValue::Null)
    }

    /// Absent, Null or empty text - the values a prefill is allowed to replace
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Absent | FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Natural number form: shortest round-trip digits, no exponent, no "-0"
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent | FieldValue::Null => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => f.write_str(&number_to_string(*n)),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(FieldValue::Null, Into::into)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => n
                .as_f64()
                .map_or_else(|| FieldValue::Text(n.to_string()), FieldValue::Number),
            Value::String(s) => FieldValue::Text(s),
            // Arrays and objects only ever get displayed, keep their JSON
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Absent | FieldValue::Null => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map_or_else(|| Value::String(number_to_string(*n)), Value::Number),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Date(_) | FieldValue::DateTime(_) => Value::String(value.to_string()),
        }
    }
}

/// Convert a JSON object into field values; anything else is an empty mapping
pub fn values_from_json(value: Value) -> FieldValues {
    match value {
        Value::Object(map) => map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
        _ => FieldValues::new(),
    }
}

/// Convert field values into a JSON object with sorted keys
pub fn values_to_json(values: &FieldValues) -> Value {
    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort();

    let map = keys
        .into_iter()
        .map(|k| (k.clone(), Value::from(&values[k])))
        .collect();
    Value::Object(map)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_nullish_is_empty() {
        assert_eq!(FieldValue::Absent.to_string(), "");
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn test_display_numbers_natural_form() {
        assert_eq!(FieldValue::Number(4.0).to_string(), "4");
        assert_eq!(FieldValue::Number(1234.5).to_string(), "1234.5");
        assert_eq!(FieldValue::Number(-0.25).to_string(), "-0.25");
        assert_eq!(FieldValue::Number(-0.0).to_string(), "0");
        assert_eq!(FieldValue::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_display_bool_and_dates() {
        assert_eq!(FieldValue::Bool(true).to_string(), "true");

        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(FieldValue::Date(date).to_string(), "2024-01-05");

        let dt = date.and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(FieldValue::DateTime(dt).to_string(), "2024-01-05T09:30:00");
    }

    #[test]
    fn test_is_blank() {
        assert!(FieldValue::Absent.is_blank());
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::from("").is_blank());
        assert!(!FieldValue::from(" ").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
        assert!(!FieldValue::Bool(false).is_blank());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from(json!(12)), FieldValue::Number(12.0));
        assert_eq!(FieldValue::from(json!("abc")), FieldValue::from("abc"));
        assert_eq!(FieldValue::from(json!([1, 2])), FieldValue::from("[1,2]"));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldValue::from(None::<&str>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(2.5)), FieldValue::Number(2.5));
    }

    #[test]
    fn test_values_json_conversion() {
        let values = values_from_json(json!({"pan": "ABCDE1234F", "turnover": 1500000, "gst": null}));
        assert_eq!(values.len(), 3);
        assert_eq!(values["gst"], FieldValue::Null);

        let back = values_to_json(&values);
        assert_eq!(back, json!({"gst": null, "pan": "ABCDE1234F", "turnover": 1500000.0}));
    }

    #[test]
    fn test_values_from_non_object_is_empty() {
        assert!(values_from_json(json!([1, 2, 3])).is_empty());
    }
}
