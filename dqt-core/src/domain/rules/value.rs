// dqt-core/src/domain/rules/value.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single attribute value as handed over by the orchestrator.
///
/// Number and text are kept apart on purpose: comparing `"42"` with `42`
/// is a type mismatch unless a rule asks for an explicit coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
}

/// One row of a dataset. Absent fields read as [`FieldValue::Null`].
pub type Record = BTreeMap<String, FieldValue>;

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null, blank text, or one of the configured NA markers.
    pub fn is_missing(&self, markers: &[String]) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => {
                let trimmed = s.trim();
                trimmed.is_empty() || markers.iter().any(|m| m == trimmed)
            }
            _ => false,
        }
    }

    /// String form used by pattern and substring operators. Lists and null have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null | Self::List(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

// Nested objects are flattened to the list of their values, which is what the
// completeness operator counts over.
impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::List(map.into_iter().map(|(_, v)| Self::from(v)).collect()),
        }
    }
}

/// Converts a JSON array of objects into records. Non-object rows are rejected
/// with their index so the caller can point at the offending entry.
pub fn records_from_json(value: serde_json::Value) -> Result<Vec<Record>, usize> {
    let serde_json::Value::Array(rows) = value else {
        return Err(0);
    };
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| match row {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect()),
            _ => Err(idx),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_detection() {
        let markers = vec!["N/A".to_string(), "NULL".to_string()];
        assert!(FieldValue::Null.is_missing(&markers));
        assert!(FieldValue::from("   ").is_missing(&markers));
        assert!(FieldValue::from("N/A").is_missing(&markers));
        assert!(!FieldValue::from("n/a").is_missing(&markers));
        assert!(!FieldValue::Number(0.0).is_missing(&markers));
        assert!(!FieldValue::Bool(false).is_missing(&[]));
    }

    #[test]
    fn test_text_representation() {
        assert_eq!(FieldValue::Number(42.0).as_text().as_deref(), Some("42"));
        assert_eq!(FieldValue::Number(0.5).as_text().as_deref(), Some("0.5"));
        assert_eq!(FieldValue::Bool(true).as_text().as_deref(), Some("true"));
        assert_eq!(FieldValue::Null.as_text(), None);
    }

    #[test]
    fn test_untagged_yaml_values() -> anyhow::Result<()> {
        let v: FieldValue = serde_yaml::from_str("42")?;
        assert_eq!(v, FieldValue::Number(42.0));
        let v: FieldValue = serde_yaml::from_str("'42'")?;
        assert_eq!(v, FieldValue::Text("42".into()));
        let v: FieldValue = serde_yaml::from_str("[a, 1]")?;
        assert_eq!(
            v,
            FieldValue::List(vec![FieldValue::Text("a".into()), FieldValue::Number(1.0)])
        );
        Ok(())
    }

    #[test]
    fn test_records_from_json() {
        let rows = records_from_json(json!([
            {"email": "a@b.io", "age": 31, "tags": ["x"]},
            {"email": null}
        ]))
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["age"], FieldValue::Number(31.0));
        assert_eq!(rows[1]["email"], FieldValue::Null);

        assert_eq!(records_from_json(json!([{"a": 1}, 3])), Err(1));
        assert_eq!(records_from_json(json!({"a": 1})), Err(0));
    }
}
