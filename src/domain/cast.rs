// Serde helpers that cast loosely typed JSON into blend fields
use serde::de::{Deserializer, Error};
use serde::Deserialize;
use serde_json::Value;

/// Cast one JSON value to a number. Null and blank strings are absent;
/// numeric strings and booleans are converted.
pub fn to_number(value: Value) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::Bool(b) => Ok(Some(if b { 1.0 } else { 0.0 })),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(format!("`{}` is not a number", s)),
        },
        other => Err(format!("expected a number, found {}", other)),
    }
}

/// Cast one JSON value to text. Null reads as empty; numbers and booleans
/// are written out.
pub fn to_text(value: Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected text, found {}", other)),
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    to_number(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub fn numbers<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(to_number)
        .collect::<Result<_, _>>()
        .map_err(D::Error::custom)
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    to_text(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}
