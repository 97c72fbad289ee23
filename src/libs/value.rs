use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar cell value as it travels between the panel and the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

/// One row: column name to scalar, in the backend's column order.
pub type Record = IndexMap<String, Value>;

impl Value {
    /// An identifier is missing when it is null or an empty string.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text used to pre-fill a form input. Null pre-fills as empty.
    pub fn to_input_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Reads the leading integer of a form string: an optional sign then
    /// digits, with whatever follows ignored (`"12.0"` is 12, `"42abc"` is
    /// 42). `Null` when no digit leads.
    pub fn integer_from_text(text: &str) -> Value {
        let text = text.trim_start();
        let sign = usize::from(text.starts_with(['+', '-']));
        let end = text[sign..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(text.len(), |i| i + sign);
        if end == sign {
            return Value::Null;
        }
        let literal = &text[..end];
        match literal.parse::<i64>() {
            Ok(n) => Value::from(n),
            // wider than i64
            Err(_) => literal
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or(Value::Null, Value::Number),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Text form of a value for binding as a SQL parameter; `None` for null.
pub fn bind_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
