//! Scalar attribute values as stored in, and returned from, a search index.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// Integers and floats compare with each other numerically, so a filter
/// `views > 7` matches a stored `7.5`. Values of unrelated kinds never
/// compare (see [`Value::compare`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> { self.as_i64().and_then(|v| u64::try_from(v).ok()) }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Orders two values when they are of comparable kinds.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            _ => None,
        }
    }

    /// Equality that treats `7` and `7.0` as the same value.
    pub fn matches(&self, other: &Value) -> bool { self.compare(other) == Some(Ordering::Equal) }

    /// Converts a JSON scalar. Null, arrays and objects have no attribute form.
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Self::Int(v) }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self { Self::Int(i64::from(v)) }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self { Self::Int(i64::from(v)) }
}

impl From<u64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: u64) -> Self { i64::try_from(v).map_or(Self::Float(v as f64), Self::Int) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Self::Float(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Self::Text(v.to_string()) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Self::Text(v) }
}
