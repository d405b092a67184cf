//! Condition keys, operands and order terms as callers write them.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use searchmap_core::{Direction, Value};

/// Operators a key may be qualified with.
///
/// Only a subset is meaningful to the backend; the rest exist so that
/// callers porting conditions from richer query languages get a precise
/// unsupported-operator error instead of a silent equality match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eql,
    Not,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    In,
    Regexp,
    Asc,
    Desc,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eql => "eql",
            Self::Not => "not",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Like => "like",
            Self::In => "in",
            Self::Regexp => "regexp",
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eql" => Self::Eql,
            "not" => Self::Not,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "like" => Self::Like,
            "in" => Self::In,
            "regexp" => Self::Regexp,
            "asc" => Self::Asc,
            "desc" => Self::Desc,
            other => return Err(other.to_string()),
        })
    }
}

/// Left-hand side of a condition or order term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Attr(String),
    Op { target: String, operator: Operator },
}

impl Key {
    pub fn target(&self) -> &str {
        match self {
            Self::Attr(target) | Self::Op { target, .. } => target,
        }
    }
}

macro_rules! operator_constructors {
    ($($name:ident => $op:ident),* $(,)?) => {
        impl Key {
            $(
                pub fn $name(attr: impl Into<String>) -> Self {
                    Self::Op { target: attr.into(), operator: Operator::$op }
                }
            )*
        }
    };
}

// `Key::gt("views")` reads like the condition it builds.
operator_constructors! {
    eql => Eql,
    not => Not,
    lt => Lt,
    lte => Lte,
    gt => Gt,
    gte => Gte,
    like => Like,
    within => In,
    regexp => Regexp,
    asc => Asc,
    desc => Desc,
}

impl From<&str> for Key {
    fn from(attr: &str) -> Self { Self::Attr(attr.to_string()) }
}

impl From<String> for Key {
    fn from(attr: String) -> Self { Self::Attr(attr) }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    /// Inclusive bounds.
    Range(Value, Value),
    List(Vec<Value>),
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self { Self::Value(v) }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self { Self::Value(v.into()) }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self { Self::Value(v.into()) }
}

impl From<u64> for Operand {
    fn from(v: u64) -> Self { Self::Value(v.into()) }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self { Self::Value(v.into()) }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self { Self::Value(v.into()) }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self { Self::Value(v.into()) }
}

impl From<String> for Operand {
    fn from(v: String) -> Self { Self::Value(v.into()) }
}

impl From<RangeInclusive<i64>> for Operand {
    fn from(r: RangeInclusive<i64>) -> Self {
        let (lo, hi) = r.into_inner();
        Self::Range(lo.into(), hi.into())
    }
}

impl From<RangeInclusive<f64>> for Operand {
    fn from(r: RangeInclusive<f64>) -> Self {
        let (lo, hi) = r.into_inner();
        Self::Range(lo.into(), hi.into())
    }
}

impl From<Vec<Value>> for Operand {
    fn from(vs: Vec<Value>) -> Self { Self::List(vs) }
}

impl From<Vec<i64>> for Operand {
    fn from(vs: Vec<i64>) -> Self { Self::List(vs.into_iter().map(Value::from).collect()) }
}

impl From<Vec<&str>> for Operand {
    fn from(vs: Vec<&str>) -> Self { Self::List(vs.into_iter().map(Value::from).collect()) }
}

/// One entry of an `order` clause.
///
/// The direction comes from an `asc`/`desc` qualified key, else from
/// `direction`, else ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub key: Key,
    pub direction: Option<Direction>,
}

impl From<&str> for OrderTerm {
    fn from(attr: &str) -> Self { Self { key: attr.into(), direction: None } }
}

impl From<String> for OrderTerm {
    fn from(attr: String) -> Self { Self { key: attr.into(), direction: None } }
}

impl From<Key> for OrderTerm {
    fn from(key: Key) -> Self { Self { key, direction: None } }
}

impl From<(&str, Direction)> for OrderTerm {
    fn from((attr, direction): (&str, Direction)) -> Self {
        Self { key: attr.into(), direction: Some(direction) }
    }
}

impl From<(String, Direction)> for OrderTerm {
    fn from((attr, direction): (String, Direction)) -> Self {
        Self { key: attr.into(), direction: Some(direction) }
    }
}
