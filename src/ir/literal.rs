use chrono::{DateTime, Utc};
use ordered_float::NotNan;
use serde_json::Value;
use std::fmt::{self, Display};
use uuid::Uuid;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(NotNan<f64>),
    Bool(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl Literal {
    /// NaN has no ordering and cannot participate in a query constant.
    pub fn float(value: f64) -> Option<Literal> {
        NotNan::new(value).ok().map(Literal::Float)
    }

    /// Map a scalar JSON value to a literal. Arrays and objects have no
    /// literal form and yield `None`.
    pub fn from_json(value: &Value) -> Option<Literal> {
        match value {
            Value::Null => Some(Literal::Null),
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Literal::Int(i))
                } else {
                    n.as_f64().and_then(Literal::float)
                }
            }
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Int(i) => Value::from(*i),
            Literal::Float(n) => Value::from(n.into_inner()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Uuid(u) => Value::String(u.to_string()),
            Literal::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Literal::Null => Value::Null,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value as i64)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<Uuid> for Literal {
    fn from(value: Uuid) -> Self {
        Literal::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(value: DateTime<Utc>) -> Self {
        Literal::DateTime(value)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "s: \"{}\"", s),
            Literal::Int(i) => write!(f, "i: {}", i),
            Literal::Float(n) => write!(f, "f: {}", n.into_inner()),
            Literal::Bool(b) => write!(f, "b: {}", b),
            Literal::Uuid(u) => write!(f, "u: {}", u),
            Literal::DateTime(dt) => write!(f, "t: {}", dt.to_rfc3339()),
            Literal::Null => write!(f, "n: NULL"),
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(_) => write!(f, "String({})", self),
            Literal::Int(_) => write!(f, "Int({})", self),
            Literal::Float(_) => write!(f, "Float({})", self),
            Literal::Bool(_) => write!(f, "Bool({})", self),
            Literal::Uuid(_) => write!(f, "Uuid({})", self),
            Literal::DateTime(_) => write!(f, "DateTime({})", self),
            Literal::Null => write!(f, "Null(n: NULL)"),
        }
    }
}
