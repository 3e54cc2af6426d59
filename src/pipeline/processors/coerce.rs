use crate::error::{AppError, Result};
use crate::pipeline::event::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetUnit {
    Int,
    Uint,
    Float,
    String,
}

impl TargetUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetUnit::Int => "int",
            TargetUnit::Uint => "uint",
            TargetUnit::Float => "float",
            TargetUnit::String => "string",
        }
    }
}

impl fmt::Display for TargetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int" => Ok(TargetUnit::Int),
            "uint" => Ok(TargetUnit::Uint),
            "float" => Ok(TargetUnit::Float),
            "string" => Ok(TargetUnit::String),
            other => Err(AppError::UnknownTargetUnit(other.to_string())),
        }
    }
}

/// Best-effort conversion of `value` to `target`.
///
/// Anything that cannot be converted comes back as `None` and the caller keeps
/// the original value: booleans, text that is not a number (surrounding spaces
/// included), and values that already have the target kind.
pub fn coerce(value: &Value, target: TargetUnit) -> Option<Value> {
    match target {
        TargetUnit::Int => to_int(value).map(Value::Int),
        TargetUnit::Uint => to_uint(value).map(Value::Uint),
        TargetUnit::Float => to_float(value).map(Value::Float),
        TargetUnit::String => to_string(value).map(Value::String),
    }
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.parse::<i64>().ok(),
        Value::Uint(u) => Some(i64::try_from(*u).unwrap_or(i64::MAX)),
        // `as` truncates toward zero and saturates; NaN becomes 0.
        Value::Float(x) => Some(*x as i64),
        Value::Int(_) | Value::Bool(_) => None,
    }
}

fn to_uint(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => {
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<i64>().ok().map(clamp_negative))
        }
        Value::Int(i) => Some(clamp_negative(*i)),
        Value::Float(x) => Some(*x as u64),
        Value::Uint(_) | Value::Bool(_) => None,
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Int(i) => Some(*i as f64),
        Value::Uint(u) => Some(*u as f64),
        Value::Float(_) | Value::Bool(_) => None,
    }
}

fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => Some(value.to_string()),
        Value::String(_) | Value::Bool(_) => None,
    }
}

fn clamp_negative(i: i64) -> u64 {
    u64::try_from(i).unwrap_or(0)
}
