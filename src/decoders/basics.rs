use serde_json::Value;

use crate::decoder::{Define, define};
use crate::types::ValueKind;

/// Accepts any value as-is.
pub fn unknown() -> Define<Value> {
    define(|blob, accept| accept.ok(blob.clone()))
}

pub fn null() -> Define<()> {
    define(|blob, accept| match blob {
        Value::Null => accept.ok(()),
        _ => accept.err(ValueKind::Null.expectation()),
    })
}

pub fn string() -> Define<String> {
    define(|blob, accept| match blob {
        Value::String(s) => accept.ok(s.clone()),
        _ => accept.err(ValueKind::String.expectation()),
    })
}

pub fn number() -> Define<f64> {
    define(|blob, accept| match blob.as_f64() {
        Some(n) => accept.ok(n),
        _ => accept.err(ValueKind::Number.expectation()),
    })
}

/// 2^63, the first float past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Accepts numbers that fit an `i64` exactly, including whole floats like `8080.0`.
pub fn integer() -> Define<i64> {
    define(|blob, accept| {
        if let Some(n) = blob.as_i64() {
            return accept.ok(n);
        }
        match blob.as_f64() {
            Some(n) if n.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&n) => {
                accept.ok(n as i64)
            }
            _ => accept.err("Must be integer"),
        }
    })
}

pub fn boolean() -> Define<bool> {
    define(|blob, accept| match blob {
        Value::Bool(b) => accept.ok(*b),
        _ => accept.err(ValueKind::Boolean.expectation()),
    })
}
