use either::Either;
use serde_json::{Map, Value};

use crate::compose::compose;
use crate::decoder::{Decoder, Define};
use crate::decoders::{array, boolean, dict, either, lazy, null, number, string};

/// Like [`json`], but only accepts objects.
pub fn json_object() -> Define<Value> {
    compose(lazy(|| dict(json())), |fields| {
        Ok(Value::Object(fields.into_iter().collect::<Map<_, _>>()))
    })
}

/// Like [`json`], but only accepts arrays.
pub fn json_array() -> Define<Value> {
    compose(lazy(|| array(json())), |items| Ok(Value::Array(items)))
}

/// Accepts any valid JSON value, checking every nested value recursively.
pub fn json() -> Define<Value> {
    let scalars = first_of(
        first_of(
            compose(null(), |()| Ok(Value::Null)),
            compose(string(), |s| Ok(Value::String(s))),
        ),
        first_of(
            // Keep the original number rather than its f64 reading, so large
            // integers stay exact.
            number().then(|_, accept| {
                let raw = accept.blob().clone();
                accept.ok(raw)
            }),
            compose(boolean(), |b| Ok(Value::Bool(b))),
        ),
    );
    first_of(scalars, first_of(json_object(), json_array())).describe("Must be valid JSON value")
}

fn first_of(left: Define<Value>, right: Define<Value>) -> Define<Value> {
    compose(either(left, right), |value| Ok(Either::into_inner(value)))
}
