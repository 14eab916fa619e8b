use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::annotation::{Annotation, Child, Location};
use crate::decoder::{Decoder, Define, define};

/// Accepts any object ("plain old JavaScript object"), yielding its fields
/// undecoded.
pub fn pojo() -> Define<Map<String, Value>> {
    define(|blob, accept| match blob {
        Value::Object(fields) => accept.ok(fields.clone()),
        _ => accept.err("Must be an object"),
    })
}

/// Accepts objects whose every field value `decoder` accepts.
///
/// All fields are decoded; every bad one is reported under its key.
pub fn dict<D>(decoder: D) -> Define<BTreeMap<String, D::Output>>
where
    D: Decoder + Send + Sync + 'static,
{
    define(move |blob, accept| {
        let Value::Object(fields) = blob else {
            return accept.err("Must be an object");
        };
        let mut decoded = BTreeMap::new();
        let mut failures = Vec::new();
        for (key, value) in fields {
            match decoder.decode(value) {
                Ok(value) => {
                    decoded.insert(key.clone(), value);
                }
                Err(failure) => failures.push(Child::at(Location::Key(key.clone()), failure)),
            }
        }
        if failures.is_empty() {
            accept.ok(decoded)
        } else {
            accept.err(Annotation::new(blob.clone()).with_children(failures))
        }
    })
}
