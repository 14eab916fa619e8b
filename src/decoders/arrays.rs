use serde_json::Value;

use crate::annotation::{Annotation, Child, Location};
use crate::decoder::{Decoder, Define, define};

/// Accepts any array ("plain old JavaScript array"), yielding its items
/// undecoded.
pub fn poja() -> Define<Vec<Value>> {
    define(|blob, accept| match blob {
        Value::Array(items) => accept.ok(items.clone()),
        _ => accept.err("Must be an array"),
    })
}

/// Accepts arrays whose every item `decoder` accepts.
///
/// Stops at the first bad item; the annotation points at it by index.
pub fn array<D>(decoder: D) -> Define<Vec<D::Output>>
where
    D: Decoder + Send + Sync + 'static,
{
    define(move |blob, accept| {
        let Value::Array(items) = blob else {
            return accept.err("Must be an array");
        };
        let mut decoded = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match decoder.decode(item) {
                Ok(value) => decoded.push(value),
                Err(failure) => {
                    return accept.err(
                        Annotation::new(blob.clone())
                            .with_child(Child::at(Location::Index(index), failure)),
                    );
                }
            }
        }
        accept.ok(decoded)
    })
}
