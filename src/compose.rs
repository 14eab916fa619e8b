//! Lifting plain functions over decoded values into decoders.
//!
//! Most leaf decoders are easiest to write as a function over an
//! already-decoded value. `compose` and `map` turn such functions into
//! decoders without implementing [`Decoder`] by hand.

use std::fmt;

use serde::Serialize;

use crate::annotation::{annotate, snapshot};
use crate::decoder::{DecodeResult, Decoder, Define, guarded};

/// Decodes with `decoder`, then runs `step` on the decoded value. `step` can
/// reject by returning an `Err` annotation of its choosing.
///
/// ```
/// use dynamic_decoders::decoders::string;
/// use dynamic_decoders::{Decoder, annotate, compose};
/// use serde_json::json;
///
/// let hex = compose(string(), |s| {
///     i64::from_str_radix(&s, 16).map_err(|_| annotate(json!(s), "Nope"))
/// });
/// assert_eq!(hex.value(&json!("100")), Some(256));
/// ```
pub fn compose<D, V, F>(decoder: D, step: F) -> Define<V>
where
    D: Decoder + Send + Sync + 'static,
    F: Fn(D::Output) -> DecodeResult<V> + Send + Sync + 'static,
{
    decoder.then(move |value, _| step(value))
}

/// Decodes with `decoder`, then maps the decoded value with `mapper`.
///
/// `mapper` cannot build annotations itself: an `Err` it returns becomes a
/// rejection of the pre-mapping value carrying the error's message, exactly
/// as with [`Decoder::transform`].
pub fn map<D, V, E, F>(decoder: D, mapper: F) -> Define<V>
where
    D: Decoder + Send + Sync + 'static,
    D::Output: Serialize,
    F: Fn(D::Output) -> Result<V, E> + Send + Sync + 'static,
    E: fmt::Display,
{
    compose(decoder, move |value| guarded(&mapper, value))
}

/// A `compose` step accepting values that satisfy `pred` and rejecting the
/// rest with `message`.
pub fn predicate<T, P>(
    pred: P,
    message: impl Into<String>,
) -> impl Fn(T) -> DecodeResult<T> + Send + Sync + 'static
where
    T: Serialize,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let message = message.into();
    move |value| {
        if pred(&value) {
            Ok(value)
        } else {
            Err(annotate(snapshot(&value), message.clone()))
        }
    }
}
