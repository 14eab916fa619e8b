//! Experimental combinators. Nothing here is covered by semver; signatures
//! may change or disappear in any release.

use serde_json::Value;

use super::{Acceptor, DecodeResult, Decoder, Define, define};

pub trait PeekUnstable: Decoder {
    /// Like [`Decoder::then`], but `next` also receives the raw input
    /// alongside the decoded value.
    fn peek_unstable<V, F>(self, next: F) -> Define<V>
    where
        Self: Sized + Send + Sync + 'static,
        F: Fn((&Value, Self::Output), Acceptor<'_>) -> DecodeResult<V> + Send + Sync + 'static,
    {
        define(move |blob, accept| match self.decode(blob) {
            Ok(value) => next((blob, value), accept),
            Err(annotation) => Err(annotation),
        })
    }
}

impl<D: Decoder> PeekUnstable for D {}
