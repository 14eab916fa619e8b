//! Fixed-arity tuple decoders, `tuple1` through `tuple6`.
//!
//! Every slot is decoded even after one fails, so a single rejection lists
//! all bad positions at once. The annotation's value is the tuple with each
//! good slot holding its decoded value and each bad slot its input, and every
//! bad slot appears as a child at its index.

use serde::Serialize;
use serde_json::Value;

use crate::annotation::{Annotation, Child, Location, annotate, snapshot};
use crate::compose::{compose, predicate};
use crate::decoder::{DecodeResult, Decoder, Define};
use crate::decoders::poja;

/// Arrays of exactly `n` items.
fn ntuple(n: usize) -> Define<Vec<Value>> {
    compose(
        poja(),
        predicate(
            move |items: &Vec<Value>| items.len() == n,
            format!("Must be a {n}-tuple"),
        ),
    )
}

enum Slot {
    Decoded(Value),
    Failed(Annotation),
}

impl Slot {
    fn settle<T: Serialize>(result: DecodeResult<T>) -> Self {
        match result {
            Ok(value) => Self::Decoded(snapshot(&value)),
            Err(failure) => Self::Failed(failure),
        }
    }
}

/// Folds per-slot outcomes into one annotation with a child per failed slot.
fn aggregate(slots: Vec<Slot>) -> Annotation {
    let mut values = Vec::with_capacity(slots.len());
    let mut failures = Vec::new();
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Slot::Decoded(value) => values.push(value),
            Slot::Failed(failure) => {
                values.push(failure.value().clone());
                failures.push(Child::at(Location::Index(index), failure));
            }
        }
    }
    tracing::trace!(
        arity = values.len(),
        failed = failures.len(),
        "tuple slots rejected"
    );
    Annotation::new(Value::Array(values)).with_children(failures)
}

macro_rules! tuple_decoder {
    ($(#[$doc:meta])* $name:ident($arity:literal) { $($decoder:ident: $ty:ident => $blob:ident, $result:ident;)+ }) => {
        $(#[$doc])*
        pub fn $name<$($ty),+>($($decoder: $ty),+) -> Define<($($ty::Output,)+)>
        where
            $($ty: Decoder + Send + Sync + 'static, $ty::Output: Serialize,)+
        {
            compose(ntuple($arity), move |blobs: Vec<Value>| {
                let [$($blob),+] = match <[Value; $arity]>::try_from(blobs) {
                    Ok(blobs) => blobs,
                    Err(blobs) => {
                        return Err(annotate(
                            Value::Array(blobs),
                            format!("Must be a {}-tuple", $arity),
                        ));
                    }
                };
                $(let $result = $decoder.decode(&$blob);)+
                match ($($result,)+) {
                    ($(Ok($result),)+) => Ok(($($result,)+)),
                    ($($result,)+) => Err(aggregate(vec![$(Slot::settle($result)),+])),
                }
            })
        }
    };
}

tuple_decoder! {
    /// Decodes a 1-tuple `[T]`.
    tuple1(1) {
        decoder1: D1 => blob1, result1;
    }
}

tuple_decoder! {
    /// Decodes a 2-tuple `[T1, T2]`.
    tuple2(2) {
        decoder1: D1 => blob1, result1;
        decoder2: D2 => blob2, result2;
    }
}

tuple_decoder! {
    /// Decodes a 3-tuple `[T1, T2, T3]`.
    tuple3(3) {
        decoder1: D1 => blob1, result1;
        decoder2: D2 => blob2, result2;
        decoder3: D3 => blob3, result3;
    }
}

tuple_decoder! {
    /// Decodes a 4-tuple `[T1, T2, T3, T4]`.
    tuple4(4) {
        decoder1: D1 => blob1, result1;
        decoder2: D2 => blob2, result2;
        decoder3: D3 => blob3, result3;
        decoder4: D4 => blob4, result4;
    }
}

tuple_decoder! {
    /// Decodes a 5-tuple `[T1, T2, T3, T4, T5]`.
    tuple5(5) {
        decoder1: D1 => blob1, result1;
        decoder2: D2 => blob2, result2;
        decoder3: D3 => blob3, result3;
        decoder4: D4 => blob4, result4;
        decoder5: D5 => blob5, result5;
    }
}

tuple_decoder! {
    /// Decodes a 6-tuple `[T1, T2, T3, T4, T5, T6]`.
    tuple6(6) {
        decoder1: D1 => blob1, result1;
        decoder2: D2 => blob2, result2;
        decoder3: D3 => blob3, result3;
        decoder4: D4 => blob4, result4;
        decoder5: D5 => blob5, result5;
        decoder6: D6 => blob6, result6;
    }
}
