#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

//! Decoders that validate untrusted, already-parsed [`serde_json::Value`]s
//! into typed Rust values, or explain precisely where and why they do not
//! fit.
//!
//! Every decoder is built from one primitive, [`define`], and exposes the
//! operations of the [`Decoder`] trait. Failures are [`Annotation`] trees
//! carried in `Err`; only [`Decoder::verify`] turns them into an [`Error`].
//!
//! ```
//! use dynamic_decoders::decoders::{number, string};
//! use dynamic_decoders::{Decoder, tuple2};
//! use serde_json::json;
//!
//! let point = tuple2(string(), number()).describe("Must be a labelled point");
//! assert_eq!(point.value(&json!(["x", 1.5])), Some(("x".to_string(), 1.5)));
//! assert!(point.verify(&json!(["x", "y"])).is_err());
//! ```

pub mod annotation;
pub mod compose;
pub mod decoder;
pub mod decoders;
pub mod error;
pub mod result;
pub mod tuple;
pub mod types;

pub use decoder::unstable;

pub use annotation::format::{FormatOptions, format_inline, format_with};
pub use annotation::{Annotation, Child, Location, annotate};
pub use compose::{compose, map, predicate};
pub use decoder::{Acceptor, DecodeResult, Decoder, Define, Rejection, define};
pub use error::{Error, Report};
pub use tuple::{tuple1, tuple2, tuple3, tuple4, tuple5, tuple6};
pub use types::ValueKind;
