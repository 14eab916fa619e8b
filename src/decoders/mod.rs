//! Leaf decoders for the common JSON shapes.
//!
//! These are ordinary consumers of the engine: each is built with
//! [`crate::define`] or by composing other decoders.

pub mod arrays;
pub mod basics;
pub mod json;
pub mod objects;
pub mod unions;
pub mod utilities;

pub use arrays::{array, poja};
pub use basics::{boolean, integer, null, number, string, unknown};
pub use json::{json, json_array, json_object};
pub use objects::{dict, pojo};
pub use unions::either;
pub use utilities::lazy;
