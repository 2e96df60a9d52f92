//! # formatstring-reference
//!
//! Reference implementation of replacement-field string formatting
//! (`"{0!r:_>16}".format(value)` style templates) together with the value
//! model shared by the conformance harness: semantic type tags, in-memory
//! values and the literal codec used to hand values to a subject process.
//!
//! No `unsafe` code is permitted at the crate level.

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
mod float;
pub mod literal;
mod render;
pub mod spec;
pub mod template;
pub mod value;

pub use engine::{format_value, render, render_one};
pub use error::{FormatError, LiteralError};
pub use literal::{encode_literal, parse_literal};
pub use spec::FormatSpec;
pub use value::{SemanticType, TypeCategory, Value, float_repr, string_repr};
