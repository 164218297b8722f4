//! Two-stage structural JSON parsing core.
//!
//! Stage 1 ([`scan`]) walks the raw text once and records the byte offset of
//! every *structural* token: the six punctuation characters and the first
//! byte of each scalar. Stage 2 ([`StructuralInput::parse`]) walks that
//! sparse index, validates the grammar exactly, and drives a pluggable
//! [`TapeBuilder`] with one semantic event per token. What a document
//! *becomes* is entirely the builder's business: [`ValueBuilder`] grows a
//! [`Value`] tree, [`MinifyBuilder`] re-emits compact text, and callers can
//! bring their own tape formats.
//!
//! The structural pass allocates nothing, keeps no stack, and touches each
//! token once, so a replacement SIMD stage 1 gets a stage 2 that can keep up
//! with it.
//!
//! # Examples
//!
//! The one-shot helpers cover the common cases:
//!
//! ```
//! use jsontape::{minify, parse_value, Value};
//!
//! let doc = br#"{ "crate": "jsontape", "stages": [1, 2] }"#;
//!
//! let value = parse_value(doc).unwrap();
//! assert_eq!(value.get("crate").and_then(Value::as_str), Some("jsontape"));
//!
//! assert_eq!(minify(doc).unwrap(), br#"{"crate":"jsontape","stages":[1,2]}"#);
//! ```
//!
//! Streaming consumes one root per call from concatenated documents:
//!
//! ```
//! use jsontape::{scan, ParseError, StructuralInput, Value, ValueBuilder};
//!
//! let stream = br#"{"seq":1} {"seq":2}"#;
//! let indexes = scan(stream).unwrap();
//! let mut input = StructuralInput::new(stream, &indexes).unwrap();
//! let mut builder = ValueBuilder::new();
//!
//! let mut seqs = Vec::new();
//! loop {
//!     match input.parse_streaming(&mut builder) {
//!         Ok(()) => {
//!             let root = builder.root().unwrap();
//!             seqs.push(root.get("seq").and_then(Value::as_f64).unwrap());
//!         }
//!         Err(ParseError::Empty) => break,
//!         Err(err) => panic!("{err}"),
//!     }
//! }
//! assert_eq!(seqs, [1.0, 2.0]);
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod builder;
mod dom;
mod error;
mod input;
mod iter;
mod logger;
mod minify;
mod parser;
mod scalar;
mod scan;
mod value;

pub use builder::TapeBuilder;
pub use dom::{parse_value, DomError, ValueBuilder};
pub use error::{DocumentError, ParseError};
pub use input::{IndexError, StructuralInput};
pub use iter::StructuralIterator;
pub use minify::{minify, MinifyBuilder, MinifyError};
pub use parser::MAX_DEPTH;
pub use scalar::{decode_string, parse_number, parse_scalar, raw_scalar, ScalarError};
pub use scan::{scan, ScanError};
pub use value::{Array, Map, Value};

#[cfg(test)]
mod tests;
