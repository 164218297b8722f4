//! Property tests over generated documents.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::Write;

use quickcheck::QuickCheck;

use super::support::CountingBuilder;
use crate::{
    minify, parse_value, scan, value::write_escaped_string, ParseError, StructuralInput, Value,
    ValueBuilder,
};

const TESTS: u64 = 500;

/// Serializes `value` with noisy but insignificant whitespace around every
/// token.
fn to_spaced(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push_str("[ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(" ,\n\t");
                }
                to_spaced(item, out);
            }
            out.push_str("\n]");
        }
        Value::Object(map) => {
            out.push_str("{ ");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str("\t,\r\n");
                }
                out.push('"');
                write_escaped_string(key, out).unwrap();
                out.push_str("\" : ");
                to_spaced(item, out);
            }
            out.push_str(" }");
        }
        scalar => write!(out, " {scalar} ").unwrap(),
    }
}

#[test]
fn parsed_documents_round_trip() {
    fn prop(value: Value) -> bool {
        let text = value.to_string();
        parse_value(text.as_bytes()) == Ok(value)
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn whitespace_does_not_change_the_document() {
    fn prop(value: Value) -> bool {
        let mut spaced = String::new();
        to_spaced(&value, &mut spaced);
        parse_value(spaced.as_bytes()) == Ok(value)
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn minify_reproduces_canonical_text() {
    fn prop(value: Value) -> bool {
        let text = value.to_string();
        let mut spaced = String::new();
        to_spaced(&value, &mut spaced);

        // Compact text is a fixed point, and whitespace minifies away.
        minify(text.as_bytes()) == Ok(text.clone().into_bytes())
            && minify(spaced.as_bytes()) == Ok(text.into_bytes())
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn container_events_balance() {
    fn prop(value: Value) -> bool {
        let text = value.to_string();
        let indexes = scan(text.as_bytes()).unwrap();
        let mut input = StructuralInput::new(text.as_bytes(), &indexes).unwrap();
        let mut counter = CountingBuilder::default();
        input.parse(&mut counter).is_ok()
            && counter.object_starts == counter.object_ends
            && counter.array_starts == counter.array_ends
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn multi_root_streams_round_trip() {
    fn prop(values: Vec<Value>) -> bool {
        let payload = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let indexes = scan(payload.as_bytes()).unwrap();
        let mut input = StructuralInput::new(payload.as_bytes(), &indexes).unwrap();
        let mut builder = ValueBuilder::new();

        let mut parsed = Vec::new();
        loop {
            match input.parse_streaming(&mut builder) {
                Ok(()) => match builder.root() {
                    Some(root) => parsed.push(root),
                    None => return false,
                },
                Err(ParseError::Empty) => break,
                Err(_) => return false,
            }
        }
        parsed == values
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Vec<Value>) -> bool);
}
