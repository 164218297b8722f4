//! Builders and helpers shared by the test suite.

use alloc::{string::String, vec::Vec};
use core::convert::Infallible;

use crate::{decode_string, raw_scalar, scan, ParseError, StructuralInput, TapeBuilder};

/// One recorded callback. Keys are decoded, values keep their raw spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDocument,
    EndDocument,
    RootPrimitive(String),
    EmptyObject,
    StartObject,
    StartObjectField(String),
    EmptyObjectField(String),
    EndObject,
    TryEndObject,
    TryResumeObject,
    EmptyArray,
    StartArray,
    EmptyArrayField(String),
    StartArrayField(String),
    EndArray,
    TryEndArray,
    TryResumeArray,
    TryResumeArrayValue(String),
    Primitive(String),
    PrimitiveField(String, String),
}

fn raw(token: &[u8]) -> String {
    String::from_utf8_lossy(raw_scalar(token)).into_owned()
}

fn key(token: &[u8]) -> String {
    decode_string(token).expect("test keys decode")
}

/// Accepts every event and records the exact callback sequence.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    pub events: Vec<Event>,
}

impl<'de> TapeBuilder<'de> for RecordingBuilder {
    type Error = Infallible;

    fn start_document(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::StartDocument);
        Ok(())
    }
    fn end_document(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::EndDocument);
        Ok(())
    }
    fn root_primitive(&mut self, value: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::RootPrimitive(raw(value)));
        Ok(())
    }
    fn empty_object(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::EmptyObject);
        Ok(())
    }
    fn start_object(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::StartObject);
        Ok(())
    }
    fn start_object_field(&mut self, k: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::StartObjectField(key(k)));
        Ok(())
    }
    fn empty_object_field(&mut self, k: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::EmptyObjectField(key(k)));
        Ok(())
    }
    fn end_object(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::EndObject);
        Ok(())
    }
    fn try_end_object(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::TryEndObject);
        Ok(())
    }
    fn try_resume_object(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::TryResumeObject);
        Ok(())
    }
    fn empty_array(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::EmptyArray);
        Ok(())
    }
    fn start_array(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::StartArray);
        Ok(())
    }
    fn empty_array_field(&mut self, k: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::EmptyArrayField(key(k)));
        Ok(())
    }
    fn start_array_field(&mut self, k: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::StartArrayField(key(k)));
        Ok(())
    }
    fn end_array(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::EndArray);
        Ok(())
    }
    fn try_end_array(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::TryEndArray);
        Ok(())
    }
    fn try_resume_array(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::TryResumeArray);
        Ok(())
    }
    fn try_resume_array_value(&mut self, value: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::TryResumeArrayValue(raw(value)));
        Ok(())
    }
    fn primitive(&mut self, value: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::Primitive(raw(value)));
        Ok(())
    }
    fn primitive_field(&mut self, k: &'de [u8], value: &'de [u8]) -> Result<(), Infallible> {
        self.events.push(Event::PrimitiveField(key(k), raw(value)));
        Ok(())
    }
}

/// Tallies container starts and ends without looking at any bytes.
#[derive(Debug, Default)]
pub struct CountingBuilder {
    pub object_starts: usize,
    pub object_ends: usize,
    pub array_starts: usize,
    pub array_ends: usize,
}

impl<'de> TapeBuilder<'de> for CountingBuilder {
    type Error = Infallible;

    fn start_document(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn end_document(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn root_primitive(&mut self, _value: &'de [u8]) -> Result<(), Infallible> {
        Ok(())
    }
    fn empty_object(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn start_object(&mut self) -> Result<(), Infallible> {
        self.object_starts += 1;
        Ok(())
    }
    fn start_object_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
        self.object_starts += 1;
        Ok(())
    }
    fn empty_object_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
        Ok(())
    }
    fn end_object(&mut self) -> Result<(), Infallible> {
        self.object_ends += 1;
        Ok(())
    }
    fn try_end_object(&mut self) -> Result<(), Infallible> {
        self.object_ends += 1;
        Ok(())
    }
    fn try_resume_object(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn empty_array(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn start_array(&mut self) -> Result<(), Infallible> {
        self.array_starts += 1;
        Ok(())
    }
    fn empty_array_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
        Ok(())
    }
    fn start_array_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
        self.array_starts += 1;
        Ok(())
    }
    fn end_array(&mut self) -> Result<(), Infallible> {
        self.array_ends += 1;
        Ok(())
    }
    fn try_end_array(&mut self) -> Result<(), Infallible> {
        self.array_ends += 1;
        Ok(())
    }
    fn try_resume_array(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn try_resume_array_value(&mut self, _value: &'de [u8]) -> Result<(), Infallible> {
        Ok(())
    }
    fn primitive(&mut self, _value: &'de [u8]) -> Result<(), Infallible> {
        Ok(())
    }
    fn primitive_field(&mut self, _key: &'de [u8], _value: &'de [u8]) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Parses `json` as one document and returns the status plus the recorded
/// callback sequence up to the failure point.
pub fn record(json: &str) -> (Result<(), ParseError<Infallible>>, Vec<Event>) {
    let indexes = scan(json.as_bytes()).expect("test inputs scan");
    let mut input = StructuralInput::new(json.as_bytes(), &indexes).expect("index is valid");
    let mut builder = RecordingBuilder::default();
    let status = input.parse(&mut builder);
    (status, builder.events)
}

/// Asserts that `json` parses cleanly and produced exactly `expected`.
pub fn assert_events(json: &str, expected: &[Event]) {
    let (status, events) = record(json);
    assert_eq!(status, Ok(()), "parse of {json:?} failed");
    assert_eq!(events, expected, "event mismatch for {json:?}");
}
