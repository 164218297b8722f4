//! Eager DOM construction from the structural event stream.

use alloc::string::String;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    builder::TapeBuilder,
    error::DocumentError,
    input::StructuralInput,
    scalar::{self, ScalarError},
    scan::scan,
    value::{Array, Map, Value},
};

/// Error from [`ValueBuilder`] callbacks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// An object event arrived while no object was open.
    #[error("no object is open here")]
    NotAnObject,

    /// An array event arrived while no array was open.
    #[error("no array is open here")]
    NotAnArray,

    /// An object value arrived with no key on record.
    #[error("object field without a key")]
    MissingKey,

    /// A scalar token failed to decode.
    #[error(transparent)]
    Scalar(#[from] ScalarError),
}

/// One open container under construction.
#[derive(Debug)]
enum Frame {
    Object {
        map: Map,
        /// Key waiting for its value when that value is a container.
        pending: Option<String>,
    },
    Array(Array),
}

/// A tape builder that materializes the document as a [`Value`] tree.
///
/// The builder keeps a stack of open containers; the ambiguous `try_` events
/// are checked against it, so a mismatched close or resume surfaces as a
/// [`DomError`] and aborts the parse. `start_document` resets all state,
/// which makes one builder reusable across streaming calls; collect each
/// finished root with [`root`](Self::root).
///
/// # Examples
///
/// ```
/// use jsontape::{scan, StructuralInput, Value, ValueBuilder};
///
/// let doc = br#"[1, "two", {"three": 3}]"#;
/// let indexes = scan(doc).unwrap();
/// let mut input = StructuralInput::new(doc, &indexes).unwrap();
/// let mut builder = ValueBuilder::new();
/// input.parse(&mut builder).unwrap();
///
/// let root = builder.root().unwrap();
/// assert_eq!(root.as_array().unwrap().len(), 3);
/// assert_eq!(root.as_array().unwrap()[1], Value::String("two".into()));
/// ```
#[derive(Debug, Default)]
pub struct ValueBuilder {
    frames: SmallVec<[Frame; 16]>,
    root: Option<Value>,
}

impl ValueBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the root value of the most recently parsed document.
    pub fn root(&mut self) -> Option<Value> {
        self.root.take()
    }

    /// Places a finished value where it belongs: the open container on top
    /// of the stack, or the root slot when nothing is open.
    fn attach(&mut self, value: Value) -> Result<(), DomError> {
        match self.frames.last_mut() {
            None => {
                self.root = Some(value);
                Ok(())
            }
            Some(Frame::Array(items)) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Object { map, pending }) => {
                let key = pending.take().ok_or(DomError::MissingKey)?;
                map.insert(key, value);
                Ok(())
            }
        }
    }

    /// Records `key` on the open object so the container value that follows
    /// can be attached under it.
    fn set_pending_key(&mut self, key: &[u8]) -> Result<(), DomError> {
        let name = scalar::decode_string(key)?;
        match self.frames.last_mut() {
            Some(Frame::Object { pending, .. }) => {
                *pending = Some(name);
                Ok(())
            }
            _ => Err(DomError::NotAnObject),
        }
    }

    fn close_object(&mut self) -> Result<(), DomError> {
        match self.frames.pop() {
            Some(Frame::Object { map, .. }) => self.attach(Value::Object(map)),
            _ => Err(DomError::NotAnObject),
        }
    }

    fn close_array(&mut self) -> Result<(), DomError> {
        match self.frames.pop() {
            Some(Frame::Array(items)) => self.attach(Value::Array(items)),
            _ => Err(DomError::NotAnArray),
        }
    }
}

impl<'de> TapeBuilder<'de> for ValueBuilder {
    type Error = DomError;

    fn start_document(&mut self) -> Result<(), DomError> {
        self.frames.clear();
        self.root = None;
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), DomError> {
        Ok(())
    }

    fn root_primitive(&mut self, value: &'de [u8]) -> Result<(), DomError> {
        self.root = Some(scalar::parse_scalar(value)?);
        Ok(())
    }

    fn empty_object(&mut self) -> Result<(), DomError> {
        self.attach(Value::Object(Map::new()))
    }

    fn start_object(&mut self) -> Result<(), DomError> {
        self.frames.push(Frame::Object {
            map: Map::new(),
            pending: None,
        });
        Ok(())
    }

    fn start_object_field(&mut self, key: &'de [u8]) -> Result<(), DomError> {
        self.set_pending_key(key)?;
        self.start_object()
    }

    fn empty_object_field(&mut self, key: &'de [u8]) -> Result<(), DomError> {
        self.set_pending_key(key)?;
        self.attach(Value::Object(Map::new()))
    }

    fn end_object(&mut self) -> Result<(), DomError> {
        self.close_object()
    }

    fn try_end_object(&mut self) -> Result<(), DomError> {
        self.close_object()
    }

    fn try_resume_object(&mut self) -> Result<(), DomError> {
        match self.frames.last() {
            Some(Frame::Object { .. }) => Ok(()),
            _ => Err(DomError::NotAnObject),
        }
    }

    fn empty_array(&mut self) -> Result<(), DomError> {
        self.attach(Value::Array(Array::new()))
    }

    fn start_array(&mut self) -> Result<(), DomError> {
        self.frames.push(Frame::Array(Array::new()));
        Ok(())
    }

    fn empty_array_field(&mut self, key: &'de [u8]) -> Result<(), DomError> {
        self.set_pending_key(key)?;
        self.attach(Value::Array(Array::new()))
    }

    fn start_array_field(&mut self, key: &'de [u8]) -> Result<(), DomError> {
        self.set_pending_key(key)?;
        self.start_array()
    }

    fn end_array(&mut self) -> Result<(), DomError> {
        self.close_array()
    }

    fn try_end_array(&mut self) -> Result<(), DomError> {
        self.close_array()
    }

    fn try_resume_array(&mut self) -> Result<(), DomError> {
        match self.frames.last() {
            Some(Frame::Array(_)) => Ok(()),
            _ => Err(DomError::NotAnArray),
        }
    }

    fn try_resume_array_value(&mut self, value: &'de [u8]) -> Result<(), DomError> {
        let item = scalar::parse_scalar(value)?;
        match self.frames.last_mut() {
            Some(Frame::Array(items)) => {
                items.push(item);
                Ok(())
            }
            _ => Err(DomError::NotAnArray),
        }
    }

    fn primitive(&mut self, value: &'de [u8]) -> Result<(), DomError> {
        let item = scalar::parse_scalar(value)?;
        match self.frames.last_mut() {
            Some(Frame::Array(items)) => {
                items.push(item);
                Ok(())
            }
            _ => Err(DomError::NotAnArray),
        }
    }

    fn primitive_field(&mut self, key: &'de [u8], value: &'de [u8]) -> Result<(), DomError> {
        let name = scalar::decode_string(key)?;
        let item = scalar::parse_scalar(value)?;
        match self.frames.last_mut() {
            Some(Frame::Object { map, .. }) => {
                map.insert(name, item);
                Ok(())
            }
            _ => Err(DomError::NotAnObject),
        }
    }
}

/// Parses a complete JSON document into a [`Value`].
///
/// Scans the buffer, validates the structure, and materializes the tree in
/// one call.
///
/// # Examples
///
/// ```
/// use jsontape::{parse_value, Value};
///
/// let value = parse_value(br#"{"ok": true, "n": 2}"#).unwrap();
/// assert_eq!(value.get("ok").and_then(Value::as_bool), Some(true));
/// assert_eq!(value.get("n").and_then(Value::as_f64), Some(2.0));
/// ```
pub fn parse_value(json: &[u8]) -> Result<Value, DocumentError<DomError>> {
    let indexes = scan(json)?;
    let mut input = StructuralInput::new(json, &indexes)?;
    let mut builder = ValueBuilder::new();
    input.parse(&mut builder)?;
    // A successful parse always leaves a root behind.
    builder
        .root()
        .ok_or(DocumentError::Parse(crate::error::ParseError::Empty))
}
