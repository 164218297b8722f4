//! Minification through the structural event stream.
//!
//! A serializing tape builder: every event appends its compact spelling to an
//! output buffer, scalar bytes are copied verbatim, and all insignificant
//! whitespace disappears. Because the events alone do not say which kind of
//! container a `try_` event refers to, the builder tracks container kinds in
//! a bit stack (one bit per nesting level).

use alloc::vec::Vec;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    builder::TapeBuilder,
    error::DocumentError,
    input::StructuralInput,
    scalar::{raw_scalar, ScalarError},
    scan::scan,
};

/// Error from [`MinifyBuilder`] callbacks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinifyError {
    /// A `}` arrived while the innermost open container was not an object.
    #[error("no object is open here")]
    NotAnObject,

    /// A `]` arrived while the innermost open container was not an array.
    #[error("no array is open here")]
    NotAnArray,

    /// A scalar token could not be copied.
    #[error(transparent)]
    Scalar(#[from] ScalarError),
}

/// Container kinds, one bit per open container.
///
/// Depth is bounded by the parser, so a handful of inline words covers every
/// document this crate will ever hand us.
#[derive(Debug, Default)]
struct KindStack {
    words: SmallVec<[u64; 4]>,
    len: u32,
}

const OBJECT: bool = true;
const ARRAY: bool = false;

impl KindStack {
    fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    fn push(&mut self, kind: bool) {
        let word = (self.len / 64) as usize;
        let bit = self.len % 64;
        if word == self.words.len() {
            self.words.push(0);
        }
        if kind {
            self.words[word] |= 1 << bit;
        } else {
            self.words[word] &= !(1 << bit);
        }
        self.len += 1;
    }

    fn top(&self) -> Option<bool> {
        self.len.checked_sub(1).map(|at| {
            let word = (at / 64) as usize;
            (self.words[word] >> (at % 64)) & 1 == 1
        })
    }

    fn pop(&mut self) -> Option<bool> {
        let top = self.top();
        if top.is_some() {
            self.len -= 1;
        }
        top
    }
}

/// A tape builder that re-emits the document as compact JSON.
///
/// Scalars and keys are copied byte for byte, so the output is the input with
/// insignificant whitespace removed. This doubles as the event-completeness
/// oracle: a document minified through the full event stream must parse to
/// the same tree as the original.
///
/// # Examples
///
/// ```
/// let out = jsontape::minify(b" { \"a\" : [ 1 , 2 ] } ").unwrap();
/// assert_eq!(out, br#"{"a":[1,2]}"#);
/// ```
#[derive(Debug, Default)]
pub struct MinifyBuilder {
    out: Vec<u8>,
    kinds: KindStack,
    /// Whether the next value or key at this level needs a `,` first.
    comma: bool,
}

impl MinifyBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The minified document produced by the last parse.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    /// Consumes the builder and returns the minified document.
    #[must_use]
    pub fn into_output(self) -> Vec<u8> {
        self.out
    }

    fn separate(&mut self) {
        if self.comma {
            self.out.push(b',');
        }
    }

    /// Copies the scalar token at the head of `token`, after checking it has
    /// a plausible start and, for strings, a closing quote.
    fn copy_scalar(&mut self, token: &[u8]) -> Result<(), MinifyError> {
        match token.first() {
            None => return Err(ScalarError::UnexpectedEnd.into()),
            Some(b'"') => {
                let raw = raw_scalar(token);
                if raw.len() < 2 || raw.last() != Some(&b'"') {
                    return Err(ScalarError::UnterminatedString.into());
                }
                self.out.extend_from_slice(raw);
            }
            Some(b'-' | b'0'..=b'9' | b't' | b'f' | b'n') => {
                self.out.extend_from_slice(raw_scalar(token));
            }
            Some(&other) => return Err(ScalarError::InvalidScalar(other).into()),
        }
        Ok(())
    }

    fn value(&mut self, token: &[u8]) -> Result<(), MinifyError> {
        self.separate();
        self.copy_scalar(token)?;
        self.comma = true;
        Ok(())
    }

    fn key(&mut self, key: &[u8]) -> Result<(), MinifyError> {
        self.separate();
        self.copy_scalar(key)?;
        self.out.push(b':');
        Ok(())
    }

    fn open(&mut self, kind: bool) {
        self.out.push(if kind == OBJECT { b'{' } else { b'[' });
        self.kinds.push(kind);
        self.comma = false;
    }

    fn close(&mut self, kind: bool) -> Result<(), MinifyError> {
        let mismatch = if kind == OBJECT {
            MinifyError::NotAnObject
        } else {
            MinifyError::NotAnArray
        };
        if self.kinds.pop() != Some(kind) {
            return Err(mismatch);
        }
        self.out.push(if kind == OBJECT { b'}' } else { b']' });
        self.comma = true;
        Ok(())
    }
}

impl<'de> TapeBuilder<'de> for MinifyBuilder {
    type Error = MinifyError;

    fn start_document(&mut self) -> Result<(), MinifyError> {
        self.out.clear();
        self.kinds.clear();
        self.comma = false;
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), MinifyError> {
        Ok(())
    }

    fn root_primitive(&mut self, value: &'de [u8]) -> Result<(), MinifyError> {
        self.value(value)
    }

    fn empty_object(&mut self) -> Result<(), MinifyError> {
        self.separate();
        self.out.extend_from_slice(b"{}");
        self.comma = true;
        Ok(())
    }

    fn start_object(&mut self) -> Result<(), MinifyError> {
        self.separate();
        self.open(OBJECT);
        Ok(())
    }

    fn start_object_field(&mut self, key: &'de [u8]) -> Result<(), MinifyError> {
        self.key(key)?;
        self.open(OBJECT);
        Ok(())
    }

    fn empty_object_field(&mut self, key: &'de [u8]) -> Result<(), MinifyError> {
        self.key(key)?;
        self.out.extend_from_slice(b"{}");
        self.comma = true;
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), MinifyError> {
        self.close(OBJECT)
    }

    fn try_end_object(&mut self) -> Result<(), MinifyError> {
        self.close(OBJECT)
    }

    fn try_resume_object(&mut self) -> Result<(), MinifyError> {
        match self.kinds.top() {
            Some(OBJECT) => Ok(()),
            _ => Err(MinifyError::NotAnObject),
        }
    }

    fn empty_array(&mut self) -> Result<(), MinifyError> {
        self.separate();
        self.out.extend_from_slice(b"[]");
        self.comma = true;
        Ok(())
    }

    fn start_array(&mut self) -> Result<(), MinifyError> {
        self.separate();
        self.open(ARRAY);
        Ok(())
    }

    fn empty_array_field(&mut self, key: &'de [u8]) -> Result<(), MinifyError> {
        self.key(key)?;
        self.out.extend_from_slice(b"[]");
        self.comma = true;
        Ok(())
    }

    fn start_array_field(&mut self, key: &'de [u8]) -> Result<(), MinifyError> {
        self.key(key)?;
        self.open(ARRAY);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), MinifyError> {
        self.close(ARRAY)
    }

    fn try_end_array(&mut self) -> Result<(), MinifyError> {
        self.close(ARRAY)
    }

    fn try_resume_array(&mut self) -> Result<(), MinifyError> {
        match self.kinds.top() {
            Some(ARRAY) => Ok(()),
            _ => Err(MinifyError::NotAnArray),
        }
    }

    fn try_resume_array_value(&mut self, value: &'de [u8]) -> Result<(), MinifyError> {
        match self.kinds.top() {
            Some(ARRAY) => self.value(value),
            _ => Err(MinifyError::NotAnArray),
        }
    }

    fn primitive(&mut self, value: &'de [u8]) -> Result<(), MinifyError> {
        self.value(value)
    }

    fn primitive_field(&mut self, key: &'de [u8], value: &'de [u8]) -> Result<(), MinifyError> {
        self.key(key)?;
        self.copy_scalar(value)?;
        self.comma = true;
        Ok(())
    }
}

/// Minifies a complete JSON document.
///
/// # Examples
///
/// ```
/// let out = jsontape::minify(b"[ true ,\n null ]").unwrap();
/// assert_eq!(out, b"[true,null]");
/// ```
pub fn minify(json: &[u8]) -> Result<Vec<u8>, DocumentError<MinifyError>> {
    let indexes = scan(json)?;
    let mut input = StructuralInput::new(json, &indexes)?;
    let mut builder = MinifyBuilder::new();
    input.parse(&mut builder)?;
    Ok(builder.into_output())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_stack_tracks_past_one_word() {
        let mut kinds = KindStack::default();
        for i in 0..130 {
            kinds.push(i % 3 == 0);
        }
        for i in (0..130).rev() {
            assert_eq!(kinds.top(), Some(i % 3 == 0));
            assert_eq!(kinds.pop(), Some(i % 3 == 0));
        }
        assert_eq!(kinds.pop(), None);
    }

    #[test]
    fn strips_whitespace_only() {
        let spaced = b"\n{\t\"a\" :  [ 1 ,\r\n 2.5 , \"x y\" ] , \"b\" : { } }";
        assert_eq!(minify(spaced).unwrap(), br#"{"a":[1,2.5,"x y"],"b":{}}"#);
    }

    #[test]
    fn compact_input_is_a_fixed_point() {
        let compact = br#"{"a":[[1],"s",{"b":null}],"c":{"d":[]}}"#;
        assert_eq!(minify(compact).unwrap(), compact);
    }

    #[test]
    fn scalar_bytes_are_verbatim() {
        // Escapes and number spellings must survive untouched.
        let doc = br#"[ "aA\n", 1.2500e2, -0 ]"#;
        assert_eq!(minify(doc).unwrap(), br#"["aA\n",1.2500e2,-0]"#);
    }

    #[test]
    fn root_scalars() {
        assert_eq!(minify(b"  42 ").unwrap(), b"42");
        assert_eq!(minify(b"\"s\"").unwrap(), b"\"s\"");
    }
}
