use thiserror::Error;

use crate::{input::IndexError, scan::ScanError};

/// Outcome of a structural parse, generic over the builder's error type.
///
/// The structural pass reports exactly three things about a document: it was
/// empty, its token stream violated the JSON grammar, or the tape builder
/// rejected one of the events it was fed. Builder errors are propagated
/// verbatim and abort the parse immediately.
///
/// Structural violations all collapse into [`ParseError::Tape`]. The
/// individual diagnostics (missing colon, missing comma, unclosed containers,
/// and so on) are emitted on the optional trace channel, never encoded in the
/// return value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError<E> {
    /// The input contained no structural tokens at all.
    ///
    /// Distinguished from success so that streaming callers can use it as the
    /// end-of-stream signal.
    #[error("no structural tokens in the input")]
    Empty,

    /// The token stream did not form a valid JSON document.
    #[error("invalid JSON structure")]
    Tape,

    /// The tape builder returned an error from one of its callbacks.
    #[error("tape builder rejected an event: {0}")]
    Builder(E),
}

/// Error from the one-shot helpers that bundle scanning and parsing of a
/// complete in-memory document ([`parse_value`], [`minify`]).
///
/// [`parse_value`]: crate::parse_value
/// [`minify`]: crate::minify
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError<E> {
    /// The structural scan rejected the raw input.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The structural index array was malformed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The structural parse failed.
    #[error("{0}")]
    Parse(ParseError<E>),
}

impl<E> From<ParseError<E>> for DocumentError<E> {
    fn from(err: ParseError<E>) -> Self {
        Self::Parse(err)
    }
}
