//! The structural state machine.
//!
//! Walks the structural index, validates JSON grammar exactly, and drives a
//! [`TapeBuilder`] with one semantic event per token. The machine keeps no
//! auxiliary stack: container kinds are known from context in the dedicated
//! object and array states, and in the one position where they are not (right
//! after a container closed) the `try_` events delegate the check to the
//! builder. The only per-document state is a scalar depth counter and the
//! current token.
//!
//! The dispatch is a loop over a state enum; each arm consumes at most a
//! couple of tokens and hands off, so cost per structural token stays
//! bounded and branch histories stay short.

use crate::{
    builder::TapeBuilder, error::ParseError, input::StructuralInput, iter::StructuralIterator,
    logger::trace_event,
};

/// Maximum container nesting depth.
///
/// Opening a container beyond this depth is a structural error. The cap
/// bounds stack usage in recursive consumers of the event stream and is
/// enforced before the corresponding `start_` event is delivered.
pub const MAX_DEPTH: u32 = 1024;

enum State {
    ObjectBegin,
    ObjectColon,
    ObjectValue,
    ObjectNext,
    ArrayBegin,
    ArrayValue,
    ArrayNext,
    GenericNext,
    DocumentEnd,
}

/// First byte of a token tail, with a NUL sentinel past the end of input.
#[inline]
fn lead(token: &[u8]) -> u8 {
    token.first().copied().unwrap_or(0)
}

pub(crate) fn parse_document<'a, B, const STREAMING: bool>(
    input: &mut StructuralInput<'a>,
    builder: &mut B,
) -> Result<(), ParseError<B::Error>>
where
    B: TapeBuilder<'a>,
{
    let mut machine = Machine {
        iter: StructuralIterator::new(input, input.next_structural),
        depth: 0,
        builder,
    };
    machine.run::<STREAMING>()?;

    // The machine saw a complete document; persist the cursor, then check
    // the document-wide invariants.
    input.next_structural = machine.iter.position();
    if machine.depth != 0 {
        return Err(machine.error("unclosed objects or arrays at end of document"));
    }
    if !STREAMING && !machine.iter.at_end() {
        return Err(machine.error("more than one value at the document root"));
    }
    Ok(())
}

struct Machine<'a, 'b, B> {
    iter: StructuralIterator<'a>,
    depth: u32,
    builder: &'b mut B,
}

impl<'a, 'b, B: TapeBuilder<'a>> Machine<'a, 'b, B> {
    fn error(&self, diagnostic: &str) -> ParseError<B::Error> {
        trace_event!(self.depth, self.iter.position(), "error", diagnostic);
        ParseError::Tape
    }

    /// Accounts for an accepted `{` or `[`.
    fn open(&mut self) -> Result<(), ParseError<B::Error>> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("maximum nesting depth exceeded"));
        }
        Ok(())
    }

    /// Accounts for an accepted `}` or `]`.
    fn close(&mut self) -> Result<(), ParseError<B::Error>> {
        if self.depth == 0 {
            return Err(self.error("container close with nothing open"));
        }
        self.depth -= 1;
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn run<const STREAMING: bool>(&mut self) -> Result<(), ParseError<B::Error>> {
        if self.iter.at_end() {
            return Err(ParseError::Empty);
        }
        trace_event!(self.depth, self.iter.position(), "+document", "");
        self.builder.start_document().map_err(ParseError::Builder)?;

        let mut value = self.iter.advance();

        let mut state = match lead(value) {
            b'{' => State::ObjectBegin,
            b'[' => {
                // A root array whose last token is not `]` cannot balance, and
                // catching it here keeps a truncated input from streaming the
                // whole buffer through the array states before failing.
                if !STREAMING && self.iter.last_structural_byte() != Some(b']') {
                    return Err(self.error("root array is never closed"));
                }
                State::ArrayBegin
            }
            _ => {
                trace_event!(self.depth, self.iter.position(), "primitive", "root");
                self.builder
                    .root_primitive(value)
                    .map_err(ParseError::Builder)?;
                State::DocumentEnd
            }
        };

        loop {
            state = match state {
                // Just consumed `{` with no field seen yet.
                State::ObjectBegin => {
                    value = self.iter.advance();
                    match lead(value) {
                        b'}' => {
                            trace_event!(self.depth, self.iter.position(), "object", "empty");
                            self.builder.empty_object().map_err(ParseError::Builder)?;
                            State::GenericNext
                        }
                        b'"' => {
                            trace_event!(self.depth, self.iter.position(), "+object", "");
                            self.open()?;
                            self.builder.start_object().map_err(ParseError::Builder)?;
                            State::ObjectColon
                        }
                        _ => return Err(self.error("first field of object missing key")),
                    }
                }

                // `value` holds the key token; the `:` must follow.
                State::ObjectColon => {
                    if self.iter.advance_char() != b':' {
                        return Err(self.error("object field missing ':'"));
                    }
                    State::ObjectValue
                }

                State::ObjectValue => {
                    let key = value;
                    value = self.iter.advance();
                    match lead(value) {
                        b'{' => {
                            value = self.iter.advance();
                            match lead(value) {
                                b'}' => {
                                    trace_event!(
                                        self.depth,
                                        self.iter.position(),
                                        "object",
                                        "empty field"
                                    );
                                    self.builder
                                        .empty_object_field(key)
                                        .map_err(ParseError::Builder)?;
                                    State::ObjectNext
                                }
                                b'"' => {
                                    trace_event!(self.depth, self.iter.position(), "+object", "field");
                                    self.open()?;
                                    self.builder
                                        .start_object_field(key)
                                        .map_err(ParseError::Builder)?;
                                    State::ObjectColon
                                }
                                _ => return Err(self.error("first field of object missing key")),
                            }
                        }
                        b'[' => {
                            value = self.iter.advance();
                            match lead(value) {
                                b']' => {
                                    trace_event!(
                                        self.depth,
                                        self.iter.position(),
                                        "array",
                                        "empty field"
                                    );
                                    self.builder
                                        .empty_array_field(key)
                                        .map_err(ParseError::Builder)?;
                                    State::ObjectNext
                                }
                                _ => {
                                    trace_event!(self.depth, self.iter.position(), "+array", "field");
                                    self.open()?;
                                    self.builder
                                        .start_array_field(key)
                                        .map_err(ParseError::Builder)?;
                                    State::ArrayValue
                                }
                            }
                        }
                        _ => {
                            trace_event!(self.depth, self.iter.position(), "primitive", "field");
                            self.builder
                                .primitive_field(key, value)
                                .map_err(ParseError::Builder)?;
                            State::ObjectNext
                        }
                    }
                }

                State::ObjectNext => match self.iter.advance_char() {
                    b',' => {
                        value = self.iter.advance();
                        if lead(value) != b'"' {
                            return Err(self.error("no key after ',' in object"));
                        }
                        State::ObjectColon
                    }
                    b'}' => {
                        trace_event!(self.depth, self.iter.position(), "-object", "");
                        self.builder.end_object().map_err(ParseError::Builder)?;
                        self.close()?;
                        State::GenericNext
                    }
                    _ => return Err(self.error("no comma between object fields")),
                },

                // Just consumed `[` with no element seen yet.
                State::ArrayBegin => {
                    value = self.iter.advance();
                    match lead(value) {
                        b']' => {
                            trace_event!(self.depth, self.iter.position(), "array", "empty");
                            self.builder.empty_array().map_err(ParseError::Builder)?;
                            State::GenericNext
                        }
                        _ => {
                            trace_event!(self.depth, self.iter.position(), "+array", "");
                            self.open()?;
                            self.builder.start_array().map_err(ParseError::Builder)?;
                            State::ArrayValue
                        }
                    }
                }

                // `value` already holds the element token.
                State::ArrayValue => match lead(value) {
                    b'{' => {
                        value = self.iter.advance();
                        match lead(value) {
                            b'}' => {
                                trace_event!(self.depth, self.iter.position(), "object", "empty");
                                self.builder.empty_object().map_err(ParseError::Builder)?;
                                State::ArrayNext
                            }
                            b'"' => {
                                trace_event!(self.depth, self.iter.position(), "+object", "");
                                self.open()?;
                                self.builder.start_object().map_err(ParseError::Builder)?;
                                State::ObjectColon
                            }
                            _ => return Err(self.error("first field of object missing key")),
                        }
                    }
                    b'[' => {
                        value = self.iter.advance();
                        match lead(value) {
                            b']' => {
                                trace_event!(self.depth, self.iter.position(), "array", "empty");
                                self.builder.empty_array().map_err(ParseError::Builder)?;
                                State::ArrayNext
                            }
                            _ => {
                                trace_event!(self.depth, self.iter.position(), "+array", "");
                                self.open()?;
                                self.builder.start_array().map_err(ParseError::Builder)?;
                                State::ArrayValue
                            }
                        }
                    }
                    _ => {
                        trace_event!(self.depth, self.iter.position(), "primitive", "");
                        self.builder.primitive(value).map_err(ParseError::Builder)?;
                        State::ArrayNext
                    }
                },

                State::ArrayNext => match self.iter.advance_char() {
                    b',' => {
                        value = self.iter.advance();
                        State::ArrayValue
                    }
                    b']' => {
                        trace_event!(self.depth, self.iter.position(), "-array", "");
                        self.builder.end_array().map_err(ParseError::Builder)?;
                        self.close()?;
                        State::GenericNext
                    }
                    _ => return Err(self.error("missing comma between array elements")),
                },

                // A container just closed and the enclosing context is not
                // locally known. What follows decides:
                //   , "key":   the enclosing container is an object
                //   , "str",   an array, with a pending string element
                //   , "str"]   an array, string element then it closes
                //   , <value>  an array
                //   ] or }     the enclosing container closes too
                //   (anything else) the document is over
                State::GenericNext => match self.iter.advance_char() {
                    b',' => {
                        value = self.iter.advance();
                        match lead(value) {
                            b'"' => match self.iter.advance_char() {
                                b':' => {
                                    trace_event!(self.depth, self.iter.position(), "object", "resume");
                                    self.builder
                                        .try_resume_object()
                                        .map_err(ParseError::Builder)?;
                                    State::ObjectValue
                                }
                                b',' => {
                                    trace_event!(self.depth, self.iter.position(), "array", "resume");
                                    self.builder
                                        .try_resume_array_value(value)
                                        .map_err(ParseError::Builder)?;
                                    value = self.iter.advance();
                                    State::ArrayValue
                                }
                                b']' => {
                                    trace_event!(self.depth, self.iter.position(), "array", "resume");
                                    self.builder
                                        .try_resume_array_value(value)
                                        .map_err(ParseError::Builder)?;
                                    trace_event!(self.depth, self.iter.position(), "-array", "");
                                    self.builder.end_array().map_err(ParseError::Builder)?;
                                    self.close()?;
                                    State::GenericNext
                                }
                                _ => return Err(self.error("missing comma or colon after value")),
                            },
                            b'[' => {
                                trace_event!(self.depth, self.iter.position(), "array", "resume");
                                self.builder.try_resume_array().map_err(ParseError::Builder)?;
                                State::ArrayBegin
                            }
                            b'{' => {
                                trace_event!(self.depth, self.iter.position(), "array", "resume");
                                self.builder.try_resume_array().map_err(ParseError::Builder)?;
                                State::ObjectBegin
                            }
                            _ => {
                                trace_event!(self.depth, self.iter.position(), "array", "resume");
                                self.builder.try_resume_array().map_err(ParseError::Builder)?;
                                State::ArrayValue
                            }
                        }
                    }
                    b']' => {
                        trace_event!(self.depth, self.iter.position(), "-array", "try");
                        self.close()?;
                        self.builder.try_end_array().map_err(ParseError::Builder)?;
                        State::GenericNext
                    }
                    b'}' => {
                        trace_event!(self.depth, self.iter.position(), "-object", "try");
                        self.close()?;
                        self.builder.try_end_object().map_err(ParseError::Builder)?;
                        State::GenericNext
                    }
                    _ => {
                        // Not a continuation, so the document ended one token
                        // ago and the probe over-advanced.
                        self.iter.step_back();
                        State::DocumentEnd
                    }
                },

                State::DocumentEnd => {
                    trace_event!(self.depth, self.iter.position(), "-document", "");
                    self.builder.end_document().map_err(ParseError::Builder)?;
                    return Ok(());
                }
            };
        }
    }
}
