//! The input bundle consumed by the structural parser.

use thiserror::Error;

use crate::{builder::TapeBuilder, error::ParseError, parser};

/// Error from [`StructuralInput::new`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A structural offset pointed past the end of the buffer.
    #[error("structural offset {offset} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds {
        /// The offending offset.
        offset: u32,
        /// Length of the raw buffer.
        len: usize,
    },

    /// The offsets were not strictly increasing.
    #[error("structural offsets must be strictly increasing (violated at entry {at})")]
    OutOfOrder {
        /// Position in the index array where order broke.
        at: usize,
    },
}

/// A raw JSON buffer paired with its pre-computed structural index.
///
/// This is the bundle handed from stage 1 to stage 2: the text itself, the
/// offsets of its structural tokens, and the cursor that survives between
/// streaming calls. The bundle borrows both slices; they must outlive every
/// token slice a builder retains from the parse.
///
/// The index array is validated once at construction so the parser can trust
/// it unconditionally afterwards.
///
/// # Examples
///
/// ```
/// use jsontape::{scan, StructuralInput, ValueBuilder};
///
/// let doc = br#"{"on": true}"#;
/// let indexes = scan(doc).unwrap();
/// let mut input = StructuralInput::new(doc, &indexes).unwrap();
///
/// let mut builder = ValueBuilder::new();
/// input.parse(&mut builder).unwrap();
/// assert!(builder.root().unwrap().is_object());
/// ```
#[derive(Debug, Clone)]
pub struct StructuralInput<'a> {
    pub(crate) buf: &'a [u8],
    pub(crate) indexes: &'a [u32],
    pub(crate) next_structural: usize,
}

impl<'a> StructuralInput<'a> {
    /// Bundles a buffer with its structural index array.
    ///
    /// Every offset must lie inside `buf` and the offsets must be strictly
    /// increasing, which is exactly what [`scan`](crate::scan) produces.
    pub fn new(buf: &'a [u8], indexes: &'a [u32]) -> Result<Self, IndexError> {
        let mut previous: Option<u32> = None;
        for (at, &offset) in indexes.iter().enumerate() {
            if offset as usize >= buf.len() {
                return Err(IndexError::OutOfBounds {
                    offset,
                    len: buf.len(),
                });
            }
            if previous.is_some_and(|p| p >= offset) {
                return Err(IndexError::OutOfOrder { at });
            }
            previous = Some(offset);
        }
        Ok(Self {
            buf,
            indexes,
            next_structural: 0,
        })
    }

    /// The raw buffer.
    #[must_use]
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// The structural index array.
    #[must_use]
    pub fn structural_indexes(&self) -> &'a [u32] {
        self.indexes
    }

    /// Index of the next structural token a streaming parse would consume.
    ///
    /// Starts at 0, is updated whenever a parse runs to completion, and never
    /// decreases across streaming calls. A single-document [`parse`] resets
    /// it, as does [`rewind`].
    ///
    /// [`parse`]: Self::parse
    /// [`rewind`]: Self::rewind
    #[must_use]
    pub fn next_structural_index(&self) -> usize {
        self.next_structural
    }

    /// Resets the streaming cursor to the start of the document stream.
    pub fn rewind(&mut self) {
        self.next_structural = 0;
    }

    /// Parses the buffer as a single complete document.
    ///
    /// The cursor is reset to 0, one document is consumed, and any structural
    /// token left over afterwards is an error. Builder errors abort the parse
    /// and are returned verbatim.
    pub fn parse<B>(&mut self, builder: &mut B) -> Result<(), ParseError<B::Error>>
    where
        B: TapeBuilder<'a>,
    {
        self.next_structural = 0;
        parser::parse_document::<B, false>(self, builder)
    }

    /// Parses the next root value from a stream of concatenated documents.
    ///
    /// Each call consumes exactly one root, resuming at the persisted cursor;
    /// [`ParseError::Empty`] signals that the stream is exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsontape::{scan, ParseError, StructuralInput, ValueBuilder};
    ///
    /// let stream = b"{} 41 [42]";
    /// let indexes = scan(stream).unwrap();
    /// let mut input = StructuralInput::new(stream, &indexes).unwrap();
    /// let mut builder = ValueBuilder::new();
    ///
    /// let mut roots = 0;
    /// loop {
    ///     match input.parse_streaming(&mut builder) {
    ///         Ok(()) => roots += 1,
    ///         Err(ParseError::Empty) => break,
    ///         Err(err) => panic!("{err}"),
    ///     }
    /// }
    /// assert_eq!(roots, 3);
    /// ```
    pub fn parse_streaming<B>(&mut self, builder: &mut B) -> Result<(), ParseError<B::Error>>
    where
        B: TapeBuilder<'a>,
    {
        parser::parse_document::<B, true>(self, builder)
    }
}
