//! The tape builder contract.
//!
//! The structural parser validates grammar and sequencing; everything that
//! gives a document *meaning* happens in a [`TapeBuilder`]. A builder may
//! materialize a value tree ([`ValueBuilder`](crate::ValueBuilder)), re-emit
//! the document ([`MinifyBuilder`](crate::MinifyBuilder)), write a binary
//! tape, collect statistics, or do nothing at all. The parser neither knows
//! nor cares.
//!
//! Every callback returns a `Result`; the first error aborts the parse and is
//! handed back to the caller verbatim inside
//! [`ParseError::Builder`](crate::ParseError::Builder). After a failed
//! callback the parser makes no further calls, not even
//! [`end_document`](TapeBuilder::end_document).

/// Consumer of the structural event stream.
///
/// The lifetime `'de` is the lifetime of the raw buffer: key and value slices
/// borrow from it and may be retained for as long as the buffer lives. Each
/// slice starts at the token's first byte and runs to the end of the buffer;
/// [`raw_scalar`](crate::raw_scalar) recovers a token's exact extent.
///
/// # Sequencing guarantees
///
/// For every parse that returns success:
///
/// 1. Calls correspond to a valid RFC 8259 derivation, with scalar-byte
///    validation deferred to the builder.
/// 2. Container starts and ends are well nested, so a builder may mirror the
///    parser's depth with a stack of its own.
/// 3. Every `start_object` / `start_object_field` is matched by an
///    object-closing event at the same nesting level before any event at a
///    shallower level, and likewise for arrays.
/// 4. A key slice is delivered before any event of its value and remains
///    valid for the whole parse.
///
/// # The `try_` events
///
/// After closing a container the parser does not locally know what encloses
/// it, and rather than keep a stack of container kinds it asks the builder,
/// which has one anyway. `try_end_object`, `try_end_array`,
/// `try_resume_object` and `try_resume_array` fire exactly in those
/// positions; a builder whose own bookkeeping contradicts the event reports
/// the mismatch through its error type, which aborts the parse.
///
/// # Examples
///
/// A builder that counts container starts:
///
/// ```
/// use core::convert::Infallible;
///
/// use jsontape::{scan, StructuralInput, TapeBuilder};
///
/// #[derive(Default)]
/// struct Containers(usize);
///
/// impl<'de> TapeBuilder<'de> for Containers {
///     type Error = Infallible;
///
///     fn start_object(&mut self) -> Result<(), Infallible> {
///         self.0 += 1;
///         Ok(())
///     }
///     fn start_object_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
///         self.0 += 1;
///         Ok(())
///     }
///     fn start_array(&mut self) -> Result<(), Infallible> {
///         self.0 += 1;
///         Ok(())
///     }
///     fn start_array_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
///         self.0 += 1;
///         Ok(())
///     }
///
///     fn start_document(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn end_document(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn root_primitive(&mut self, _value: &'de [u8]) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn empty_object(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn empty_object_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn end_object(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn try_end_object(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn try_resume_object(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn empty_array(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn empty_array_field(&mut self, _key: &'de [u8]) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn end_array(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn try_end_array(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn try_resume_array(&mut self) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn try_resume_array_value(&mut self, _value: &'de [u8]) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn primitive(&mut self, _value: &'de [u8]) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn primitive_field(&mut self, _key: &'de [u8], _value: &'de [u8]) -> Result<(), Infallible> {
///         Ok(())
///     }
/// }
///
/// let doc = br#"{"a": [1, {}], "b": {"c": []}}"#;
/// let indexes = scan(doc).unwrap();
/// let mut input = StructuralInput::new(doc, &indexes).unwrap();
/// let mut counter = Containers::default();
/// input.parse(&mut counter).unwrap();
/// assert_eq!(counter.0, 3); // the root object, the "a" array, the "b" object
/// ```
pub trait TapeBuilder<'de> {
    /// Error type returned by the callbacks, propagated verbatim.
    type Error;

    /// First event of every non-empty document.
    fn start_document(&mut self) -> Result<(), Self::Error>;

    /// Last event of every successful parse, called exactly once.
    fn end_document(&mut self) -> Result<(), Self::Error>;

    /// The entire document is the single scalar starting at `value`.
    fn root_primitive(&mut self, value: &'de [u8]) -> Result<(), Self::Error>;

    /// `{}` encountered as a root or array element.
    fn empty_object(&mut self) -> Result<(), Self::Error>;

    /// A non-empty object opened as a root or array element. The first key
    /// arrives with the first field event.
    fn start_object(&mut self) -> Result<(), Self::Error>;

    /// A field of the current object whose value is a non-empty object.
    fn start_object_field(&mut self, key: &'de [u8]) -> Result<(), Self::Error>;

    /// A field of the current object whose value is `{}`.
    fn empty_object_field(&mut self, key: &'de [u8]) -> Result<(), Self::Error>;

    /// Matching `}` for a container start the parser saw in object context.
    fn end_object(&mut self) -> Result<(), Self::Error>;

    /// A `}` whose enclosing container is not locally known; the builder
    /// checks that an object is in fact open and closes it.
    fn try_end_object(&mut self) -> Result<(), Self::Error>;

    /// Continuation after an ambiguous comma resolved to object context; the
    /// builder checks that an object is in fact open.
    fn try_resume_object(&mut self) -> Result<(), Self::Error>;

    /// `[]` encountered as a root or array element.
    fn empty_array(&mut self) -> Result<(), Self::Error>;

    /// A non-empty array opened as a root or array element.
    fn start_array(&mut self) -> Result<(), Self::Error>;

    /// A field of the current object whose value is `[]`.
    fn empty_array_field(&mut self, key: &'de [u8]) -> Result<(), Self::Error>;

    /// A field of the current object whose value is a non-empty array.
    fn start_array_field(&mut self, key: &'de [u8]) -> Result<(), Self::Error>;

    /// Matching `]` for a container start the parser saw in array context.
    fn end_array(&mut self) -> Result<(), Self::Error>;

    /// A `]` whose enclosing container is not locally known.
    fn try_end_array(&mut self) -> Result<(), Self::Error>;

    /// Continuation after an ambiguous comma resolved to array context. The
    /// element itself is delivered by the event that follows.
    fn try_resume_array(&mut self) -> Result<(), Self::Error>;

    /// Continuation after an ambiguous comma resolved to array context by a
    /// string element, which is delivered here.
    fn try_resume_array_value(&mut self, value: &'de [u8]) -> Result<(), Self::Error>;

    /// A scalar element of the current array.
    fn primitive(&mut self, value: &'de [u8]) -> Result<(), Self::Error>;

    /// A scalar-valued field of the current object.
    fn primitive_field(&mut self, key: &'de [u8], value: &'de [u8]) -> Result<(), Self::Error>;
}
