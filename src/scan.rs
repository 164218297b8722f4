//! Portable structural scanner.
//!
//! This is the reference stage 1: a byte-at-a-time pass over the raw input
//! that records the offset of every structural character and of the first
//! byte of every scalar. A SIMD tokenizer can replace it wholesale as long as
//! it produces the same index contract (strictly increasing offsets, one per
//! structural token).
//!
//! The scanner does not validate scalars and does not validate UTF-8. Its
//! only hard failure is a string whose closing quote never arrives, because
//! an unterminated string makes every later offset meaningless.

use alloc::vec::Vec;

use thiserror::Error;

/// Error from the structural scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A string opened at `offset` was never closed.
    #[error("unterminated string starting at byte {offset}")]
    UnclosedString {
        /// Byte offset of the opening quote.
        offset: usize,
    },

    /// The input is too large for 32-bit structural offsets.
    #[error("input of {len} bytes exceeds the 32-bit offset range")]
    InputTooLong {
        /// Length of the rejected input.
        len: usize,
    },
}

/// Returns `true` for the six structural characters and the four JSON
/// whitespace bytes, the characters that terminate an unquoted scalar.
#[inline]
pub(crate) fn structural_or_whitespace(byte: u8) -> bool {
    matches!(
        byte,
        b'{' | b'}' | b'[' | b']' | b':' | b',' | b' ' | b'\t' | b'\n' | b'\r'
    )
}

/// Scans `buf` and returns the offsets of all structural tokens.
///
/// Each returned offset points at one of `{ } [ ] , :`, at the opening quote
/// of a string, or at the first byte of an unquoted scalar run. String bodies
/// are skipped with escape awareness and contribute no offsets of their own.
///
/// # Examples
///
/// ```
/// let indexes = jsontape::scan(b"[10, true]").unwrap();
/// assert_eq!(indexes, vec![0, 1, 3, 5, 9]);
/// ```
pub fn scan(buf: &[u8]) -> Result<Vec<u32>, ScanError> {
    if u32::try_from(buf.len()).is_err() {
        return Err(ScanError::InputTooLong { len: buf.len() });
    }

    // One token per ~4 input bytes is a reasonable first guess.
    let mut indexes = Vec::with_capacity(buf.len() / 4 + 4);
    let mut i = 0;
    while i < buf.len() {
        match buf[i] {
            b'{' | b'}' | b'[' | b']' | b':' | b',' => {
                indexes.push(i as u32);
                i += 1;
            }
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'"' => {
                indexes.push(i as u32);
                let start = i;
                i += 1;
                loop {
                    match buf.get(i) {
                        None => return Err(ScanError::UnclosedString { offset: start }),
                        Some(b'\\') => i += 2,
                        Some(b'"') => {
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            _ => {
                // First byte of a scalar run. The run's remaining bytes are
                // not structural; validation is the builder's job.
                indexes.push(i as u32);
                i += 1;
                while i < buf.len() && !structural_or_whitespace(buf[i]) && buf[i] != b'"' {
                    i += 1;
                }
            }
        }
    }
    Ok(indexes)
}
