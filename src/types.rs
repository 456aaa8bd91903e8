//! Core data types for squitterrator
//!
//! # Main Types
//!
//! - [`LineRecord`] - A fixed-capacity line of text moving through the queue
//! - [`DecodedRecord`] - Up to [`MAX_DECODED_WORDS`] integers decoded from one line
//!
//! Both types are plain `Copy` values with inline storage, so moving a line
//! across the queue never allocates.

use std::fmt;

/// Maximum number of bytes stored per line; longer lines are truncated
pub const MAX_LINE_LENGTH: usize = 63;

/// Maximum number of 32-bit words decoded from a single line
pub const MAX_DECODED_WORDS: usize = 8;

/// Default number of slots in the line queue (must be a power of two)
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// One newline-delimited, length-capped line of text
///
/// Content beyond [`MAX_LINE_LENGTH`] bytes is cut off at construction time.
/// The length is tracked explicitly so the stored bytes need no terminator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    bytes: [u8; MAX_LINE_LENGTH],
    len: u8,
}

impl LineRecord {
    /// An empty line
    pub const fn empty() -> Self {
        Self {
            bytes: [0; MAX_LINE_LENGTH],
            len: 0,
        }
    }

    /// Build a line from raw bytes, keeping at most [`MAX_LINE_LENGTH`] of them
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut record = Self::empty();
        record.set(data);
        record
    }

    /// Overwrite the content in place, truncating to capacity
    pub fn set(&mut self, data: &[u8]) {
        let len = data.len().min(MAX_LINE_LENGTH);
        self.bytes[..len].copy_from_slice(&data[..len]);
        self.bytes[len..].fill(0);
        self.len = len as u8;
    }

    /// Stored bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Stored text, lossily converted from the raw bytes
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LineRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for LineRecord {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Debug for LineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LineRecord")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

/// Integers decoded from the hex text of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedRecord {
    values: [u32; MAX_DECODED_WORDS],
    count: usize,
    /// Set when the line held more words than fit in the record
    pub truncated: bool,
}

impl DecodedRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a word; returns false (and marks the record truncated) when full
    pub fn push(&mut self, value: u32) -> bool {
        if self.count == MAX_DECODED_WORDS {
            self.truncated = true;
            return false;
        }
        self.values[self.count] = value;
        self.count += 1;
        true
    }

    /// Number of decoded words
    pub fn count(&self) -> usize {
        self.count
    }

    /// Decoded words in line order
    pub fn values(&self) -> &[u32] {
        &self.values[..self.count]
    }

    pub fn is_full(&self) -> bool {
        self.count == MAX_DECODED_WORDS
    }
}

impl fmt::Display for DecodedRecord {
    /// Space separated decimal words, each followed by a space
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.values() {
            write!(f, "{} ", value)?;
        }
        Ok(())
    }
}
