//! Newline framing of a raw byte stream
//!
//! [`LineFramer`] turns arbitrarily split socket reads into [`LineRecord`]s.
//! A partial line survives across calls, so the output does not depend on
//! how the stream was chunked.
//!
//! Framing rules, applied byte by byte:
//!
//! - `\n` completes the current line.
//! - A byte arriving while the partial buffer already holds
//!   [`MAX_LINE_LENGTH`] bytes also completes the line; that byte is consumed
//!   by the flush and does not start the next line.
//! - A completed line with no bytes is not emitted.

use crate::types::{LineRecord, MAX_LINE_LENGTH};

/// Line delimiter
pub const DELIMITER: u8 = b'\n';

/// Stateful splitter from byte chunks to line records
#[derive(Debug, Clone)]
pub struct LineFramer {
    partial: [u8; MAX_LINE_LENGTH],
    len: usize,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            partial: [0; MAX_LINE_LENGTH],
            len: 0,
        }
    }

    /// Consume `chunk`, calling `emit` for every completed line
    ///
    /// Returns the number of lines emitted.
    pub fn feed<F>(&mut self, chunk: &[u8], mut emit: F) -> usize
    where
        F: FnMut(LineRecord),
    {
        let mut emitted = 0;
        for &byte in chunk {
            if byte == DELIMITER || self.len >= MAX_LINE_LENGTH {
                if self.len > 0 {
                    emit(LineRecord::from_bytes(&self.partial[..self.len]));
                    emitted += 1;
                }
                self.len = 0;
            } else {
                self.partial[self.len] = byte;
                self.len += 1;
            }
        }
        emitted
    }

    /// Consume `chunk` and collect the completed lines
    pub fn feed_collect(&mut self, chunk: &[u8]) -> Vec<LineRecord> {
        let mut lines = Vec::new();
        self.feed(chunk, |line| lines.push(line));
        lines
    }

    /// Bytes of the line currently being accumulated
    pub fn pending(&self) -> &[u8] {
        &self.partial[..self.len]
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}
