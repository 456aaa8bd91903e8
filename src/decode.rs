//! Hex word decoding for buffered lines
//!
//! A line is scanned left to right for runs of ASCII hex digits. Any other
//! byte separates runs and is otherwise ignored, and a `0x`/`0X` directly in
//! front of a run is skipped as well. Runs longer than eight digits are cut
//! into fixed-width eight-digit words from the left, the last word taking
//! whatever remains. At most [`MAX_DECODED_WORDS`](crate::types::MAX_DECODED_WORDS) words are kept per line;
//! further words set [`DecodedRecord::truncated`].
//!
//! ```
//! use squitterrator::decode::decode_hex_words;
//!
//! let record = decode_hex_words(b"1A2Bxx 3C4D");
//! assert_eq!(record.values(), &[0x1A2B, 0x3C4D]);
//!
//! let squitter = decode_hex_words(b"*8D4840D6202CC371C32CE0576098;");
//! assert_eq!(squitter.values(), &[0x8D4840D6, 0x202CC371, 0xC32CE057, 0x6098]);
//! ```

use crate::types::{DecodedRecord, LineRecord};

/// Hex digits per 32-bit word
pub const WORD_DIGITS: usize = 8;

/// Decode the text of a buffered line
pub fn decode_line(line: &LineRecord) -> DecodedRecord {
    decode_hex_words(line.as_bytes())
}

/// Decode hex words from raw text
pub fn decode_hex_words(text: &[u8]) -> DecodedRecord {
    let mut record = DecodedRecord::new();
    let mut i = 0;

    while i < text.len() {
        if !text[i].is_ascii_hexdigit() {
            i += 1;
            continue;
        }
        if is_hex_prefix(text, i) {
            i += 2;
            continue;
        }

        let start = i;
        while i < text.len() && text[i].is_ascii_hexdigit() {
            i += 1;
        }
        for word in text[start..i].chunks(WORD_DIGITS) {
            if !record.push(parse_word(word)) {
                return record;
            }
        }
    }

    record
}

/// `0x` or `0X` at `i`, followed by at least one hex digit
fn is_hex_prefix(text: &[u8], i: usize) -> bool {
    text[i] == b'0'
        && matches!(text.get(i + 1), Some(b'x') | Some(b'X'))
        && text.get(i + 2).is_some_and(|b| b.is_ascii_hexdigit())
}

/// Fold at most eight hex digits into a word
fn parse_word(digits: &[u8]) -> u32 {
    debug_assert!(digits.len() <= WORD_DIGITS);
    digits
        .iter()
        .fold(0u32, |acc, &d| (acc << 4) | hex_value(d) as u32)
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
