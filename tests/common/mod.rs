//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod server;

use std::time::Duration;

/// Generous upper bound for anything a test waits on
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Hex line whose three words are derived from `i`, so a torn or mixed-up
/// line is detectable after decoding
pub fn checked_line(i: u32) -> String {
    format!("{:08X} {:08X} {:08X}", i, i ^ 0xA5A5_A5A5, !i)
}

/// Recover `i` from the words of a [`checked_line`], or `None` if they disagree
pub fn verify_checked_words(words: &[u32]) -> Option<u32> {
    match words {
        [i, x, n] if *x == i ^ 0xA5A5_A5A5 && *n == !i => Some(*i),
        _ => None,
    }
}
