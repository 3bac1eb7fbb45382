//! The Base64URL alphabet accepted inside token segments
//!
//! Σ = {A-Z, a-z, 0-9, '_', '-'} (64 symbols), delimiter '.'

use serde::Serialize;
use std::collections::BTreeSet;

/// Segment delimiter
pub const DELIMITER: char = '.';

/// Canonical regular expression for a single segment
pub const SEGMENT_PATTERN: &str = "^[A-Za-z0-9_-]+$";

/// Number of symbols in the alphabet
pub const ALPHABET_SIZE: usize = 64;

/// Whether `c` belongs to the segment alphabet
pub const fn is_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Whether `text` is a non-empty run of alphabet symbols
pub fn is_segment(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_symbol)
}

/// Characters of `text` outside the alphabet, deduplicated and sorted
pub fn invalid_symbols(text: &str) -> BTreeSet<char> {
    text.chars().filter(|c| !is_symbol(*c)).collect()
}

/// Symbol class counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolClasses {
    pub uppercase: usize,
    pub lowercase: usize,
    pub digits: usize,
    pub special: usize,
}

/// Static description of the alphabet, for introspection output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphabetInfo {
    pub name: &'static str,
    pub size: usize,
    pub classes: SymbolClasses,
    pub symbols: Vec<char>,
    pub delimiter: char,
    pub regex: &'static str,
}

impl AlphabetInfo {
    pub fn base64url() -> Self {
        let mut symbols: Vec<char> = ('A'..='Z')
            .chain('a'..='z')
            .chain('0'..='9')
            .chain(['-', '_'])
            .collect();
        symbols.sort_unstable();

        Self {
            name: "Base64URL",
            size: ALPHABET_SIZE,
            classes: SymbolClasses {
                uppercase: 26,
                lowercase: 26,
                digits: 10,
                special: 2,
            },
            symbols,
            delimiter: DELIMITER,
            regex: SEGMENT_PATTERN,
        }
    }
}
