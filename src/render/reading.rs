//! Helpers for presenting reconstructed text to a reader.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

/// Split text into paragraphs on blank lines.
///
/// A blank line is a line feed, any whitespace, then another line feed, the
/// same delimiter the normalizer's `\n\n` paragraph breaks satisfy.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_DELIMITER.split(text).collect()
}

/// A word split into an emphasized prefix and the plain remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BionicWord<'a> {
    /// Leading part rendered bold
    pub bold: &'a str,
    /// Remaining part rendered normally
    pub normal: &'a str,
}

/// Split a word for bionic reading.
///
/// Words of up to three characters get a one character prefix; longer words
/// get 40% of their characters, rounded up.
pub fn bionic_split(word: &str) -> BionicWord<'_> {
    let char_count = word.chars().count();
    let bold_chars = match char_count {
        0 => 0,
        1..=3 => 1,
        n => (n * 2).div_ceil(5),
    };

    let split_at = word
        .char_indices()
        .nth(bold_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(word.len());

    BionicWord {
        bold: &word[..split_at],
        normal: &word[split_at..],
    }
}
