//! Whole-document text normalization.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bullet marker substituted for mis-encoded bullet glyphs.
pub const BULLET: &str = "• ";

// Some extractors decode the bullet glyph of common list fonts as "nn" or "n".
// This repair is tied to that encoding and may need revisiting if the
// parser changes how it maps bullet glyphs. Leading whitespace never crosses
// a line feed, so the repair cannot merge lines. Trailing whitespace also
// stops at `\r`, so a lone token ends a CRLF line the same way as an LF one.
static DOUBLE_N_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^\S\n]*nn[^\S\r\n]+").expect("valid bullet regex"));
static SINGLE_N_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^\S\n]*n[^\S\r\n]+").expect("valid bullet regex"));
static CRLF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r+\n").expect("valid line ending regex"));
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

/// Options for text normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Replace line-start `nn`/`n` artifacts with a bullet marker
    pub repair_bullets: bool,

    /// Convert `\r\n` (and stray `\r` before it) to `\n`
    pub normalize_line_endings: bool,

    /// Collapse three or more consecutive line breaks to two
    pub collapse_blank_lines: bool,

    /// Trim leading and trailing whitespace
    pub trim: bool,
}

impl NormalizeOptions {
    /// Every step enabled.
    pub fn full() -> Self {
        Self {
            repair_bullets: true,
            normalize_line_endings: true,
            collapse_blank_lines: true,
            trim: true,
        }
    }

    /// Only line endings, for text that never went through a PDF parser.
    pub fn line_endings_only() -> Self {
        Self {
            repair_bullets: false,
            normalize_line_endings: true,
            collapse_blank_lines: false,
            trim: false,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::full()
    }
}

/// Cleans extraction artifacts and applies a minimal whitespace convention.
///
/// Steps run in a fixed order, each on the previous output:
/// 1. line-start `nn` + whitespace becomes `• `
/// 2. line-start `n` + whitespace becomes `• `
/// 3. `\r\n` becomes `\n`, along with any extra `\r` before it
/// 4. three or more `\n` become exactly two
/// 5. surrounding whitespace is trimmed
///
/// Normalizing already normalized text returns it unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    options: NormalizeOptions,
}

impl TextNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize a whole document.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.options.repair_bullets {
            result = DOUBLE_N_BULLET.replace_all(&result, BULLET).into_owned();
            result = SINGLE_N_BULLET.replace_all(&result, BULLET).into_owned();
        }

        if self.options.normalize_line_endings {
            result = CRLF.replace_all(&result, "\n").into_owned();
        }

        if self.options.collapse_blank_lines {
            result = EXCESS_NEWLINES.replace_all(&result, "\n\n").into_owned();
        }

        if self.options.trim {
            result = result.trim().to_string();
        }

        result
    }
}

/// Normalize text with every step enabled.
pub fn normalize(text: &str) -> String {
    TextNormalizer::default().normalize(text)
}
