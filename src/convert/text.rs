//! Plain text passthrough.

use crate::detect::MimeType;
use crate::error::{Error, Result};
use crate::render::{ExtractionStats, NormalizeOptions, TextNormalizer};

use super::{ConvertOptions, ConvertResult, DocumentConverter, EmptyPolicy};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Converter for `text/plain` uploads.
///
/// The text is kept as written; only CRLF line endings are rewritten.
#[derive(Debug, Clone)]
pub struct PlainTextConverter {
    normalizer: TextNormalizer,
}

impl PlainTextConverter {
    /// Create a new plain text converter.
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(NormalizeOptions::line_endings_only()),
        }
    }
}

impl Default for PlainTextConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for PlainTextConverter {
    fn mime_types(&self) -> &[MimeType] {
        &[MimeType::PlainText]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let text = std::str::from_utf8(bytes).map_err(Error::parse)?;

        if text.trim().is_empty() && options.empty == EmptyPolicy::Reject {
            return Err(Error::EmptyExtraction);
        }

        let content = self.normalizer.normalize(text);
        let mut stats = ExtractionStats::new();
        stats.count_text(&content);

        Ok(ConvertResult::new(content, stats, MimeType::PlainText))
    }
}
