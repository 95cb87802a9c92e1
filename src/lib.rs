//! # reflow
//!
//! Turns uploaded documents into clean, reading-ordered text.
//!
//! PDF content streams only place glyph runs at coordinates. This library
//! collects those runs as [`Fragment`]s, puts them back into reading order,
//! infers word, line and paragraph boundaries from their geometry and then
//! repairs a few extraction artifacts, so the result can be shown in a
//! reader view or handed to a rewriting service.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> reflow::Result<()> {
//!     let text = reflow::extract_text("document.pdf")?;
//!     for paragraph in reflow::render::split_paragraphs(&text) {
//!         println!("{}", paragraph);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction** ([`parser`]): positioned fragments per page, behind the
//!   [`FragmentSource`] trait
//! - **Layout** ([`layout`]): reading order and break inference
//! - **Normalization** ([`render`]): bullet repair, line endings, blank lines
//! - **Parallel processing**: pages are reconstructed with Rayon

pub mod convert;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod rewrite;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConvertResult, ConverterRegistry, DocumentConverter, EmptyPolicy,
    PdfConverter, PlainTextConverter,
};
pub use detect::{is_pdf_bytes, MimeType};
pub use error::{Error, Result};
pub use layout::{LayoutConfig, Reconstructor};
pub use model::{Fragment, Page};
pub use parser::{FragmentSource, JsonSource, LoadedPdf, LopdfSource};
pub use render::{normalize, ExtractionStats};
pub use rewrite::{rewrite_text, RewriteMode, TextRewriter};

use std::path::Path;
use std::sync::Arc;

/// Convert bytes of the given MIME type to text with default options.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.pdf").unwrap();
/// let text = reflow::convert_bytes(&data, "application/pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn convert_bytes(data: &[u8], mime: &str) -> Result<String> {
    Reflow::new().convert_bytes(data, mime).map(|r| r.content)
}

/// Extract reading-ordered text from a PDF or text file.
///
/// # Example
///
/// ```no_run
/// use reflow::extract_text;
///
/// let text = extract_text("document.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Reflow::new().convert_file(path).map(|r| r.content)
}

/// Reconstruct and normalize already extracted pages.
pub fn reconstruct_text(pages: &[Page]) -> String {
    normalize(&Reconstructor::default().reconstruct_document(pages))
}

/// Builder for conversions.
///
/// # Example
///
/// ```no_run
/// use reflow::{LayoutConfig, Reflow};
///
/// let text = Reflow::new()
///     .with_layout(LayoutConfig::default().with_space_threshold(2.5))
///     .reject_empty()
///     .convert_file("document.pdf")?
///     .content;
/// # Ok::<(), reflow::Error>(())
/// ```
pub struct Reflow {
    options: ConvertOptions,
    registry: ConverterRegistry,
}

impl Reflow {
    /// Create a new builder with the default converters.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            registry: ConverterRegistry::with_defaults(),
        }
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Fail with [`Error::EmptyExtraction`] when no text is found.
    pub fn reject_empty(mut self) -> Self {
        self.options = self.options.reject_empty();
        self
    }

    /// Extract PDF fragments with a custom source instead of lopdf.
    pub fn with_source<S: FragmentSource + 'static>(mut self, source: S) -> Self {
        self.registry
            .register(Arc::new(PdfConverter::with_source(source)));
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert bytes declared with the given MIME string.
    pub fn convert_bytes(&self, data: &[u8], mime: &str) -> Result<ConvertResult> {
        self.registry.convert_bytes(data, mime, &self.options)
    }

    /// Convert a file, with the MIME type taken from its extension.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        self.registry.convert_file(path.as_ref(), &self.options)
    }
}

impl Default for Reflow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflow_builder() {
        let reflow = Reflow::new()
            .sequential()
            .reject_empty()
            .with_layout(LayoutConfig::default().with_line_tolerance(2.0));

        assert!(!reflow.options().parallel);
        assert_eq!(reflow.options().empty, EmptyPolicy::Reject);
        assert_eq!(reflow.options().layout.line_tolerance, 2.0);
    }

    #[test]
    fn test_convert_bytes_unsupported_mime() {
        let result = convert_bytes(b"GIF89a", "image/gif");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_convert_bytes_empty_pdf_data() {
        let result = convert_bytes(&[], "application/pdf");
        assert!(matches!(result, Err(Error::DocumentParse { .. })));
    }

    #[test]
    fn test_convert_bytes_plain_text() {
        assert_eq!(convert_bytes(b"a\r\nb", "text/plain").unwrap(), "a\nb");
    }

    #[test]
    fn test_extract_text_nonexistent_file() {
        let result = extract_text("/nonexistent/path/to/file.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_reflow_with_json_source() {
        let json = br#"[{"number": 1, "fragments": [
            {"text": "nn Item one", "x": 0, "y": 100, "width": 50},
            {"text": "n Item two", "x": 0, "y": 90, "width": 50}
        ]}]"#;
        let result = Reflow::new()
            .with_source(JsonSource::new())
            .convert_bytes(json, "application/pdf")
            .unwrap();
        assert_eq!(result.content, "• Item one\n• Item two");
    }

    #[test]
    fn test_reconstruct_text() {
        let pages = vec![Page::with_fragments(
            1,
            vec![Fragment::new("a", 0.0, 0.0, 5.0), Fragment::new("  ", 10.0, 0.0, 5.0)],
        )];
        assert_eq!(reconstruct_text(&pages), "a");
    }
}
