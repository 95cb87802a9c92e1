//! Converters from uploaded bytes to reading text.
//!
//! Converters are registered by MIME type, and the registry dispatches to
//! them. Unknown types fail with [`Error::UnsupportedFormat`] before any
//! bytes are parsed.
//!
//! # Example
//!
//! ```no_run
//! use reflow::convert::{ConverterRegistry, ConvertOptions};
//! use std::path::Path;
//!
//! fn main() -> reflow::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let result = registry.convert_file(Path::new("document.pdf"), &ConvertOptions::default())?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod pdf;
mod text;

pub use pdf::PdfConverter;
pub use text::PlainTextConverter;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::detect::MimeType;
use crate::error::{Error, Result};
use crate::layout::LayoutConfig;
use crate::render::ExtractionStats;

/// What to do when a document parses but yields no text at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Return an empty string.
    #[default]
    Allow,
    /// Fail with [`Error::EmptyExtraction`].
    Reject,
}

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Layout thresholds
    pub layout: LayoutConfig,

    /// Reconstruct pages on the rayon thread pool
    pub parallel: bool,

    /// Handling of documents without any text fragment
    pub empty: EmptyPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            parallel: true,
            empty: EmptyPolicy::default(),
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Reconstruct pages on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Fail with [`Error::EmptyExtraction`] instead of returning "".
    pub fn reject_empty(mut self) -> Self {
        self.empty = EmptyPolicy::Reject;
        self
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Normalized text
    pub content: String,

    /// Extraction statistics
    pub stats: ExtractionStats,

    /// MIME type of the source document
    pub mime_type: MimeType,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(content: String, stats: ExtractionStats, mime_type: MimeType) -> Self {
        Self {
            content,
            stats,
            mime_type,
        }
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// True when no text was produced.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new input type.
pub trait DocumentConverter: Send + Sync {
    /// MIME types handled by this converter.
    fn mime_types(&self) -> &[MimeType];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert from bytes.
    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult>;

    /// Check if this converter handles the given MIME type.
    fn supports(&self, mime: MimeType) -> bool {
        self.mime_types().contains(&mime)
    }
}

/// Registry for document converters, keyed by MIME type.
pub struct ConverterRegistry {
    converters: HashMap<MimeType, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Create a registry with the PDF and plain text converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfConverter::new()));
        registry.register(Arc::new(PlainTextConverter::new()));
        registry
    }

    /// Register a converter for all its MIME types, replacing any earlier one.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for mime in converter.mime_types() {
            self.converters.insert(*mime, converter.clone());
        }
    }

    /// Get the converter for a MIME type.
    pub fn get(&self, mime: MimeType) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&mime).cloned()
    }

    /// Check if a MIME type has a converter.
    pub fn supports(&self, mime: MimeType) -> bool {
        self.converters.contains_key(&mime)
    }

    /// Convert bytes declared with the given MIME string.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        mime: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let mime: MimeType = mime.parse()?;
        self.convert_typed(bytes, mime, options)
    }

    /// Convert a file, with the MIME type taken from its extension.
    pub fn convert_file(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let mime = MimeType::from_path(path)?;
        let bytes = std::fs::read(path)?;
        self.convert_typed(&bytes, mime, options)
    }

    fn convert_typed(
        &self,
        bytes: &[u8],
        mime: MimeType,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let converter = self
            .get(mime)
            .ok_or_else(|| Error::UnsupportedFormat(mime.to_string()))?;

        log::debug!(
            "Converting {} bytes of {} with {}",
            bytes.len(),
            mime,
            converter.name()
        );
        converter.convert_bytes(bytes, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
