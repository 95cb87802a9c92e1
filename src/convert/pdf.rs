//! PDF document converter implementation.

use crate::detect::MimeType;
use crate::error::{Error, Result};
use crate::layout::Reconstructor;
use crate::parser::{FragmentSource, LopdfSource};
use crate::render::{normalize, ExtractionStats};

use super::{ConvertOptions, ConvertResult, DocumentConverter, EmptyPolicy};

/// PDF document converter.
///
/// Runs extraction, layout reconstruction and normalization. The fragment
/// source is pluggable so the pipeline can run on fragments from anywhere.
#[derive(Debug, Clone, Default)]
pub struct PdfConverter<S = LopdfSource> {
    source: S,
}

impl PdfConverter {
    /// Create a converter backed by lopdf.
    pub fn new() -> Self {
        Self::with_source(LopdfSource::new())
    }
}

impl<S: FragmentSource> PdfConverter<S> {
    /// Create a converter with a custom fragment source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// The fragment source in use.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: FragmentSource> DocumentConverter for PdfConverter<S> {
    fn mime_types(&self) -> &[MimeType] {
        &[MimeType::Pdf]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let pages = self.source.extract(bytes)?;
        let mut stats = ExtractionStats::from_pages(&pages);

        if stats.is_empty() && options.empty == EmptyPolicy::Reject {
            return Err(Error::EmptyExtraction);
        }

        let reconstructor = Reconstructor::new(options.layout);
        let raw = if options.parallel {
            reconstructor.reconstruct_document_parallel(&pages)
        } else {
            reconstructor.reconstruct_document(&pages)
        };

        let content = normalize(&raw);
        stats.count_text(&content);
        log::debug!(
            "Converted {} pages ({} with text, {} fragments) into {} chars",
            stats.page_count,
            stats.pages_with_text,
            stats.fragment_count,
            content.len()
        );

        Ok(ConvertResult::new(content, stats, MimeType::Pdf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fragment, Page};

    struct FixedSource(Vec<Page>);

    impl FragmentSource for FixedSource {
        fn extract(&self, _data: &[u8]) -> Result<Vec<Page>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl FragmentSource for FailingSource {
        fn extract(&self, _data: &[u8]) -> Result<Vec<Page>> {
            Err(Error::parse("page 2: bad operator"))
        }
    }

    fn two_pages() -> Vec<Page> {
        vec![
            Page::with_fragments(2, vec![Fragment::new("Bye", 0.0, 50.0, 10.0)]),
            Page::with_fragments(
                1,
                vec![
                    Fragment::new("world", 25.0, 100.0, 30.0),
                    Fragment::new("Hello", 0.0, 100.0, 20.0),
                ],
            ),
        ]
    }

    #[test]
    fn test_pdf_converter_mime_types() {
        let converter = PdfConverter::new();
        assert_eq!(converter.mime_types(), &[MimeType::Pdf]);
        assert!(converter.supports(MimeType::Pdf));
        assert!(!converter.supports(MimeType::PlainText));
        assert_eq!(converter.name(), "pdf");
    }

    #[test]
    fn test_two_page_document() {
        let converter = PdfConverter::with_source(FixedSource(two_pages()));
        for options in [ConvertOptions::default(), ConvertOptions::default().sequential()] {
            let result = converter.convert_bytes(b"", &options).unwrap();
            assert_eq!(result.content, "Hello world\n\nBye");
            assert_eq!(result.stats.page_count, 2);
            assert_eq!(result.stats.fragment_count, 3);
            assert_eq!(result.stats.paragraph_count, 2);
        }
    }

    #[test]
    fn test_empty_document_allowed_by_default() {
        let converter = PdfConverter::with_source(FixedSource(vec![Page::new(1)]));
        let result = converter.convert_bytes(b"", &ConvertOptions::default()).unwrap();
        assert_eq!(result.content, "");
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_document_rejected() {
        let converter = PdfConverter::with_source(FixedSource(vec![Page::new(1)]));
        let result = converter.convert_bytes(b"", &ConvertOptions::default().reject_empty());
        assert!(matches!(result, Err(Error::EmptyExtraction)));
    }

    #[test]
    fn test_source_failure_propagates() {
        let converter = PdfConverter::with_source(FailingSource);
        let result = converter.convert_bytes(b"", &ConvertOptions::default());
        assert!(matches!(result, Err(Error::DocumentParse { .. })));
    }

    #[test]
    fn test_invalid_pdf_bytes() {
        let result = PdfConverter::new().convert_bytes(b"not a pdf", &ConvertOptions::default());
        assert!(matches!(result, Err(Error::DocumentParse { .. })));
    }
}
