//! Fragment extraction backed by lopdf.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::Page;

use super::content::ContentWalker;
use super::font::load_page_fonts;
use super::source::FragmentSource;

/// Production [`FragmentSource`] that parses PDF bytes with lopdf.
#[derive(Debug, Clone, Default)]
pub struct LopdfSource {
    _private: (),
}

impl LopdfSource {
    /// Create a new lopdf-backed source.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl FragmentSource for LopdfSource {
    fn extract(&self, data: &[u8]) -> Result<Vec<Page>> {
        let pdf = LoadedPdf::load(data)?;
        pdf.extract_all()
    }
}

/// A parsed PDF held for the duration of one extraction.
pub struct LoadedPdf {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LoadedPdf {
    /// Parse PDF bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            return Err(Error::parse("document is encrypted"));
        }
        let pages = doc.get_pages();
        log::debug!("Loaded PDF {} with {} pages", doc.version, pages.len());
        Ok(Self { doc, pages })
    }

    /// PDF version from the header, e.g. "1.7".
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Page numbers in ascending order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    /// Extract every page in page order. Any page failure aborts.
    pub fn extract_all(&self) -> Result<Vec<Page>> {
        self.pages
            .keys()
            .map(|&number| self.extract_page(number))
            .collect()
    }

    /// Extract the fragments of one page (1-indexed).
    pub fn extract_page(&self, number: u32) -> Result<Page> {
        let page_id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, self.page_count()))?;

        let content = self.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Page::new(number));
        }

        let operations = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::parse(format!("page {}: {}", number, e)))?
            .operations;

        let font_dicts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::parse(format!("page {}: {}", number, e)))?;
        let fonts = load_page_fonts(&self.doc, &font_dicts);

        let fragments = ContentWalker::new(&fonts).walk(&operations);
        log::debug!("Page {}: {} fragments", number, fragments.len());

        Ok(Page::with_fragments(number, fragments))
    }

    /// Get the decompressed content stream of a page.
    ///
    /// Pages without a `Contents` entry are blank and yield no bytes.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => self.stream_content(*r),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        content.extend_from_slice(&self.stream_content(*r)?);
                        content.push(b' ');
                    }
                }
                Ok(content)
            }
            _ => Err(Error::parse("invalid content stream")),
        }
    }

    fn stream_content(&self, id: ObjectId) -> Result<Vec<u8>> {
        match self.doc.get_object(id)? {
            Object::Stream(s) if s.dict.get(b"Filter").is_err() => Ok(s.content.clone()),
            Object::Stream(s) => Ok(s.decompressed_content()?),
            _ => Err(Error::parse("content entry is not a stream")),
        }
    }
}
