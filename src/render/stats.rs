//! Statistics gathered while converting a document.

use serde::{Deserialize, Serialize};

use crate::model::Page;

use super::reading::split_paragraphs;

/// Counts describing one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages the extractor returned
    pub page_count: u32,

    /// Pages that carried at least one fragment
    pub pages_with_text: u32,

    /// Fragments across all pages
    pub fragment_count: u32,

    /// Paragraphs in the final text
    pub paragraph_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count pages and fragments as extracted.
    pub fn from_pages(pages: &[Page]) -> Self {
        let mut stats = Self::new();
        for page in pages {
            stats.add_page(page);
        }
        stats
    }

    /// Add one extracted page.
    pub fn add_page(&mut self, page: &Page) {
        self.page_count += 1;
        if !page.is_empty() {
            self.pages_with_text += 1;
        }
        self.fragment_count += page.fragment_count() as u32;
    }

    /// Add paragraph, word and character counts from final text.
    pub fn count_text(&mut self, text: &str) {
        self.paragraph_count += split_paragraphs(text)
            .iter()
            .filter(|p| !p.trim().is_empty())
            .count() as u32;
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// True when no page carried a fragment.
    pub fn is_empty(&self) -> bool {
        self.fragment_count == 0
    }
}
