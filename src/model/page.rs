//! Page-level types.

use super::Fragment;
use serde::{Deserialize, Serialize};

/// The fragments extracted from a single page, in extraction order.
///
/// Extraction order carries no meaning; reading order is derived later by
/// the layout reconstructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Text fragments found on the page
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fragments: Vec::new(),
        }
    }

    /// Create a page from already extracted fragments.
    pub fn with_fragments(number: u32, fragments: Vec<Fragment>) -> Self {
        Self { number, fragments }
    }

    /// Add a fragment to the page.
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Check if the page has no fragments at all.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Get the number of fragments on the page.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_creation() {
        let mut page = Page::new(3);
        assert_eq!(page.number, 3);
        assert!(page.is_empty());

        page.push(Fragment::new("x", 0.0, 0.0, 5.0));
        assert!(!page.is_empty());
        assert_eq!(page.fragment_count(), 1);
    }

    #[test]
    fn test_page_json_round_trip() {
        let page = Page::with_fragments(1, vec![Fragment::new("Hello", 0.0, 100.0, 20.0)]);
        let json = serde_json::to_string(&page).unwrap();
        let back: Page = serde_json::from_str(&json).unwrap();
        assert_eq!(back, page);
    }
}
