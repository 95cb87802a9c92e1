//! Turn unordered page fragments into flowing text.

use rayon::prelude::*;

use crate::model::{Fragment, Page};

use super::config::LayoutConfig;
use super::order::sort_reading_order;

/// Separator appended after every page that produced text.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Rebuilds line, paragraph and word boundaries from fragment geometry.
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    config: LayoutConfig,
}

impl Reconstructor {
    /// Create a reconstructor with the given thresholds.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// The thresholds in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Reconstruct one page's text in reading order.
    ///
    /// Vertical jumps between consecutive fragments become `\n` (beyond the
    /// line break threshold) or `\n\n` (beyond the paragraph threshold).
    /// On the same line a space is inserted only when the horizontal gap
    /// exceeds the space threshold and the fragment has visible text; small
    /// or negative gaps join fragments directly, which keeps kerned or
    /// ligature-split words whole.
    pub fn reconstruct_page(&self, fragments: &[Fragment]) -> String {
        let ordered = sort_reading_order(fragments, self.config.line_tolerance);

        let mut text = String::new();
        let mut last: Option<&Fragment> = None;

        for fragment in ordered {
            match last {
                None => text.push_str(&fragment.text),
                Some(prev) => {
                    let dy = (fragment.y - prev.y).abs();
                    if dy > self.config.line_break_threshold {
                        text.push('\n');
                        if dy > self.config.paragraph_break_threshold {
                            text.push('\n');
                        }
                    } else {
                        let gap = fragment.x - prev.right();
                        if gap > self.config.space_threshold && !fragment.is_blank() {
                            text.push(' ');
                        }
                    }

                    if text.ends_with('\n') {
                        text.push_str(fragment.text.trim_start());
                    } else {
                        text.push_str(&fragment.text);
                    }
                }
            }
            last = Some(fragment);
        }

        text
    }

    /// Reconstruct a whole document, pages joined in page-number order.
    ///
    /// Pages without fragments are skipped entirely, so a document made
    /// only of empty pages yields an empty string. Every other page is
    /// followed by [`PAGE_SEPARATOR`].
    pub fn reconstruct_document(&self, pages: &[Page]) -> String {
        let texts = pages
            .iter()
            .filter_map(|page| self.reconstruct_numbered(page))
            .collect();
        assemble(texts)
    }

    /// Same as [`reconstruct_document`](Self::reconstruct_document), with
    /// pages reconstructed on the rayon thread pool.
    pub fn reconstruct_document_parallel(&self, pages: &[Page]) -> String {
        let texts = pages
            .par_iter()
            .filter_map(|page| self.reconstruct_numbered(page))
            .collect();
        assemble(texts)
    }

    fn reconstruct_numbered(&self, page: &Page) -> Option<(u32, String)> {
        if page.is_empty() {
            log::debug!("Page {} has no fragments, skipping", page.number);
            return None;
        }
        Some((page.number, self.reconstruct_page(&page.fragments)))
    }
}

/// Join per-page texts in page-number order.
fn assemble(mut texts: Vec<(u32, String)>) -> String {
    texts.sort_by_key(|(number, _)| *number);

    let capacity = texts
        .iter()
        .map(|(_, text)| text.len() + PAGE_SEPARATOR.len())
        .sum();
    let mut document = String::with_capacity(capacity);
    for (_, text) in texts {
        document.push_str(&text);
        document.push_str(PAGE_SEPARATOR);
    }
    document
}
