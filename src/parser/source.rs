//! The extractor seam.
//!
//! Everything downstream of extraction only needs pages of positioned
//! fragments, so the concrete PDF library stays behind [`FragmentSource`].
//! Tests and replays can feed fragments without parsing anything.

use crate::error::{Error, Result};
use crate::model::Page;

/// Turns document bytes into pages of unordered fragments.
pub trait FragmentSource: Send + Sync {
    /// Extract every page. Pages are returned with their 1-based numbers;
    /// their order in the returned vector is not significant.
    fn extract(&self, data: &[u8]) -> Result<Vec<Page>>;
}

impl<S: FragmentSource + ?Sized> FragmentSource for &S {
    fn extract(&self, data: &[u8]) -> Result<Vec<Page>> {
        (**self).extract(data)
    }
}

impl<S: FragmentSource + ?Sized> FragmentSource for Box<S> {
    fn extract(&self, data: &[u8]) -> Result<Vec<Page>> {
        (**self).extract(data)
    }
}

/// Reads pages from JSON, as written by `serde_json` from `Vec<Page>`.
///
/// Useful for replaying fragments dumped from a real document.
#[derive(Debug, Clone, Default)]
pub struct JsonSource {
    _private: (),
}

impl JsonSource {
    /// Create a new JSON source.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl FragmentSource for JsonSource {
    fn extract(&self, data: &[u8]) -> Result<Vec<Page>> {
        serde_json::from_slice(data).map_err(Error::parse)
    }
}
