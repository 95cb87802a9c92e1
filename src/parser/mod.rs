//! Fragment extraction.

mod content;
mod font;
mod pdf;
mod source;

pub use pdf::{LoadedPdf, LopdfSource};
pub use source::{FragmentSource, JsonSource};
