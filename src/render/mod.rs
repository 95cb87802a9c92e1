//! Post-processing of reconstructed text.

mod normalize;
mod reading;
mod stats;

pub use normalize::{normalize, NormalizeOptions, TextNormalizer, BULLET};
pub use reading::{bionic_split, split_paragraphs, BionicWord};
pub use stats::ExtractionStats;
