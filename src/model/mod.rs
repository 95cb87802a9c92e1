//! Document model types for positioned text.
//!
//! These types sit between the extractor and the layout reconstructor.
//! They carry no reading order: a [`Page`] is just a bag of [`Fragment`]s.

mod fragment;
mod page;

pub use fragment::Fragment;
pub use page::Page;
