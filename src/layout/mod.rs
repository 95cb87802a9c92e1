//! Layout reconstruction for positioned text.
//!
//! A PDF page gives us text fragments with coordinates but no word, line or
//! paragraph boundaries. This module derives reading order from geometry and
//! rebuilds those boundaries as spaces and line breaks.
//!
//! ```
//! use reflow::layout::Reconstructor;
//! use reflow::Fragment;
//!
//! let fragments = vec![
//!     Fragment::new("world", 25.0, 100.0, 30.0),
//!     Fragment::new("Hello", 0.0, 100.0, 20.0),
//! ];
//! let text = Reconstructor::default().reconstruct_page(&fragments);
//! assert_eq!(text, "Hello world");
//! ```

mod config;
mod order;
mod reconstruct;

pub use config::{
    LayoutConfig, LINE_BREAK_THRESHOLD, LINE_TOLERANCE, PARAGRAPH_BREAK_THRESHOLD, SPACE_THRESHOLD,
};
pub use order::{reading_order, sort_reading_order};
pub use reconstruct::{Reconstructor, PAGE_SEPARATOR};
