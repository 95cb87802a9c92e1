//! Positioned text fragments.

use serde::{Deserialize, Serialize};

/// One chunk of text positioned on a page.
///
/// Coordinates are in page space: origin at the bottom-left corner,
/// `y` growing upward. `y` is the baseline of the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Horizontal extent of the text
    #[serde(default)]
    pub width: f32,
}

impl Fragment {
    /// Create a new fragment. Negative widths are clamped to zero.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: width.max(0.0),
        }
    }

    /// X coordinate where the fragment ends.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the fragment carries only whitespace (or nothing).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether both coordinates and the width are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite()
    }
}
