//! Layout thresholds.

/// Maximum baseline distance for two fragments to count as the same line
/// when ordering.
pub const LINE_TOLERANCE: f32 = 5.0;

/// Vertical distance above which a line break is emitted.
pub const LINE_BREAK_THRESHOLD: f32 = 8.0;

/// Vertical distance above which a paragraph break (two line breaks) is
/// emitted.
pub const PARAGRAPH_BREAK_THRESHOLD: f32 = 24.0;

/// Horizontal gap above which a space is inserted between two fragments on
/// the same line.
pub const SPACE_THRESHOLD: f32 = 3.5;

/// Thresholds used by the layout reconstructor, in page layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Same-line tolerance for reading order
    pub line_tolerance: f32,

    /// Vertical gap that starts a new line
    pub line_break_threshold: f32,

    /// Vertical gap that starts a new paragraph
    pub paragraph_break_threshold: f32,

    /// Horizontal gap that becomes a space
    pub space_threshold: f32,
}

impl LayoutConfig {
    /// Create a config with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the same-line tolerance used for ordering.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the line break threshold.
    pub fn with_line_break_threshold(mut self, threshold: f32) -> Self {
        self.line_break_threshold = threshold;
        self
    }

    /// Set the paragraph break threshold.
    pub fn with_paragraph_break_threshold(mut self, threshold: f32) -> Self {
        self.paragraph_break_threshold = threshold;
        self
    }

    /// Set the word space threshold.
    pub fn with_space_threshold(mut self, threshold: f32) -> Self {
        self.space_threshold = threshold;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: LINE_TOLERANCE,
            line_break_threshold: LINE_BREAK_THRESHOLD,
            paragraph_break_threshold: PARAGRAPH_BREAK_THRESHOLD,
            space_threshold: SPACE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = LayoutConfig::default();
        assert_eq!(config.line_tolerance, 5.0);
        assert_eq!(config.line_break_threshold, 8.0);
        assert_eq!(config.paragraph_break_threshold, 24.0);
        assert_eq!(config.space_threshold, 3.5);
    }

    #[test]
    fn test_config_builder() {
        let config = LayoutConfig::new()
            .with_line_tolerance(2.0)
            .with_line_break_threshold(6.0)
            .with_paragraph_break_threshold(18.0)
            .with_space_threshold(1.5);

        assert_eq!(config.line_tolerance, 2.0);
        assert_eq!(config.line_break_threshold, 6.0);
        assert_eq!(config.paragraph_break_threshold, 18.0);
        assert_eq!(config.space_threshold, 1.5);
    }
}
