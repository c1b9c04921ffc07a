//! Conversion options configuration.

/// How much of the layout/master/theme chain is drawn beneath slide content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeProcessing {
    /// Inherit backgrounds and draw layout/master decoration shapes
    #[default]
    Full,
    /// Inherit backgrounds (colors and images) only
    ColorsAndImageOnly,
    /// Use the slide's own background only
    None,
}

/// Default device units per EMU (96 dpi).
pub const DEFAULT_SLIDE_FACTOR: f64 = 96.0 / 914400.0;

/// Default multiplier from points to rendered font pixels.
pub const DEFAULT_FONT_SIZE_FACTOR: f64 = 4.0 / 3.2;

/// Options for converting a presentation.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Theme inheritance depth
    pub theme_processing: ThemeProcessing,

    /// Embed audio/video parts instead of showing their poster image
    pub media_process: bool,

    /// Device units per EMU
    pub slide_factor: f64,

    /// Pixels per point of font size
    pub font_size_factor: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            theme_processing: ThemeProcessing::Full,
            media_process: false,
            slide_factor: DEFAULT_SLIDE_FACTOR,
            font_size_factor: DEFAULT_FONT_SIZE_FACTOR,
        }
    }
}

impl ConvertOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set theme processing depth.
    pub fn with_theme_processing(mut self, mode: ThemeProcessing) -> Self {
        self.theme_processing = mode;
        self
    }

    /// Enable or disable media embedding.
    pub fn with_media(mut self, enabled: bool) -> Self {
        self.media_process = enabled;
        self
    }

    /// Set the EMU to device unit factor; non-positive values keep the default.
    pub fn with_slide_factor(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            self.slide_factor = factor;
        }
        self
    }

    /// Set the font size factor; non-positive values keep the default.
    pub fn with_font_size_factor(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            self.font_size_factor = factor;
        }
        self
    }

    /// Convert an EMU length to device units.
    pub fn emu(&self, value: f64) -> f64 {
        value * self.slide_factor
    }

    /// Convert a font size in points to rendered pixels.
    pub fn font_px(&self, points: f64) -> f64 {
        points * self.font_size_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.theme_processing, ThemeProcessing::Full);
        assert!(!opts.media_process);
        assert!((opts.slide_factor - 96.0 / 914400.0).abs() < f64::EPSILON);
        assert!((opts.font_size_factor - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = ConvertOptions::new()
            .with_theme_processing(ThemeProcessing::ColorsAndImageOnly)
            .with_media(true)
            .with_slide_factor(0.0)
            .with_font_size_factor(2.0);

        assert_eq!(opts.theme_processing, ThemeProcessing::ColorsAndImageOnly);
        assert!(opts.media_process);
        assert!((opts.slide_factor - DEFAULT_SLIDE_FACTOR).abs() < f64::EPSILON);
        assert_eq!(opts.font_px(10.0), 20.0);
    }

    #[test]
    fn test_emu_conversion() {
        let opts = ConvertOptions::default();
        assert!((opts.emu(914400.0) - 96.0).abs() < 1e-9);
    }
}
