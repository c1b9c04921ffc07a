//! Style resolution: colors, fills, borders and fonts.
//!
//! Everything here works on plain [`Node`](crate::xml::Node) fragments plus a
//! [`StyleContext`] that carries the palette and theme in effect for the
//! slide being rendered. Walking the slide/layout/master chain is left to the
//! callers, which know where each fragment came from.

pub mod border;
pub mod color;
pub mod fill;
pub mod font;
pub mod theme;

pub use border::{ArrowEnd, Border, DashType};
pub use color::Color;
pub use fill::{Fill, Gradient, GradientStop};
pub use font::RunStyle;
pub use theme::{Palette, Theme};

use std::rc::Rc;

/// Resolves image relationship ids of the part being rendered.
pub trait ImageSource {
    /// Data URI of the image behind relationship `rel_id`.
    fn image_uri(&self, rel_id: &str) -> Option<Rc<str>>;
}

/// Palette, theme and image lookup for one part of one slide.
#[derive(Clone, Copy)]
pub struct StyleContext<'a> {
    pub palette: &'a Palette,
    pub theme: &'a Theme,
    pub images: Option<&'a dyn ImageSource>,
    /// Device units per EMU.
    pub slide_factor: f64,
}

impl<'a> StyleContext<'a> {
    pub fn new(palette: &'a Palette, theme: &'a Theme, slide_factor: f64) -> Self {
        Self {
            palette,
            theme,
            images: None,
            slide_factor,
        }
    }

    /// Same context with a different image source.
    pub fn with_images(self, images: &'a dyn ImageSource) -> Self {
        Self {
            images: Some(images),
            ..self
        }
    }

    pub(crate) fn image_uri(&self, rel_id: &str) -> Option<Rc<str>> {
        self.images.and_then(|source| source.image_uri(rel_id))
    }
}

impl std::fmt::Debug for StyleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleContext")
            .field("theme", &self.theme.is_present())
            .field("slide_factor", &self.slide_factor)
            .finish()
    }
}

/// Format a device-unit length for CSS/SVG output.
pub fn px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(96.0), "96");
        assert_eq!(px(12.3456), "12.35");
        assert_eq!(px(-0.004), "0");
    }
}
