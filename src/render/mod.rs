//! Markup rendering.
//!
//! Slides are rendered one after another into HTML fragments. All mutable
//! state shared between slides (the style table, the chart queue and the
//! text scratch flags) lives in one [`RenderState`] that is passed down by
//! mutable reference, so at most one writer touches it at a time.
//!
//! # Example
//!
//! ```no_run
//! use unslide::{convert_file, render::*};
//!
//! let conversion = convert_file("deck.pptx", &ConvertOptions::default())?;
//!
//! let page = to_html_document(&conversion);
//! let json = to_json(&conversion, JsonFormat::Pretty)?;
//! # Ok::<(), unslide::Error>(())
//! ```

pub mod emitter;
mod json;
pub mod options;
pub mod style_table;

pub use emitter::{convert_package, to_html_document};
pub use json::{to_json, to_json_default, JsonFormat};
pub use options::{ConvertOptions, ThemeProcessing};
pub use style_table::{StyleEntry, StyleTable};

use crate::container::OoxmlContainer;
use crate::context::{PartImages, PartTree, SlideContext};
use crate::model::ChartRequest;
use crate::presentation::Presentation;
use crate::style::StyleContext;
use crate::text::TextScratch;

/// Mutable state of one conversion.
#[derive(Debug, Default)]
pub struct RenderState {
    pub styles: StyleTable,
    pub charts: Vec<ChartRequest>,
    pub text: TextScratch,
    ids: u32,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversion-wide unique element id with the given prefix.
    pub fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{}{}", prefix, self.ids);
        self.ids += 1;
        id
    }
}

/// Which part of the inheritance chain a shape tree comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Slide,
    Layout,
    Master,
    Diagram,
}

/// Read-only environment for rendering the shapes of one part.
pub struct Env<'a> {
    pub package: &'a OoxmlContainer,
    pub options: &'a ConvertOptions,
    pub presentation: &'a Presentation,
    pub slide: &'a SlideContext,
    /// Part whose shape tree is being rendered
    pub part: &'a PartTree,
    pub layer: Layer,
    images: PartImages<'a>,
}

impl<'a> Env<'a> {
    pub fn new(
        package: &'a OoxmlContainer,
        options: &'a ConvertOptions,
        presentation: &'a Presentation,
        slide: &'a SlideContext,
        part: &'a PartTree,
        layer: Layer,
    ) -> Self {
        Self {
            package,
            options,
            presentation,
            slide,
            part,
            layer,
            images: PartImages {
                package,
                rels: &part.rels,
            },
        }
    }

    /// Environment for another part of the same slide.
    pub fn for_part(&self, part: &'a PartTree, layer: Layer) -> Env<'a> {
        Env::new(
            self.package,
            self.options,
            self.presentation,
            self.slide,
            part,
            layer,
        )
    }

    /// Style context resolving images through the current part.
    pub fn style(&self) -> StyleContext<'_> {
        StyleContext::new(
            &self.slide.palette,
            &self.slide.theme,
            self.options.slide_factor,
        )
        .with_images(&self.images)
    }

    /// Path of an internal relationship target of the current part.
    pub fn target_path(&self, rel_id: &str) -> Option<String> {
        self.part.rels.target_path(rel_id)
    }
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let mut state = RenderState::new();
        assert_eq!(state.next_id("chart"), "chart0");
        assert_eq!(state.next_id("svg"), "svg1");
    }
}
