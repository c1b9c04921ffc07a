//! Run-level character formatting.
//!
//! A [`RunStyle`] is read from one `a:rPr`/`a:defRPr`/`a:endParaRPr`
//! element with every property optional, then layered with
//! [`RunStyle::or`] across the inheritance chain so that the first level
//! defining a property wins.

use super::color::{color_from_children, Color};
use super::fill::{parse_fill_element, FILL_ELEMENTS};
use super::StyleContext;
use crate::xml::Node;

/// Font size in points when no level of the chain defines one.
pub const DEFAULT_FONT_SIZE_PT: f64 = 18.0;

/// Character formatting with optional properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    /// Resolved family name (theme references already substituted)
    pub typeface: Option<String>,
    /// Size in points
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// `a:rPr@u` value (`sng`, `dbl`, `none`, ...)
    pub underline: Option<String>,
    /// `a:rPr@strike` value (`sngStrike`, `dblStrike`, `noStrike`)
    pub strike: Option<String>,
    /// Baseline shift in percent of the font size
    pub baseline: Option<f64>,
    pub color: Option<Color>,
    pub highlight: Option<Color>,
    /// `a:rPr@cap` value (`all`, `small`, `none`)
    pub cap: Option<String>,
    /// Character spacing in hundredths of a point
    pub spacing: Option<f64>,
    /// Language tag of the run
    pub lang: Option<String>,
}

impl RunStyle {
    /// Read the properties of one run property element.
    pub fn read(rpr: &Node, cx: &StyleContext<'_>) -> Self {
        let typeface = rpr
            .get_attr(&["a:latin"], "typeface")
            .or_else(|| rpr.get_attr(&["a:cs"], "typeface"))
            .or_else(|| rpr.get_attr(&["a:ea"], "typeface"))
            .filter(|t| !t.is_empty())
            .map(|t| cx.theme.typeface(t).to_string());

        Self {
            typeface,
            size: rpr.attr_f64("sz").map(|sz| sz / 100.0),
            bold: rpr.attr_bool("b"),
            italic: rpr.attr_bool("i"),
            underline: rpr.attr("u").map(str::to_string),
            strike: rpr.attr("strike").map(str::to_string),
            baseline: rpr.attr_f64("baseline").map(|b| b / 1000.0),
            color: run_color(rpr, cx),
            highlight: rpr
                .child("a:highlight")
                .and_then(|h| color_from_children(h, cx.palette, None)),
            cap: rpr.attr("cap").map(str::to_string),
            spacing: rpr.attr_f64("spc"),
            lang: rpr.attr("lang").map(str::to_string),
        }
    }

    /// Properties of a `p:style/a:fontRef` (theme font and color).
    pub fn from_font_ref(font_ref: &Node, cx: &StyleContext<'_>) -> Self {
        let typeface = match font_ref.attr("idx") {
            Some("major") => Some(cx.theme.major_font().to_string()),
            Some("minor") => Some(cx.theme.minor_font().to_string()),
            _ => None,
        };
        Self {
            typeface,
            color: color_from_children(font_ref, cx.palette, None),
            ..Default::default()
        }
    }

    /// Fill in every property missing here from `lower`.
    pub fn or(self, lower: RunStyle) -> RunStyle {
        RunStyle {
            typeface: self.typeface.or(lower.typeface),
            size: self.size.or(lower.size),
            bold: self.bold.or(lower.bold),
            italic: self.italic.or(lower.italic),
            underline: self.underline.or(lower.underline),
            strike: self.strike.or(lower.strike),
            baseline: self.baseline.or(lower.baseline),
            color: self.color.or(lower.color),
            highlight: self.highlight.or(lower.highlight),
            cap: self.cap.or(lower.cap),
            spacing: self.spacing.or(lower.spacing),
            lang: self.lang.or(lower.lang),
        }
    }

    /// Layer a whole chain, highest precedence first.
    pub fn layered(levels: impl IntoIterator<Item = RunStyle>) -> RunStyle {
        levels
            .into_iter()
            .fold(RunStyle::default(), |acc, level| acc.or(level))
    }

    /// Whether the run's language is written right to left.
    pub fn is_rtl_lang(&self) -> bool {
        self.lang
            .as_deref()
            .and_then(|l| l.split('-').next())
            .map(|l| matches!(l, "ar" | "he" | "fa" | "ur" | "yi" | "ps" | "sd" | "ug"))
            .unwrap_or(false)
    }

    /// CSS declarations for a text span.
    ///
    /// `font_size_factor` converts points to pixels and `scale` is the
    /// autofit font scale of the text body (1.0 when not shrinking).
    pub fn css(&self, font_size_factor: f64, scale: f64) -> String {
        let mut css = String::new();

        if let Some(face) = &self.typeface {
            css.push_str(&format!("font-family:'{}';", face.replace('\'', "")));
        }
        let size = self.size.unwrap_or(DEFAULT_FONT_SIZE_PT) * scale;
        let mut size_px = size * font_size_factor;
        if let Some(shift) = self.baseline.filter(|b| *b != 0.0) {
            // sub/superscript runs are drawn smaller
            size_px *= 0.7;
            css.push_str(&format!(
                "vertical-align:{};",
                if shift > 0.0 { "super" } else { "sub" }
            ));
        }
        css.push_str(&format!("font-size:{}px;", super::px(size_px)));

        if self.bold == Some(true) {
            css.push_str("font-weight:bold;");
        }
        if self.italic == Some(true) {
            css.push_str("font-style:italic;");
        }

        let underline = self.underline.as_deref().is_some_and(|u| u != "none");
        let strike = self.strike.as_deref().is_some_and(|s| s != "noStrike");
        match (underline, strike) {
            (true, true) => css.push_str("text-decoration:underline line-through;"),
            (true, false) => css.push_str("text-decoration:underline;"),
            (false, true) => css.push_str("text-decoration:line-through;"),
            (false, false) => {}
        }
        if self.underline.as_deref() == Some("dbl") || self.strike.as_deref() == Some("dblStrike") {
            css.push_str("text-decoration-style:double;");
        }

        match self.cap.as_deref() {
            Some("all") => css.push_str("text-transform:uppercase;"),
            Some("small") => css.push_str("font-variant:small-caps;"),
            _ => {}
        }
        if let Some(spc) = self.spacing.filter(|s| *s != 0.0) {
            css.push_str(&format!(
                "letter-spacing:{}px;",
                super::px(spc / 100.0 * font_size_factor)
            ));
        }

        css.push_str(&format!(
            "color:{};",
            self.color.unwrap_or(Color::BLACK).css()
        ));
        if let Some(hl) = self.highlight {
            css.push_str(&format!("background-color:{};", hl.css()));
        }

        css
    }
}

/// Text color of a run property element: its fill, whatever the kind.
fn run_color(rpr: &Node, cx: &StyleContext<'_>) -> Option<Color> {
    let el = rpr
        .children()
        .iter()
        .find(|c| FILL_ELEMENTS.contains(&c.name()))?;
    parse_fill_element(el, cx, None)?.primary_color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Palette, Theme};

    fn cx_parts() -> (Palette, Theme) {
        (Palette::default(), Theme::default())
    }

    #[test]
    fn test_read_run_properties() {
        let (palette, theme) = cx_parts();
        let cx = StyleContext::new(&palette, &theme, 1.0);
        let rpr = Node::new("a:rPr")
            .with_attr("sz", "2400")
            .with_attr("b", "1")
            .with_attr("u", "sng")
            .with_child(Node::new("a:solidFill").with_child(Node::new("a:schemeClr").with_attr("val", "accent2")))
            .with_child(Node::new("a:latin").with_attr("typeface", "+mn-lt"));

        let style = RunStyle::read(&rpr, &cx);
        assert_eq!(style.size, Some(24.0));
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.typeface.as_deref(), Some("Calibri"));
        assert_eq!(style.color, Some(Color::from_u32(0xED7D31)));

        let css = style.css(1.0, 1.0);
        assert!(css.contains("font-size:24px;"));
        assert!(css.contains("font-weight:bold;"));
        assert!(css.contains("text-decoration:underline;"));
        assert!(css.contains("color:#ED7D31;"));
    }

    #[test]
    fn test_layering_keeps_highest_precedence() {
        let run = RunStyle {
            bold: Some(false),
            ..Default::default()
        };
        let layout = RunStyle {
            bold: Some(true),
            size: Some(32.0),
            ..Default::default()
        };
        let master = RunStyle {
            size: Some(44.0),
            color: Some(Color::WHITE),
            ..Default::default()
        };
        let merged = RunStyle::layered([run, layout, master]);
        assert_eq!(merged.bold, Some(false));
        assert_eq!(merged.size, Some(32.0));
        assert_eq!(merged.color, Some(Color::WHITE));
    }

    #[test]
    fn test_font_ref() {
        let (palette, theme) = cx_parts();
        let cx = StyleContext::new(&palette, &theme, 1.0);
        let font_ref = Node::new("a:fontRef")
            .with_attr("idx", "major")
            .with_child(Node::new("a:schemeClr").with_attr("val", "lt1"));
        let style = RunStyle::from_font_ref(&font_ref, &cx);
        assert_eq!(style.typeface.as_deref(), Some("Calibri Light"));
        assert_eq!(style.color, Some(Color::WHITE));
    }

    #[test]
    fn test_default_size_and_baseline() {
        let style = RunStyle {
            baseline: Some(30.0),
            ..Default::default()
        };
        let css = style.css(4.0 / 3.2, 1.0);
        assert!(css.contains("vertical-align:super;"));
        // 18pt * 1.25 * 0.7
        assert!(css.contains("font-size:15.75px;"));
        assert!(css.contains("color:#000000;"));
    }

    #[test]
    fn test_rtl_language() {
        let style = RunStyle {
            lang: Some("ar-SA".to_string()),
            ..Default::default()
        };
        assert!(style.is_rtl_lang());
        assert!(!RunStyle::default().is_rtl_lang());
    }
}
