//! Fill resolution and rendering.
//!
//! Precedence for a shape: explicit fill element on its shape properties,
//! then the `p:style/a:fillRef` theme reference, then the fill of the
//! enclosing group, then no fill at all.

use super::color::{color_from_children, Color};
use super::StyleContext;
use crate::resolve::Resolver;
use crate::xml::Node;
use std::rc::Rc;

/// Elements that specify a fill directly.
pub const FILL_ELEMENTS: [&str; 6] = [
    "a:noFill",
    "a:solidFill",
    "a:gradFill",
    "a:pattFill",
    "a:blipFill",
    "a:grpFill",
];

/// One gradient stop.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Position in percent (`0..=100`)
    pub position: f64,
    pub color: Color,
}

/// A linear or radial gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// Direction in degrees, DrawingML convention (0 = left to right)
    pub angle: f64,
    /// Radial gradients carry their `a:path@path` kind
    pub radial: bool,
    pub stops: Vec<GradientStop>,
}

/// A resolved fill.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fill {
    #[default]
    None,
    Solid(Color),
    Gradient(Gradient),
    Pattern {
        preset: String,
        foreground: Color,
        background: Color,
    },
    Picture {
        data_uri: Rc<str>,
        tile: bool,
    },
}

impl Fill {
    pub fn is_none(&self) -> bool {
        matches!(self, Fill::None)
    }

    /// Representative single color (first stop, pattern foreground).
    pub fn primary_color(&self) -> Option<Color> {
        match self {
            Fill::Solid(c) => Some(*c),
            Fill::Gradient(g) => g.stops.first().map(|s| s.color),
            Fill::Pattern { foreground, .. } => Some(*foreground),
            _ => None,
        }
    }

    /// CSS declarations painting an HTML box with this fill.
    pub fn css(&self) -> String {
        match self {
            Fill::None => "background-color:transparent;".to_string(),
            Fill::Solid(c) => format!("background-color:{};", c.css()),
            Fill::Gradient(g) => format!("background:{};", g.css()),
            Fill::Pattern {
                preset,
                foreground,
                background,
            } => format!(
                "background-color:{};background-image:{};",
                background.css(),
                pattern_css(preset, foreground)
            ),
            Fill::Picture { data_uri, tile } => {
                if *tile {
                    format!("background-image:url({});background-repeat:repeat;", data_uri)
                } else {
                    format!(
                        "background-image:url({});background-size:100% 100%;background-repeat:no-repeat;",
                        data_uri
                    )
                }
            }
        }
    }

    /// SVG paint for this fill: the `fill` attribute value and any `<defs>`
    /// content it refers to. `id` must be unique within the slide.
    pub fn svg_paint(&self, id: &str) -> (String, String) {
        match self {
            Fill::None => ("none".to_string(), String::new()),
            Fill::Solid(c) => (svg_color(c), String::new()),
            Fill::Gradient(g) => (format!("url(#{})", id), g.svg_def(id)),
            Fill::Pattern {
                foreground,
                background,
                ..
            } => (
                format!("url(#{})", id),
                format!(
                    "<pattern id=\"{id}\" patternUnits=\"userSpaceOnUse\" width=\"6\" height=\"6\">\
                     <rect width=\"6\" height=\"6\" fill=\"{}\"/>\
                     <path d=\"M0,6 L6,0\" stroke=\"{}\" stroke-width=\"1\"/></pattern>",
                    svg_color(background),
                    svg_color(foreground),
                ),
            ),
            Fill::Picture { data_uri, .. } => (
                format!("url(#{})", id),
                format!(
                    "<pattern id=\"{id}\" patternContentUnits=\"objectBoundingBox\" width=\"1\" height=\"1\">\
                     <image href=\"{}\" width=\"1\" height=\"1\" preserveAspectRatio=\"none\"/></pattern>",
                    data_uri
                ),
            ),
        }
    }
}

/// SVG color literal, with the alpha folded into `rgba()` when needed.
pub fn svg_color(c: &Color) -> String {
    c.css()
}

impl Gradient {
    /// CSS gradient function.
    pub fn css(&self) -> String {
        let stops: Vec<String> = self
            .stops
            .iter()
            .map(|s| format!("{} {}%", s.color.css(), super::px(s.position)))
            .collect();
        if self.radial {
            format!("radial-gradient({})", stops.join(","))
        } else {
            // CSS measures from "to top", DrawingML from "to right"
            format!(
                "linear-gradient({}deg,{})",
                super::px((self.angle + 90.0).rem_euclid(360.0)),
                stops.join(",")
            )
        }
    }

    fn svg_def(&self, id: &str) -> String {
        let stops: String = self
            .stops
            .iter()
            .map(|s| {
                let mut stop = format!(
                    "<stop offset=\"{}%\" stop-color=\"#{}\"",
                    super::px(s.position),
                    s.color.to_hex()
                );
                if s.color.a < 1.0 {
                    stop.push_str(&format!(" stop-opacity=\"{}\"", s.color.a));
                }
                stop.push_str("/>");
                stop
            })
            .collect();

        if self.radial {
            format!("<radialGradient id=\"{id}\">{stops}</radialGradient>")
        } else {
            let rad = self.angle.to_radians();
            let (dx, dy) = (rad.cos() * 50.0, rad.sin() * 50.0);
            format!(
                "<linearGradient id=\"{id}\" x1=\"{}%\" y1=\"{}%\" x2=\"{}%\" y2=\"{}%\">{stops}</linearGradient>",
                super::px(50.0 - dx),
                super::px(50.0 - dy),
                super::px(50.0 + dx),
                super::px(50.0 + dy),
            )
        }
    }
}

fn pattern_css(preset: &str, fg: &Color) -> String {
    let preset = preset.to_ascii_lowercase();
    let angle = if preset.contains("horz") {
        0
    } else if preset.contains("vert") {
        90
    } else if preset.contains("dndiag") {
        135
    } else {
        45
    };
    format!(
        "repeating-linear-gradient({}deg,{} 0 1px,transparent 1px 4px)",
        angle,
        fg.css()
    )
}

/// Parse a single fill element (`a:solidFill`, `a:gradFill`, ...).
///
/// `placeholder` is the color substituted for `phClr` in theme styles.
/// Returns `None` for `a:grpFill` and unrecognized elements.
pub fn parse_fill_element(el: &Node, cx: &StyleContext<'_>, placeholder: Option<Color>) -> Option<Fill> {
    match el.name() {
        "a:noFill" => Some(Fill::None),
        "a:solidFill" => color_from_children(el, cx.palette, placeholder).map(Fill::Solid),
        "a:gradFill" => {
            let stops: Vec<GradientStop> = el
                .get(&["a:gsLst"])
                .map(|list| {
                    list.children_named("a:gs")
                        .filter_map(|gs| {
                            let color = color_from_children(gs, cx.palette, placeholder)?;
                            let position = gs.attr_f64("pos").unwrap_or(0.0) / 1000.0;
                            Some(GradientStop { position, color })
                        })
                        .collect()
                })
                .unwrap_or_default();
            if stops.is_empty() {
                return None;
            }
            let angle = el
                .child("a:lin")
                .and_then(|lin| lin.attr_f64("ang"))
                .unwrap_or(0.0)
                / 60000.0;
            Some(Fill::Gradient(Gradient {
                angle,
                radial: el.has("a:path"),
                stops,
            }))
        }
        "a:pattFill" => {
            let fg = el
                .child("a:fgClr")
                .and_then(|c| color_from_children(c, cx.palette, placeholder))
                .unwrap_or(Color::BLACK);
            let bg = el
                .child("a:bgClr")
                .and_then(|c| color_from_children(c, cx.palette, placeholder))
                .unwrap_or(Color::WHITE);
            Some(Fill::Pattern {
                preset: el.attr("prst").unwrap_or("pct5").to_string(),
                foreground: fg,
                background: bg,
            })
        }
        "a:blipFill" | "p:blipFill" => {
            let rel_id = el.get(&["a:blip"])?.attr("r:embed")?;
            let data_uri = cx.image_uri(rel_id)?;
            Some(Fill::Picture {
                data_uri,
                tile: el.has("a:tile"),
            })
        }
        other => {
            log::debug!("fill element {} not handled", other);
            None
        }
    }
}

/// Fill declared directly among the children of `props` (usually `p:spPr`).
pub fn explicit_fill(props: &Node, cx: &StyleContext<'_>) -> Option<Fill> {
    let el = props
        .children()
        .iter()
        .find(|c| FILL_ELEMENTS.contains(&c.name()))?;
    parse_fill_element(el, cx, None)
}

/// Whether the shape properties defer to the group fill.
pub fn uses_group_fill(props: &Node) -> bool {
    props.has("a:grpFill")
}

/// Fill from a `p:style` element's `a:fillRef`.
pub fn style_ref_fill(style: &Node, cx: &StyleContext<'_>) -> Option<Fill> {
    reference_fill(style.child("a:fillRef")?, cx)
}

/// Fill addressed by a theme reference (`a:fillRef`, `p:bgRef`).
///
/// Index 0 and 1000 mean no fill; 1001 and above address the background
/// fill list. The reference's own color stands in for `phClr`.
pub fn reference_fill(fill_ref: &Node, cx: &StyleContext<'_>) -> Option<Fill> {
    let idx = fill_ref.attr_i64("idx")?;
    if idx == 0 || idx == 1000 {
        return Some(Fill::None);
    }
    if idx < 0 {
        return None;
    }
    let placeholder = color_from_children(fill_ref, cx.palette, None);
    let idx = idx as usize;
    let theme_fill = if idx > 1000 {
        cx.theme.background_fill_style(idx)
    } else {
        cx.theme.fill_style(idx)
    };
    match theme_fill {
        Some(el) => parse_fill_element(el, cx, placeholder),
        None => placeholder.map(Fill::Solid),
    }
}

/// Resolve the fill of a shape.
pub fn resolve_fill(
    props: Option<&Node>,
    style: Option<&Node>,
    group_fill: Option<&Fill>,
    cx: &StyleContext<'_>,
) -> Fill {
    let defers_to_group = props.map(uses_group_fill).unwrap_or(false);
    Resolver::new()
        .source("explicit", || props.and_then(|p| explicit_fill(p, cx)))
        .source("style reference", || {
            if defers_to_group {
                None
            } else {
                style.and_then(|s| style_ref_fill(s, cx))
            }
        })
        .source("group", || group_fill.cloned())
        .resolve_or(Fill::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Palette, Theme};

    struct OneImage;

    impl crate::style::ImageSource for OneImage {
        fn image_uri(&self, rel_id: &str) -> Option<Rc<str>> {
            (rel_id == "rId2").then(|| Rc::from("data:image/png;base64,AAAA"))
        }
    }

    fn theme() -> Theme {
        let xml = r#"<a:theme xmlns:a="a"><a:themeElements><a:fmtScheme>
            <a:fillStyleLst>
              <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
              <a:solidFill><a:schemeClr val="phClr"><a:lumMod val="50000"/></a:schemeClr></a:solidFill>
            </a:fillStyleLst>
          </a:fmtScheme></a:themeElements></a:theme>"#;
        Theme::new(Some(Rc::new(Node::parse(xml).unwrap())))
    }

    fn style(idx: &str) -> Node {
        Node::new("p:style").with_child(
            Node::new("a:fillRef")
                .with_attr("idx", idx)
                .with_child(Node::new("a:schemeClr").with_attr("val", "accent1")),
        )
    }

    fn solid(hex: &str) -> Node {
        Node::new("a:solidFill").with_child(Node::new("a:srgbClr").with_attr("val", hex))
    }

    #[test]
    fn test_explicit_fill_beats_style_reference() {
        let theme = theme();
        let palette = Palette::default();
        let cx = StyleContext::new(&palette, &theme, 1.0);
        let props = Node::new("p:spPr").with_child(solid("00FF00"));

        let fill = resolve_fill(Some(&props), Some(&style("1")), None, &cx);
        assert_eq!(fill, Fill::Solid(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn test_style_reference_uses_placeholder_color() {
        let theme = theme();
        let palette = Palette::default();
        let cx = StyleContext::new(&palette, &theme, 1.0);
        let props = Node::new("p:spPr");

        let fill = resolve_fill(Some(&props), Some(&style("1")), None, &cx);
        assert_eq!(fill, Fill::Solid(Color::from_u32(0x4472C4)));

        for none in ["0", "1000"] {
            assert_eq!(resolve_fill(Some(&props), Some(&style(none)), None, &cx), Fill::None);
        }
    }

    #[test]
    fn test_group_fill_inheritance() {
        let theme = Theme::default();
        let palette = Palette::default();
        let cx = StyleContext::new(&palette, &theme, 1.0);
        let group = Fill::Solid(Color::rgb(1, 2, 3));

        let props = Node::new("p:spPr").with_child(Node::new("a:grpFill"));
        assert_eq!(resolve_fill(Some(&props), Some(&style("1")), Some(&group), &cx), group);
        assert_eq!(resolve_fill(None, None, Some(&group), &cx), group);
        assert_eq!(resolve_fill(None, None, None, &cx), Fill::None);
    }

    #[test]
    fn test_gradient_parsing_and_css() {
        let theme = Theme::default();
        let palette = Palette::default();
        let cx = StyleContext::new(&palette, &theme, 1.0);
        let grad = Node::new("a:gradFill")
            .with_child(
                Node::new("a:gsLst")
                    .with_child(Node::new("a:gs").with_attr("pos", "0").with_child(
                        Node::new("a:srgbClr").with_attr("val", "FF0000"),
                    ))
                    .with_child(Node::new("a:gs").with_attr("pos", "100000").with_child(
                        Node::new("a:srgbClr").with_attr("val", "0000FF"),
                    )),
            )
            .with_child(Node::new("a:lin").with_attr("ang", "5400000"));

        let fill = parse_fill_element(&grad, &cx, None).unwrap();
        assert_eq!(
            fill.css(),
            "background:linear-gradient(180deg,#FF0000 0%,#0000FF 100%);"
        );
        let (paint, defs) = fill.svg_paint("g1");
        assert_eq!(paint, "url(#g1)");
        assert!(defs.starts_with("<linearGradient id=\"g1\""));
        assert_eq!(fill.primary_color(), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_picture_fill_uses_image_source() {
        let theme = Theme::default();
        let palette = Palette::default();
        let images = OneImage;
        let cx = StyleContext::new(&palette, &theme, 1.0).with_images(&images);

        let blip = Node::new("a:blipFill")
            .with_child(Node::new("a:blip").with_attr("r:embed", "rId2"))
            .with_child(Node::new("a:stretch"));
        let fill = parse_fill_element(&blip, &cx, None).unwrap();
        assert!(fill.css().contains("url(data:image/png;base64,AAAA)"));

        let missing = Node::new("a:blipFill")
            .with_child(Node::new("a:blip").with_attr("r:embed", "rId9"));
        assert!(parse_fill_element(&missing, &cx, None).is_none());
    }
}
