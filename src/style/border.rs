//! Outline (`a:ln`) resolution.

use super::color::{color_from_children, Color};
use super::fill::{parse_fill_element, Fill};
use super::StyleContext;
use crate::resolve::Resolver;
use crate::xml::Node;

/// Outline width in EMU when neither the shape nor the theme gives one.
const DEFAULT_LINE_WIDTH_EMU: f64 = 12700.0;

/// Preset dash pattern of an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashType {
    #[default]
    Solid,
    Dot,
    Dash,
    LgDash,
    DashDot,
    LgDashDot,
    LgDashDotDot,
    SysDash,
    SysDot,
    SysDashDot,
    SysDashDotDot,
}

impl DashType {
    /// Parse `a:prstDash@val`; unknown values draw solid.
    pub fn from_preset(value: &str) -> Self {
        match value {
            "solid" => DashType::Solid,
            "dot" => DashType::Dot,
            "dash" => DashType::Dash,
            "lgDash" => DashType::LgDash,
            "dashDot" => DashType::DashDot,
            "lgDashDot" => DashType::LgDashDot,
            "lgDashDotDot" => DashType::LgDashDotDot,
            "sysDash" => DashType::SysDash,
            "sysDot" => DashType::SysDot,
            "sysDashDot" => DashType::SysDashDot,
            "sysDashDotDot" => DashType::SysDashDotDot,
            other => {
                log::debug!("unknown dash preset {}, drawing solid", other);
                DashType::Solid
            }
        }
    }

    /// CSS `border-style` keyword.
    pub fn css(&self) -> &'static str {
        match self {
            DashType::Solid => "solid",
            DashType::Dot | DashType::SysDot => "dotted",
            _ => "dashed",
        }
    }

    /// SVG `stroke-dasharray` for a stroke of width `w`; `None` when solid.
    pub fn svg_dasharray(&self, w: f64) -> Option<String> {
        let pattern: &[f64] = match self {
            DashType::Solid => return None,
            DashType::Dot => &[1.0, 3.0],
            DashType::Dash => &[4.0, 3.0],
            DashType::LgDash => &[8.0, 3.0],
            DashType::DashDot => &[4.0, 3.0, 1.0, 3.0],
            DashType::LgDashDot => &[8.0, 3.0, 1.0, 3.0],
            DashType::LgDashDotDot => &[8.0, 3.0, 1.0, 3.0, 1.0, 3.0],
            DashType::SysDash => &[3.0, 1.0],
            DashType::SysDot => &[1.0, 1.0],
            DashType::SysDashDot => &[3.0, 1.0, 1.0, 1.0],
            DashType::SysDashDotDot => &[3.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        };
        let w = w.max(1.0);
        Some(
            pattern
                .iter()
                .map(|p| super::px(p * w))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Arrowhead at one end of an open path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowEnd {
    /// `triangle`, `stealth`, `diamond`, `oval` or `arrow`
    pub kind: String,
}

impl ArrowEnd {
    fn from_node(node: &Node) -> Option<Self> {
        match node.attr("type")? {
            "none" => None,
            kind => Some(Self {
                kind: kind.to_string(),
            }),
        }
    }

    /// SVG marker element with the given id, painted in `color`.
    pub fn svg_marker(&self, id: &str, color: &Color, at_start: bool) -> String {
        let shape = match self.kind.as_str() {
            "oval" => "<circle cx=\"5\" cy=\"5\" r=\"4\"".to_string(),
            "diamond" => "<path d=\"M5,0 L10,5 L5,10 L0,5 Z\"".to_string(),
            "arrow" => "<path d=\"M0,0 L10,5 L0,10\" fill=\"none\" stroke-width=\"1.5\"".to_string(),
            "stealth" => "<path d=\"M0,0 L10,5 L0,10 L3,5 Z\"".to_string(),
            _ => "<path d=\"M0,0 L10,5 L0,10 Z\"".to_string(),
        };
        let orient = if at_start { "auto-start-reverse" } else { "auto" };
        let paint = if self.kind == "arrow" {
            format!(" stroke=\"{}\"", color.css())
        } else {
            format!(" fill=\"{}\"", color.css())
        };
        format!(
            "<marker id=\"{id}\" viewBox=\"0 0 10 10\" refX=\"5\" refY=\"5\" markerWidth=\"5\" markerHeight=\"5\" orient=\"{orient}\">{shape}{paint}/></marker>"
        )
    }
}

/// A visible outline. Hidden outlines are represented by `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    /// Width in device units
    pub width: f64,
    pub color: Color,
    pub dash: DashType,
    pub head: Option<ArrowEnd>,
    pub tail: Option<ArrowEnd>,
}

impl Border {
    /// CSS `border` declaration for HTML boxes.
    pub fn css(&self) -> String {
        format!(
            "border:{}px {} {};",
            super::px(self.width),
            self.dash.css(),
            self.color.css()
        )
    }

    /// CSS declaration for a single side (`top`, `left`, ...).
    pub fn css_side(&self, side: &str) -> String {
        format!(
            "border-{}:{}px {} {};",
            side,
            super::px(self.width),
            self.dash.css(),
            self.color.css()
        )
    }

    /// SVG stroke attributes.
    pub fn svg_attrs(&self) -> String {
        let mut attrs = format!(
            " stroke=\"{}\" stroke-width=\"{}\"",
            self.color.css(),
            super::px(self.width)
        );
        if let Some(dash) = self.dash.svg_dasharray(self.width) {
            attrs.push_str(&format!(" stroke-dasharray=\"{}\"", dash));
        }
        attrs
    }
}

/// Color of an `a:ln` element: explicit fill, or `None` when it has none.
///
/// `Some(None)` means the outline is explicitly hidden.
fn line_color(ln: &Node, cx: &StyleContext<'_>, placeholder: Option<Color>) -> Option<Option<Color>> {
    let el = ln.children().iter().find(|c| {
        matches!(
            c.name(),
            "a:noFill" | "a:solidFill" | "a:gradFill" | "a:pattFill"
        )
    })?;
    match parse_fill_element(el, cx, placeholder)? {
        Fill::None => Some(None),
        fill => Some(fill.primary_color()),
    }
}

/// Resolve the outline of a shape.
///
/// `ln` is the shape's own `a:ln`, `style` its `p:style`. Explicit
/// properties win per property; anything missing comes from the theme line
/// style addressed by `a:lnRef`.
pub fn resolve_border(ln: Option<&Node>, style: Option<&Node>, cx: &StyleContext<'_>) -> Option<Border> {
    let line_ref = style.and_then(|s| s.child("a:lnRef"));
    let ref_color = line_ref.and_then(|r| color_from_children(r, cx.palette, None));
    let theme_ln = line_ref
        .and_then(|r| r.attr_i64("idx"))
        .filter(|idx| *idx > 0)
        .and_then(|idx| cx.theme.line_style(idx as usize));

    let color = Resolver::new()
        .source("explicit", || ln.and_then(|l| line_color(l, cx, None)))
        .source("style reference", || {
            theme_ln
                .and_then(|l| line_color(l, cx, ref_color))
                .or_else(|| ref_color.map(Some))
        })
        .resolve()
        .flatten()?;

    let width_emu = Resolver::new()
        .source("explicit", || ln.and_then(|l| l.attr_f64("w")))
        .source("style reference", || theme_ln.and_then(|l| l.attr_f64("w")))
        .resolve_or(DEFAULT_LINE_WIDTH_EMU);

    let dash = Resolver::new()
        .source("explicit", || {
            ln.and_then(|l| l.get_attr(&["a:prstDash"], "val"))
        })
        .source("style reference", || {
            theme_ln.and_then(|l| l.get_attr(&["a:prstDash"], "val"))
        })
        .resolve()
        .map(DashType::from_preset)
        .unwrap_or_default();

    Some(Border {
        width: width_emu * cx.slide_factor,
        color,
        dash,
        head: ln.and_then(|l| l.child("a:headEnd")).and_then(ArrowEnd::from_node),
        tail: ln.and_then(|l| l.child("a:tailEnd")).and_then(ArrowEnd::from_node),
    })
}
