//! Paragraph bullets.
//!
//! A paragraph has at most one bullet. Its definition is looked up through
//! the paragraph property chain (paragraph, list style, layout, master); an
//! explicit `a:buNone` anywhere along the chain ends the lookup with no
//! bullet.

use crate::style::color::{color_from_children, Color};
use crate::style::StyleContext;
use crate::xml::Node;
use std::rc::Rc;

/// Largest `buAutoNum@startAt` the format allows.
const MAX_START_AT: u32 = 32767;

/// What a bullet draws.
#[derive(Debug, Clone, PartialEq)]
pub enum BulletKind {
    /// A literal glyph
    Char(String),
    /// An automatic numeral; `scheme` is the `buAutoNum@type` value
    AutoNumber { scheme: String, start_at: u32 },
    /// An image glyph
    Picture(Rc<str>),
}

/// A resolved bullet with its presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub kind: BulletKind,
    /// Glyph font family (`a:buFont`)
    pub font: Option<String>,
    /// Glyph color (`a:buClr`); `None` follows the text
    pub color: Option<Color>,
    /// Glyph size relative to the text, as a fraction (`a:buSzPct`)
    pub size_pct: Option<f64>,
    /// Absolute glyph size in points (`a:buSzPts`)
    pub size_pts: Option<f64>,
}

/// Outcome of inspecting one level of the chain.
enum Lookup {
    /// `a:buNone`: stop, no bullet
    Suppressed,
    Found(BulletKind),
    /// Nothing here, keep looking
    Absent,
}

fn bullet_kind(ppr: &Node, cx: &StyleContext<'_>) -> Lookup {
    if ppr.has("a:buNone") {
        return Lookup::Suppressed;
    }
    if let Some(ch) = ppr.child("a:buChar").and_then(|c| c.attr("char")) {
        return Lookup::Found(BulletKind::Char(ch.to_string()));
    }
    if let Some(auto) = ppr.child("a:buAutoNum") {
        return Lookup::Found(BulletKind::AutoNumber {
            scheme: auto.attr("type").unwrap_or("arabicPeriod").to_string(),
            start_at: auto
                .attr_parse::<u32>("startAt")
                .map_or(1, |s| s.clamp(1, MAX_START_AT)),
        });
    }
    if let Some(blip) = ppr.get(&["a:buBlip", "a:blip"]) {
        match blip.attr("r:embed").and_then(|id| cx.image_uri(id)) {
            Some(uri) => return Lookup::Found(BulletKind::Picture(uri)),
            None => log::debug!("picture bullet image is missing"),
        }
    }
    Lookup::Absent
}

/// Resolve the bullet of a paragraph from its property chain, highest
/// precedence first.
pub fn resolve_bullet(chain: &[&Node], cx: &StyleContext<'_>) -> Option<Bullet> {
    let mut kind = None;
    for ppr in chain {
        match bullet_kind(ppr, cx) {
            Lookup::Suppressed => return None,
            Lookup::Found(found) => {
                kind = Some(found);
                break;
            }
            Lookup::Absent => {}
        }
    }
    let kind = kind?;

    let font = chain
        .iter()
        .find_map(|p| p.get_attr(&["a:buFont"], "typeface"))
        .map(|t| cx.theme.typeface(t).to_string());
    let color = chain
        .iter()
        .find_map(|p| p.child("a:buClr"))
        .and_then(|c| color_from_children(c, cx.palette, None));
    let size_pct = chain
        .iter()
        .find_map(|p| p.child("a:buSzPct"))
        .and_then(|s| s.attr_f64("val"))
        .map(|v| v / 100000.0);
    let size_pts = chain
        .iter()
        .find_map(|p| p.child("a:buSzPts"))
        .and_then(|s| s.attr_f64("val"))
        .map(|v| v / 100.0);

    Some(Bullet {
        kind,
        font,
        color,
        size_pct,
        size_pts,
    })
}

impl Bullet {
    /// CSS for the marker span, given the text's font size in points and
    /// color.
    pub fn css(&self, text_size_pt: f64, text_color: Color, font_size_factor: f64) -> String {
        let size = match (self.size_pts, self.size_pct) {
            (Some(pts), _) => pts,
            (None, Some(pct)) => text_size_pt * pct,
            (None, None) => text_size_pt,
        };
        let mut css = String::new();
        if let Some(font) = &self.font {
            css.push_str(&format!("font-family:'{}';", font.replace('\'', "")));
        }
        css.push_str(&format!(
            "font-size:{}px;color:{};",
            crate::style::px(size * font_size_factor),
            self.color.unwrap_or(text_color).css()
        ));
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Palette, Theme};

    fn with_cx<T>(f: impl FnOnce(&StyleContext<'_>) -> T) -> T {
        let palette = Palette::default();
        let theme = Theme::default();
        f(&StyleContext::new(&palette, &theme, 1.0))
    }

    fn ppr() -> Node {
        Node::new("a:pPr")
    }

    #[test]
    fn test_first_definition_wins() {
        let paragraph = ppr().with_child(Node::new("a:buAutoNum").with_attr("type", "romanUcPeriod"));
        let master = ppr()
            .with_child(Node::new("a:buFont").with_attr("typeface", "Arial"))
            .with_child(Node::new("a:buChar").with_attr("char", "•"));

        let bullet = with_cx(|cx| resolve_bullet(&[&paragraph, &master], cx)).unwrap();
        assert_eq!(
            bullet.kind,
            BulletKind::AutoNumber {
                scheme: "romanUcPeriod".to_string(),
                start_at: 1
            }
        );
        // presentation properties still inherit from lower levels
        assert_eq!(bullet.font.as_deref(), Some("Arial"));
    }

    #[test]
    fn test_bu_none_short_circuits() {
        let list = ppr().with_child(Node::new("a:buNone"));
        let master = ppr().with_child(Node::new("a:buChar").with_attr("char", "•"));
        assert!(with_cx(|cx| resolve_bullet(&[&ppr(), &list, &master], cx)).is_none());
    }

    #[test]
    fn test_no_definition_means_no_bullet() {
        assert!(with_cx(|cx| resolve_bullet(&[&ppr(), &ppr()], cx)).is_none());
    }

    #[test]
    fn test_start_at_and_size() {
        let p = ppr()
            .with_child(Node::new("a:buSzPct").with_attr("val", "50000"))
            .with_child(Node::new("a:buClr").with_child(Node::new("a:srgbClr").with_attr("val", "FF0000")))
            .with_child(
                Node::new("a:buAutoNum")
                    .with_attr("type", "arabicPeriod")
                    .with_attr("startAt", "4"),
            );
        let bullet = with_cx(|cx| resolve_bullet(&[&p], cx)).unwrap();
        assert!(matches!(bullet.kind, BulletKind::AutoNumber { start_at: 4, .. }));
        assert_eq!(
            bullet.css(20.0, Color::BLACK, 1.0),
            "font-size:10px;color:#FF0000;"
        );
    }

    #[test]
    fn test_start_at_clamped() {
        let auto = |start: &str| {
            ppr().with_child(
                Node::new("a:buAutoNum")
                    .with_attr("type", "arabicPeriod")
                    .with_attr("startAt", start),
            )
        };
        let start_of = |p: &Node| match with_cx(|cx| resolve_bullet(&[p], cx)).map(|b| b.kind) {
            Some(BulletKind::AutoNumber { start_at, .. }) => start_at,
            other => panic!("expected a numbered bullet, got {:?}", other),
        };
        assert_eq!(start_of(&auto("4294967295")), 32767);
        assert_eq!(start_of(&auto("0")), 1);
    }
}
