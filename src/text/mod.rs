//! Text layout: text bodies, paragraphs, runs and bullets.
//!
//! Paragraph and run properties are resolved per indent level through the
//! chain paragraph → shape list style → layout placeholder → master
//! placeholder → master text style → presentation default text style.
//! Numbered bullets are assigned in a second pass over the laid out
//! paragraphs of one body (see [`numbering`]).

pub mod bullet;
pub mod numbering;

use crate::context::{Placeholders, TextFamily};
use crate::render::{escape_html, Env, RenderState};
use crate::style::{px, Color, RunStyle, StyleContext};
use crate::xml::Node;
use bullet::{resolve_bullet, BulletKind};
use numbering::{format_number, NumberingState};

/// Default body insets in EMU (left/right, top/bottom).
const DEFAULT_INSET_LR: f64 = 91440.0;
const DEFAULT_INSET_TB: f64 = 45720.0;

/// Line height of single spacing relative to the font size.
const SINGLE_LINE_HEIGHT: f64 = 1.2;

/// Writing direction of the paragraph being laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Per-conversion text scratch state.
///
/// `line_started` records whether the current line already holds a run, so
/// consecutive breaks keep their line height; `direction` is the direction
/// of the paragraph being laid out.
#[derive(Debug, Default)]
pub struct TextScratch {
    pub line_started: bool,
    pub direction: Direction,
}

/// A text body to lay out and what it inherits from.
#[derive(Debug)]
pub struct TextFrame<'a> {
    /// `p:txBody` or `a:txBody`
    pub body: &'a Node,
    /// Resolved shape type
    pub kind: &'a str,
    pub placeholders: Placeholders<'a>,
    /// `p:style/a:fontRef` of the shape
    pub font_ref: Option<&'a Node>,
    /// Body properties taking precedence over the body's own `a:bodyPr`
    pub body_props: Option<&'a Node>,
    /// Lowest-precedence run defaults (table style text properties)
    pub inherited: RunStyle,
}

impl<'a> TextFrame<'a> {
    pub fn new(body: &'a Node, kind: &'a str) -> Self {
        Self {
            body,
            kind,
            placeholders: Placeholders::default(),
            font_ref: None,
            body_props: None,
            inherited: RunStyle::default(),
        }
    }
}

/// `a:lvlNpPr` element name for a 0-based level.
fn level_element(level: u32) -> String {
    format!("a:lvl{}pPr", level.min(8) + 1)
}

/// Body properties along the placeholder chain.
fn body_chain<'n>(frame: &TextFrame<'n>) -> Vec<&'n Node> {
    [
        frame.body_props,
        frame.body.child("a:bodyPr"),
        frame
            .placeholders
            .layout
            .and_then(|l| l.get(&["p:txBody", "a:bodyPr"])),
        frame
            .placeholders
            .master
            .and_then(|m| m.get(&["p:txBody", "a:bodyPr"])),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn body_attr<'n>(chain: &[&'n Node], key: &str) -> Option<&'n str> {
    chain.iter().find_map(|b| b.attr(key))
}

/// CSS for the text body box.
fn body_css(chain: &[&Node], slide_factor: f64) -> String {
    let inset = |key: &str, default: f64| {
        chain
            .iter()
            .find_map(|b| b.attr_f64(key))
            .unwrap_or(default)
            * slide_factor
    };
    let justify = match body_attr(chain, "anchor") {
        Some("ctr") => "center",
        Some("b") => "flex-end",
        _ => "flex-start",
    };

    let mut css = format!(
        "display:flex;flex-direction:column;justify-content:{};width:100%;height:100%;box-sizing:border-box;padding:{}px {}px {}px {}px;",
        justify,
        px(inset("tIns", DEFAULT_INSET_TB)),
        px(inset("rIns", DEFAULT_INSET_LR)),
        px(inset("bIns", DEFAULT_INSET_TB)),
        px(inset("lIns", DEFAULT_INSET_LR)),
    );
    match body_attr(chain, "vert") {
        Some("vert") | Some("eaVert") | Some("wordArtVertRtl") => {
            css.push_str("writing-mode:vertical-rl;")
        }
        Some("vert270") => css.push_str("writing-mode:vertical-rl;transform:rotate(180deg);"),
        _ => {}
    }
    if body_attr(chain, "wrap") == Some("none") {
        css.push_str("white-space:pre;");
    } else {
        css.push_str("white-space:pre-wrap;word-wrap:break-word;");
    }
    css
}

/// Autofit font scale of the body (`a:normAutofit@fontScale`).
fn font_scale(chain: &[&Node]) -> f64 {
    chain
        .iter()
        .find_map(|b| b.child("a:normAutofit"))
        .and_then(|a| a.attr_f64("fontScale"))
        .map(|s| s / 100000.0)
        .filter(|s| *s > 0.0)
        .unwrap_or(1.0)
}

/// Where each level of the paragraph chain comes from.
struct LevelSources<'n> {
    paragraph: Option<&'n Node>,
    list: Option<&'n Node>,
    layout: Option<&'n Node>,
    master: Option<&'n Node>,
    family: Option<&'n Node>,
    default: Option<&'n Node>,
}

impl<'n> LevelSources<'n> {
    /// Paragraph property chain, highest precedence first.
    fn chain(&self) -> Vec<&'n Node> {
        [
            self.paragraph,
            self.list,
            self.layout,
            self.master,
            self.family,
            self.default,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Paragraph-wide run defaults.
    ///
    /// Order: list style, shape font reference, paragraph, layout, master,
    /// master text style, presentation default, inherited table text.
    fn run_defaults(&self, frame: &TextFrame<'_>, cx: &StyleContext<'_>) -> RunStyle {
        let def_rpr = |n: Option<&Node>| {
            n.and_then(|n| n.child("a:defRPr"))
                .map(|r| RunStyle::read(r, cx))
                .unwrap_or_default()
        };
        RunStyle::layered([
            def_rpr(self.list),
            frame
                .font_ref
                .map(|f| RunStyle::from_font_ref(f, cx))
                .unwrap_or_default(),
            def_rpr(self.paragraph),
            def_rpr(self.layout),
            def_rpr(self.master),
            def_rpr(self.family),
            def_rpr(self.default),
            frame.inherited.clone(),
        ])
    }
}

/// Marker of a laid out paragraph, before numbering.
enum Marker {
    Literal { css: String, text: String },
    Number { css: String, scheme: String, start_at: u32, level: u32 },
    Picture { css: String, uri: String },
}

/// A paragraph laid out except for its numeral.
struct LaidOut {
    class_attr: String,
    rtl: bool,
    marker: Option<Marker>,
    content: String,
}

/// Lay out one text body into markup.
pub fn render_text_body(env: &Env<'_>, state: &mut RenderState, frame: &TextFrame<'_>) -> String {
    let cx = env.style();
    let factor = env.options.slide_factor;
    let font_factor = env.options.font_size_factor;

    let bodies = body_chain(frame);
    let scale = font_scale(&bodies);
    let body_class = state.styles.class_attr(&body_css(&bodies, factor));

    let family = TextFamily::for_type(frame.kind);
    let family_style = env.slide.master_text_style(family);
    let default_style = env.presentation.default_text_style();
    let fallback_face = if family == TextFamily::Title {
        cx.theme.major_font()
    } else {
        cx.theme.minor_font()
    };
    let fallback_color = cx.palette.scheme("tx1");

    let mut laid_out = Vec::new();
    for paragraph in frame.body.children_named("a:p") {
        let ppr = paragraph.child("a:pPr");
        let level = ppr
            .and_then(|p| p.attr_parse::<u32>("lvl"))
            .unwrap_or(0)
            .min(8);
        let lvl = level_element(level);

        let sources = LevelSources {
            paragraph: ppr,
            list: frame.body.get(&["a:lstStyle", lvl.as_str()]),
            layout: frame
                .placeholders
                .layout
                .and_then(|l| l.get(&["p:txBody", "a:lstStyle", lvl.as_str()])),
            master: frame
                .placeholders
                .master
                .and_then(|m| m.get(&["p:txBody", "a:lstStyle", lvl.as_str()])),
            family: family_style.and_then(|s| s.child(&lvl)),
            default: default_style.and_then(|s| s.child(&lvl)),
        };
        let chain = sources.chain();

        let mut defaults = sources.run_defaults(frame, &cx);
        if defaults.typeface.is_none() {
            defaults.typeface = Some(fallback_face.to_string());
        }
        if defaults.color.is_none() {
            defaults.color = Some(fallback_color);
        }

        laid_out.push(layout_paragraph(
            env, state, &cx, paragraph, &chain, level, defaults, scale, font_factor,
        ));
    }

    // numbering pass over the laid out markers, in document order
    let mut numbering = NumberingState::new();
    let mut html = format!("<div{}>", body_class);
    for paragraph in laid_out {
        let marker = match paragraph.marker {
            Some(Marker::Literal { css, text }) => format!(
                "<span{}>{}</span>",
                state.styles.class_attr(&css),
                escape_html(&text)
            ),
            Some(Marker::Number {
                css,
                scheme,
                start_at,
                level,
            }) => {
                let number = numbering
                    .next(&scheme, level)
                    .saturating_add(start_at.saturating_sub(1));
                format!(
                    "<span{}>{}</span>",
                    state.styles.class_attr(&css),
                    escape_html(&format_number(&scheme, number))
                )
            }
            Some(Marker::Picture { css, uri }) => format!(
                "<img{} src=\"{}\" alt=\"\">",
                state.styles.class_attr(&css),
                uri
            ),
            None => String::new(),
        };
        html.push_str(&format!(
            "<div{}{}>{}{}</div>",
            paragraph.class_attr,
            if paragraph.rtl { " dir=\"rtl\"" } else { "" },
            marker,
            paragraph.content
        ));
    }
    html.push_str("</div>");
    html
}

#[allow(clippy::too_many_arguments)]
fn layout_paragraph(
    env: &Env<'_>,
    state: &mut RenderState,
    cx: &StyleContext<'_>,
    paragraph: &Node,
    chain: &[&Node],
    level: u32,
    defaults: RunStyle,
    scale: f64,
    font_factor: f64,
) -> LaidOut {
    let attr = |key: &str| chain.iter().find_map(|p| p.attr(key));
    let emu = |key: &str| {
        chain
            .iter()
            .find_map(|p| p.attr_f64(key))
            .map(|v| v * env.options.slide_factor)
    };

    let first_run_style = paragraph
        .children()
        .iter()
        .find(|c| c.name() == "a:r")
        .and_then(|r| r.child("a:rPr"))
        .map(|r| RunStyle::read(r, cx));
    let rtl = attr("rtl").map(|v| v == "1").unwrap_or(false)
        || first_run_style
            .as_ref()
            .map(RunStyle::is_rtl_lang)
            .unwrap_or(false);
    state.text.direction = if rtl { Direction::Rtl } else { Direction::Ltr };
    state.text.line_started = false;

    let size_pt = first_run_style
        .as_ref()
        .and_then(|s| s.size)
        .or(defaults.size)
        .unwrap_or(crate::style::font::DEFAULT_FONT_SIZE_PT)
        * scale;

    // paragraph box
    let mut css = String::new();
    let align = match attr("algn") {
        Some("ctr") => "center",
        Some("r") => "right",
        Some("just") | Some("dist") | Some("justLow") | Some("thaiDist") => "justify",
        _ if rtl => "right",
        _ => "left",
    };
    css.push_str(&format!("text-align:{};", align));
    if rtl {
        css.push_str("direction:rtl;");
    }
    let margin_side = if rtl { "right" } else { "left" };
    let indent = emu("indent").unwrap_or(0.0);
    if let Some(mar) = emu("marL").filter(|m| *m != 0.0) {
        css.push_str(&format!("margin-{}:{}px;", margin_side, px(mar)));
    }
    if indent != 0.0 {
        css.push_str(&format!("text-indent:{}px;", px(indent)));
    }

    if let Some(ln) = chain.iter().find_map(|p| p.child("a:lnSpc")) {
        if let Some(pct) = ln.get_attr(&["a:spcPct"], "val").and_then(|v| v.parse::<f64>().ok()) {
            css.push_str(&format!(
                "line-height:{};",
                (pct / 100000.0 * SINGLE_LINE_HEIGHT * 1000.0).round() / 1000.0
            ));
        } else if let Some(pts) = ln.get_attr(&["a:spcPts"], "val").and_then(|v| v.parse::<f64>().ok()) {
            css.push_str(&format!("line-height:{}px;", px(pts / 100.0 * font_factor)));
        }
    }
    for (element, property) in [("a:spcBef", "margin-top"), ("a:spcAft", "margin-bottom")] {
        let space = chain.iter().find_map(|p| p.child(element)).and_then(|s| {
            if let Some(pts) = s.get_attr(&["a:spcPts"], "val").and_then(|v| v.parse::<f64>().ok()) {
                Some(pts / 100.0 * font_factor)
            } else {
                s.get_attr(&["a:spcPct"], "val")
                    .and_then(|v| v.parse::<f64>().ok())
                    .map(|pct| pct / 100000.0 * size_pt * font_factor)
            }
        });
        css.push_str(&format!("{}:{}px;", property, px(space.unwrap_or(0.0))));
    }
    let class_attr = state.styles.class_attr(&css);

    // runs
    let mut content = String::new();
    let mut has_text = false;
    for item in paragraph.children() {
        match item.name() {
            "a:r" | "a:fld" => {
                let text = if item.name() == "a:fld" && item.attr("type") == Some("slidenum") {
                    env.slide.number.to_string()
                } else {
                    item.child("a:t").map(|t| t.text().to_string()).unwrap_or_default()
                };
                content.push_str(&render_run(env, state, cx, item, &text, &defaults, scale, font_factor));
                has_text = true;
                state.text.line_started = true;
            }
            "a:br" => {
                if !state.text.line_started {
                    // an empty line keeps the height of its break
                    let style = item
                        .child("a:rPr")
                        .map(|r| RunStyle::read(r, cx))
                        .unwrap_or_default()
                        .or(defaults.clone());
                    let class = state.styles.class_attr(&style.css(font_factor, scale));
                    content.push_str(&format!("<span{}>&nbsp;</span>", class));
                }
                content.push_str("<br>");
                state.text.line_started = false;
            }
            _ => {}
        }
    }
    if !has_text {
        let style = paragraph
            .child("a:endParaRPr")
            .map(|r| RunStyle::read(r, cx))
            .unwrap_or_default()
            .or(defaults.clone());
        let class = state.styles.class_attr(&style.css(font_factor, scale));
        content.push_str(&format!("<span{}>&nbsp;</span>", class));
    }

    // marker
    let marker = if has_text {
        resolve_bullet(chain, cx).map(|bullet| {
            let text_color = first_run_style
                .as_ref()
                .and_then(|s| s.color)
                .or(defaults.color)
                .unwrap_or(Color::BLACK);
            let mut css = bullet.css(size_pt, text_color, font_factor);
            css.push_str("display:inline-block;text-indent:0;");
            if indent < 0.0 {
                css.push_str(&format!("min-width:{}px;", px(-indent)));
            }
            match bullet.kind {
                BulletKind::Char(ch) => Marker::Literal { css, text: ch },
                BulletKind::AutoNumber { scheme, start_at } => Marker::Number {
                    css,
                    scheme,
                    start_at,
                    level,
                },
                BulletKind::Picture(uri) => {
                    css.push_str(&format!(
                        "height:{}px;vertical-align:middle;",
                        px(size_pt * font_factor)
                    ));
                    Marker::Picture {
                        css,
                        uri: uri.to_string(),
                    }
                }
            }
        })
    } else {
        None
    };

    LaidOut {
        class_attr,
        rtl,
        marker,
        content,
    }
}

#[allow(clippy::too_many_arguments)]
fn render_run(
    env: &Env<'_>,
    state: &mut RenderState,
    cx: &StyleContext<'_>,
    run: &Node,
    text: &str,
    defaults: &RunStyle,
    scale: f64,
    font_factor: f64,
) -> String {
    let rpr = run.child("a:rPr");
    let own = rpr.map(|r| RunStyle::read(r, cx)).unwrap_or_default();
    let has_own_color = own.color.is_some();

    let link = rpr
        .and_then(|r| r.child("a:hlinkClick"))
        .and_then(|h| h.attr("r:id"))
        .and_then(|id| env.part.rels.get(id))
        .filter(|rel| rel.external)
        .map(|rel| rel.target.clone());

    let mut style = own.or(defaults.clone());
    if link.is_some() {
        if !has_own_color {
            style.color = Some(cx.palette.scheme("hlink"));
        }
        style.underline.get_or_insert_with(|| "sng".to_string());
    }

    let class = state.styles.class_attr(&style.css(font_factor, scale));
    let span = format!("<span{}>{}</span>", class, escape_html(text));
    match link {
        Some(href) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            escape_html(&href),
            span
        ),
        None => span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_element() {
        assert_eq!(level_element(0), "a:lvl1pPr");
        assert_eq!(level_element(8), "a:lvl9pPr");
        assert_eq!(level_element(20), "a:lvl9pPr");
    }

    #[test]
    fn test_body_css_defaults_and_anchor() {
        let factor = 96.0 / 914400.0;
        let body_pr = Node::new("a:bodyPr").with_attr("anchor", "ctr");
        let css = body_css(&[&body_pr], factor);
        assert!(css.contains("justify-content:center;"));
        assert!(css.contains("padding:4.8px 9.6px 4.8px 9.6px;"));
        assert!(css.contains("white-space:pre-wrap;"));

        let vertical = Node::new("a:bodyPr")
            .with_attr("vert", "vert270")
            .with_attr("wrap", "none")
            .with_attr("lIns", "0");
        let css = body_css(&[&vertical, &body_pr], factor);
        assert!(css.contains("writing-mode:vertical-rl;transform:rotate(180deg);"));
        assert!(css.contains("white-space:pre;"));
        assert!(css.contains("9.6px 0px;"));
        assert!(css.contains("justify-content:center;"));
    }

    #[test]
    fn test_font_scale() {
        let body_pr = Node::new("a:bodyPr")
            .with_child(Node::new("a:normAutofit").with_attr("fontScale", "62500"));
        assert_eq!(font_scale(&[&body_pr]), 0.625);
        assert_eq!(font_scale(&[]), 1.0);
    }
}
