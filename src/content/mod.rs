//! Shape content dispatch.
//!
//! Every child of a shape tree is classified into one [`Content`] variant
//! and rendered by the matching handler. Markup-compatibility blocks
//! (`mc:AlternateContent`) are resolved before classification.

pub mod chart;
pub mod diagram;
pub mod media;
pub mod table;

use crate::context::{non_visual_props, placeholder_of, Placeholders};
use crate::geometry::{shape_paths, GroupTransform, Transform};
use crate::render::{escape_html, Env, Layer, RenderState};
use crate::style::border::resolve_border;
use crate::style::fill::{explicit_fill, resolve_fill};
use crate::style::{px, Border, Fill, RunStyle};
use crate::text::{render_text_body, TextFrame};
use crate::xml::Node;

/// Declarations of the SVG canvas inside a shape box.
const CANVAS_CSS: &str = "position:absolute;top:0px;left:0px;overflow:visible;";
/// Declarations of an image filling its box.
pub(crate) const IMAGE_CSS: &str = "display:block;width:100%;height:100%;";

/// What a graphic frame holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Graphic {
    Table,
    Chart,
    Diagram,
    Ole,
}

/// One renderable child of a shape tree.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// `p:sp`
    Shape(&'a Node),
    /// `p:cxnSp`
    Connector(&'a Node),
    /// `p:pic`
    Picture(&'a Node),
    /// `p:graphicFrame`
    GraphicFrame(&'a Node, Graphic),
    /// `p:grpSp`
    Group(&'a Node),
}

impl<'a> Content<'a> {
    /// Classify a shape tree child; `None` for anything that draws nothing.
    pub fn classify(node: &'a Node) -> Option<Self> {
        match node.name() {
            "p:sp" => Some(Content::Shape(node)),
            "p:cxnSp" => Some(Content::Connector(node)),
            "p:pic" => Some(Content::Picture(node)),
            "p:grpSp" => Some(Content::Group(node)),
            "p:graphicFrame" => {
                let data = node.get(&["a:graphic", "a:graphicData"])?;
                match graphic_kind(data) {
                    Some(graphic) => Some(Content::GraphicFrame(node, graphic)),
                    None => {
                        log::debug!(
                            "graphic frame with unknown content {}",
                            data.attr("uri").unwrap_or("")
                        );
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

fn graphic_kind(data: &Node) -> Option<Graphic> {
    let uri = data.attr("uri").unwrap_or("");
    let children = expand_alternates(data.children());
    let holds = |name: &str| children.iter().any(|c| c.name() == name);

    if holds("a:tbl") || uri.ends_with("/table") {
        Some(Graphic::Table)
    } else if holds("c:chart") || uri.ends_with("/chart") {
        Some(Graphic::Chart)
    } else if holds("dgm:relIds") || uri.ends_with("/diagram") {
        Some(Graphic::Diagram)
    } else if holds("p:oleObj") || uri.ends_with("/ole") {
        Some(Graphic::Ole)
    } else {
        None
    }
}

/// Children with every `mc:AlternateContent` replaced by the content of its
/// `mc:Choice`, or of its `mc:Fallback` when the choice is empty.
pub fn expand_alternates(nodes: &[Node]) -> Vec<&Node> {
    let mut out = Vec::new();
    for node in nodes {
        if node.name() == "mc:AlternateContent" {
            let branch = node
                .child("mc:Choice")
                .filter(|c| !c.children().is_empty())
                .or_else(|| node.child("mc:Fallback"));
            if let Some(branch) = branch {
                out.extend(expand_alternates(branch.children()));
            }
        } else {
            out.push(node);
        }
    }
    out
}

/// Render every child of a shape tree (or group) in document order.
pub fn render_tree(
    env: &Env<'_>,
    state: &mut RenderState,
    tree: &Node,
    group_fill: Option<&Fill>,
) -> String {
    let mut html = String::new();
    for node in expand_alternates(tree.children()) {
        html.push_str(&render_node(env, state, node, group_fill));
    }
    html
}

/// Render one shape tree child.
pub fn render_node(
    env: &Env<'_>,
    state: &mut RenderState,
    node: &Node,
    group_fill: Option<&Fill>,
) -> String {
    let Some(content) = Content::classify(node) else {
        return String::new();
    };
    if non_visual_props(node)
        .and_then(|p| p.attr_bool("hidden"))
        .unwrap_or(false)
    {
        return String::new();
    }
    // layout and master placeholders only supply inherited properties
    if matches!(env.layer, Layer::Layout | Layer::Master) && placeholder_of(node).is_some() {
        return String::new();
    }

    match content {
        Content::Shape(node) | Content::Connector(node) => {
            render_shape(env, state, node, group_fill)
        }
        Content::Picture(node) => render_picture(env, state, node),
        Content::GraphicFrame(node, graphic) => render_graphic_frame(env, state, node, graphic),
        Content::Group(node) => render_group(env, state, node, group_fill),
    }
}

/// Placeholder counterparts; only slide shapes inherit.
fn placeholders_for<'e>(env: &'e Env<'_>, node: &Node) -> Placeholders<'e> {
    if env.layer == Layer::Slide {
        env.slide.placeholders(node)
    } else {
        Placeholders::default()
    }
}

/// The transform element of a shape, whatever its kind.
fn xfrm_of(node: &Node) -> Option<&Node> {
    node.get(&["p:spPr", "a:xfrm"])
        .or_else(|| node.child("p:xfrm"))
        .filter(|x| Transform::is_declared(x))
}

/// Position of a shape, inherited from its placeholders when not declared.
fn shape_transform(env: &Env<'_>, node: &Node, placeholders: &Placeholders<'_>) -> Transform {
    xfrm_of(node)
        .or_else(|| placeholders.layout.and_then(xfrm_of))
        .or_else(|| placeholders.master.and_then(xfrm_of))
        .map(|x| Transform::from_xfrm(x, env.options.slide_factor))
        .unwrap_or_default()
}

/// Opening tag of a positioned shape box.
fn open_box(state: &mut RenderState, css: &str, node: &Node) -> String {
    let id = non_visual_props(node)
        .and_then(|p| p.attr("id"))
        .map(|id| format!(" data-shape-id=\"{}\"", escape_html(id)))
        .unwrap_or_default();
    format!("<div{}{}>", state.styles.class_attr(css), id)
}

fn render_shape(
    env: &Env<'_>,
    state: &mut RenderState,
    node: &Node,
    group_fill: Option<&Fill>,
) -> String {
    let cx = env.style();
    let placeholders = placeholders_for(env, node);
    let sp_pr = node.child("p:spPr");
    let style = node.child("p:style");
    let transform = shape_transform(env, node, &placeholders);

    let fill = resolve_fill(sp_pr, style, group_fill, &cx);
    let border = resolve_border(sp_pr.and_then(|p| p.child("a:ln")), style, &cx);

    let mut html = open_box(state, &transform.css(), node);
    html.push_str(&shape_svg(
        state,
        sp_pr,
        &transform,
        &fill,
        border.as_ref(),
        env.options.slide_factor,
    ));

    if let Some(body) = node.child("p:txBody") {
        let kind = if env.layer == Layer::Diagram {
            "diagram".to_string()
        } else {
            env.slide.shape_type(node)
        };
        let frame = TextFrame {
            body,
            kind: &kind,
            placeholders,
            font_ref: style.and_then(|s| s.child("a:fontRef")),
            body_props: None,
            inherited: RunStyle::default(),
        };
        html.push_str(&render_text_body(env, state, &frame));
    }
    html.push_str("</div>");
    html
}

/// SVG outline of a shape; nothing when it is neither filled nor stroked.
fn shape_svg(
    state: &mut RenderState,
    sp_pr: Option<&Node>,
    transform: &Transform,
    fill: &Fill,
    border: Option<&Border>,
    slide_factor: f64,
) -> String {
    if fill.is_none() && border.is_none() {
        return String::new();
    }
    let empty = Node::new("p:spPr");
    let paths = shape_paths(
        sp_pr.unwrap_or(&empty),
        transform.width,
        transform.height,
        slide_factor,
    );

    let id = state.next_id("paint");
    let (paint, mut defs) = fill.svg_paint(&id);
    let mut markers = String::new();
    if let Some(border) = border {
        if let Some(head) = &border.head {
            let marker_id = format!("{}-head", id);
            defs.push_str(&head.svg_marker(&marker_id, &border.color, true));
            markers.push_str(&format!(" marker-start=\"url(#{})\"", marker_id));
        }
        if let Some(tail) = &border.tail {
            let marker_id = format!("{}-tail", id);
            defs.push_str(&tail.svg_marker(&marker_id, &border.color, false));
            markers.push_str(&format!(" marker-end=\"url(#{})\"", marker_id));
        }
    }

    let mut svg = format!(
        "<svg{} width=\"{}\" height=\"{}\">",
        state.styles.class_attr(CANVAS_CSS),
        px(transform.width),
        px(transform.height)
    );
    if !defs.is_empty() {
        svg.push_str("<defs>");
        svg.push_str(&defs);
        svg.push_str("</defs>");
    }
    for path in paths {
        let fill_attr = if path.filled { paint.as_str() } else { "none" };
        let stroke = match border {
            Some(border) if path.stroked => {
                let mut attrs = border.svg_attrs();
                if !path.filled {
                    attrs.push_str(&markers);
                }
                attrs
            }
            _ => " stroke=\"none\"".to_string(),
        };
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\"{}/>",
            path.d, fill_attr, stroke
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn render_picture(env: &Env<'_>, state: &mut RenderState, node: &Node) -> String {
    let cx = env.style();
    let placeholders = placeholders_for(env, node);
    let transform = shape_transform(env, node, &placeholders);

    let mut css = transform.css();
    let ln = node.get(&["p:spPr", "a:ln"]);
    if let Some(border) = ln.and_then(|ln| resolve_border(Some(ln), None, &cx)) {
        css.push_str(&border.css());
        css.push_str("box-sizing:border-box;");
    }
    let mut html = open_box(state, &css, node);

    if let Some(media) = media::render_media(env, state, node) {
        html.push_str(&media);
    } else {
        let uri = node
            .get_attr(&["p:blipFill", "a:blip"], "r:embed")
            .and_then(|id| cx.image_uri(id));
        match uri {
            Some(uri) => {
                let alt = non_visual_props(node)
                    .and_then(|p| p.attr("descr"))
                    .unwrap_or("");
                html.push_str(&format!(
                    "<img{} src=\"{}\" alt=\"{}\">",
                    state.styles.class_attr(IMAGE_CSS),
                    uri,
                    escape_html(alt)
                ));
            }
            None => log::debug!("picture without a resolvable image in {}", env.part.path),
        }
    }
    html.push_str("</div>");
    html
}

fn render_group(
    env: &Env<'_>,
    state: &mut RenderState,
    node: &Node,
    group_fill: Option<&Fill>,
) -> String {
    let cx = env.style();
    let grp_sp_pr = node.child("p:grpSpPr");
    let empty = Node::new("a:xfrm");
    let xfrm = grp_sp_pr.and_then(|p| p.child("a:xfrm")).unwrap_or(&empty);
    let group = GroupTransform::from_xfrm(xfrm, env.options.slide_factor);

    // children without a fill of their own take the nearest group fill
    let fill = grp_sp_pr
        .and_then(|p| explicit_fill(p, &cx))
        .or_else(|| group_fill.cloned());

    let mut html = open_box(state, &group.outer.css(), node);
    html.push_str(&format!(
        "<div{}>",
        state.styles.class_attr(&group.inner_css())
    ));
    html.push_str(&render_tree(env, state, node, fill.as_ref()));
    html.push_str("</div></div>");
    html
}

fn render_graphic_frame(
    env: &Env<'_>,
    state: &mut RenderState,
    node: &Node,
    graphic: Graphic,
) -> String {
    let placeholders = placeholders_for(env, node);
    let transform = shape_transform(env, node, &placeholders);

    let inner = match graphic {
        Graphic::Table => table::render_table(env, state, node),
        Graphic::Chart => chart::render_chart(env, state, node),
        Graphic::Diagram => diagram::render_diagram(env, state, node),
        Graphic::Ole => render_ole(env, state, node),
    };

    let mut html = open_box(state, &transform.css(), node);
    html.push_str(&inner);
    html.push_str("</div>");
    html
}

/// Embedded object: its preview picture, when it has one.
fn render_ole(env: &Env<'_>, state: &mut RenderState, frame: &Node) -> String {
    let Some(data) = frame.get(&["a:graphic", "a:graphicData"]) else {
        return String::new();
    };
    let preview = expand_alternates(data.children())
        .into_iter()
        .find(|n| n.name() == "p:oleObj")
        .and_then(|ole| ole.get_attr(&["p:pic", "p:blipFill", "a:blip"], "r:embed"))
        .and_then(|id| env.style().image_uri(id));

    match preview {
        Some(uri) => format!(
            "<img{} src=\"{}\" alt=\"\">",
            state.styles.class_attr(IMAGE_CSS),
            uri
        ),
        None => {
            log::debug!("embedded object without a preview picture");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert!(matches!(
            Content::classify(&Node::new("p:sp")),
            Some(Content::Shape(_))
        ));
        assert!(matches!(
            Content::classify(&Node::new("p:cxnSp")),
            Some(Content::Connector(_))
        ));
        assert!(Content::classify(&Node::new("p:nvGrpSpPr")).is_none());

        let table = Node::new("p:graphicFrame").with_child(
            Node::new("a:graphic").with_child(
                Node::new("a:graphicData")
                    .with_attr("uri", "http://schemas.openxmlformats.org/drawingml/2006/table")
                    .with_child(Node::new("a:tbl")),
            ),
        );
        assert!(matches!(
            Content::classify(&table),
            Some(Content::GraphicFrame(_, Graphic::Table))
        ));

        let unknown = Node::new("p:graphicFrame").with_child(
            Node::new("a:graphic").with_child(Node::new("a:graphicData").with_attr("uri", "urn:x")),
        );
        assert!(Content::classify(&unknown).is_none());
    }

    #[test]
    fn test_alternate_content_prefers_choice() {
        let tree = Node::new("p:spTree")
            .with_child(Node::new("p:sp"))
            .with_child(
                Node::new("mc:AlternateContent")
                    .with_child(Node::new("mc:Choice").with_child(Node::new("p:graphicFrame")))
                    .with_child(Node::new("mc:Fallback").with_child(Node::new("p:pic"))),
            );
        let names: Vec<&str> = expand_alternates(tree.children())
            .iter()
            .map(|n| n.name())
            .collect();
        assert_eq!(names, vec!["p:sp", "p:graphicFrame"]);
    }

    #[test]
    fn test_alternate_content_falls_back() {
        let tree = Node::new("p:spTree").with_child(
            Node::new("mc:AlternateContent")
                .with_child(Node::new("mc:Choice"))
                .with_child(Node::new("mc:Fallback").with_child(Node::new("p:pic"))),
        );
        let names: Vec<&str> = expand_alternates(tree.children())
            .iter()
            .map(|n| n.name())
            .collect();
        assert_eq!(names, vec!["p:pic"]);
    }

    #[test]
    fn test_shape_svg_skips_invisible_shapes() {
        let mut state = RenderState::new();
        let transform = Transform {
            width: 10.0,
            height: 10.0,
            ..Default::default()
        };
        assert!(shape_svg(&mut state, None, &transform, &Fill::None, None, 1.0).is_empty());

        let svg = shape_svg(
            &mut state,
            None,
            &transform,
            &Fill::Solid(crate::style::Color::from_u32(0xFF0000)),
            None,
            1.0,
        );
        assert!(svg.contains("fill=\"#FF0000\""));
        assert!(svg.contains("stroke=\"none\""));
        assert!(svg.contains("width=\"10\""));
    }
}
