//! SmartArt diagrams.
//!
//! PowerPoint caches the laid-out shapes of a diagram in a drawing part
//! whose elements mirror slide shapes under the `dsp` prefix. The drawing
//! is renamed into the slide vocabulary and rendered like any shape tree,
//! relative to the frame.

use super::render_tree;
use crate::context::PartTree;
use crate::render::{Env, Layer, RenderState};
use crate::xml::Node;
use std::rc::Rc;

/// Locate the drawing part of a diagram frame.
///
/// The data model part names its drawing through `dsp:dataModelExt@relId`
/// (a relationship of the slide); without one the slide's first diagram
/// drawing relationship is used.
fn drawing_part(env: &Env<'_>, frame: &Node) -> Option<String> {
    let data_path = frame
        .get_attr(&["a:graphic", "a:graphicData", "dgm:relIds"], "r:dm")
        .and_then(|id| env.target_path(id));

    if let Some(model) = data_path.and_then(|p| env.package.part(&p)) {
        let drawing_rel = model
            .descendants_named("dsp:dataModelExt")
            .first()
            .and_then(|ext| ext.attr("relId"))
            .map(str::to_string);
        if let Some(path) = drawing_rel.and_then(|id| env.target_path(&id)) {
            return Some(path);
        }
    }
    env.part.related("diagramDrawing")
}

/// Drawing part reinterpreted as slide shapes.
pub fn load_drawing(env: &Env<'_>, frame: &Node) -> Option<PartTree> {
    let path = drawing_part(env, frame)?;
    let drawing = PartTree::load(env.package, &path)?;
    Some(PartTree {
        root: Rc::new(drawing.root.rename_prefix("dsp", "p")),
        ..drawing
    })
}

/// Render the cached shapes of a diagram frame.
pub fn render_diagram(env: &Env<'_>, state: &mut RenderState, frame: &Node) -> String {
    let Some(drawing) = load_drawing(env, frame) else {
        log::debug!("diagram without a drawing part in {}", env.part.path);
        return String::new();
    };
    let Some(tree) = drawing.root.child("p:spTree") else {
        return String::new();
    };

    let diagram_env = Env::new(
        env.package,
        env.options,
        env.presentation,
        env.slide,
        &drawing,
        Layer::Diagram,
    );
    render_tree(&diagram_env, state, tree, None)
}
