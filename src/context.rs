//! Per-slide inheritance chain.
//!
//! A [`SlideContext`] ties a slide part to its layout, master and theme,
//! indexes the placeholder shapes of the layout and master, and builds the
//! color palette in effect for the slide. Layout and master parts are
//! indexed once per conversion and shared between slides.

use crate::container::{OoxmlContainer, Relationships};
use crate::style::{ImageSource, Palette, Theme};
use crate::xml::Node;
use std::collections::HashMap;
use std::rc::Rc;

/// A parsed part with its relationships.
#[derive(Debug, Clone)]
pub struct PartTree {
    pub path: String,
    pub root: Rc<Node>,
    pub rels: Rc<Relationships>,
}

impl PartTree {
    /// Load a part; `None` when it is absent or malformed.
    pub fn load(package: &OoxmlContainer, path: &str) -> Option<Self> {
        Some(Self {
            path: path.to_string(),
            root: package.part(path)?,
            rels: package.relationships(path),
        })
    }

    /// `p:cSld/p:spTree` of a slide, layout or master.
    pub fn shape_tree(&self) -> Option<&Node> {
        self.root.get(&["p:cSld", "p:spTree"])
    }

    /// Part path of the first relationship of a type (by URI suffix).
    pub fn related(&self, type_suffix: &str) -> Option<String> {
        let rel = *self.rels.get_by_type_suffix(type_suffix).first()?;
        self.rels.target_path(&rel.id)
    }
}

/// Placeholder properties (`p:nvPr/p:ph`) of a shape node, whatever its kind.
pub fn placeholder_of(shape: &Node) -> Option<&Node> {
    ["p:nvSpPr", "p:nvPicPr", "p:nvGraphicFramePr", "p:nvGrpSpPr", "p:nvCxnSpPr"]
        .into_iter()
        .find_map(|nv| shape.get(&[nv, "p:nvPr", "p:ph"]))
}

/// `p:cNvPr` of a shape node, whatever its kind.
pub fn non_visual_props(shape: &Node) -> Option<&Node> {
    ["p:nvSpPr", "p:nvPicPr", "p:nvGraphicFramePr", "p:nvGrpSpPr", "p:nvCxnSpPr"]
        .into_iter()
        .find_map(|nv| shape.get(&[nv, "p:cNvPr"]))
}

/// Shapes of a layout or master indexed by id, placeholder index and type.
#[derive(Debug, Default)]
pub struct ShapeIndex {
    by_id: HashMap<String, Rc<Node>>,
    by_idx: HashMap<String, Rc<Node>>,
    by_type: HashMap<String, Rc<Node>>,
}

impl ShapeIndex {
    /// Index the top-level shapes of a shape tree. The first shape wins when
    /// keys repeat.
    pub fn build(tree: Option<&Node>) -> Self {
        let mut index = Self::default();
        let Some(tree) = tree else {
            return index;
        };

        for shape in tree.children() {
            let shared = Rc::new(shape.clone());
            if let Some(id) = non_visual_props(shape).and_then(|p| p.attr("id")) {
                index
                    .by_id
                    .entry(id.to_string())
                    .or_insert_with(|| Rc::clone(&shared));
            }
            if let Some(ph) = placeholder_of(shape) {
                if let Some(idx) = ph.attr("idx") {
                    index
                        .by_idx
                        .entry(idx.to_string())
                        .or_insert_with(|| Rc::clone(&shared));
                }
                if let Some(kind) = ph.attr("type") {
                    index
                        .by_type
                        .entry(kind.to_string())
                        .or_insert_with(|| Rc::clone(&shared));
                }
            }
        }
        index
    }

    pub fn by_id(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|n| n.as_ref())
    }

    pub fn by_idx(&self, idx: &str) -> Option<&Node> {
        self.by_idx.get(idx).map(|n| n.as_ref())
    }

    pub fn by_type(&self, kind: &str) -> Option<&Node> {
        self.by_type.get(kind).map(|n| n.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_idx.is_empty() && self.by_type.is_empty()
    }
}

/// A layout or master part with its shape index.
#[derive(Debug)]
pub struct IndexedPart {
    pub tree: PartTree,
    pub index: ShapeIndex,
}

impl IndexedPart {
    fn new(tree: PartTree) -> Self {
        let index = ShapeIndex::build(tree.shape_tree());
        Self { tree, index }
    }
}

/// Text style family on the master that supplies a shape's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFamily {
    /// `p:titleStyle`
    Title,
    /// `p:bodyStyle`
    Body,
    /// `p:otherStyle`
    Other,
    /// Presentation `p:defaultTextStyle`
    Default,
}

impl TextFamily {
    /// Family for a resolved shape type.
    pub fn for_type(kind: &str) -> Self {
        match kind {
            "title" | "ctrTitle" => TextFamily::Title,
            "body" | "obj" | "subTitle" => TextFamily::Body,
            "textBox" => TextFamily::Default,
            _ => TextFamily::Other,
        }
    }

    fn element(&self) -> Option<&'static str> {
        match self {
            TextFamily::Title => Some("p:titleStyle"),
            TextFamily::Body => Some("p:bodyStyle"),
            TextFamily::Other => Some("p:otherStyle"),
            TextFamily::Default => None,
        }
    }
}

/// Everything needed to resolve inherited properties of one slide.
#[derive(Debug)]
pub struct SlideContext {
    /// 1-based slide number
    pub number: u32,
    pub slide: PartTree,
    pub layout: Option<Rc<IndexedPart>>,
    pub master: Option<Rc<IndexedPart>>,
    pub theme: Rc<Theme>,
    pub palette: Palette,
}

/// Placeholder counterparts of a slide shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholders<'a> {
    pub layout: Option<&'a Node>,
    pub master: Option<&'a Node>,
}

impl SlideContext {
    /// Resolve the type of a shape.
    ///
    /// Explicit placeholder type, then the text box flag, then the type of
    /// the matching layout placeholder (by index, then id), then of the
    /// matching master placeholder, then `obj`.
    pub fn shape_type(&self, shape: &Node) -> String {
        let ph = placeholder_of(shape);
        if let Some(kind) = ph.and_then(|p| p.attr("type")) {
            return kind.to_string();
        }
        if shape
            .get(&["p:nvSpPr", "p:cNvSpPr"])
            .and_then(|c| c.attr_bool("txBox"))
            .unwrap_or(false)
        {
            return "textBox".to_string();
        }
        if let Some(ph) = ph {
            let id = non_visual_props(shape).and_then(|p| p.attr("id"));
            for part in [&self.layout, &self.master].into_iter().flatten() {
                let matched = ph
                    .attr("idx")
                    .and_then(|idx| part.index.by_idx(idx))
                    .or_else(|| id.and_then(|id| part.index.by_id(id)));
                if let Some(kind) = matched
                    .and_then(placeholder_of)
                    .and_then(|p| p.attr("type"))
                {
                    return kind.to_string();
                }
            }
        }
        "obj".to_string()
    }

    /// Layout and master shapes a slide shape inherits from.
    pub fn placeholders(&self, shape: &Node) -> Placeholders<'_> {
        let Some(ph) = placeholder_of(shape) else {
            return Placeholders::default();
        };
        let idx = ph.attr("idx");
        let kind = ph.attr("type");

        let layout = self.layout.as_deref().and_then(|l| {
            idx.and_then(|i| l.index.by_idx(i))
                .or_else(|| kind.and_then(|k| l.index.by_type(k)))
        });

        let master_kind = match kind.unwrap_or("body") {
            "ctrTitle" => "title",
            "subTitle" | "obj" => "body",
            other => other,
        };
        let master = self.master.as_deref().and_then(|m| {
            m.index
                .by_type(master_kind)
                .or_else(|| idx.and_then(|i| m.index.by_idx(i)))
        });

        Placeholders { layout, master }
    }

    /// Master text style for a family (`p:txStyles/...`).
    pub fn master_text_style(&self, family: TextFamily) -> Option<&Node> {
        let element = family.element()?;
        self.master
            .as_deref()?
            .tree
            .root
            .get(&["p:txStyles", element])
    }
}

/// Builds slide contexts, sharing layouts, masters and themes between slides.
pub struct ContextBuilder<'p> {
    package: &'p OoxmlContainer,
    parts: HashMap<String, Rc<IndexedPart>>,
    themes: HashMap<String, Rc<Theme>>,
}

impl<'p> ContextBuilder<'p> {
    pub fn new(package: &'p OoxmlContainer) -> Self {
        Self {
            package,
            parts: HashMap::new(),
            themes: HashMap::new(),
        }
    }

    fn indexed(&mut self, path: &str) -> Option<Rc<IndexedPart>> {
        if let Some(part) = self.parts.get(path) {
            return Some(Rc::clone(part));
        }
        let part = Rc::new(IndexedPart::new(PartTree::load(self.package, path)?));
        self.parts.insert(path.to_string(), Rc::clone(&part));
        Some(part)
    }

    fn theme(&mut self, path: Option<String>) -> Rc<Theme> {
        let Some(path) = path else {
            log::debug!("master has no theme relationship, using defaults");
            return Rc::new(Theme::default());
        };
        if let Some(theme) = self.themes.get(&path) {
            return Rc::clone(theme);
        }
        let theme = Rc::new(Theme::new(self.package.part(&path)));
        if !theme.is_present() {
            log::debug!("theme part {} is missing, using defaults", path);
        }
        self.themes.insert(path, Rc::clone(&theme));
        theme
    }

    /// Build the context of one slide; `None` when the slide part is absent.
    pub fn build(&mut self, number: u32, slide_path: &str) -> Option<SlideContext> {
        let slide = PartTree::load(self.package, slide_path)?;

        let layout = slide
            .related("slideLayout")
            .and_then(|path| self.indexed(&path));
        let master = layout
            .as_ref()
            .and_then(|l| l.tree.related("slideMaster"))
            .and_then(|path| self.indexed(&path));
        let theme = self.theme(master.as_ref().and_then(|m| m.tree.related("theme")));

        let palette = Palette::new(
            Some(&theme),
            master.as_ref().and_then(|m| m.tree.root.child("p:clrMap")),
            &[
                slide.root.child("p:clrMapOvr"),
                layout.as_ref().and_then(|l| l.tree.root.child("p:clrMapOvr")),
            ],
        );

        Some(SlideContext {
            number,
            slide,
            layout,
            master,
            theme,
            palette,
        })
    }
}

/// Image lookup through the relationships of one part.
pub struct PartImages<'a> {
    pub package: &'a OoxmlContainer,
    pub rels: &'a Relationships,
}

impl ImageSource for PartImages<'_> {
    fn image_uri(&self, rel_id: &str) -> Option<Rc<str>> {
        let path = self.rels.target_path(rel_id)?;
        self.package.data_uri(&path)
    }
}
