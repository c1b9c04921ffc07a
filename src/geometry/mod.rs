//! Geometry: EMU conversion, shape transforms and SVG path generation.

pub mod custom;
pub mod preset;

use crate::style::px;
use crate::xml::Node;

/// DrawingML angles are expressed in 60000ths of a degree.
pub const ANGLE_SCALE: f64 = 60000.0;

/// Convert EMU to device units.
pub fn emu_to_px(emu: f64, slide_factor: f64) -> f64 {
    emu * slide_factor
}

/// Convert device units back to EMU.
pub fn px_to_emu(px: f64, slide_factor: f64) -> f64 {
    px / slide_factor
}

/// Position, size, rotation and flips of one shape, in device units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees
    pub rotation: f64,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Transform {
    /// Read an `a:xfrm`/`p:xfrm` element.
    pub fn from_xfrm(xfrm: &Node, slide_factor: f64) -> Self {
        let off = xfrm.child("a:off");
        let ext = xfrm.child("a:ext");
        let coord = |node: Option<&Node>, key: &str| {
            node.and_then(|n| n.attr_f64(key)).unwrap_or(0.0) * slide_factor
        };
        Self {
            x: coord(off, "x"),
            y: coord(off, "y"),
            width: coord(ext, "cx"),
            height: coord(ext, "cy"),
            rotation: xfrm.attr_f64("rot").unwrap_or(0.0) / ANGLE_SCALE,
            flip_h: xfrm.attr_bool("flipH").unwrap_or(false),
            flip_v: xfrm.attr_bool("flipV").unwrap_or(false),
        }
    }

    /// Whether any offset or extent is present on the element.
    pub fn is_declared(xfrm: &Node) -> bool {
        xfrm.has("a:off") || xfrm.has("a:ext")
    }

    /// CSS transform value for rotation and flips, if any.
    pub fn css_transform(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.rotation != 0.0 {
            parts.push(format!("rotate({}deg)", px(self.rotation)));
        }
        match (self.flip_h, self.flip_v) {
            (true, true) => parts.push("scale(-1,-1)".to_string()),
            (true, false) => parts.push("scale(-1,1)".to_string()),
            (false, true) => parts.push("scale(1,-1)".to_string()),
            (false, false) => {}
        }
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Absolute positioning declarations for a shape box.
    pub fn css(&self) -> String {
        let mut css = format!(
            "position:absolute;top:{}px;left:{}px;width:{}px;height:{}px;",
            px(self.y),
            px(self.x),
            px(self.width),
            px(self.height)
        );
        if let Some(transform) = self.css_transform() {
            css.push_str(&format!("transform:{};", transform));
        }
        css
    }
}

/// Transform of a group shape (`p:grpSpPr/a:xfrm`).
///
/// Children are positioned in the group's child coordinate space
/// (`a:chOff`/`a:chExt`), which is mapped onto the group's own box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTransform {
    pub outer: Transform,
    pub child_x: f64,
    pub child_y: f64,
    pub child_width: f64,
    pub child_height: f64,
}

impl GroupTransform {
    pub fn from_xfrm(xfrm: &Node, slide_factor: f64) -> Self {
        let outer = Transform::from_xfrm(xfrm, slide_factor);
        let ch_off = xfrm.child("a:chOff");
        let ch_ext = xfrm.child("a:chExt");
        let coord = |node: Option<&Node>, key: &str, default: f64| {
            node.and_then(|n| n.attr_f64(key))
                .map(|v| v * slide_factor)
                .unwrap_or(default)
        };
        Self {
            outer,
            child_x: coord(ch_off, "x", outer.x),
            child_y: coord(ch_off, "y", outer.y),
            child_width: coord(ch_ext, "cx", outer.width),
            child_height: coord(ch_ext, "cy", outer.height),
        }
    }

    /// Horizontal and vertical scale from child space to the group box.
    pub fn scale(&self) -> (f64, f64) {
        let sx = if self.child_width > 0.0 {
            self.outer.width / self.child_width
        } else {
            1.0
        };
        let sy = if self.child_height > 0.0 {
            self.outer.height / self.child_height
        } else {
            1.0
        };
        (sx, sy)
    }

    /// Declarations for the inner box that holds the children.
    ///
    /// The translation is applied first, then the scale.
    pub fn inner_css(&self) -> String {
        let (sx, sy) = self.scale();
        format!(
            "position:absolute;top:0px;left:0px;width:{}px;height:{}px;transform-origin:0 0;transform:scale({},{}) translate({}px,{}px);",
            px(self.child_width),
            px(self.child_height),
            round4(sx),
            round4(sy),
            px(-self.child_x),
            px(-self.child_y)
        )
    }

    /// Map a point from child space into the group's parent space.
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        let (sx, sy) = self.scale();
        (
            self.outer.x + (x - self.child_x) * sx,
            self.outer.y + (y - self.child_y) * sy,
        )
    }
}

fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

/// One SVG path of a shape outline.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePath {
    /// SVG path data in device units relative to the shape box
    pub d: String,
    /// Whether the path is painted with the shape fill
    pub filled: bool,
    /// Whether the path is stroked with the shape outline
    pub stroked: bool,
}

impl ShapePath {
    pub fn closed(d: String) -> Self {
        Self {
            d,
            filled: true,
            stroked: true,
        }
    }

    pub fn open(d: String) -> Self {
        Self {
            d,
            filled: false,
            stroked: true,
        }
    }
}

/// Outline paths of a shape from its `p:spPr`, in device units.
pub fn shape_paths(sp_pr: &Node, width: f64, height: f64, slide_factor: f64) -> Vec<ShapePath> {
    if let Some(cust) = sp_pr.child("a:custGeom") {
        let paths = custom::custom_paths(cust, width, height, slide_factor);
        if !paths.is_empty() {
            return paths;
        }
    }

    let (name, adjust) = match sp_pr.child("a:prstGeom") {
        Some(prst) => (
            prst.attr("prst").unwrap_or("rect"),
            preset::Adjustments::from_geometry(prst),
        ),
        None => ("rect", preset::Adjustments::default()),
    };
    vec![preset::preset_path(name, width, height, &adjust)]
}
