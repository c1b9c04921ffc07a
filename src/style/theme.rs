//! Theme part access and the per-slide scheme palette.

use super::color::{system_color, Color};
use crate::xml::Node;
use std::collections::HashMap;
use std::rc::Rc;

/// Scheme names that go through the color map.
const MAPPED_NAMES: [&str; 4] = ["bg1", "tx1", "bg2", "tx2"];

/// Color map used when neither slide, layout nor master define one.
const DEFAULT_COLOR_MAP: [(&str, &str); 4] =
    [("bg1", "lt1"), ("tx1", "dk1"), ("bg2", "lt2"), ("tx2", "dk2")];

const SCHEME_SLOTS: [&str; 12] = [
    "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5",
    "accent6", "hlink", "folHlink",
];

/// Latin typeface used when the theme defines none.
pub const DEFAULT_MINOR_FONT: &str = "Calibri";
/// Heading typeface used when the theme defines none.
pub const DEFAULT_MAJOR_FONT: &str = "Calibri Light";

/// Office default scheme colors, used when a package ships no theme.
pub fn default_scheme_color(slot: &str) -> Option<Color> {
    let value = match slot {
        "dk1" => 0x000000,
        "lt1" => 0xFFFFFF,
        "dk2" => 0x44546A,
        "lt2" => 0xE7E6E6,
        "accent1" => 0x4472C4,
        "accent2" => 0xED7D31,
        "accent3" => 0xA5A5A5,
        "accent4" => 0xFFC000,
        "accent5" => 0x5B9BD5,
        "accent6" => 0x70AD47,
        "hlink" => 0x0563C1,
        "folHlink" => 0x954F72,
        _ => return None,
    };
    Some(Color::from_u32(value))
}

/// A theme part (`ppt/theme/themeN.xml`), possibly absent.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    root: Option<Rc<Node>>,
}

impl Theme {
    pub fn new(root: Option<Rc<Node>>) -> Self {
        Self { root }
    }

    /// Whether the package actually provided a theme part.
    pub fn is_present(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    fn elements(&self) -> Option<&Node> {
        self.root()?.child("a:themeElements")
    }

    /// Colors declared by `a:clrScheme`.
    pub fn scheme_colors(&self) -> HashMap<String, Color> {
        let mut colors = HashMap::new();
        let Some(scheme) = self.elements().and_then(|e| e.child("a:clrScheme")) else {
            return colors;
        };

        for slot in SCHEME_SLOTS {
            let Some(entry) = scheme.child(&format!("a:{}", slot)) else {
                continue;
            };
            let color = if let Some(srgb) = entry.child("a:srgbClr") {
                srgb.attr("val").and_then(Color::from_hex)
            } else if let Some(sys) = entry.child("a:sysClr") {
                sys.attr("lastClr")
                    .and_then(Color::from_hex)
                    .or_else(|| sys.attr("val").and_then(system_color))
            } else {
                None
            };
            if let Some(color) = color {
                colors.insert(slot.to_string(), color);
            }
        }
        colors
    }

    /// Heading (`major`) or body (`minor`) latin typeface.
    fn font_scheme_face(&self, kind: &str) -> Option<&str> {
        self.elements()?
            .get(&["a:fontScheme", kind, "a:latin"])?
            .attr("typeface")
            .filter(|t| !t.is_empty())
    }

    pub fn major_font(&self) -> &str {
        self.font_scheme_face("a:majorFont")
            .unwrap_or(DEFAULT_MAJOR_FONT)
    }

    pub fn minor_font(&self) -> &str {
        self.font_scheme_face("a:minorFont")
            .unwrap_or(DEFAULT_MINOR_FONT)
    }

    /// Resolve a typeface reference: `+mj-*` and `+mn-*` point at the theme
    /// font scheme, anything else is a literal family name.
    pub fn typeface<'a>(&'a self, face: &'a str) -> &'a str {
        if face.starts_with("+mj") {
            self.major_font()
        } else if face.starts_with("+mn") {
            self.minor_font()
        } else {
            face
        }
    }

    fn format_list(&self, list: &str) -> Option<&Node> {
        self.elements()?.get(&["a:fmtScheme", list])
    }

    /// Entry of `a:fillStyleLst` for a 1-based `fillRef` index.
    pub fn fill_style(&self, idx: usize) -> Option<&Node> {
        let list = self.format_list("a:fillStyleLst")?;
        list.children().get(idx.checked_sub(1)?)
    }

    /// Entry of `a:lnStyleLst` for a 1-based `lnRef` index.
    pub fn line_style(&self, idx: usize) -> Option<&Node> {
        let list = self.format_list("a:lnStyleLst")?;
        list.children_named("a:ln").nth(idx.checked_sub(1)?)
    }

    /// Entry of `a:bgFillStyleLst` for a `bgRef` index (1001-based).
    pub fn background_fill_style(&self, idx: usize) -> Option<&Node> {
        let list = self.format_list("a:bgFillStyleLst")?;
        list.children().get(idx.checked_sub(1001)?)
    }
}

/// Theme colors plus the color map in effect for one slide.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: HashMap<String, Color>,
    map: HashMap<String, String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(None, None, &[])
    }
}

impl Palette {
    /// Build a palette.
    ///
    /// `overrides` are `p:clrMapOvr` elements in precedence order (slide,
    /// then layout); the first one carrying `a:overrideClrMapping` wins over
    /// the master's `p:clrMap`.
    pub fn new(theme: Option<&Theme>, master_map: Option<&Node>, overrides: &[Option<&Node>]) -> Self {
        let colors = theme.map(Theme::scheme_colors).unwrap_or_default();

        let mapping = overrides
            .iter()
            .flatten()
            .find_map(|ovr| ovr.child("a:overrideClrMapping"))
            .or(master_map);

        let mut map: HashMap<String, String> = DEFAULT_COLOR_MAP
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(mapping) = mapping {
            for name in MAPPED_NAMES {
                if let Some(target) = mapping.attr(name) {
                    map.insert(name.to_string(), target.to_string());
                }
            }
        }

        Self { colors, map }
    }

    /// Theme slot a scheme name refers to (one hop through the color map).
    pub fn slot<'a>(&'a self, name: &'a str) -> &'a str {
        if MAPPED_NAMES.contains(&name) {
            self.map.get(name).map(String::as_str).unwrap_or(name)
        } else {
            name
        }
    }

    /// Resolve a scheme color name to a concrete color.
    pub fn scheme(&self, name: &str) -> Color {
        let slot = self.slot(name);
        match self.colors.get(slot).copied().or_else(|| default_scheme_color(slot)) {
            Some(color) => color,
            None => {
                log::debug!("unknown scheme color {}", name);
                Color::BLACK
            }
        }
    }
}
