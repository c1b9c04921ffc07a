//! DrawingML color model.
//!
//! A color element (`a:srgbClr`, `a:schemeClr`, `a:scrgbClr`, `a:hslClr`,
//! `a:prstClr`, `a:sysClr`) yields a base color which is then passed through
//! its percentage-encoded child operators in a fixed order.

use super::theme::Palette;
use crate::xml::Node;

/// Child elements that carry a color value.
pub const COLOR_ELEMENTS: [&str; 6] = [
    "a:srgbClr",
    "a:schemeClr",
    "a:scrgbClr",
    "a:hslClr",
    "a:prstClr",
    "a:sysClr",
];

/// Operators applied to a base color, in application order.
const TRANSFORM_ORDER: [&str; 7] = [
    "a:alpha", "a:hueMod", "a:lumMod", "a:lumOff", "a:satMod", "a:shade", "a:tint",
];

/// Scale of percentage values in DrawingML (100000 = 100%).
pub const PERCENT_SCALE: f64 = 100000.0;

/// An RGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`
    pub a: f64,
}

/// Hue (degrees), saturation and lightness (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub const fn from_u32(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parse `RRGGBB` (optionally prefixed with `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Same color with a different opacity.
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Upper-case `RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS color value: `#RRGGBB` when opaque, `rgba(...)` otherwise.
    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{}", self.to_hex())
        } else {
            format!(
                "rgba({},{},{},{})",
                self.r,
                self.g,
                self.b,
                (self.a * 1000.0).round() / 1000.0
            )
        }
    }

    /// Convert to HSL.
    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f64::EPSILON {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }

    /// Build from HSL with the given opacity.
    pub fn from_hsl(hsl: Hsl, a: f64) -> Self {
        let h = hsl.h.rem_euclid(360.0) / 360.0;
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a,
        }
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Percentage operand of a transform element (`val` / 100000).
fn percent(node: &Node) -> Option<f64> {
    node.attr_f64("val").map(|v| v / PERCENT_SCALE)
}

/// Apply the `alpha, hueMod, lumMod, lumOff, satMod, shade, tint` children of
/// `element`, each at most once and in that order.
pub fn apply_transforms(color: Color, element: &Node) -> Color {
    let mut color = color;
    for op in TRANSFORM_ORDER {
        if let Some(p) = element.child(op).and_then(percent) {
            color = apply_transform(color, op, p);
        }
    }
    color
}

/// Apply a single transform operator with its percentage operand.
pub fn apply_transform(color: Color, op: &str, p: f64) -> Color {
    if op == "a:alpha" {
        return color.with_alpha(p);
    }

    let mut hsl = color.to_hsl();
    match op {
        "a:hueMod" => hsl.h = (hsl.h * p).rem_euclid(360.0),
        "a:lumMod" => hsl.l = (hsl.l * p).clamp(0.0, 1.0),
        "a:lumOff" => hsl.l = (hsl.l + p).clamp(0.0, 1.0),
        "a:satMod" => hsl.s = (hsl.s * p).clamp(0.0, 1.0),
        "a:shade" => hsl.l = (hsl.l * p).clamp(0.0, 1.0),
        "a:tint" => {
            let p = p.clamp(0.0, 1.0);
            hsl.l = (hsl.l * p + (1.0 - p)).clamp(0.0, 1.0);
        }
        _ => return color,
    }
    Color::from_hsl(hsl, color.a)
}

/// Resolve the first color element among the children of `parent`.
///
/// `placeholder` is the color substituted for `phClr`, i.e. the color of the
/// style reference currently being applied.
pub fn color_from_children(
    parent: &Node,
    palette: &Palette,
    placeholder: Option<Color>,
) -> Option<Color> {
    let element = parent
        .children()
        .iter()
        .find(|c| COLOR_ELEMENTS.contains(&c.name()))?;
    resolve_color_element(element, palette, placeholder)
}

/// Resolve one color element (base color plus transforms).
pub fn resolve_color_element(
    element: &Node,
    palette: &Palette,
    placeholder: Option<Color>,
) -> Option<Color> {
    let base = match element.name() {
        "a:srgbClr" => element.attr("val").and_then(Color::from_hex),
        "a:schemeClr" => {
            let name = element.attr("val")?;
            if name == "phClr" {
                Some(placeholder.unwrap_or(Color::BLACK))
            } else {
                Some(palette.scheme(name))
            }
        }
        "a:scrgbClr" => {
            let pct = |key: &str| element.attr_f64(key).map(|v| channel(v / PERCENT_SCALE));
            Some(Color::rgb(pct("r")?, pct("g")?, pct("b")?))
        }
        "a:hslClr" => {
            let h = element.attr_f64("hue")? / 60000.0;
            let s = element.attr_f64("sat")? / PERCENT_SCALE;
            let l = element.attr_f64("lum")? / PERCENT_SCALE;
            Some(Color::from_hsl(Hsl { h, s, l }, 1.0))
        }
        "a:prstClr" => element.attr("val").and_then(preset_color),
        "a:sysClr" => element
            .attr("lastClr")
            .and_then(Color::from_hex)
            .or_else(|| element.attr("val").and_then(system_color)),
        _ => None,
    };

    match base {
        Some(color) => Some(apply_transforms(color, element)),
        None => {
            log::debug!("unresolvable color element {}", element.name());
            None
        }
    }
}

/// Colors for `a:sysClr` values without a cached `lastClr`.
pub fn system_color(name: &str) -> Option<Color> {
    let value = match name {
        "windowText" | "btnText" | "menuText" | "captionText" | "infoText" => 0x000000,
        "window" | "menu" | "highlightText" | "btnHighlight" => 0xFFFFFF,
        "btnFace" | "3dLight" | "menuBar" => 0xF0F0F0,
        "btnShadow" | "3dDkShadow" => 0xA0A0A0,
        "highlight" | "hotLight" => 0x3399FF,
        "grayText" => 0x6D6D6D,
        "activeCaption" => 0x99B4D1,
        "inactiveCaption" => 0xBFCDDB,
        "inactiveCaptionText" => 0x434E54,
        "infoBk" => 0xFFFFE1,
        "appWorkspace" => 0xABABAB,
        "background" => 0x000000,
        "activeBorder" => 0xB4B4B4,
        "inactiveBorder" => 0xF4F7FC,
        "windowFrame" => 0x646464,
        "scrollBar" => 0xC8C8C8,
        "gradientActiveCaption" => 0xB9D1EA,
        "gradientInactiveCaption" => 0xD7E4F2,
        "menuHighlight" => 0x3399FF,
        _ => return None,
    };
    Some(Color::from_u32(value))
}

/// Colors for `a:prstClr` names.
///
/// DrawingML abbreviates `dark`, `light` and `medium` as `dk`, `lt` and
/// `med`; names are matched case-insensitively after expansion.
pub fn preset_color(name: &str) -> Option<Color> {
    let lower = name.to_ascii_lowercase();
    let expanded = if let Some(rest) = lower.strip_prefix("dk") {
        format!("dark{}", rest)
    } else if let Some(rest) = lower.strip_prefix("lt") {
        format!("light{}", rest)
    } else if let Some(rest) = lower.strip_prefix("med") {
        if rest.starts_with("ium") {
            lower.clone()
        } else {
            format!("medium{}", rest)
        }
    } else {
        lower
    };

    PRESET_COLORS
        .iter()
        .find(|(n, _)| *n == expanded)
        .map(|(_, v)| Color::from_u32(*v))
}

const PRESET_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF), ("antiquewhite", 0xFAEBD7), ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4), ("azure", 0xF0FFFF), ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4), ("black", 0x000000), ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF), ("blueviolet", 0x8A2BE2), ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887), ("cadetblue", 0x5F9EA0), ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E), ("coral", 0xFF7F50), ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC), ("crimson", 0xDC143C), ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B), ("darkcyan", 0x008B8B), ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9), ("darkgrey", 0xA9A9A9), ("darkgreen", 0x006400),
    ("darkkhaki", 0xBDB76B), ("darkmagenta", 0x8B008B), ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00), ("darkorchid", 0x9932CC), ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A), ("darkseagreen", 0x8FBC8F), ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F), ("darkslategrey", 0x2F4F4F), ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3), ("deeppink", 0xFF1493), ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969), ("dimgrey", 0x696969), ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222), ("floralwhite", 0xFFFAF0), ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF), ("gainsboro", 0xDCDCDC), ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700), ("goldenrod", 0xDAA520), ("gray", 0x808080),
    ("grey", 0x808080), ("green", 0x008000), ("greenyellow", 0xADFF2F),
    ("honeydew", 0xF0FFF0), ("hotpink", 0xFF69B4), ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082), ("ivory", 0xFFFFF0), ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA), ("lavenderblush", 0xFFF0F5), ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD), ("lightblue", 0xADD8E6), ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF), ("lightgoldenrodyellow", 0xFAFAD2), ("lightgray", 0xD3D3D3),
    ("lightgrey", 0xD3D3D3), ("lightgreen", 0x90EE90), ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A), ("lightseagreen", 0x20B2AA), ("lightskyblue", 0x87CEFA),
    ("lightslategray", 0x778899), ("lightslategrey", 0x778899), ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0), ("lime", 0x00FF00), ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6), ("magenta", 0xFF00FF), ("maroon", 0x800000),
    ("mediumaquamarine", 0x66CDAA), ("mediumblue", 0x0000CD), ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB), ("mediumseagreen", 0x3CB371), ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A), ("mediumturquoise", 0x48D1CC), ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970), ("mintcream", 0xF5FFFA), ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5), ("navajowhite", 0xFFDEAD), ("navy", 0x000080),
    ("oldlace", 0xFDF5E6), ("olive", 0x808000), ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500), ("orangered", 0xFF4500), ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA), ("palegreen", 0x98FB98), ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093), ("papayawhip", 0xFFEFD5), ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F), ("pink", 0xFFC0CB), ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6), ("purple", 0x800080), ("rebeccapurple", 0x663399),
    ("red", 0xFF0000), ("rosybrown", 0xBC8F8F), ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513), ("salmon", 0xFA8072), ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57), ("seashell", 0xFFF5EE), ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0), ("skyblue", 0x87CEEB), ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090), ("slategrey", 0x708090), ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F), ("steelblue", 0x4682B4), ("tan", 0xD2B48C),
    ("teal", 0x008080), ("thistle", 0xD8BFD8), ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0), ("violet", 0xEE82EE), ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF), ("whitesmoke", 0xF5F5F5), ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];
