//! Custom geometry (`a:custGeom`) to SVG path data.

use super::{ShapePath, ANGLE_SCALE};
use crate::style::px;
use crate::xml::Node;

/// Scales path-space coordinates into the shape box.
struct PathSpace {
    sx: f64,
    sy: f64,
    /// Path width and height in path units, for builtin guide names
    w: f64,
    h: f64,
}

impl PathSpace {
    fn new(path: &Node, width: f64, height: f64, slide_factor: f64) -> Self {
        let pw = path.attr_f64("w").filter(|v| *v > 0.0);
        let ph = path.attr_f64("h").filter(|v| *v > 0.0);
        Self {
            sx: pw.map(|pw| width / pw).unwrap_or(slide_factor),
            sy: ph.map(|ph| height / ph).unwrap_or(slide_factor),
            w: pw.unwrap_or(width / slide_factor),
            h: ph.unwrap_or(height / slide_factor),
        }
    }

    /// Value of a coordinate attribute: a number or a builtin guide name.
    fn value(&self, raw: &str) -> Option<f64> {
        if let Ok(v) = raw.trim().parse::<f64>() {
            return Some(v);
        }
        let v = match raw {
            "l" | "t" => 0.0,
            "r" | "w" => self.w,
            "b" | "h" => self.h,
            "hc" | "wd2" => self.w / 2.0,
            "vc" | "hd2" => self.h / 2.0,
            "wd4" => self.w / 4.0,
            "hd4" => self.h / 4.0,
            "wd3" => self.w / 3.0,
            "hd3" => self.h / 3.0,
            "ss" => self.w.min(self.h),
            "ls" => self.w.max(self.h),
            _ => {
                log::debug!("custom geometry guide {} not supported", raw);
                return None;
            }
        };
        Some(v)
    }

    fn point(&self, pt: &Node) -> Option<(f64, f64)> {
        let x = self.value(pt.attr("x")?)?;
        let y = self.value(pt.attr("y")?)?;
        Some((x * self.sx, y * self.sy))
    }
}

fn fmt_point((x, y): (f64, f64)) -> String {
    format!("{},{}", px(x), px(y))
}

/// Convert one `a:path` element.
fn convert_path(path: &Node, width: f64, height: f64, slide_factor: f64) -> Option<ShapePath> {
    let space = PathSpace::new(path, width, height, slide_factor);
    let mut d: Vec<String> = Vec::new();
    let mut current = (0.0, 0.0);
    let mut closed = false;

    for cmd in path.children() {
        match cmd.name() {
            "a:moveTo" => {
                if let Some(p) = cmd.child("a:pt").and_then(|pt| space.point(pt)) {
                    d.push(format!("M{}", fmt_point(p)));
                    current = p;
                }
            }
            "a:lnTo" => {
                if let Some(p) = cmd.child("a:pt").and_then(|pt| space.point(pt)) {
                    d.push(format!("L{}", fmt_point(p)));
                    current = p;
                }
            }
            "a:cubicBezTo" => {
                let pts: Vec<(f64, f64)> = cmd
                    .children_named("a:pt")
                    .filter_map(|pt| space.point(pt))
                    .collect();
                if pts.len() == 3 {
                    d.push(format!(
                        "C{} {} {}",
                        fmt_point(pts[0]),
                        fmt_point(pts[1]),
                        fmt_point(pts[2])
                    ));
                    current = pts[2];
                }
            }
            "a:quadBezTo" => {
                let pts: Vec<(f64, f64)> = cmd
                    .children_named("a:pt")
                    .filter_map(|pt| space.point(pt))
                    .collect();
                if pts.len() == 2 {
                    d.push(format!("Q{} {}", fmt_point(pts[0]), fmt_point(pts[1])));
                    current = pts[1];
                }
            }
            "a:arcTo" => {
                let radius = |key: &str, scale: f64| {
                    cmd.attr(key).and_then(|v| space.value(v)).map(|v| v * scale)
                };
                let (Some(wr), Some(hr)) = (radius("wR", space.sx), radius("hR", space.sy)) else {
                    continue;
                };
                let start = cmd.attr_f64("stAng").unwrap_or(0.0) / ANGLE_SCALE;
                let sweep = cmd.attr_f64("swAng").unwrap_or(0.0) / ANGLE_SCALE;
                let (st, end) = (start.to_radians(), (start + sweep).to_radians());

                let cx = current.0 - wr * st.cos();
                let cy = current.1 - hr * st.sin();
                let target = (cx + wr * end.cos(), cy + hr * end.sin());

                d.push(format!(
                    "A{},{} 0 {},{} {}",
                    px(wr),
                    px(hr),
                    u8::from(sweep.abs() > 180.0),
                    u8::from(sweep > 0.0),
                    fmt_point(target)
                ));
                current = target;
            }
            "a:close" => {
                d.push("Z".to_string());
                closed = true;
            }
            other => log::debug!("custom path command {} ignored", other),
        }
    }

    if d.is_empty() {
        return None;
    }

    let filled = path.attr("fill").map(|f| f != "none").unwrap_or(true);
    let stroked = path.attr_bool("stroke").unwrap_or(true);
    Some(ShapePath {
        d: d.join(" "),
        filled: filled && closed,
        stroked,
    })
}

/// SVG paths of a custom geometry, scaled into a `width x height` box.
pub fn custom_paths(cust_geom: &Node, width: f64, height: f64, slide_factor: f64) -> Vec<ShapePath> {
    cust_geom
        .get(&["a:pathLst"])
        .map(|list| {
            list.children_named("a:path")
                .filter_map(|p| convert_path(p, width, height, slide_factor))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: &str, y: &str) -> Node {
        Node::new("a:pt").with_attr("x", x).with_attr("y", y)
    }

    #[test]
    fn test_scaled_polygon() {
        let geom = Node::new("a:custGeom").with_child(
            Node::new("a:pathLst").with_child(
                Node::new("a:path")
                    .with_attr("w", "100")
                    .with_attr("h", "100")
                    .with_child(Node::new("a:moveTo").with_child(pt("0", "0")))
                    .with_child(Node::new("a:lnTo").with_child(pt("100", "0")))
                    .with_child(Node::new("a:lnTo").with_child(pt("r", "b")))
                    .with_child(Node::new("a:close")),
            ),
        );
        let paths = custom_paths(&geom, 200.0, 50.0, 1.0);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].d, "M0,0 L200,0 L200,50 Z");
        assert!(paths[0].filled);
    }

    #[test]
    fn test_curves_and_open_paths() {
        let geom = Node::new("a:custGeom").with_child(
            Node::new("a:pathLst").with_child(
                Node::new("a:path")
                    .with_attr("w", "10")
                    .with_attr("h", "10")
                    .with_attr("fill", "none")
                    .with_child(Node::new("a:moveTo").with_child(pt("0", "10")))
                    .with_child(
                        Node::new("a:cubicBezTo")
                            .with_child(pt("0", "0"))
                            .with_child(pt("10", "0"))
                            .with_child(pt("10", "10")),
                    )
                    .with_child(
                        Node::new("a:quadBezTo")
                            .with_child(pt("5", "5"))
                            .with_child(pt("0", "10")),
                    ),
            ),
        );
        let paths = custom_paths(&geom, 10.0, 10.0, 1.0);
        assert_eq!(paths[0].d, "M0,10 C0,0 10,0 10,10 Q5,5 0,10");
        assert!(!paths[0].filled);
        assert!(paths[0].stroked);
    }

    #[test]
    fn test_arc_to() {
        // quarter circle around (10,10), clockwise in y-down space
        let geom = Node::new("a:custGeom").with_child(
            Node::new("a:pathLst").with_child(
                Node::new("a:path")
                    .with_attr("w", "20")
                    .with_attr("h", "20")
                    .with_child(Node::new("a:moveTo").with_child(pt("20", "10")))
                    .with_child(
                        Node::new("a:arcTo")
                            .with_attr("wR", "10")
                            .with_attr("hR", "10")
                            .with_attr("stAng", "0")
                            .with_attr("swAng", "5400000"),
                    ),
            ),
        );
        let paths = custom_paths(&geom, 20.0, 20.0, 1.0);
        assert_eq!(paths[0].d, "M20,10 A10,10 0 0,1 10,20");
    }

    #[test]
    fn test_empty_geometry() {
        assert!(custom_paths(&Node::new("a:custGeom"), 1.0, 1.0, 1.0).is_empty());
    }
}
