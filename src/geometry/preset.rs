//! Preset geometries (`a:prstGeom`).
//!
//! Each preset is drawn into a `w x h` box from its adjust values. Presets
//! without an outline here are drawn as rectangles.

use super::ShapePath;
use crate::style::px;
use crate::xml::Node;

/// Adjust values from `a:avLst` (`<a:gd name="adj" fmla="val 16667"/>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjustments {
    values: Vec<(String, f64)>,
}

impl Adjustments {
    pub fn from_geometry(prst_geom: &Node) -> Self {
        let values = prst_geom
            .child("a:avLst")
            .map(|list| {
                list.children_named("a:gd")
                    .filter_map(|gd| {
                        let name = gd.attr("name")?;
                        let value = gd.attr("fmla")?.strip_prefix("val ")?.trim().parse().ok()?;
                        Some((name.to_string(), value))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { values }
    }

    /// Raw adjust value, or the preset default.
    pub fn value(&self, name: &str, default: f64) -> f64 {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or(default)
    }

    /// Adjust value as a fraction (`val / 100000`), or the preset default.
    pub fn fraction(&self, name: &str, default: f64) -> f64 {
        self.value(name, default) / 100000.0
    }

    /// Angle adjust value in radians (`val` is in 60000ths of a degree).
    pub fn angle(&self, name: &str, default: f64) -> f64 {
        (self.value(name, default) / 60000.0).to_radians()
    }

    #[cfg(test)]
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.push((name.to_string(), value));
        self
    }
}

fn point(x: f64, y: f64) -> String {
    format!("{},{}", px(x), px(y))
}

fn polygon(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        d.push_str(if i == 0 { "M" } else { " L" });
        d.push_str(&point(*x, *y));
    }
    d.push_str(" Z");
    d
}

fn polyline(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        d.push_str(if i == 0 { "M" } else { " L" });
        d.push_str(&point(*x, *y));
    }
    d
}

fn rect(w: f64, h: f64) -> String {
    polygon(&[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)])
}

fn ellipse(w: f64, h: f64) -> String {
    let (rx, ry) = (w / 2.0, h / 2.0);
    format!(
        "M0,{cy} A{rx},{ry} 0 1,0 {w},{cy} A{rx},{ry} 0 1,0 0,{cy} Z",
        cy = px(ry),
        rx = px(rx),
        ry = px(ry),
        w = px(w)
    )
}

fn round_rect(w: f64, h: f64, r: f64) -> String {
    let r = r.min(w / 2.0).min(h / 2.0);
    let a = format!("A{},{} 0 0,1", px(r), px(r));
    format!(
        "M{} L{} {a} {} L{} {a} {} L{} {a} {} L{} {a} {} Z",
        point(r, 0.0),
        point(w - r, 0.0),
        point(w, r),
        point(w, h - r),
        point(w - r, h),
        point(r, h),
        point(0.0, h - r),
        point(0.0, r),
        point(r, 0.0),
    )
}

fn star(w: f64, h: f64, points: usize, inner_ratio: f64) -> String {
    let (cx, cy) = (w / 2.0, h / 2.0);
    let vertices: Vec<(f64, f64)> = (0..points * 2)
        .map(|i| {
            let angle = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / points as f64;
            let ratio = if i % 2 == 0 { 1.0 } else { inner_ratio };
            (cx + cx * ratio * angle.cos(), cy + cy * ratio * angle.sin())
        })
        .collect();
    polygon(&vertices)
}

/// Point at `angle` on an ellipse; angles run clockwise from the x axis.
fn on_ellipse(cx: f64, cy: f64, rx: f64, ry: f64, angle: f64) -> (f64, f64) {
    (cx + rx * angle.cos(), cy + ry * angle.sin())
}

/// Clockwise sweep from `start` to `end`, in `(0, 2pi]`.
fn clockwise_sweep(start: f64, end: f64) -> f64 {
    let sweep = (end - start).rem_euclid(std::f64::consts::TAU);
    if sweep == 0.0 {
        std::f64::consts::TAU
    } else {
        sweep
    }
}

/// Elliptical arc command to `to`; `clockwise` picks the sweep flag.
fn arc_to(rx: f64, ry: f64, sweep: f64, clockwise: bool, to: (f64, f64)) -> String {
    format!(
        "A{},{} 0 {},{} {}",
        px(rx),
        px(ry),
        u8::from(sweep > std::f64::consts::PI),
        u8::from(clockwise),
        point(to.0, to.1)
    )
}

/// Full ellipse as a closed subpath, drawn in the given direction.
fn ellipse_at(cx: f64, cy: f64, rx: f64, ry: f64, clockwise: bool) -> String {
    let flag = u8::from(clockwise);
    format!(
        "M{} A{rx},{ry} 0 1,{flag} {} A{rx},{ry} 0 1,{flag} {} Z",
        point(cx - rx, cy),
        point(cx + rx, cy),
        point(cx - rx, cy),
        rx = px(rx),
        ry = px(ry),
    )
}

/// Ring between two concentric ellipses; the inner one runs backwards.
fn donut(w: f64, h: f64, thickness: f64) -> String {
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (irx, iry) = ((cx - thickness).max(0.0), (cy - thickness).max(0.0));
    format!(
        "{} {}",
        ellipse_at(cx, cy, cx, cy, true),
        ellipse_at(cx, cy, irx, iry, false)
    )
}

/// Thick arc from `start` clockwise to `end`.
fn block_arc(w: f64, h: f64, start: f64, end: f64, thickness: f64) -> String {
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (irx, iry) = ((cx - thickness).max(0.0), (cy - thickness).max(0.0));
    let sweep = clockwise_sweep(start, end);
    let (sx, sy) = on_ellipse(cx, cy, cx, cy, start);
    let outer_end = on_ellipse(cx, cy, cx, cy, end);
    let inner_end = on_ellipse(cx, cy, irx, iry, end);
    let inner_start = on_ellipse(cx, cy, irx, iry, start);
    format!(
        "M{} {} L{} {} Z",
        point(sx, sy),
        arc_to(cx, cy, sweep, true, outer_end),
        point(inner_end.0, inner_end.1),
        arc_to(irx, iry, sweep, false, inner_start),
    )
}

/// Upright cylinder; the top ellipse is `depth` high.
fn can(w: f64, h: f64, depth: f64) -> String {
    let (rx, ry) = (w / 2.0, depth / 2.0);
    format!(
        "M{} L{} A{rx},{ry} 0 0,0 {} L{} A{rx},{ry} 0 0,0 {} Z {}",
        point(0.0, ry),
        point(0.0, h - ry),
        point(w, h - ry),
        point(w, ry),
        point(0.0, ry),
        ellipse_at(rx, ry, rx, ry, true),
        rx = px(rx),
        ry = px(ry),
    )
}

/// Box seen from the front right, with top and side faces `depth` deep.
fn cube(w: f64, h: f64, depth: f64) -> String {
    format!(
        "{} {} M{} L{}",
        polygon(&[
            (depth, 0.0),
            (w, 0.0),
            (w, h - depth),
            (w - depth, h),
            (0.0, h),
            (0.0, depth),
        ]),
        polyline(&[(0.0, depth), (w - depth, depth), (w, 0.0)]),
        point(w - depth, depth),
        point(w - depth, h),
    )
}

fn heart(w: f64, h: f64) -> String {
    let hc = w / 2.0;
    let (dx1, dx2) = (w * 49.0 / 48.0, w * 10.0 / 48.0);
    let y1 = -h / 3.0;
    format!(
        "M{} C{} {} {} C{} {} {} Z",
        point(hc, h / 4.0),
        point(hc + dx2, y1),
        point(hc + dx1, h / 4.0),
        point(hc, h),
        point(hc - dx1, h / 4.0),
        point(hc - dx2, y1),
        point(hc, h / 4.0),
    )
}

/// Ring of lobes around an ellipse inset from the box.
fn cloud(w: f64, h: f64) -> String {
    const LOBES: usize = 10;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (rx, ry) = (cx * 0.8, cy * 0.8);
    let points: Vec<(f64, f64)> = (0..LOBES)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / LOBES as f64;
            on_ellipse(cx, cy, rx, ry, angle)
        })
        .collect();
    let mut d = format!("M{}", point(points[0].0, points[0].1));
    for (i, &(x0, y0)) in points.iter().enumerate() {
        let (x1, y1) = points[(i + 1) % LOBES];
        let r = ((x1 - x0).hypot(y1 - y0) * 0.6).max(0.01);
        d.push_str(&format!(" A{},{} 0 0,1 {}", px(r), px(r), point(x1, y1)));
    }
    d.push_str(" Z");
    d
}

/// Side of a box a callout tail leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TailSide {
    Top,
    Right,
    Bottom,
    Left,
    /// Tip inside the box: no tail
    Inside,
}

fn tail_side(w: f64, h: f64, tip: (f64, f64)) -> TailSide {
    if (0.0..=w).contains(&tip.0) && (0.0..=h).contains(&tip.1) {
        return TailSide::Inside;
    }
    let dx = tip.0 - w / 2.0;
    let dy = tip.1 - h / 2.0;
    // compared in box-relative units
    if dy.abs() * w >= dx.abs() * h {
        if dy > 0.0 {
            TailSide::Bottom
        } else {
            TailSide::Top
        }
    } else if dx > 0.0 {
        TailSide::Right
    } else {
        TailSide::Left
    }
}

/// Rectangle callout with corner radius `r` and a wedge tail to `tip`.
///
/// The tail base spans a sixth of the side, in the half nearest the tip.
fn wedge_rect_callout(w: f64, h: f64, r: f64, tip: (f64, f64)) -> String {
    let r = r.min(w / 2.0).min(h / 2.0);
    let side = tail_side(w, h, tip);
    let base = |len: f64, toward_end: bool| {
        if toward_end {
            (len * 7.0 / 12.0, len * 9.0 / 12.0)
        } else {
            (len * 3.0 / 12.0, len * 5.0 / 12.0)
        }
    };
    let tip_point = point(tip.0, tip.1);
    let corner = |to: (f64, f64)| {
        if r > 0.0 {
            format!(" A{},{} 0 0,1 {}", px(r), px(r), point(to.0, to.1))
        } else {
            String::new()
        }
    };

    let mut d = format!("M{}", point(r, 0.0));
    if side == TailSide::Top {
        let (a, b) = base(w, tip.0 > w / 2.0);
        d.push_str(&format!(" L{} L{} L{}", point(a, 0.0), tip_point, point(b, 0.0)));
    }
    d.push_str(&format!(" L{}", point(w - r, 0.0)));
    d.push_str(&corner((w, r)));
    if side == TailSide::Right {
        let (a, b) = base(h, tip.1 > h / 2.0);
        d.push_str(&format!(" L{} L{} L{}", point(w, a), tip_point, point(w, b)));
    }
    d.push_str(&format!(" L{}", point(w, h - r)));
    d.push_str(&corner((w - r, h)));
    if side == TailSide::Bottom {
        let (a, b) = base(w, tip.0 > w / 2.0);
        d.push_str(&format!(" L{} L{} L{}", point(b, h), tip_point, point(a, h)));
    }
    d.push_str(&format!(" L{}", point(r, h)));
    d.push_str(&corner((0.0, h - r)));
    if side == TailSide::Left {
        let (a, b) = base(h, tip.1 > h / 2.0);
        d.push_str(&format!(" L{} L{} L{}", point(0.0, b), tip_point, point(0.0, a)));
    }
    d.push_str(&format!(" L{}", point(0.0, r)));
    d.push_str(&corner((r, 0.0)));
    d.push_str(" Z");
    d
}

/// Ellipse callout whose tail base spans 20 degrees facing `tip`.
fn wedge_ellipse_callout(w: f64, h: f64, tip: (f64, f64)) -> String {
    let (cx, cy) = (w / 2.0, h / 2.0);
    if tail_side(w, h, tip) == TailSide::Inside {
        return ellipse_at(cx, cy, cx, cy, true);
    }
    let toward = (tip.1 - cy).atan2(tip.0 - cx);
    let half = 10f64.to_radians();
    let start = on_ellipse(cx, cy, cx, cy, toward + half);
    let end = on_ellipse(cx, cy, cx, cy, toward - half);
    format!(
        "M{} {} L{} Z",
        point(start.0, start.1),
        arc_to(cx, cy, std::f64::consts::TAU - 2.0 * half, true, end),
        point(tip.0, tip.1),
    )
}

/// Tail tip of a wedge callout from its offsets relative to the center.
fn callout_tip(w: f64, h: f64, adj: &Adjustments) -> (f64, f64) {
    (
        w / 2.0 + w * adj.fraction("adj1", -20833.0),
        h / 2.0 + h * adj.fraction("adj2", 62500.0),
    )
}

/// Outline of a preset geometry in a `w x h` box.
pub fn preset_path(name: &str, w: f64, h: f64, adj: &Adjustments) -> ShapePath {
    let ss = w.min(h);

    let d = match name {
        "rect" | "flowChartProcess" | "textBox" => rect(w, h),
        "roundRect" | "flowChartAlternateProcess" => {
            round_rect(w, h, ss * adj.fraction("adj", 16667.0))
        }
        "flowChartTerminator" => round_rect(w, h, ss / 2.0),
        "ellipse" | "flowChartConnector" => ellipse(w, h),
        "triangle" | "flowChartExtract" => {
            let x = w * adj.fraction("adj", 50000.0);
            polygon(&[(x, 0.0), (w, h), (0.0, h)])
        }
        "rtTriangle" => polygon(&[(0.0, 0.0), (w, h), (0.0, h)]),
        "diamond" | "flowChartDecision" => {
            polygon(&[(w / 2.0, 0.0), (w, h / 2.0), (w / 2.0, h), (0.0, h / 2.0)])
        }
        "parallelogram" | "flowChartInputOutput" => {
            let x = ss * adj.fraction("adj", 25000.0);
            polygon(&[(x, 0.0), (w, 0.0), (w - x, h), (0.0, h)])
        }
        "trapezoid" => {
            let x = ss * adj.fraction("adj", 25000.0);
            polygon(&[(0.0, h), (x, 0.0), (w - x, 0.0), (w, h)])
        }
        "pentagon" => polygon(&[
            (w / 2.0, 0.0),
            (w, h * 0.382),
            (w * 0.809, h),
            (w * 0.191, h),
            (0.0, h * 0.382),
        ]),
        "hexagon" => {
            let x = ss * adj.fraction("adj", 25000.0);
            polygon(&[
                (x, 0.0),
                (w - x, 0.0),
                (w, h / 2.0),
                (w - x, h),
                (x, h),
                (0.0, h / 2.0),
            ])
        }
        "octagon" => {
            let x = ss * adj.fraction("adj", 29289.0);
            polygon(&[
                (x, 0.0),
                (w - x, 0.0),
                (w, x),
                (w, h - x),
                (w - x, h),
                (x, h),
                (0.0, h - x),
                (0.0, x),
            ])
        }
        "star4" => star(w, h, 4, adj.fraction("adj", 12500.0) * 2.0),
        "star5" => star(w, h, 5, 0.382),
        "star6" => star(w, h, 6, 0.577),
        "plus" | "flowChartSummingJunction" => {
            let x = ss * adj.fraction("adj", 25000.0);
            polygon(&[
                (x, 0.0),
                (w - x, 0.0),
                (w - x, x),
                (w, x),
                (w, h - x),
                (w - x, h - x),
                (w - x, h),
                (x, h),
                (x, h - x),
                (0.0, h - x),
                (0.0, x),
                (x, x),
            ])
        }
        "rightArrow" => {
            let half = h * adj.fraction("adj1", 50000.0) / 2.0;
            let head = w - ss * adj.fraction("adj2", 50000.0);
            let (y1, y2) = (h / 2.0 - half, h / 2.0 + half);
            polygon(&[
                (0.0, y1),
                (head, y1),
                (head, 0.0),
                (w, h / 2.0),
                (head, h),
                (head, y2),
                (0.0, y2),
            ])
        }
        "leftArrow" => {
            let half = h * adj.fraction("adj1", 50000.0) / 2.0;
            let head = ss * adj.fraction("adj2", 50000.0);
            let (y1, y2) = (h / 2.0 - half, h / 2.0 + half);
            polygon(&[
                (w, y1),
                (head, y1),
                (head, 0.0),
                (0.0, h / 2.0),
                (head, h),
                (head, y2),
                (w, y2),
            ])
        }
        "upArrow" => {
            let half = w * adj.fraction("adj1", 50000.0) / 2.0;
            let head = ss * adj.fraction("adj2", 50000.0);
            let (x1, x2) = (w / 2.0 - half, w / 2.0 + half);
            polygon(&[
                (x1, h),
                (x1, head),
                (0.0, head),
                (w / 2.0, 0.0),
                (w, head),
                (x2, head),
                (x2, h),
            ])
        }
        "downArrow" => {
            let half = w * adj.fraction("adj1", 50000.0) / 2.0;
            let head = h - ss * adj.fraction("adj2", 50000.0);
            let (x1, x2) = (w / 2.0 - half, w / 2.0 + half);
            polygon(&[
                (x1, 0.0),
                (x2, 0.0),
                (x2, head),
                (w, head),
                (w / 2.0, h),
                (0.0, head),
                (x1, head),
            ])
        }
        "leftRightArrow" => {
            let half = h * adj.fraction("adj1", 50000.0) / 2.0;
            let head = ss * adj.fraction("adj2", 50000.0);
            let (y1, y2) = (h / 2.0 - half, h / 2.0 + half);
            polygon(&[
                (0.0, h / 2.0),
                (head, 0.0),
                (head, y1),
                (w - head, y1),
                (w - head, 0.0),
                (w, h / 2.0),
                (w - head, h),
                (w - head, y2),
                (head, y2),
                (head, h),
            ])
        }
        "chevron" => {
            let x = ss * adj.fraction("adj", 50000.0);
            polygon(&[
                (0.0, 0.0),
                (w - x, 0.0),
                (w, h / 2.0),
                (w - x, h),
                (0.0, h),
                (x, h / 2.0),
            ])
        }
        "homePlate" | "flowChartOffpageConnector" => {
            let x = ss * adj.fraction("adj", 50000.0);
            polygon(&[(0.0, 0.0), (w - x, 0.0), (w, h / 2.0), (w - x, h), (0.0, h)])
        }
        "snip1Rect" => {
            let x = ss * adj.fraction("adj", 16667.0);
            polygon(&[(0.0, 0.0), (w - x, 0.0), (w, x), (w, h), (0.0, h)])
        }
        "line" | "straightConnector1" => return ShapePath::open(polyline(&[(0.0, 0.0), (w, h)])),
        "bentConnector2" => return ShapePath::open(polyline(&[(0.0, 0.0), (w, 0.0), (w, h)])),
        "bentConnector3" => {
            let x = w * adj.fraction("adj1", 50000.0);
            return ShapePath::open(polyline(&[(0.0, 0.0), (x, 0.0), (x, h), (w, h)]));
        }
        "arc" => {
            let (cx, cy) = (w / 2.0, h / 2.0);
            let start = adj.angle("adj1", 16200000.0);
            let end = adj.angle("adj2", 0.0);
            let (sx, sy) = on_ellipse(cx, cy, cx, cy, start);
            let to = on_ellipse(cx, cy, cx, cy, end);
            return ShapePath::open(format!(
                "M{} {}",
                point(sx, sy),
                arc_to(cx, cy, clockwise_sweep(start, end), true, to)
            ));
        }
        "curvedConnector3" => {
            let x = w * adj.fraction("adj1", 50000.0);
            return ShapePath::open(format!(
                "M0,0 C{} {} {}",
                point(x, 0.0),
                point(x, h),
                point(w, h)
            ));
        }
        "donut" => donut(w, h, ss * adj.fraction("adj", 25000.0)),
        "blockArc" => block_arc(
            w,
            h,
            adj.angle("adj1", 10800000.0),
            adj.angle("adj2", 0.0),
            ss * adj.fraction("adj3", 25000.0),
        ),
        "can" | "flowChartMagneticDisk" => can(w, h, ss * adj.fraction("adj", 25000.0)),
        "cube" => cube(w, h, ss * adj.fraction("adj", 25000.0)),
        "heart" => heart(w, h),
        "cloud" | "cloudCallout" => cloud(w, h),
        "wedgeRectCallout" => wedge_rect_callout(w, h, 0.0, callout_tip(w, h, adj)),
        "wedgeRoundRectCallout" => wedge_rect_callout(
            w,
            h,
            ss * adj.fraction("adj3", 16667.0),
            callout_tip(w, h, adj),
        ),
        "wedgeEllipseCallout" => wedge_ellipse_callout(w, h, callout_tip(w, h, adj)),
        other => {
            log::debug!("preset geometry {} drawn as rectangle", other);
            rect(w, h)
        }
    };

    ShapePath::closed(d)
}

/// Whether a preset draws an open path (line or connector).
pub fn is_line_preset(name: &str) -> bool {
    matches!(
        name,
        "line"
            | "straightConnector1"
            | "bentConnector2"
            | "bentConnector3"
            | "curvedConnector3"
            | "arc"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_and_unknown_preset() {
        let rect = preset_path("rect", 100.0, 50.0, &Adjustments::default());
        assert_eq!(rect.d, "M0,0 L100,0 L100,50 L0,50 Z");
        assert!(rect.filled);

        let unknown = preset_path("irregularSeal1", 100.0, 50.0, &Adjustments::default());
        assert_eq!(unknown.d, rect.d);
    }

    #[test]
    fn test_adjusted_triangle() {
        let adj = Adjustments::default().with("adj", 0.0);
        let tri = preset_path("triangle", 10.0, 10.0, &adj);
        assert_eq!(tri.d, "M0,0 L10,10 L0,10 Z");
    }

    #[test]
    fn test_adjustments_from_xml() {
        let geom = Node::new("a:prstGeom").with_attr("prst", "roundRect").with_child(
            Node::new("a:avLst")
                .with_child(Node::new("a:gd").with_attr("name", "adj").with_attr("fmla", "val 50000")),
        );
        let adj = Adjustments::from_geometry(&geom);
        assert_eq!(adj.fraction("adj", 16667.0), 0.5);
        assert_eq!(adj.fraction("adj2", 25000.0), 0.25);
    }

    #[test]
    fn test_connectors_are_open() {
        let line = preset_path("straightConnector1", 20.0, 0.0, &Adjustments::default());
        assert_eq!(line.d, "M0,0 L20,0");
        assert!(!line.filled);
        assert!(is_line_preset("bentConnector3"));
        assert!(!is_line_preset("rect"));
    }

    #[test]
    fn test_ellipse_path() {
        let e = preset_path("ellipse", 20.0, 10.0, &Adjustments::default());
        assert_eq!(e.d, "M0,5 A10,5 0 1,0 20,5 A10,5 0 1,0 0,5 Z");
    }

    #[test]
    fn test_donut_has_reversed_hole() {
        let ring = preset_path("donut", 100.0, 100.0, &Adjustments::default());
        assert_eq!(
            ring.d,
            "M0,50 A50,50 0 1,1 100,50 A50,50 0 1,1 0,50 Z M25,50 A25,25 0 1,0 75,50 A25,25 0 1,0 25,50 Z"
        );
        assert!(ring.filled);
    }

    #[test]
    fn test_block_arc_default_is_upper_half() {
        let arc = preset_path("blockArc", 100.0, 100.0, &Adjustments::default());
        assert_eq!(
            arc.d,
            "M0,50 A50,50 0 0,1 100,50 L75,50 A25,25 0 0,0 25,50 Z"
        );
    }

    #[test]
    fn test_arc_is_open_quarter() {
        let arc = preset_path("arc", 100.0, 100.0, &Adjustments::default());
        assert_eq!(arc.d, "M50,0 A50,50 0 0,1 100,50");
        assert!(!arc.filled);
        assert!(is_line_preset("arc"));
    }

    #[test]
    fn test_heart_and_cube() {
        let heart = preset_path("heart", 48.0, 48.0, &Adjustments::default());
        assert_eq!(heart.d, "M24,12 C34,-16 73,12 24,48 C-25,12 14,-16 24,12 Z");

        let cube = preset_path("cube", 100.0, 100.0, &Adjustments::default());
        assert!(cube.d.starts_with("M25,0 L100,0 L100,75 L75,100 L0,100 L0,25 Z"));
        assert!(cube.d.ends_with("M75,25 L75,100"));
    }

    #[test]
    fn test_can_top_ellipse() {
        let can = preset_path("can", 100.0, 200.0, &Adjustments::default());
        assert!(can.d.starts_with("M0,12.5 L0,187.5 A50,12.5 0 0,0 100,187.5"));
        assert!(can.d.ends_with("M0,12.5 A50,12.5 0 1,1 100,12.5 A50,12.5 0 1,1 0,12.5 Z"));
    }

    #[test]
    fn test_wedge_rect_callout_tail() {
        // default tip sits below the box, left of center
        let callout = preset_path("wedgeRectCallout", 120.0, 60.0, &Adjustments::default());
        assert_eq!(
            callout.d,
            "M0,0 L120,0 L120,60 L50,60 L35,67.5 L30,60 L0,60 L0,0 Z"
        );

        let right = Adjustments::default().with("adj1", 75000.0).with("adj2", 0.0);
        let callout = preset_path("wedgeRectCallout", 120.0, 60.0, &right);
        assert!(callout.d.contains("L120,15 L150,30 L120,25"));

        let inside = Adjustments::default().with("adj1", 0.0).with("adj2", 0.0);
        let plain = preset_path("wedgeRectCallout", 120.0, 60.0, &inside);
        assert_eq!(plain.d, "M0,0 L120,0 L120,60 L0,60 L0,0 Z");
    }

    #[test]
    fn test_cloud_and_ellipse_callout_are_drawn() {
        let cloud = preset_path("cloud", 100.0, 60.0, &Adjustments::default());
        assert_eq!(cloud.d.matches(" A").count(), 10);

        let callout = preset_path("wedgeEllipseCallout", 100.0, 60.0, &Adjustments::default());
        assert!(callout.d.contains("L29.17,67.5 Z"));
    }
}
