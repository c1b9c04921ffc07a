//! Tables.
//!
//! Cell formatting is resolved per property (fill, each border side, text)
//! with the first source that sets it winning: the cell's own `a:tcPr`,
//! then the table style parts that apply to the cell (corner, first/last
//! row, first/last column, row band, column band, whole table).

use crate::render::{Env, RenderState};
use crate::style::border::resolve_border;
use crate::style::color::color_from_children;
use crate::style::fill::{explicit_fill, style_ref_fill};
use crate::style::{px, Border, Fill, RunStyle, StyleContext};
use crate::text::{render_text_body, TextFrame};
use crate::xml::Node;

const TABLE_CSS: &str = "border-collapse:collapse;table-layout:fixed;";

/// Style options of a table (`a:tblPr` flags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableFlags {
    pub first_row: bool,
    pub last_row: bool,
    pub first_col: bool,
    pub last_col: bool,
    pub band_row: bool,
    pub band_col: bool,
}

impl TableFlags {
    pub fn read(tbl_pr: Option<&Node>) -> Self {
        let flag = |key: &str| {
            tbl_pr
                .and_then(|p| p.attr_bool(key))
                .unwrap_or(false)
        };
        Self {
            first_row: flag("firstRow"),
            last_row: flag("lastRow"),
            first_col: flag("firstCol"),
            last_col: flag("lastCol"),
            band_row: flag("bandRow"),
            band_col: flag("bandCol"),
        }
    }
}

/// Table style parts applying to a cell, highest precedence first.
///
/// Banding alternates from the first row (column) after any header: odd
/// indices take the `band1` part, even ones fall through to the whole table
/// style.
pub fn cell_parts(
    flags: TableFlags,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> Vec<&'static str> {
    let first_row = flags.first_row && row == 0;
    let last_row = flags.last_row && rows > 0 && row == rows - 1;
    let first_col = flags.first_col && col == 0;
    let last_col = flags.last_col && cols > 0 && col == cols - 1;

    let mut parts = Vec::new();
    if first_row && first_col {
        parts.push("a:nwCell");
    }
    if first_row && last_col {
        parts.push("a:neCell");
    }
    if last_row && first_col {
        parts.push("a:swCell");
    }
    if last_row && last_col {
        parts.push("a:seCell");
    }
    if first_row {
        parts.push("a:firstRow");
    }
    if last_row {
        parts.push("a:lastRow");
    }
    if first_col {
        parts.push("a:firstCol");
    }
    if last_col {
        parts.push("a:lastCol");
    }
    if flags.band_row && !first_row && !last_row && row % 2 == 1 {
        parts.push("a:band1H");
    }
    if flags.band_col && !first_col && !last_col && col % 2 == 1 {
        parts.push("a:band1V");
    }
    parts.push("a:wholeTbl");
    parts
}

/// Border sides in output order with the cell property element for each.
const SIDES: [(&str, &str); 4] = [
    ("left", "a:lnL"),
    ("right", "a:lnR"),
    ("top", "a:lnT"),
    ("bottom", "a:lnB"),
];

/// Resolved formatting of one cell.
#[derive(Debug, Default)]
struct CellLook {
    fill: Option<Fill>,
    /// Per side: `Some(None)` is an explicitly hidden side
    borders: [Option<Option<Border>>; 4],
    text: RunStyle,
}

/// Where a cell sits in the grid.
#[derive(Debug, Clone, Copy)]
struct CellPosition {
    row: usize,
    col: usize,
    last_row: usize,
    last_col: usize,
}

impl CellPosition {
    /// Table style border element for a side, and its table-edge name.
    fn style_side(&self, side: usize) -> (&'static str, &'static str) {
        match side {
            0 if self.col == 0 => ("a:left", "a:left"),
            0 => ("a:insideV", "a:left"),
            1 if self.col >= self.last_col => ("a:right", "a:right"),
            1 => ("a:insideV", "a:right"),
            2 if self.row == 0 => ("a:top", "a:top"),
            2 => ("a:insideH", "a:top"),
            _ if self.row >= self.last_row => ("a:bottom", "a:bottom"),
            _ => ("a:insideH", "a:bottom"),
        }
    }
}

fn resolve_look(
    tc_pr: Option<&Node>,
    parts: &[&Node],
    position: CellPosition,
    cx: &StyleContext<'_>,
) -> CellLook {
    let mut look = CellLook::default();

    if let Some(tc_pr) = tc_pr {
        look.fill = explicit_fill(tc_pr, cx);
        for (i, (_, element)) in SIDES.iter().enumerate() {
            if let Some(ln) = tc_pr.child(element) {
                look.borders[i] = Some(resolve_border(Some(ln), None, cx));
            }
        }
    }

    let mut text_levels = Vec::new();
    for part in parts {
        let whole_table = part.name() == "a:wholeTbl";
        if let Some(tc_style) = part.child("a:tcStyle") {
            if look.fill.is_none() {
                look.fill = tc_style
                    .child("a:fill")
                    .and_then(|f| explicit_fill(f, cx))
                    .or_else(|| style_ref_fill(tc_style, cx));
            }
            if let Some(bdr) = tc_style.child("a:tcBdr") {
                for side in 0..SIDES.len() {
                    if look.borders[side].is_some() {
                        continue;
                    }
                    let (name, edge) = position.style_side(side);
                    let found = bdr.child(name).or_else(|| {
                        if whole_table {
                            None
                        } else {
                            bdr.child(edge)
                        }
                    });
                    if let Some(el) = found {
                        look.borders[side] = Some(resolve_border(el.child("a:ln"), Some(el), cx));
                    }
                }
            }
        }
        if let Some(tx) = part.child("a:tcTxStyle") {
            text_levels.push(text_style(tx, cx));
        }
    }
    look.text = RunStyle::layered(text_levels);
    look
}

/// Run defaults from a table style part's `a:tcTxStyle`.
fn text_style(tx: &Node, cx: &StyleContext<'_>) -> RunStyle {
    let on_off = |key: &str| match tx.attr(key) {
        Some("on") => Some(true),
        Some("off") => Some(false),
        _ => None,
    };
    let own = RunStyle {
        bold: on_off("b"),
        italic: on_off("i"),
        typeface: tx
            .get_attr(&["a:font", "a:latin"], "typeface")
            .map(|t| cx.theme.typeface(t).to_string()),
        color: color_from_children(tx, cx.palette, None),
        ..Default::default()
    };
    let font_ref = tx
        .child("a:fontRef")
        .map(|f| RunStyle::from_font_ref(f, cx))
        .unwrap_or_default();
    own.or(font_ref)
}

/// Body properties of a cell from its margins and anchor.
fn cell_body_props(tc_pr: Option<&Node>) -> Node {
    let mut body_pr = Node::new("a:bodyPr");
    let Some(tc_pr) = tc_pr else {
        return body_pr;
    };
    for (margin, inset) in [
        ("marL", "lIns"),
        ("marR", "rIns"),
        ("marT", "tIns"),
        ("marB", "bIns"),
    ] {
        if let Some(value) = tc_pr.attr(margin) {
            body_pr = body_pr.with_attr(inset, value);
        }
    }
    if let Some(anchor) = tc_pr.attr("anchor") {
        body_pr = body_pr.with_attr("anchor", anchor);
    }
    body_pr
}

/// Render the table of a graphic frame.
pub fn render_table(env: &Env<'_>, state: &mut RenderState, frame: &Node) -> String {
    let Some(tbl) = frame.get(&["a:graphic", "a:graphicData", "a:tbl"]) else {
        return String::new();
    };
    let cx = env.style();
    let factor = env.options.slide_factor;

    let tbl_pr = tbl.child("a:tblPr");
    let flags = TableFlags::read(tbl_pr);
    let style = tbl_pr
        .and_then(|p| p.child("a:tableStyleId"))
        .or_else(|| tbl.child("a:tableStyleId"))
        .map(|id| id.text().trim())
        .and_then(|id| {
            let found = env.presentation.table_style(id);
            if found.is_none() {
                log::debug!("table style {} not found", id);
            }
            found
        });

    let widths: Vec<f64> = tbl
        .get(&["a:tblGrid"])
        .map(|g| {
            g.children_named("a:gridCol")
                .map(|c| c.attr_f64("w").unwrap_or(0.0) * factor)
                .collect()
        })
        .unwrap_or_default();
    let rows: Vec<&Node> = tbl.children_named("a:tr").collect();
    let cols = widths.len().max(
        rows.iter()
            .map(|r| r.children_named("a:tc").count())
            .max()
            .unwrap_or(0),
    );

    let mut table_css = TABLE_CSS.to_string();
    let total: f64 = widths.iter().sum();
    if total > 0.0 {
        table_css.push_str(&format!("width:{}px;", px(total)));
    }
    let mut html = format!("<table{}>", state.styles.class_attr(&table_css));
    if !widths.is_empty() {
        html.push_str("<colgroup>");
        for w in &widths {
            html.push_str(&format!(
                "<col{}>",
                state.styles.class_attr(&format!("width:{}px;", px(*w)))
            ));
        }
        html.push_str("</colgroup>");
    }

    // rows still covered by a vertical span, per grid column
    let mut covered = vec![0usize; cols];
    for (r, tr) in rows.iter().enumerate() {
        let row_css = tr
            .attr_f64("h")
            .map(|h| format!("height:{}px;", px(h * factor)))
            .unwrap_or_default();
        html.push_str(&format!("<tr{}>", state.styles.class_attr(&row_css)));

        for (c, tc) in tr.children_named("a:tc").enumerate() {
            if covered.get(c).copied().unwrap_or(0) > 0 {
                covered[c] -= 1;
                continue;
            }
            if tc.attr_bool("hMerge").unwrap_or(false) || tc.attr_bool("vMerge").unwrap_or(false) {
                continue;
            }
            let row_span = tc.attr_parse::<usize>("rowSpan").unwrap_or(1).max(1);
            let grid_span = tc.attr_parse::<usize>("gridSpan").unwrap_or(1).max(1);
            for slot in covered.iter_mut().skip(c).take(grid_span) {
                *slot = row_span - 1;
            }

            let position = CellPosition {
                row: r,
                col: c,
                last_row: rows.len().saturating_sub(1),
                last_col: cols.saturating_sub(1),
            };
            let parts: Vec<&Node> = style
                .map(|s| {
                    cell_parts(flags, r, c, rows.len(), cols)
                        .into_iter()
                        .filter_map(|name| s.child(name))
                        .collect()
                })
                .unwrap_or_default();
            let tc_pr = tc.child("a:tcPr");
            let look = resolve_look(tc_pr, &parts, position, &cx);

            let mut cell_css = String::from("padding:0px;vertical-align:top;");
            if let Some(fill) = &look.fill {
                cell_css.push_str(&fill.css());
            }
            for (i, (side, _)) in SIDES.iter().enumerate() {
                match &look.borders[i] {
                    Some(Some(border)) => cell_css.push_str(&border.css_side(side)),
                    _ => cell_css.push_str(&format!("border-{}:none;", side)),
                }
            }

            let mut attrs = state.styles.class_attr(&cell_css);
            if row_span > 1 {
                attrs.push_str(&format!(" rowspan=\"{}\"", row_span));
            }
            if grid_span > 1 {
                attrs.push_str(&format!(" colspan=\"{}\"", grid_span));
            }

            let body_props = cell_body_props(tc_pr);
            let text = match tc.child("a:txBody") {
                Some(body) => {
                    let cell_frame = TextFrame {
                        body_props: Some(&body_props),
                        inherited: look.text,
                        ..TextFrame::new(body, "table")
                    };
                    render_text_body(env, state, &cell_frame)
                }
                None => String::new(),
            };
            html.push_str(&format!("<td{}>{}</td>", attrs, text));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}
