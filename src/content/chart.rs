//! Chart extraction.
//!
//! Chart parts are read for their cached series data only. Drawing is left
//! to the host: each supported chart gets an empty placeholder element and
//! a [`ChartRequest`] naming it.

use crate::error::{Error, Result};
use crate::model::{ChartRequest, ChartSeries, ChartType, ChartValue};
use crate::render::{Env, RenderState};
use crate::xml::Node;

const CHART_CSS: &str = "width:100%;height:100%;";

/// Upper bound on the points kept per series reference.
const MAX_POINTS: usize = 100_000;

/// Data read from a chart part.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    /// Family of the first plot in the plot area
    pub chart_type: Option<ChartType>,
    /// Chart title (if available)
    pub title: Option<String>,
    /// Series data
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.values.is_empty())
    }
}

/// Which series reference a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesPart {
    Name,
    Categories,
    Values,
    XValues,
    YValues,
}

/// Store a cached point at its declared index.
///
/// Indexes at or past `limit` are dropped.
fn put<T: Clone>(target: &mut Vec<T>, idx: Option<usize>, limit: usize, value: T, filler: T) {
    let idx = idx.unwrap_or(target.len());
    if idx >= limit {
        log::debug!("chart point {} outside a cache of {}", idx, limit);
        return;
    }
    if target.len() <= idx {
        target.resize(idx + 1, filler);
    }
    target[idx] = value;
}

/// Value of a `val` attribute as a count.
fn count_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<usize> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"val")
        .and_then(|attr| String::from_utf8_lossy(&attr.value).parse::<usize>().ok())
}

/// Parse chart XML to extract data
pub fn parse_chart_xml(xml: &str) -> Result<ChartData> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut chart = ChartData::default();
    let mut buf = Vec::new();

    // State tracking
    let mut in_plot_area = false;
    let mut in_ser = false;
    let mut title_depth = 0usize;
    let mut part: Option<SeriesPart> = None;
    let mut in_v = false;
    let mut in_t = false;

    let mut name = String::new();
    let mut categories: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let mut x_values: Vec<f64> = Vec::new();
    let mut text = String::new();
    let mut title = String::new();
    let mut pt_idx: Option<usize> = None;
    let mut pt_count: Option<usize> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e)) => {
                let local_name = e.name().local_name();
                match local_name.as_ref() {
                    b"plotArea" => in_plot_area = true,
                    // axis titles live in the plot area
                    b"title" if !in_ser && !in_plot_area => title_depth += 1,
                    b"t" if title_depth > 0 => in_t = true,
                    b"ser" => {
                        in_ser = true;
                        name.clear();
                        categories.clear();
                        values.clear();
                        x_values.clear();
                    }
                    b"tx" if in_ser && part.is_none() => {
                        part = Some(SeriesPart::Name);
                        pt_count = None;
                    }
                    b"cat" | b"val" | b"xVal" | b"yVal" if in_ser => {
                        part = match local_name.as_ref() {
                            b"cat" => Some(SeriesPart::Categories),
                            b"val" => Some(SeriesPart::Values),
                            b"xVal" => Some(SeriesPart::XValues),
                            _ => Some(SeriesPart::YValues),
                        };
                        pt_count = None;
                    }
                    b"ptCount" => pt_count = count_attr(e),
                    b"pt" => {
                        // Get idx attribute
                        for attr in e.attributes().flatten() {
                            if attr.key.local_name().as_ref() == b"idx" {
                                if let Ok(idx) = String::from_utf8_lossy(&attr.value).parse::<usize>() {
                                    pt_idx = Some(idx);
                                }
                            }
                        }
                    }
                    b"v" => {
                        in_v = true;
                        text.clear();
                    }
                    other if in_plot_area && chart.chart_type.is_none() => {
                        let other = String::from_utf8_lossy(other);
                        if other.ends_with("Chart") {
                            chart.chart_type = ChartType::from_plot_element(&other);
                            if chart.chart_type.is_none() {
                                log::debug!("chart family {} is not supported", other);
                                // stop at the first family, supported or not
                                return Ok(ChartData {
                                    chart_type: None,
                                    title: non_empty(&title),
                                    series: Vec::new(),
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => {
                let local_name = e.name().local_name();
                match local_name.as_ref() {
                    b"plotArea" => in_plot_area = false,
                    b"title" if !in_ser && !in_plot_area => {
                        title_depth = title_depth.saturating_sub(1)
                    }
                    b"t" => in_t = false,
                    b"ser" => {
                        let key = if name.is_empty() {
                            format!("Series {}", chart.series.len() + 1)
                        } else {
                            name.clone()
                        };
                        let series_values = if chart.chart_type == Some(ChartType::Scatter) {
                            values
                                .iter()
                                .enumerate()
                                .map(|(i, y)| ChartValue::Point {
                                    x: x_values.get(i).copied().unwrap_or((i + 1) as f64),
                                    y: *y,
                                })
                                .collect()
                        } else {
                            values.iter().map(|v| ChartValue::Value(*v)).collect()
                        };
                        chart.series.push(ChartSeries {
                            key,
                            values: series_values,
                            category_labels: categories.clone(),
                        });
                        in_ser = false;
                    }
                    b"tx" | b"cat" | b"val" | b"xVal" | b"yVal" => {
                        part = None;
                        pt_count = None;
                    }
                    b"pt" => pt_idx = None,
                    b"v" => {
                        if in_v {
                            // Process the value based on context
                            let raw = text.trim();
                            let limit = pt_count.map_or(MAX_POINTS, |n| n.min(MAX_POINTS));
                            match part {
                                Some(SeriesPart::Name) => name = raw.to_string(),
                                Some(SeriesPart::Categories) => put(
                                    &mut categories,
                                    pt_idx,
                                    limit,
                                    raw.to_string(),
                                    String::new(),
                                ),
                                Some(SeriesPart::Values) | Some(SeriesPart::YValues) => {
                                    if let Ok(val) = raw.parse::<f64>() {
                                        put(&mut values, pt_idx, limit, val, 0.0);
                                    }
                                }
                                Some(SeriesPart::XValues) => match raw.parse::<f64>() {
                                    Ok(val) => put(&mut x_values, pt_idx, limit, val, 0.0),
                                    // text x values are labels, plotted by position
                                    Err(_) => put(
                                        &mut categories,
                                        pt_idx,
                                        limit,
                                        raw.to_string(),
                                        String::new(),
                                    ),
                                },
                                None => {}
                            }
                        }
                        in_v = false;
                    }
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Empty(ref e)) => {
                if e.name().local_name().as_ref() == b"ptCount" {
                    pt_count = count_attr(e);
                }
            }
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if in_v || in_t {
                    if let Ok(unescaped) = e.unescape() {
                        if in_v {
                            text.push_str(&unescaped);
                        } else {
                            title.push_str(&unescaped);
                        }
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    chart.title = non_empty(&title);
    Ok(chart)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Render a chart frame: an empty target element, plus a queued request
/// when the chart is supported.
pub fn render_chart(env: &Env<'_>, state: &mut RenderState, frame: &Node) -> String {
    let target_id = state.next_id("chart");
    let html = format!(
        "<div id=\"{}\"{}></div>",
        target_id,
        state.styles.class_attr(CHART_CSS)
    );

    let Some(path) = frame
        .get_attr(&["a:graphic", "a:graphicData", "c:chart"], "r:id")
        .and_then(|id| env.target_path(id))
    else {
        log::debug!("chart frame without a chart part");
        return html;
    };

    let data = match env.package.read_xml(&path).and_then(|xml| parse_chart_xml(&xml)) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("chart part {} unreadable: {}", path, e);
            return html;
        }
    };

    match data.chart_type {
        Some(chart_type) if !data.is_empty() => {
            log::trace!("queued {:?} chart {}", chart_type, target_id);
            state.charts.push(ChartRequest {
                target_id,
                chart_type,
                series_data: data.series,
                title: data.title,
            });
        }
        _ => log::debug!("chart {} has nothing to draw", path),
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bar_chart() {
        let xml = r#"<?xml version="1.0"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <c:chart>
    <c:title><c:tx><c:rich><a:p><a:r><a:t>Revenue</a:t></a:r></a:p></c:rich></c:tx></c:title>
    <c:plotArea>
      <c:barChart>
        <c:ser>
          <c:tx>
            <c:strRef>
              <c:strCache>
                <c:pt idx="0"><c:v>2010</c:v></c:pt>
              </c:strCache>
            </c:strRef>
          </c:tx>
          <c:cat>
            <c:strRef>
              <c:strCache>
                <c:pt idx="0"><c:v>Q1</c:v></c:pt>
                <c:pt idx="1"><c:v>Q2</c:v></c:pt>
              </c:strCache>
            </c:strRef>
          </c:cat>
          <c:val>
            <c:numRef>
              <c:numCache>
                <c:pt idx="0"><c:v>100</c:v></c:pt>
                <c:pt idx="1"><c:v>150</c:v></c:pt>
              </c:numCache>
            </c:numRef>
          </c:val>
        </c:ser>
        <c:ser>
          <c:val>
            <c:numRef>
              <c:numCache>
                <c:pt idx="1"><c:v>180</c:v></c:pt>
              </c:numCache>
            </c:numRef>
          </c:val>
        </c:ser>
      </c:barChart>
    </c:plotArea>
  </c:chart>
</c:chartSpace>"#;

        let chart = parse_chart_xml(xml).unwrap();

        assert_eq!(chart.chart_type, Some(ChartType::Bar));
        assert_eq!(chart.title.as_deref(), Some("Revenue"));
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].key, "2010");
        assert_eq!(chart.series[0].category_labels, vec!["Q1", "Q2"]);
        assert_eq!(
            chart.series[0].values,
            vec![ChartValue::Value(100.0), ChartValue::Value(150.0)]
        );
        assert_eq!(chart.series[1].key, "Series 2");
        assert_eq!(
            chart.series[1].values,
            vec![ChartValue::Value(0.0), ChartValue::Value(180.0)]
        );
    }

    #[test]
    fn test_parse_scatter_chart() {
        let xml = r#"<c:chartSpace xmlns:c="c"><c:chart><c:plotArea>
          <c:scatterChart>
            <c:ser>
              <c:tx><c:v>Points</c:v></c:tx>
              <c:xVal><c:numRef><c:numCache>
                <c:pt idx="0"><c:v>0.5</c:v></c:pt>
                <c:pt idx="1"><c:v>1.5</c:v></c:pt>
              </c:numCache></c:numRef></c:xVal>
              <c:yVal><c:numRef><c:numCache>
                <c:pt idx="0"><c:v>2</c:v></c:pt>
                <c:pt idx="1"><c:v>4</c:v></c:pt>
              </c:numCache></c:numRef></c:yVal>
            </c:ser>
          </c:scatterChart>
        </c:plotArea></c:chart></c:chartSpace>"#;

        let chart = parse_chart_xml(xml).unwrap();
        assert_eq!(chart.chart_type, Some(ChartType::Scatter));
        assert_eq!(chart.series[0].key, "Points");
        assert_eq!(
            chart.series[0].values,
            vec![
                ChartValue::Point { x: 0.5, y: 2.0 },
                ChartValue::Point { x: 1.5, y: 4.0 }
            ]
        );
    }

    #[test]
    fn test_doughnut_is_pie() {
        let xml = r#"<c:chartSpace xmlns:c="c"><c:chart><c:plotArea>
          <c:doughnutChart><c:ser><c:val><c:numLit><c:pt idx="0"><c:v>3</c:v></c:pt></c:numLit></c:val></c:ser></c:doughnutChart>
        </c:plotArea></c:chart></c:chartSpace>"#;
        let chart = parse_chart_xml(xml).unwrap();
        assert_eq!(chart.chart_type, Some(ChartType::Pie));
        assert!(!chart.is_empty());
    }

    #[test]
    fn test_unsupported_family() {
        let xml = r#"<c:chartSpace xmlns:c="c"><c:chart><c:plotArea>
          <c:radarChart><c:ser><c:val><c:numLit><c:pt idx="0"><c:v>3</c:v></c:pt></c:numLit></c:val></c:ser></c:radarChart>
        </c:plotArea></c:chart></c:chartSpace>"#;
        let chart = parse_chart_xml(xml).unwrap();
        assert_eq!(chart.chart_type, None);
        assert!(chart.is_empty());
    }

    #[test]
    fn test_axis_title_is_not_chart_title() {
        let xml = r#"<c:chartSpace xmlns:c="c" xmlns:a="a"><c:chart>
          <c:title><c:tx><c:rich><a:p><a:r><a:t>Revenue</a:t></a:r></a:p></c:rich></c:tx></c:title>
          <c:plotArea>
            <c:barChart><c:ser><c:val><c:numLit><c:pt idx="0"><c:v>3</c:v></c:pt></c:numLit></c:val></c:ser></c:barChart>
            <c:catAx><c:title><c:tx><c:rich><a:p><a:r><a:t>Quarter</a:t></a:r></a:p></c:rich></c:tx></c:title></c:catAx>
            <c:valAx><c:title><c:tx><c:rich><a:p><a:r><a:t>Units</a:t></a:r></a:p></c:rich></c:tx></c:title></c:valAx>
          </c:plotArea>
        </c:chart></c:chartSpace>"#;
        let chart = parse_chart_xml(xml).unwrap();
        assert_eq!(chart.title.as_deref(), Some("Revenue"));

        let untitled = r#"<c:chartSpace xmlns:c="c" xmlns:a="a"><c:chart><c:plotArea>
            <c:barChart><c:ser><c:val><c:numLit><c:pt idx="0"><c:v>3</c:v></c:pt></c:numLit></c:val></c:ser></c:barChart>
            <c:valAx><c:title><c:tx><c:rich><a:p><a:r><a:t>Units</a:t></a:r></a:p></c:rich></c:tx></c:title></c:valAx>
        </c:plotArea></c:chart></c:chartSpace>"#;
        assert_eq!(parse_chart_xml(untitled).unwrap().title, None);
    }

    #[test]
    fn test_point_index_bounded_by_count() {
        let xml = r#"<c:chartSpace xmlns:c="c"><c:chart><c:plotArea>
          <c:lineChart><c:ser>
            <c:cat><c:strRef><c:strCache><c:ptCount val="1"/>
              <c:pt idx="0"><c:v>Q1</c:v></c:pt>
              <c:pt idx="20000000"><c:v>Q9</c:v></c:pt>
            </c:strCache></c:strRef></c:cat>
            <c:val><c:numRef><c:numCache><c:ptCount val="1"/>
              <c:pt idx="0"><c:v>4</c:v></c:pt>
              <c:pt idx="20000000"><c:v>9</c:v></c:pt>
            </c:numCache></c:numRef></c:val>
          </c:ser></c:lineChart>
        </c:plotArea></c:chart></c:chartSpace>"#;
        let chart = parse_chart_xml(xml).unwrap();
        assert_eq!(chart.series[0].values, vec![ChartValue::Value(4.0)]);
        assert_eq!(chart.series[0].category_labels, vec!["Q1"]);
    }

    #[test]
    fn test_point_index_capped_without_count() {
        let xml = r#"<c:chartSpace xmlns:c="c"><c:chart><c:plotArea>
          <c:barChart><c:ser><c:val><c:numLit>
            <c:pt idx="1"><c:v>2</c:v></c:pt>
            <c:pt idx="20000000"><c:v>9</c:v></c:pt>
          </c:numLit></c:val></c:ser></c:barChart>
        </c:plotArea></c:chart></c:chartSpace>"#;
        let chart = parse_chart_xml(xml).unwrap();
        assert_eq!(
            chart.series[0].values,
            vec![ChartValue::Value(0.0), ChartValue::Value(2.0)]
        );
    }
}
