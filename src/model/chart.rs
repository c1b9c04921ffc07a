//! Chart request model.

use serde::{Deserialize, Serialize};

/// Chart family recognized in a chart part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    /// `c:lineChart`
    Line,
    /// `c:barChart` / `c:bar3DChart`
    Bar,
    /// `c:pieChart` / `c:doughnutChart`
    Pie,
    /// `c:pie3DChart`
    Pie3D,
    /// `c:areaChart`
    Area,
    /// `c:scatterChart`
    Scatter,
}

impl ChartType {
    /// Map a plot-area child element (local name) to a chart family.
    pub fn from_plot_element(local_name: &str) -> Option<Self> {
        match local_name {
            "lineChart" | "line3DChart" => Some(ChartType::Line),
            "barChart" | "bar3DChart" => Some(ChartType::Bar),
            "pieChart" | "doughnutChart" => Some(ChartType::Pie),
            "pie3DChart" => Some(ChartType::Pie3D),
            "areaChart" | "area3DChart" => Some(ChartType::Area),
            "scatterChart" => Some(ChartType::Scatter),
            _ => None,
        }
    }
}

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartValue {
    /// Value at a category position
    Value(f64),
    /// Scatter point
    Point {
        /// X coordinate
        x: f64,
        /// Y coordinate
        y: f64,
    },
}

/// A data series in a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Series name (legend label)
    pub key: String,
    /// Data values
    pub values: Vec<ChartValue>,
    /// Category labels (X-axis)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_labels: Vec<String>,
}

/// Request for the host to render a chart into an emitted placeholder element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    /// `id` attribute of the placeholder element in the slide markup
    pub target_id: String,
    /// Chart family
    pub chart_type: ChartType,
    /// Extracted series
    pub series_data: Vec<ChartSeries>,
    /// Chart title, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_element_mapping() {
        assert_eq!(ChartType::from_plot_element("barChart"), Some(ChartType::Bar));
        assert_eq!(ChartType::from_plot_element("pie3DChart"), Some(ChartType::Pie3D));
        assert_eq!(ChartType::from_plot_element("radarChart"), None);
    }

    #[test]
    fn test_request_serialization() {
        let request = ChartRequest {
            target_id: "chart0".to_string(),
            chart_type: ChartType::Scatter,
            series_data: vec![ChartSeries {
                key: "S1".to_string(),
                values: vec![ChartValue::Point { x: 1.0, y: 2.5 }],
                category_labels: Vec::new(),
            }],
            title: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"targetId\":\"chart0\""));
        assert!(json.contains("\"chartType\":\"scatter\""));
        assert!(json.contains("{\"x\":1.0,\"y\":2.5}"));
        assert!(!json.contains("categoryLabels"));
        assert!(!json.contains("title"));
    }
}
