//! Conversion result structures and host collaborator traits.

use super::ChartRequest;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Document metadata from docProps/core.xml and docProps/app.xml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document author/creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Document subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Last modified by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,

    /// Creation date (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Last modification date (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,

    /// Application that created the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    /// Slide count declared in docProps/app.xml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_slides: Option<u32>,

    /// Hidden slide count declared in docProps/app.xml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_slides: Option<u32>,
}

/// Package-level information about the converted presentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationInfo {
    /// Slide width in device units
    pub width: f64,
    /// Slide height in device units
    pub height: f64,
    /// Number of slides converted
    pub slide_count: usize,
    /// Document metadata
    pub metadata: Metadata,
    /// Package thumbnail as a data URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Markup of one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideFragment {
    /// 1-based slide number in presentation order
    pub slide_number: u32,
    /// Slide HTML fragment
    pub html: String,
}

/// Result of converting one presentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Slide fragments ordered by slide number
    pub slides: Vec<SlideFragment>,
    /// Aggregate stylesheet for every fragment
    pub stylesheet: String,
    /// Charts for the host to render after mounting
    pub charts: Vec<ChartRequest>,
    /// Presentation-level info
    pub info: PresentationInfo,
}

/// A display surface that receives converted slides.
pub trait MountTarget {
    /// Install the aggregate stylesheet.
    fn mount_stylesheet(&mut self, css: &str);

    /// Append one slide fragment.
    fn mount_slide(&mut self, slide: &SlideFragment);
}

/// A charting backend that renders queued chart requests.
pub trait ChartRenderer {
    /// Render one chart into the element named by `request.target_id`.
    fn render_chart(&mut self, request: &ChartRequest);
}

impl Conversion {
    /// Mount stylesheet and slides into a host surface.
    ///
    /// This is the only fatal step after conversion: it fails when no target
    /// surface is given.
    pub fn mount(&self, target: Option<&mut dyn MountTarget>) -> Result<()> {
        let target = target.ok_or(Error::MountTargetMissing)?;
        target.mount_stylesheet(&self.stylesheet);
        for slide in &self.slides {
            target.mount_slide(slide);
        }
        Ok(())
    }

    /// Hand every queued chart request to a charting backend, in queue order.
    pub fn dispatch_charts(&self, renderer: &mut dyn ChartRenderer) {
        for request in &self.charts {
            renderer.render_chart(request);
        }
    }

    /// Number of converted slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether no slides were converted.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChartSeries, ChartType};

    #[derive(Default)]
    struct Surface {
        css: String,
        slides: Vec<u32>,
    }

    impl MountTarget for Surface {
        fn mount_stylesheet(&mut self, css: &str) {
            self.css = css.to_string();
        }

        fn mount_slide(&mut self, slide: &SlideFragment) {
            self.slides.push(slide.slide_number);
        }
    }

    struct Recorder(Vec<String>);

    impl ChartRenderer for Recorder {
        fn render_chart(&mut self, request: &ChartRequest) {
            self.0.push(request.target_id.clone());
        }
    }

    fn sample() -> Conversion {
        Conversion {
            slides: vec![
                SlideFragment {
                    slide_number: 1,
                    html: "<div></div>".to_string(),
                },
                SlideFragment {
                    slide_number: 2,
                    html: "<div></div>".to_string(),
                },
            ],
            stylesheet: "._css_0{color:red;}".to_string(),
            charts: vec![ChartRequest {
                target_id: "chart0".to_string(),
                chart_type: ChartType::Line,
                series_data: vec![ChartSeries {
                    key: "a".to_string(),
                    values: Vec::new(),
                    category_labels: Vec::new(),
                }],
                title: None,
            }],
            info: PresentationInfo::default(),
        }
    }

    #[test]
    fn test_mount_without_target_fails() {
        let conversion = sample();
        assert!(matches!(
            conversion.mount(None),
            Err(Error::MountTargetMissing)
        ));
    }

    #[test]
    fn test_mount_into_surface() {
        let conversion = sample();
        let mut surface = Surface::default();
        conversion.mount(Some(&mut surface)).unwrap();
        assert_eq!(surface.slides, vec![1, 2]);
        assert!(surface.css.contains("_css_0"));
    }

    #[test]
    fn test_dispatch_charts() {
        let conversion = sample();
        let mut recorder = Recorder(Vec::new());
        conversion.dispatch_charts(&mut recorder);
        assert_eq!(recorder.0, vec!["chart0".to_string()]);
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = Metadata {
            title: Some("Quarterly Review".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("Quarterly Review"));
        assert!(!json.contains("subject"));
    }
}
