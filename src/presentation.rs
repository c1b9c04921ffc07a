//! Package-level presentation data.
//!
//! Built once per conversion: the ordered slide part list, slide size,
//! default text style, table styles and document info.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::{Metadata, PresentationInfo};
use crate::render::options::ConvertOptions;
use crate::xml::Node;
use std::rc::Rc;

/// Presentation part path.
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";
/// Table style part path.
pub const TABLE_STYLES_PART: &str = "ppt/tableStyles.xml";

const SLIDE_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Default slide size (16:9) in EMU.
const DEFAULT_SLIDE_WIDTH_EMU: f64 = 12192000.0;
const DEFAULT_SLIDE_HEIGHT_EMU: f64 = 6858000.0;

/// Resolved presentation: slide order, size and shared styles.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Slide part paths in presentation order
    pub slides: Vec<String>,
    /// Slide width in device units
    pub width: f64,
    /// Slide height in device units
    pub height: f64,
    root: Option<Rc<Node>>,
    table_styles: Option<Rc<Node>>,
}

impl Presentation {
    /// Load presentation-level data from the package.
    pub fn load(package: &OoxmlContainer, options: &ConvertOptions) -> Result<Self> {
        let root = package.part(PRESENTATION_PART);

        let mut slides = root
            .as_deref()
            .map(|root| Self::slides_from_list(package, root))
            .unwrap_or_default();
        if slides.is_empty() {
            slides = Self::slides_from_content_types(package)?;
        }

        let size = root.as_deref().and_then(|r| r.child("p:sldSz"));
        let width = size
            .and_then(|s| s.attr_f64("cx"))
            .unwrap_or(DEFAULT_SLIDE_WIDTH_EMU);
        let height = size
            .and_then(|s| s.attr_f64("cy"))
            .unwrap_or(DEFAULT_SLIDE_HEIGHT_EMU);

        log::debug!("presentation has {} slides", slides.len());

        Ok(Self {
            slides,
            width: options.emu(width),
            height: options.emu(height),
            root,
            table_styles: package.part(TABLE_STYLES_PART),
        })
    }

    /// Slide order from `p:sldIdLst`, resolved through the presentation rels.
    fn slides_from_list(package: &OoxmlContainer, root: &Node) -> Vec<String> {
        let rels = package.relationships(PRESENTATION_PART);
        let Some(list) = root.child("p:sldIdLst") else {
            return Vec::new();
        };
        list.children_named("p:sldId")
            .filter_map(|id| id.attr("r:id"))
            .filter_map(|rel_id| rels.target_path(rel_id))
            .collect()
    }

    /// Slide parts declared in `[Content_Types].xml`, ordered by number.
    fn slides_from_content_types(package: &OoxmlContainer) -> Result<Vec<String>> {
        let types = package
            .part("[Content_Types].xml")
            .ok_or_else(|| Error::MissingComponent("[Content_Types].xml".to_string()))?;

        let mut slides: Vec<String> = types
            .children_named("Override")
            .filter(|o| o.attr("ContentType") == Some(SLIDE_CONTENT_TYPE))
            .filter_map(|o| o.attr("PartName"))
            .map(|p| p.trim_start_matches('/').to_string())
            .collect();
        slides.sort_by_key(|p| slide_number_of(p));
        Ok(slides)
    }

    /// `p:defaultTextStyle` of the presentation part.
    pub fn default_text_style(&self) -> Option<&Node> {
        self.root.as_deref()?.child("p:defaultTextStyle")
    }

    /// Table style by `a:tableStyleId`, from `ppt/tableStyles.xml`.
    pub fn table_style(&self, style_id: &str) -> Option<&Node> {
        self.table_styles
            .as_deref()?
            .children_named("a:tblStyle")
            .find(|s| s.attr("styleId") == Some(style_id))
    }

    /// Document info: size, metadata and thumbnail.
    pub fn info(&self, package: &OoxmlContainer) -> PresentationInfo {
        let mut metadata = package.parse_core_metadata();
        read_app_properties(package, &mut metadata);

        PresentationInfo {
            width: self.width,
            height: self.height,
            slide_count: self.slides.len(),
            metadata,
            thumbnail: thumbnail(package).map(|t| t.to_string()),
        }
    }
}

/// Number in a part name like `ppt/slides/slide12.xml`.
fn slide_number_of(path: &str) -> u32 {
    let stem = path.rsplit('/').next().unwrap_or(path);
    stem.trim_end_matches(".xml")
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(u32::MAX)
}

/// Application name and slide counts from `docProps/app.xml`.
fn read_app_properties(package: &OoxmlContainer, metadata: &mut Metadata) {
    let Some(app) = package.part("docProps/app.xml") else {
        return;
    };
    for child in app.children() {
        let text = child.text().trim();
        if text.is_empty() {
            continue;
        }
        match child.local_name() {
            "Application" => metadata.application = Some(text.to_string()),
            "Slides" => metadata.declared_slides = text.parse().ok(),
            "HiddenSlides" => metadata.hidden_slides = text.parse().ok(),
            _ => {}
        }
    }
}

/// Package thumbnail as a data URI.
fn thumbnail(package: &OoxmlContainer) -> Option<Rc<str>> {
    let root_rels = package.relationships("");
    let path = root_rels
        .get_by_type_suffix("thumbnail")
        .first()
        .map(|r| r.target.trim_start_matches('/').to_string())
        .unwrap_or_else(|| "docProps/thumbnail.jpeg".to_string());
    package.data_uri(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(files: &[(&str, &str)]) -> OoxmlContainer {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            for (name, content) in files {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        OoxmlContainer::from_bytes(buffer).unwrap()
    }

    const PRESENTATION: &str = r#"<p:presentation xmlns:p="p" xmlns:r="r" xmlns:a="a">
        <p:sldIdLst><p:sldId id="257" r:id="rId3"/><p:sldId id="256" r:id="rId2"/></p:sldIdLst>
        <p:sldSz cx="9144000" cy="6858000"/>
        <p:defaultTextStyle><a:lvl1pPr algn="l"/></p:defaultTextStyle>
      </p:presentation>"#;

    const PRESENTATION_RELS: &str = r#"<Relationships>
        <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
        <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/>
      </Relationships>"#;

    #[test]
    fn test_slide_order_follows_id_list() {
        let pkg = package(&[
            ("ppt/presentation.xml", PRESENTATION),
            ("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS),
        ]);
        let pres = Presentation::load(&pkg, &ConvertOptions::default()).unwrap();
        assert_eq!(pres.slides, vec!["ppt/slides/slide2.xml", "ppt/slides/slide1.xml"]);
        assert!((pres.width - 960.0).abs() < 1e-9);
        assert!((pres.height - 720.0).abs() < 1e-9);
        assert!(pres.default_text_style().is_some());
    }

    #[test]
    fn test_content_types_fallback() {
        let types = r#"<Types>
            <Override PartName="/ppt/slides/slide10.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
            <Override PartName="/ppt/slides/slide2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
            <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
          </Types>"#;
        let pkg = package(&[("[Content_Types].xml", types)]);
        let pres = Presentation::load(&pkg, &ConvertOptions::default()).unwrap();
        assert_eq!(pres.slides, vec!["ppt/slides/slide2.xml", "ppt/slides/slide10.xml"]);
        assert!((pres.width - 1280.0).abs() < 1e-9);
    }

    #[test]
    fn test_info_reads_app_properties() {
        let app = r#"<Properties><Application>Microsoft Office PowerPoint</Application><Slides>2</Slides><HiddenSlides>1</HiddenSlides></Properties>"#;
        let core = r#"<cp:coreProperties xmlns:cp="cp" xmlns:dc="dc"><dc:title>Deck</dc:title></cp:coreProperties>"#;
        let pkg = package(&[
            ("ppt/presentation.xml", PRESENTATION),
            ("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS),
            ("docProps/app.xml", app),
            ("docProps/core.xml", core),
            ("docProps/thumbnail.jpeg", "jpeg"),
        ]);
        let pres = Presentation::load(&pkg, &ConvertOptions::default()).unwrap();
        let info = pres.info(&pkg);
        assert_eq!(info.slide_count, 2);
        assert_eq!(info.metadata.title.as_deref(), Some("Deck"));
        assert_eq!(info.metadata.application.as_deref(), Some("Microsoft Office PowerPoint"));
        assert_eq!(info.metadata.declared_slides, Some(2));
        assert_eq!(info.metadata.hidden_slides, Some(1));
        assert!(info.thumbnail.unwrap().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_table_style_lookup() {
        let styles = r#"<a:tblStyleLst xmlns:a="a" def="{A}"><a:tblStyle styleId="{B}" styleName="Medium"/></a:tblStyleLst>"#;
        let pkg = package(&[
            ("ppt/presentation.xml", PRESENTATION),
            ("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS),
            ("ppt/tableStyles.xml", styles),
        ]);
        let pres = Presentation::load(&pkg, &ConvertOptions::default()).unwrap();
        assert_eq!(
            pres.table_style("{B}").and_then(|s| s.attr("styleName")),
            Some("Medium")
        );
        assert!(pres.table_style("{A}").is_none());
    }

    #[test]
    fn test_slide_number_of() {
        assert_eq!(slide_number_of("ppt/slides/slide12.xml"), 12);
        assert_eq!(slide_number_of("ppt/slides/other.xml"), u32::MAX);
    }
}
