//! Package kind detection.
//!
//! Only presentations are converted; other Office Open XML packages are
//! recognized so they can be rejected with a precise error.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content types of the main part of each package kind.
const MAIN_CONTENT_TYPES: [(&str, PackageKind); 6] = [
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        PackageKind::Presentation,
    ),
    (
        "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml",
        PackageKind::Presentation,
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml",
        PackageKind::Presentation,
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml",
        PackageKind::Presentation,
    ),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        PackageKind::WordDocument,
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        PackageKind::Workbook,
    ),
];

/// Kind of Office Open XML package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// PowerPoint presentation, show or template
    Presentation,
    /// Word document
    WordDocument,
    /// Excel workbook
    Workbook,
}

impl PackageKind {
    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            PackageKind::Presentation => "PowerPoint Presentation",
            PackageKind::WordDocument => "Word Document",
            PackageKind::Workbook => "Excel Workbook",
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Detect the kind of an opened package.
///
/// `[Content_Types].xml` decides; packages without a recognizable main part
/// fall back to their folder layout.
pub fn detect_package(package: &OoxmlContainer) -> Result<PackageKind> {
    if let Some(types) = package.part("[Content_Types].xml") {
        let declared = types
            .children_named("Override")
            .filter_map(|o| o.attr("ContentType"))
            .find_map(|ct| {
                MAIN_CONTENT_TYPES
                    .iter()
                    .find(|(main, _)| *main == ct)
                    .map(|(_, kind)| *kind)
            });
        if let Some(kind) = declared {
            return Ok(kind);
        }
    } else {
        log::debug!("package has no [Content_Types].xml, checking folders");
    }

    let has = |prefix: &str| !package.list_files_with_prefix(prefix).is_empty();
    match (has("ppt/"), has("word/"), has("xl/")) {
        (true, false, false) => Ok(PackageKind::Presentation),
        (false, true, false) => Ok(PackageKind::WordDocument),
        (false, false, true) => Ok(PackageKind::Workbook),
        _ => Err(Error::UnknownFormat),
    }
}

/// Fail unless the package is a presentation.
pub fn ensure_presentation(package: &OoxmlContainer) -> Result<()> {
    match detect_package(package)? {
        PackageKind::Presentation => Ok(()),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn package(files: &[(&str, &str)]) -> OoxmlContainer {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, content) in files {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let bytes = zip.finish().unwrap().into_inner();
        OoxmlContainer::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_package_kind_display() {
        assert_eq!(PackageKind::Presentation.to_string(), "PowerPoint Presentation");
        assert_eq!(PackageKind::WordDocument.to_string(), "Word Document");
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B])); // Too short
    }

    #[test]
    fn test_detect_from_content_types() {
        let pptx = package(&[(
            "[Content_Types].xml",
            r#"<Types><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/></Types>"#,
        )]);
        assert_eq!(detect_package(&pptx).unwrap(), PackageKind::Presentation);
        assert!(ensure_presentation(&pptx).is_ok());

        let docx = package(&[(
            "[Content_Types].xml",
            r#"<Types><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
        )]);
        assert!(matches!(
            ensure_presentation(&docx),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detect_by_folders() {
        let pptx = package(&[("ppt/presentation.xml", "<p:presentation/>")]);
        assert_eq!(detect_package(&pptx).unwrap(), PackageKind::Presentation);

        let unknown = package(&[("readme.txt", "hello")]);
        assert!(matches!(detect_package(&unknown), Err(Error::UnknownFormat)));
    }
}
