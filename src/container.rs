//! ZIP container abstraction for the presentation package.
//!
//! Parts are read lazily and memoized per path for the lifetime of one
//! conversion: parsed XML trees, relationship maps and embedded media encoded
//! as data URIs each have their own cache.

use crate::error::{Error, Result};
use crate::model::Metadata;
use crate::xml::Node;
use base64::Engine;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use std::rc::Rc;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Part the relationships belong to; relative targets resolve against it.
    pub source: String,
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
    /// Map from relationship type to list of relationships
    pub by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection for the given source part.
    pub fn for_part(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Get relationships whose type URI ends with `/{suffix}`.
    ///
    /// Transitional and strict packages use different type URI roots.
    pub fn get_by_type_suffix(&self, suffix: &str) -> Vec<&Relationship> {
        let mut found: Vec<&Relationship> = self
            .by_type
            .iter()
            .filter(|(t, _)| t.rsplit('/').next() == Some(suffix))
            .flat_map(|(_, rels)| rels.iter())
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Resolve the package path of an internal relationship target.
    pub fn target_path(&self, id: &str) -> Option<String> {
        let rel = self.get(id)?;
        if rel.external {
            return None;
        }
        Some(OoxmlContainer::resolve_path(&self.source, &rel.target))
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// When we decode UTF-16 XML to a Rust String (UTF-8), the XML declaration
/// still says encoding="UTF-16". This causes quick-xml to fail when it tries
/// to re-interpret the already-decoded UTF-8 string as UTF-16.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16(&bytes[2..], u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16(&bytes[2..], u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM has a zero byte in every ASCII code unit
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let len = bytes.len() & !1;
    let units = (0..len).step_by(2).map(|i| unit([bytes[i], bytes[i + 1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// MIME type for a media part, from its extension.
pub fn mime_type_for(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        "webp" => "image/webp",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "ogg" => "audio/ogg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "mov" => "video/quicktime",
        "wma" => "audio/x-ms-wma",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// OOXML container abstraction over a ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    parts: RefCell<HashMap<String, Option<Rc<Node>>>>,
    rels: RefCell<HashMap<String, Rc<Relationships>>>,
    media: RefCell<HashMap<String, Option<Rc<str>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unslide::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("deck.pptx")?;
    /// # Ok::<(), unslide::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
            parts: RefCell::new(HashMap::new()),
            rels: RefCell::new(HashMap::new()),
            media: RefCell::new(HashMap::new()),
        })
    }

    /// Create an OOXML container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an XML file from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary file from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a file exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let result = archive.file_names().any(|n| n == path);
        result
    }

    /// List all files in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// List files matching a prefix.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Parsed XML tree of a part, or `None` when the part is absent or unparsable.
    pub fn part(&self, path: &str) -> Option<Rc<Node>> {
        if let Some(cached) = self.parts.borrow().get(path) {
            return cached.clone();
        }

        let parsed = match self.read_xml(path) {
            Ok(xml) => match Node::parse(&xml) {
                Ok(node) => Some(Rc::new(node)),
                Err(e) => {
                    log::debug!("part {} is not well-formed XML: {}", path, e);
                    None
                }
            },
            Err(_) => {
                log::debug!("part {} is not present in the package", path);
                None
            }
        };

        self.parts
            .borrow_mut()
            .insert(path.to_string(), parsed.clone());
        parsed
    }

    /// Relationships of a part; empty when the part has no `.rels` sidecar.
    pub fn relationships(&self, part_path: &str) -> Rc<Relationships> {
        if let Some(cached) = self.rels.borrow().get(part_path) {
            return Rc::clone(cached);
        }
        let rels = Rc::new(self.read_relationships(part_path));
        self.rels
            .borrow_mut()
            .insert(part_path.to_string(), Rc::clone(&rels));
        rels
    }

    /// Read and parse relationships from the `.rels` file of a part.
    pub fn read_relationships(&self, part_path: &str) -> Relationships {
        let rels_path = Self::rels_path(part_path);
        let mut rels = Relationships::for_part(part_path);

        let Some(root) = self.part(&rels_path) else {
            return rels;
        };

        for entry in root.children_named("Relationship") {
            let (Some(id), Some(target)) = (entry.attr("Id"), entry.attr("Target")) else {
                continue;
            };
            rels.add(Relationship {
                id: id.to_string(),
                rel_type: entry.attr("Type").unwrap_or_default().to_string(),
                target: target.to_string(),
                external: entry
                    .attr("TargetMode")
                    .map(|m| m.eq_ignore_ascii_case("external"))
                    .unwrap_or(false),
            });
        }

        rels
    }

    /// Path of the `.rels` sidecar for a part.
    pub fn rels_path(part_path: &str) -> String {
        if part_path.is_empty() || part_path == "/" {
            return "_rels/.rels".to_string();
        }
        match part_path.rfind('/') {
            Some(slash) => format!(
                "{}/_rels/{}.rels",
                &part_path[..slash],
                &part_path[slash + 1..]
            ),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Media part encoded as a `data:` URI, memoized per path.
    pub fn data_uri(&self, path: &str) -> Option<Rc<str>> {
        if let Some(cached) = self.media.borrow().get(path) {
            return cached.clone();
        }

        let encoded = match self.read_binary(path) {
            Ok(bytes) => {
                let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
                Some(Rc::from(format!("data:{};base64,{}", mime_type_for(path), b64)))
            }
            Err(_) => {
                log::debug!("media part {} is missing", path);
                None
            }
        };

        self.media
            .borrow_mut()
            .insert(path.to_string(), encoded.clone());
        encoded
    }

    /// Parse core metadata from docProps/core.xml.
    pub fn parse_core_metadata(&self) -> Metadata {
        let mut meta = Metadata::default();

        if let Some(root) = self.part("docProps/core.xml") {
            for child in root.children() {
                let text = child.text().trim().to_string();
                if text.is_empty() {
                    continue;
                }
                match child.local_name() {
                    "title" => meta.title = Some(text),
                    "creator" => meta.author = Some(text),
                    "subject" => meta.subject = Some(text),
                    "lastModifiedBy" => meta.last_modified_by = Some(text),
                    "created" => meta.created = Some(text),
                    "modified" => meta.modified = Some(text),
                    _ => {}
                }
            }
        }

        meta
    }

    /// Resolve a relative path from a base path.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .field("cached_parts", &self.parts.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn package(files: &[(&str, &[u8])]) -> OoxmlContainer {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            for (name, data) in files {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
            zip.finish().unwrap();
        }
        OoxmlContainer::from_bytes(buffer).unwrap()
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn test_rels_path() {
        assert_eq!(
            OoxmlContainer::rels_path("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(OoxmlContainer::rels_path(""), "_rels/.rels");
    }

    #[test]
    fn test_relationships_collection() {
        let mut rels = Relationships::for_part("ppt/slides/slide1.xml");
        rels.add(Relationship {
            id: "rId1".to_string(),
            rel_type: "http://schemas/relationships/slideLayout".to_string(),
            target: "../slideLayouts/slideLayout1.xml".to_string(),
            external: false,
        });
        rels.add(Relationship {
            id: "rId2".to_string(),
            rel_type: "http://schemas/relationships/hyperlink".to_string(),
            target: "https://example.com".to_string(),
            external: true,
        });

        assert_eq!(rels.get_by_type_suffix("slideLayout").len(), 1);
        assert_eq!(
            rels.target_path("rId1").as_deref(),
            Some("ppt/slideLayouts/slideLayout1.xml")
        );
        assert_eq!(rels.target_path("rId2"), None);
        assert!(rels.get("rId3").is_none());
    }

    #[test]
    fn test_part_cache_and_missing_parts() {
        let container = package(&[
            ("ppt/a.xml", b"<root><child/></root>"),
            ("ppt/broken.xml", b"<root><child></root>"),
        ]);

        let first = container.part("ppt/a.xml").unwrap();
        let second = container.part("ppt/a.xml").unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        assert!(container.part("ppt/missing.xml").is_none());
        assert!(container.part("ppt/broken.xml").is_none());
    }

    #[test]
    fn test_read_relationships_from_package() {
        let container = package(&[(
            "ppt/slides/_rels/slide1.xml.rels",
            br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://x/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="http://x/image" Target="../media/image1.png"/>
</Relationships>"#,
        )]);

        let rels = container.relationships("ppt/slides/slide1.xml");
        assert_eq!(rels.by_id.len(), 2);
        assert_eq!(
            rels.target_path("rId2").as_deref(),
            Some("ppt/media/image1.png")
        );

        let none = container.relationships("ppt/slides/slide9.xml");
        assert!(none.is_empty());
    }

    #[test]
    fn test_data_uri() {
        let container = package(&[("ppt/media/image1.png", &[1u8, 2, 3])]);
        let uri = container.data_uri("ppt/media/image1.png").unwrap();
        assert_eq!(&*uri, "data:image/png;base64,AQID");
        assert!(container.data_uri("ppt/media/missing.png").is_none());
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");
    }
}
