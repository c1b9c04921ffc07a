//! # unslide
//!
//! PowerPoint (PPTX) presentations to styled HTML.
//!
//! Every slide becomes a self-contained HTML fragment. Visual styles are
//! deduplicated into one stylesheet of generated classes shared by all
//! fragments, shapes are drawn as inline SVG and charts are handed to the
//! host as a queue of [`ChartRequest`]s for its charting library.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unslide::{convert_file, to_html_document, ConvertOptions};
//!
//! let conversion = convert_file("deck.pptx", &ConvertOptions::default())?;
//! println!("{} slides, {} charts", conversion.len(), conversion.charts.len());
//!
//! // Standalone page
//! std::fs::write("deck.html", to_html_document(&conversion))?;
//! # Ok::<(), unslide::Error>(())
//! ```
//!
//! ## Mounting into a host
//!
//! ```no_run
//! use unslide::{convert_file, ConvertOptions, MountTarget, SlideFragment};
//!
//! struct Page(String);
//!
//! impl MountTarget for Page {
//!     fn mount_stylesheet(&mut self, css: &str) {
//!         self.0.push_str(&format!("<style>{}</style>", css));
//!     }
//!     fn mount_slide(&mut self, slide: &SlideFragment) {
//!         self.0.push_str(&slide.html);
//!     }
//! }
//!
//! let conversion = convert_file("deck.pptx", &ConvertOptions::default())?;
//! let mut page = Page(String::new());
//! conversion.mount(Some(&mut page))?;
//! # Ok::<(), unslide::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: Async file loading with Tokio

pub mod container;
pub mod content;
pub mod context;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod model;
pub mod presentation;
pub mod render;
pub mod resolve;
pub mod style;
pub mod text;
pub mod xml;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::PackageKind;
pub use error::{Error, Result};
pub use model::{
    ChartRenderer, ChartRequest, ChartSeries, ChartType, ChartValue, Conversion, Metadata,
    MountTarget, PresentationInfo, SlideFragment,
};
pub use render::{to_html_document, to_json, ConvertOptions, JsonFormat, ThemeProcessing};

use std::io::{Read, Seek};
use std::path::Path;

/// Convert an opened package.
pub fn convert_package(package: &OoxmlContainer, options: &ConvertOptions) -> Result<Conversion> {
    detect::ensure_presentation(package)?;
    render::convert_package(package, options)
}

/// Convert a presentation file.
///
/// # Example
///
/// ```no_run
/// use unslide::{convert_file, ConvertOptions, ThemeProcessing};
///
/// let options = ConvertOptions::new().with_theme_processing(ThemeProcessing::None);
/// let conversion = convert_file("deck.pptx", &options)?;
/// for slide in &conversion.slides {
///     println!("slide {}: {} bytes", slide.slide_number, slide.html.len());
/// }
/// # Ok::<(), unslide::Error>(())
/// ```
pub fn convert_file(path: impl AsRef<Path>, options: &ConvertOptions) -> Result<Conversion> {
    let path = path.as_ref();
    log::debug!("converting {}", path.display());
    let package = OoxmlContainer::open(path)?;
    convert_package(&package, options)
}

/// Convert a presentation from bytes.
///
/// # Example
///
/// ```no_run
/// use unslide::{convert_bytes, ConvertOptions};
///
/// let data = std::fs::read("deck.pptx")?;
/// let conversion = convert_bytes(&data, &ConvertOptions::default())?;
/// # Ok::<(), unslide::Error>(())
/// ```
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<Conversion> {
    if !detect::is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    let package = OoxmlContainer::from_bytes(data.to_vec())?;
    convert_package(&package, options)
}

/// Convert a presentation from a reader.
pub fn convert_reader<R: Read + Seek>(reader: R, options: &ConvertOptions) -> Result<Conversion> {
    let package = OoxmlContainer::from_reader(reader)?;
    convert_package(&package, options)
}

/// Convert a presentation file, reading it asynchronously.
///
/// Only the file read is asynchronous; conversion itself runs on the
/// calling task.
#[cfg(feature = "async")]
pub async fn convert_file_async(
    path: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let data = tokio::fs::read(path.as_ref()).await?;
    convert_bytes(&data, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_bytes_rejects_non_zip() {
        let result = convert_bytes(b"not a presentation", &ConvertOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_convert_missing_file() {
        let result = convert_file("does-not-exist.pptx", &ConvertOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
