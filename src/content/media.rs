//! Audio and video attached to pictures.
//!
//! A media shape is a `p:pic` whose non-visual properties carry an
//! `a:videoFile` or `a:audioFile` link; the picture itself is the poster
//! frame. Media is only embedded when enabled in the options, otherwise the
//! poster is drawn.

use crate::render::{escape_html, Env, RenderState};
use std::fmt;

const VIDEO_FORMATS: [&str; 4] = ["mp4", "webm", "ogg", "ogv"];
const AUDIO_FORMATS: [&str; 3] = ["mp3", "wav", "ogg"];

const MEDIA_CSS: &str = "display:block;width:100%;height:100%;";
const UNSUPPORTED_CSS: &str = "display:flex;align-items:center;justify-content:center;width:100%;height:100%;background-color:#000000;color:#FFFFFF;font-size:12px;";

/// Kind of linked media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    fn tag(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Whether a file extension can be played by this kind of element.
    pub fn supports(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        match self {
            MediaKind::Video => VIDEO_FORMATS.contains(&extension.as_str()),
            MediaKind::Audio => AUDIO_FORMATS.contains(&extension.as_str()),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn extension(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.contains('/') => ext,
        _ => "",
    }
}

/// Markup for the media of a picture, or `None` to draw the poster image.
pub fn render_media(env: &Env<'_>, state: &mut RenderState, pic: &crate::xml::Node) -> Option<String> {
    let nv_pr = pic.get(&["p:nvPicPr", "p:nvPr"])?;
    let (kind, link) = match (nv_pr.child("a:videoFile"), nv_pr.child("a:audioFile")) {
        (Some(video), _) => (MediaKind::Video, video),
        (None, Some(audio)) => (MediaKind::Audio, audio),
        (None, None) => return None,
    };
    if !env.options.media_process {
        log::trace!("{} not embedded, drawing its poster", kind);
        return None;
    }

    let rel = link.attr("r:link").and_then(|id| env.part.rels.get(id))?;
    let src = if rel.external {
        rel.target.clone()
    } else {
        let path = env.target_path(&rel.id)?;
        if !kind.supports(extension(&path)) {
            log::warn!("unsupported {} format: {}", kind, path);
            return Some(format!(
                "<div{}>Unsupported {} format</div>",
                state.styles.class_attr(UNSUPPORTED_CSS),
                kind
            ));
        }
        env.package.data_uri(&path)?.to_string()
    };

    Some(format!(
        "<{tag}{class} src=\"{src}\" controls></{tag}>",
        tag = kind.tag(),
        class = state.styles.class_attr(MEDIA_CSS),
        src = escape_html(&src)
    ))
}
