//! Slide emission.
//!
//! Slides are converted in presentation order. Each slide becomes one
//! fixed-size box holding its background, the decoration shapes of its
//! master and layout (depending on [`ThemeProcessing`]) and its own shapes.

use super::{escape_html, Env, Layer, RenderState};
use crate::container::OoxmlContainer;
use crate::content::render_tree;
use crate::context::{ContextBuilder, PartTree, SlideContext};
use crate::error::Result;
use crate::model::{Conversion, SlideFragment};
use crate::presentation::Presentation;
use crate::render::options::{ConvertOptions, ThemeProcessing};
use crate::style::fill::{explicit_fill, reference_fill};
use crate::style::{px, Fill};

/// Styles of the standalone page around the slide fragments.
const PAGE_CSS: &str = "body{margin:0;padding:16px;background-color:#E5E5E5;}\n\
.unslide-page{margin:0 auto 16px auto;width:fit-content;box-shadow:0 1px 4px rgba(0,0,0,0.3);}\n";

/// Convert every slide of a package.
///
/// Fails only when the package is not a readable presentation; a slide
/// that cannot be read is emitted empty.
pub fn convert_package(package: &OoxmlContainer, options: &ConvertOptions) -> Result<Conversion> {
    let presentation = Presentation::load(package, options)?;
    let mut builder = ContextBuilder::new(package);
    let mut state = RenderState::new();
    let mut slides = Vec::with_capacity(presentation.slides.len());

    for (i, path) in presentation.slides.iter().enumerate() {
        let number = (i + 1) as u32;
        let html = match builder.build(number, path) {
            Some(slide) => render_slide(package, options, &presentation, &slide, &mut state),
            None => {
                log::warn!("slide {} ({}) could not be read, emitting it empty", number, path);
                empty_slide(&presentation, &mut state, number)
            }
        };
        slides.push(SlideFragment {
            slide_number: number,
            html,
        });
    }

    log::debug!(
        "converted {} slides with {} distinct styles and {} charts",
        slides.len(),
        state.styles.len(),
        state.charts.len()
    );

    Ok(Conversion {
        slides,
        stylesheet: state.styles.stylesheet(),
        charts: state.charts,
        info: presentation.info(package),
    })
}

fn slide_box_css(presentation: &Presentation) -> String {
    format!(
        "position:relative;overflow:hidden;width:{}px;height:{}px;",
        px(presentation.width),
        px(presentation.height)
    )
}

fn empty_slide(presentation: &Presentation, state: &mut RenderState, number: u32) -> String {
    let css = slide_box_css(presentation);
    format!(
        "<div{} data-slide-number=\"{}\"></div>",
        state.styles.class_attr(&css),
        number
    )
}

/// Parts that may supply the background, nearest first.
fn background_chain(slide: &SlideContext, mode: ThemeProcessing) -> Vec<(&PartTree, Layer)> {
    let mut chain = vec![(&slide.slide, Layer::Slide)];
    if mode != ThemeProcessing::None {
        if let Some(layout) = &slide.layout {
            chain.push((&layout.tree, Layer::Layout));
        }
        if let Some(master) = &slide.master {
            chain.push((&master.tree, Layer::Master));
        }
    }
    chain
}

/// Background fill of a slide.
///
/// `p:bgPr` declares a fill directly; `p:bgRef` points into the theme's
/// background fill list. Without any background the slide is painted with
/// the `bg1` scheme color.
fn background(env: &Env<'_>) -> Fill {
    for (part, layer) in background_chain(env.slide, env.options.theme_processing) {
        let Some(bg) = part.root.get(&["p:cSld", "p:bg"]) else {
            continue;
        };
        let part_env = env.for_part(part, layer);
        let cx = part_env.style();
        let fill = bg
            .child("p:bgPr")
            .and_then(|pr| explicit_fill(pr, &cx))
            .or_else(|| bg.child("p:bgRef").and_then(|r| reference_fill(r, &cx)));
        if let Some(fill) = fill {
            log::trace!("slide {} background from {:?}", env.slide.number, layer);
            return fill;
        }
    }
    Fill::Solid(env.slide.palette.scheme("bg1"))
}

/// Whether a part lets the shapes of the parts above it show through.
fn shows_master_shapes(part: &PartTree) -> bool {
    part.root.attr_bool("showMasterSp").unwrap_or(true)
}

fn render_slide(
    package: &OoxmlContainer,
    options: &ConvertOptions,
    presentation: &Presentation,
    slide: &SlideContext,
    state: &mut RenderState,
) -> String {
    let env = Env::new(package, options, presentation, slide, &slide.slide, Layer::Slide);

    let mut css = slide_box_css(presentation);
    css.push_str(&background(&env).css());
    let mut html = format!(
        "<div{} data-slide-number=\"{}\">",
        state.styles.class_attr(&css),
        slide.number
    );

    if options.theme_processing == ThemeProcessing::Full && shows_master_shapes(&slide.slide) {
        let layout = slide.layout.as_deref();
        if layout.map(|l| shows_master_shapes(&l.tree)).unwrap_or(true) {
            if let Some(master) = slide.master.as_deref() {
                html.push_str(&render_part(&env, state, &master.tree, Layer::Master));
            }
        }
        if let Some(layout) = layout {
            html.push_str(&render_part(&env, state, &layout.tree, Layer::Layout));
        }
    }

    if let Some(tree) = slide.slide.shape_tree() {
        html.push_str(&render_tree(&env, state, tree, None));
    }
    html.push_str("</div>");
    html
}

fn render_part(env: &Env<'_>, state: &mut RenderState, part: &PartTree, layer: Layer) -> String {
    let Some(tree) = part.shape_tree() else {
        return String::new();
    };
    let part_env = Env::new(
        env.package,
        env.options,
        env.presentation,
        env.slide,
        part,
        layer,
    );
    render_tree(&part_env, state, tree, None)
}

/// Standalone HTML page with every slide and the stylesheet.
///
/// Queued chart requests are embedded as JSON in a
/// `<script id="unslide-charts">` element for the host's charting code.
pub fn to_html_document(conversion: &Conversion) -> String {
    let title = conversion
        .info
        .metadata
        .title
        .as_deref()
        .unwrap_or("Presentation");

    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(PAGE_CSS);
    html.push_str(&conversion.stylesheet);
    html.push_str("</style>\n</head>\n<body>\n");

    for slide in &conversion.slides {
        html.push_str("<div class=\"unslide-page\">");
        html.push_str(&slide.html);
        html.push_str("</div>\n");
    }

    if !conversion.charts.is_empty() {
        match serde_json::to_string(&conversion.charts) {
            Ok(json) => html.push_str(&format!(
                "<script type=\"application/json\" id=\"unslide-charts\">{}</script>\n",
                json.replace("</", "<\\/")
            )),
            Err(e) => log::warn!("chart requests not embedded: {}", e),
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChartRequest, ChartType};

    #[test]
    fn test_html_document() {
        let mut conversion = Conversion {
            stylesheet: "._css_0{color:#FF0000;}\n".to_string(),
            ..Default::default()
        };
        conversion.info.metadata.title = Some("Q&A".to_string());
        conversion.slides.push(SlideFragment {
            slide_number: 1,
            html: "<div class=\"_css_0\"></div>".to_string(),
        });
        conversion.charts.push(ChartRequest {
            target_id: "chart0".to_string(),
            chart_type: ChartType::Pie,
            series_data: Vec::new(),
            title: Some("</script>".to_string()),
        });

        let page = to_html_document(&conversion);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Q&amp;A</title>"));
        assert!(page.contains("._css_0{color:#FF0000;}"));
        assert!(page.contains("<div class=\"unslide-page\"><div class=\"_css_0\"></div></div>"));
        assert!(page.contains("id=\"unslide-charts\""));
        assert!(!page.contains("\"</script>\""));
    }

    #[test]
    fn test_page_without_charts() {
        let page = to_html_document(&Conversion::default());
        assert!(page.contains("<title>Presentation</title>"));
        assert!(!page.contains("unslide-charts"));
    }
}
