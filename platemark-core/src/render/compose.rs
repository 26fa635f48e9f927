use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::{
    config::model::{IconRef, TagConfig, TextAlign},
    foundation::{core::RenderContext, error::PlatemarkResult},
    layout::zones::{self, SlotKind, Zone},
    render::document::{Primitive, TextAnchor, VectorDocument},
    text::fit::{self, SVG_TEXT_SCALE},
};

/// Resolved icon artwork: inner markup plus its original `viewBox`.
#[derive(Clone, Debug, PartialEq)]
pub struct IconArtwork {
    /// Markup inside the icon's root `<svg>` element.
    pub markup: String,
    /// The root element's `viewBox` attribute value.
    pub view_box: String,
}

/// Icon resolution capability. `Ok(None)` means the icon is unknown; the
/// renderer degrades to a placeholder in that case instead of failing.
pub trait IconLookup {
    /// Resolve artwork for `icon`.
    fn lookup(&self, icon: &IconRef) -> PlatemarkResult<Option<IconArtwork>>;
}

/// Compose the vector document for one tag.
///
/// Emits the background first, then per-zone content: embedded icons (ids
/// uniquely prefixed via `ctx`), placeholder rects where artwork cannot be
/// resolved, and fitted text runs. With `monochrome` set the palette is
/// forced to black-on-white for manufacturing export.
pub fn compose(
    config: &TagConfig,
    zones: &[Zone],
    ctx: &RenderContext,
    icons: &dyn IconLookup,
    measure: &dyn fit::TextMeasure,
    monochrome: bool,
) -> PlatemarkResult<VectorDocument> {
    config.validate()?;
    let dims = config.size.dimensions_mm();
    let (foreground, background) = if monochrome {
        ("black".to_string(), "white".to_string())
    } else {
        (config.foreground.clone(), config.background.clone())
    };

    let mut doc = VectorDocument::new(dims);
    doc.push(Primitive::Background {
        fill: background,
    });

    let icon_side = zones::icon_side_mm(config);
    for zone in zones {
        match zone.slot {
            SlotKind::Icon => {
                let Some(icon) = config.icons.get(zone.index).and_then(Option::as_ref) else {
                    continue;
                };
                let rect = zone.rect_mm(dims);
                let x = rect.x0 + (rect.width() - icon_side) / 2.0;
                let y = rect.y0 + (rect.height() - icon_side) / 2.0;
                match icons.lookup(icon) {
                    Ok(Some(artwork)) => {
                        let markup =
                            prefix_fragment_ids(&artwork.markup, &ctx.next_icon_prefix());
                        doc.push(Primitive::IconGroup {
                            x,
                            y,
                            width: icon_side,
                            height: icon_side,
                            view_box: artwork.view_box,
                            markup,
                        });
                    }
                    Ok(None) => {
                        warn!(icon = %icon.display_name(), "icon not found, using placeholder");
                        doc.push(placeholder(x, y, icon_side, &foreground));
                    }
                    Err(error) => {
                        warn!(icon = %icon.display_name(), %error, "icon lookup failed, using placeholder");
                        doc.push(placeholder(x, y, icon_side, &foreground));
                    }
                }
            }
            SlotKind::Text => {
                let Some(text) = config.texts.get(zone.index).map(|t| t.trim()) else {
                    continue;
                };
                if text.is_empty() {
                    continue;
                }
                let rect = zone.rect_mm(dims);
                let line_height = rect.height() * config.text_scale_factor();
                let font_size = fit::fit_font_size(text, rect.width(), line_height, measure);
                if font_size <= 0.0 {
                    continue;
                }
                let y = rect.y0 + rect.height() / 2.0;
                let (x, anchor) = match config.text_align {
                    TextAlign::Center => (rect.x0 + rect.width() / 2.0, TextAnchor::Middle),
                    TextAlign::Left => (
                        fit::visual_start_x(text, rect.x0, font_size, measure),
                        TextAnchor::Start,
                    ),
                };
                doc.push(Primitive::TextRun {
                    x,
                    y,
                    font_size: font_size * SVG_TEXT_SCALE,
                    anchor,
                    fill: foreground.clone(),
                    content: text.to_string(),
                });
            }
        }
    }

    Ok(doc)
}

/// Compute zones and compose in one call.
pub fn render_tag(
    config: &TagConfig,
    ctx: &RenderContext,
    icons: &dyn IconLookup,
    measure: &dyn fit::TextMeasure,
    monochrome: bool,
) -> PlatemarkResult<VectorDocument> {
    let zones = zones::compute_zones(config);
    compose(config, &zones, ctx, icons, measure, monochrome)
}

fn placeholder(x: f64, y: f64, side: f64, fill: &str) -> Primitive {
    Primitive::Placeholder {
        x,
        y,
        width: side,
        height: side,
        fill: fill.to_string(),
    }
}

/// Rewrite an icon fragment's internal ids and references with `prefix`.
///
/// Multiple fragments share one output document; unprefixed `id`,
/// `url(#...)` and `href="#..."` values collide across fragments and make
/// gradients or clips resolve against the wrong icon.
pub fn prefix_fragment_ids(markup: &str, prefix: &str) -> String {
    static ID_ATTR: OnceLock<Regex> = OnceLock::new();
    static URL_REF: OnceLock<Regex> = OnceLock::new();
    static HREF_REF: OnceLock<Regex> = OnceLock::new();

    let id_attr = ID_ATTR.get_or_init(|| Regex::new(r#"\bid="([^"]*)""#).expect("static regex"));
    let url_ref = URL_REF.get_or_init(|| Regex::new(r"url\(#([^)]*)\)").expect("static regex"));
    let href_ref =
        HREF_REF.get_or_init(|| Regex::new(r##"href="#([^"]*)""##).expect("static regex"));

    let out = id_attr.replace_all(markup, format!(r#"id="{prefix}_$1""#).as_str());
    let out = url_ref.replace_all(&out, format!(r"url(#{prefix}_$1)").as_str());
    let out = href_ref.replace_all(&out, format!(r##"href="#{prefix}_$1""##).as_str());
    out.into_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
