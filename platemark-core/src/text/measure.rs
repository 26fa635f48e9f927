use std::sync::Mutex;

use anyhow::Context as _;

use crate::{
    foundation::error::{PlatemarkError, PlatemarkResult},
    text::fit::{TextMeasure, TextMetrics},
};

/// Unit brush; measurement never paints.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeasureBrush;

struct MeasureInner {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<MeasureBrush>,
    family_name: Option<String>,
}

/// [`TextMeasure`] backed by Parley shaping.
///
/// Font registration happens once at construction; the shaping contexts sit
/// behind a mutex so one instance can serve concurrent export workers.
/// Reports the line advance as ink width with zero left bearing (advance
/// metrics carry no per-glyph ink box).
pub struct ParleyTextMeasure {
    inner: Mutex<MeasureInner>,
}

impl ParleyTextMeasure {
    /// Measure with the system font collection's sans-serif fallback.
    pub fn system() -> Self {
        Self {
            inner: Mutex::new(MeasureInner {
                font_ctx: parley::FontContext::default(),
                layout_ctx: parley::LayoutContext::new(),
                family_name: None,
            }),
        }
    }

    /// Register `font_bytes` and measure with its first family.
    pub fn from_font_bytes(font_bytes: &[u8]) -> PlatemarkResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PlatemarkError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PlatemarkError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            inner: Mutex::new(MeasureInner {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
                family_name: Some(family_name),
            }),
        })
    }

    /// Load a font file and register it, see [`Self::from_font_bytes`].
    pub fn from_font_file(path: &std::path::Path) -> PlatemarkResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_font_bytes(&bytes)
    }
}

impl TextMeasure for ParleyTextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        if text.is_empty() || !font_size.is_finite() || font_size <= 0.0 {
            return TextMetrics::default();
        }
        let Ok(mut inner) = self.inner.lock() else {
            return TextMetrics::default();
        };
        let inner = &mut *inner;

        let family = inner
            .family_name
            .clone()
            .unwrap_or_else(|| "sans-serif".to_string());
        let mut builder = inner
            .layout_ctx
            .ranged_builder(&mut inner.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size as f32));
        builder.push_default(parley::style::StyleProperty::Brush(MeasureBrush));

        let mut layout: parley::Layout<MeasureBrush> = builder.build(text);
        layout.break_all_lines(None);

        let ink_width = layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0f64, f64::max);

        TextMetrics {
            ink_width,
            left_bearing: 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
