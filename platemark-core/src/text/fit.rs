/// Fraction of the zone width usable by text ink.
pub const FIT_WIDTH_RATIO: f64 = 0.96;
/// Fraction of the line height usable as font size.
pub const FIT_HEIGHT_CAP: f64 = 0.9;
/// Ratio between the emitted SVG font size and the fitted size.
pub const SVG_TEXT_SCALE: f64 = 1.2;
/// Binary search iteration count; enough for sub-0.001 mm resolution over
/// plate-scale boxes.
pub const FIT_ITERATIONS: u32 = 14;

/// Horizontal ink metrics for one run of text at one font size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Total ink width in mm.
    pub ink_width: f64,
    /// Distance from the pen origin to the first glyph's ink, in mm.
    pub left_bearing: f64,
}

/// Text measurement capability used by the fitter and the renderer.
///
/// Implementations must be monotone: a larger font size never yields a
/// smaller `ink_width` for the same text.
pub trait TextMeasure {
    /// Measure `text` at `font_size` (mm, already at SVG render scale).
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics;
}

/// Find the largest font size whose ink fits the box, by binary search.
///
/// The search measures candidates at [`SVG_TEXT_SCALE`], the same scale the
/// renderer will emit, and keeps the largest size whose width stays within
/// `max_width * FIT_WIDTH_RATIO`. The result never exceeds
/// `max_height * FIT_HEIGHT_CAP`; empty text or a degenerate box yields 0.
pub fn fit_font_size(
    text: &str,
    max_width: f64,
    max_height: f64,
    measure: &dyn TextMeasure,
) -> f64 {
    if text.is_empty() || max_width <= 0.0 || max_height <= 0.0 {
        return 0.0;
    }

    let usable_width = max_width * FIT_WIDTH_RATIO;
    let cap = max_height * FIT_HEIGHT_CAP;

    let mut lo = 0.0f64;
    let mut hi = cap;
    let mut best = 0.0f64;
    for _ in 0..FIT_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let metrics = measure.measure(text, mid * SVG_TEXT_SCALE);
        if metrics.ink_width <= usable_width {
            best = mid;
            lo = mid;
        } else {
            hi = mid;
        }
    }

    best.min(cap)
}

/// X coordinate where left-aligned text must be anchored so its visible ink
/// starts at `target_left_x`. Compensates for the glyph's left side bearing;
/// anchoring at the raw zone edge leaves an inconsistent gap otherwise.
pub fn visual_start_x(
    text: &str,
    target_left_x: f64,
    font_size: f64,
    measure: &dyn TextMeasure,
) -> f64 {
    if text.is_empty() || font_size <= 0.0 {
        return target_left_x;
    }
    let metrics = measure.measure(text, font_size * SVG_TEXT_SCALE);
    target_left_x + metrics.left_bearing
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
