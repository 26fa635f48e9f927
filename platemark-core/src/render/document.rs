use std::fmt::Write as _;

use crate::foundation::core::MmSize;

/// Font stack emitted on every text primitive.
pub const TEXT_FONT_FAMILY: &str = r#""Platemark Sans", "Arial Black", Arial, sans-serif"#;
/// Stroke width as a fraction of the SVG font size; the stroke thickens
/// thin glyph features so they survive engraving.
pub const TEXT_STROKE_RATIO: f64 = 0.04;
/// Lower bound on the text stroke width in mm.
pub const MIN_STROKE_WIDTH_MM: f64 = 0.04;

/// SVG `text-anchor` values the renderer emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAnchor {
    /// Anchor at the pen origin (left-aligned text).
    Start,
    /// Anchor at the run's horizontal midpoint (centered text).
    Middle,
}

impl TextAnchor {
    fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
        }
    }
}

/// One drawing operation of a [`VectorDocument`]. All coordinates in mm.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Primitive {
    /// Full-footprint background fill, always the first primitive.
    Background {
        /// CSS fill colour.
        fill: String,
    },
    /// An embedded icon fragment, wrapped in a nested `<svg>` so the
    /// fragment's own viewBox mapping (clips, masks, defs) keeps working.
    IconGroup {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// The fragment's `viewBox` attribute value.
        view_box: String,
        /// Inner markup with fragment ids already uniquely prefixed.
        markup: String,
    },
    /// Solid rectangle standing in for unresolvable icon artwork.
    Placeholder {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// CSS fill colour.
        fill: String,
    },
    /// A fitted single-line text run.
    TextRun {
        /// Anchor x.
        x: f64,
        /// Baseline-central y.
        y: f64,
        /// Final SVG font size (render scale already applied).
        font_size: f64,
        /// Horizontal anchoring.
        anchor: TextAnchor,
        /// CSS fill colour.
        fill: String,
        /// The text content, unescaped.
        content: String,
    },
    /// One rectangle of a contour cover, emitted as a closed path.
    ContourRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
}

/// Backend-agnostic vector artwork for one tag.
///
/// Primitives are ordered back to front; serialization to SVG is the only
/// IO-free output path, raster and CAD artifacts derive from it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VectorDocument {
    /// Plate width in mm.
    pub width_mm: f64,
    /// Plate height in mm.
    pub height_mm: f64,
    /// Drawing operations, back to front.
    pub primitives: Vec<Primitive>,
}

impl VectorDocument {
    /// Empty document for a plate of the given size.
    pub fn new(size: MmSize) -> Self {
        Self {
            width_mm: size.width,
            height_mm: size.height,
            primitives: Vec::new(),
        }
    }

    /// Append a primitive.
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Iterate over the text runs in draw order.
    pub fn text_runs(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::TextRun { .. }))
    }

    /// Serialize to a standalone SVG string with mm units.
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(512 + self.primitives.len() * 128);
        let _ = write!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}mm\" height=\"{h}mm\" \
             viewBox=\"0 0 {w} {h}\" font-family='{family}'>\n",
            w = fmt_mm(self.width_mm),
            h = fmt_mm(self.height_mm),
            family = TEXT_FONT_FAMILY,
        );
        for primitive in &self.primitives {
            self.write_primitive(&mut out, primitive);
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_primitive(&self, out: &mut String, primitive: &Primitive) {
        match primitive {
            Primitive::Background { fill } => {
                let _ = writeln!(
                    out,
                    "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" />",
                    fmt_mm(self.width_mm),
                    fmt_mm(self.height_mm),
                    escape_xml(fill),
                );
            }
            Primitive::IconGroup {
                x,
                y,
                width,
                height,
                view_box,
                markup,
            } => {
                let _ = writeln!(
                    out,
                    "<svg x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" viewBox=\"{}\" \
                     overflow=\"hidden\">{}</svg>",
                    fmt_mm(*x),
                    fmt_mm(*y),
                    fmt_mm(*width),
                    fmt_mm(*height),
                    escape_xml(view_box),
                    markup,
                );
            }
            Primitive::Placeholder {
                x,
                y,
                width,
                height,
                fill,
            } => {
                let _ = writeln!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" />",
                    fmt_mm(*x),
                    fmt_mm(*y),
                    fmt_mm(*width),
                    fmt_mm(*height),
                    escape_xml(fill),
                );
            }
            Primitive::TextRun {
                x,
                y,
                font_size,
                anchor,
                fill,
                content,
            } => {
                let stroke_width = (font_size * TEXT_STROKE_RATIO).max(MIN_STROKE_WIDTH_MM);
                let fill = escape_xml(fill);
                let _ = writeln!(
                    out,
                    "<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{}\" \
                     dominant-baseline=\"central\" fill=\"{fill}\" stroke=\"{fill}\" \
                     stroke-width=\"{}\" paint-order=\"stroke fill\">{}</text>",
                    fmt_mm(*x),
                    fmt_mm(*y),
                    fmt_mm(*font_size),
                    anchor.as_svg(),
                    fmt_mm(stroke_width),
                    escape_xml(content),
                );
            }
            Primitive::ContourRect {
                x,
                y,
                width,
                height,
            } => {
                let (x0, y0) = (fmt_mm(*x), fmt_mm(*y));
                let (x1, y1) = (fmt_mm(x + width), fmt_mm(y + height));
                let _ = writeln!(
                    out,
                    "<path fill=\"black\" d=\"M {x0} {y0} L {x1} {y0} L {x1} {y1} L {x0} {y1} Z\" />",
                );
            }
        }
    }
}

/// Format a mm coordinate with three decimals, trimming trailing zeros.
fn fmt_mm(v: f64) -> String {
    let mut s = format!("{v:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    // Normalize negative zero.
    if s == "-0" { "0".to_string() } else { s }
}

/// Escape the five XML special characters for attribute and text content.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/document.rs"]
mod tests;
