use anyhow::Context as _;

use crate::{
    foundation::error::{PlatemarkError, PlatemarkResult},
    render::document::VectorDocument,
};

/// Default raster density for contour extraction, in pixels per mm.
pub const DEFAULT_PX_PER_MM: f64 = 28.0;

/// Pixels darker than this luma (0..255, BT.709 weights) count as ink.
const LUMA_THRESHOLD: u32 = 140;
/// Pixels must also be at least this opaque to count as ink.
const ALPHA_THRESHOLD: u8 = 140;

/// Upper bound on either raster dimension.
const MAX_DIM: u32 = 16_384;

/// A plain RGBA8 pixel grid, straight (non-premultiplied) alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 data, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Fully white, opaque buffer.
    pub fn new_white(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![255u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Wrap existing RGBA8 data, checking its length.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> PlatemarkResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(PlatemarkError::validation(format!(
                "pixel buffer length {} does not match {width}x{height}x4",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Whether the pixel at `(x, y)` counts as solid ink.
    pub fn is_solid(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba[i..i + 4];
        is_solid_rgba(px[0], px[1], px[2], px[3])
    }

    /// Paint an axis-aligned rectangle opaque black (test fixture helper).
    pub fn fill_black(&mut self, x: u32, y: u32, w: u32, h: u32) {
        for yy in y..(y + h).min(self.height) {
            for xx in x..(x + w).min(self.width) {
                let i = ((yy as usize) * (self.width as usize) + (xx as usize)) * 4;
                self.rgba[i..i + 3].copy_from_slice(&[0, 0, 0]);
                self.rgba[i + 3] = 255;
            }
        }
    }
}

/// Ink classification for one pixel: dark enough and opaque enough.
pub fn is_solid_rgba(r: u8, g: u8, b: u8, a: u8) -> bool {
    let luma =
        (2126 * u32::from(r) + 7152 * u32::from(g) + 722 * u32::from(b)) / 10_000;
    luma < LUMA_THRESHOLD && a > ALPHA_THRESHOLD
}

/// Rasterization capability used by contour extraction.
pub trait Rasterize {
    /// Render `doc` over an opaque white backdrop at `px_per_mm`.
    fn rasterize(&self, doc: &VectorDocument, px_per_mm: f64) -> PlatemarkResult<PixelBuffer>;
}

/// [`Rasterize`] implementation backed by resvg.
///
/// The font database is loaded once and shared; rasterization composites
/// over opaque white so the ink classifier sees no transparency from the
/// document itself.
pub struct ResvgRasterizer {
    fontdb: std::sync::Arc<usvg::fontdb::Database>,
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgRasterizer {
    /// Build a rasterizer with the system font collection.
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self {
            fontdb: std::sync::Arc::new(fontdb),
        }
    }

    /// Build a rasterizer that also knows the given font file.
    pub fn with_font_file(path: &std::path::Path) -> PlatemarkResult<Self> {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        fontdb
            .load_font_file(path)
            .with_context(|| format!("load font file '{}'", path.display()))?;
        Ok(Self {
            fontdb: std::sync::Arc::new(fontdb),
        })
    }
}

impl Rasterize for ResvgRasterizer {
    fn rasterize(&self, doc: &VectorDocument, px_per_mm: f64) -> PlatemarkResult<PixelBuffer> {
        if !px_per_mm.is_finite() || px_per_mm <= 0.0 {
            return Err(PlatemarkError::validation(
                "px_per_mm must be finite and > 0",
            ));
        }

        let width = ((doc.width_mm * px_per_mm).round().max(1.0)) as u32;
        let height = ((doc.height_mm * px_per_mm).round().max(1.0)) as u32;
        if width > MAX_DIM || height > MAX_DIM {
            return Err(PlatemarkError::validation(format!(
                "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..usvg::Options::default()
        };
        let svg = doc.to_svg();
        let tree =
            usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse rendered svg tree")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| PlatemarkError::content("failed to allocate raster pixmap"))?;
        pixmap.fill(resvg::tiny_skia::Color::WHITE);

        let sx = (width as f32) / tree.size().width();
        let sy = (height as f32) / tree.size().height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        // The backdrop is opaque, so premultiplied and straight alpha agree.
        PixelBuffer::from_rgba(width, height, pixmap.data().to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/contour/raster.rs"]
mod tests;
