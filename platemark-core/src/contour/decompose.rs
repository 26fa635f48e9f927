use std::collections::HashMap;

use crate::{
    contour::raster::{PixelBuffer, Rasterize},
    foundation::{
        core::MmSize,
        error::{PlatemarkError, PlatemarkResult},
    },
    render::document::{Primitive, VectorDocument},
};

/// Upper bound on the rectangle count of one contour cover. Covers past
/// this size produce CAD payloads the solid-model backend cannot handle.
pub const MAX_REGIONS: usize = 18_000;

/// One solid rectangle of a contour cover, in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterRegion {
    /// Left edge in px.
    pub x: u32,
    /// Top edge in px.
    pub y: u32,
    /// Width in px.
    pub w: u32,
    /// Height in px.
    pub h: u32,
}

/// Reduce solid ink to a minimal cover of axis-aligned rectangles.
///
/// Scans row by row, collecting maximal horizontal runs of solid pixels.
/// A run whose exact span `(x0, x1)` repeats on the next row extends the
/// open rectangle for that span downward; a span absent from the next row
/// closes it. Runs that merely overlap without matching exactly start new
/// rectangles, so the cover is exact but never merges drifting shapes.
///
/// Fails with a content error when the buffer holds no solid pixels at all
/// or when the cover exceeds [`MAX_REGIONS`]. The result is sorted by
/// `(y, x, w)` for deterministic output.
pub fn decompose(buffer: &PixelBuffer) -> PlatemarkResult<Vec<RasterRegion>> {
    let mut active: HashMap<(u32, u32), RasterRegion> = HashMap::new();
    let mut regions: Vec<RasterRegion> = Vec::new();

    for y in 0..buffer.height {
        let mut runs: Vec<(u32, u32)> = Vec::new();
        let mut x = 0u32;
        while x < buffer.width {
            if !buffer.is_solid(x, y) {
                x += 1;
                continue;
            }
            let x0 = x;
            x += 1;
            while x < buffer.width && buffer.is_solid(x, y) {
                x += 1;
            }
            runs.push((x0, x - 1));
        }

        for &(x0, x1) in &runs {
            active
                .entry((x0, x1))
                .and_modify(|r| r.h += 1)
                .or_insert(RasterRegion {
                    x: x0,
                    y,
                    w: x1 - x0 + 1,
                    h: 1,
                });
        }
        // Close every open span the current row did not repeat.
        active.retain(|span, region| {
            if runs.contains(span) {
                true
            } else {
                regions.push(*region);
                false
            }
        });
    }
    regions.extend(active.into_values());

    if regions.is_empty() {
        return Err(PlatemarkError::content("no visible content to export"));
    }
    if regions.len() > MAX_REGIONS {
        return Err(PlatemarkError::content(format!(
            "contour too complex ({} regions, max {MAX_REGIONS}); reduce icon or text complexity",
            regions.len()
        )));
    }

    regions.sort_by_key(|r| (r.y, r.x, r.w));
    Ok(regions)
}

/// Render `doc` to pixels and rebuild it as a monochrome contour document
/// made solely of filled [`Primitive::ContourRect`]s in mm coordinates.
pub fn contour_document(
    doc: &VectorDocument,
    rasterizer: &dyn Rasterize,
    px_per_mm: f64,
) -> PlatemarkResult<VectorDocument> {
    let buffer = rasterizer.rasterize(doc, px_per_mm)?;
    let regions = decompose(&buffer)?;

    let mut out = VectorDocument::new(MmSize {
        width: doc.width_mm,
        height: doc.height_mm,
    });
    for region in regions {
        out.push(Primitive::ContourRect {
            x: f64::from(region.x) / px_per_mm,
            y: f64::from(region.y) / px_per_mm,
            width: f64::from(region.w) / px_per_mm,
            height: f64::from(region.h) / px_per_mm,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/contour/decompose.rs"]
mod tests;
