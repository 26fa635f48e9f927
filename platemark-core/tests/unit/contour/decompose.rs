use super::*;
use crate::{
    contour::raster::PixelBuffer,
    foundation::error::PlatemarkError,
    render::document::{Primitive, VectorDocument},
};

/// Rasterize fake that returns a pre-built buffer.
struct FixedRaster(PixelBuffer);

impl Rasterize for FixedRaster {
    fn rasterize(&self, _doc: &VectorDocument, _px_per_mm: f64) -> PlatemarkResult<PixelBuffer> {
        Ok(self.0.clone())
    }
}

#[test]
fn rectangular_ink_decomposes_to_itself() {
    let mut buffer = PixelBuffer::new_white(32, 16);
    buffer.fill_black(2, 3, 5, 4);
    buffer.fill_black(20, 1, 3, 8);

    let regions = decompose(&buffer).unwrap();
    assert_eq!(
        regions,
        vec![
            RasterRegion { x: 20, y: 1, w: 3, h: 8 },
            RasterRegion { x: 2, y: 3, w: 5, h: 4 },
        ]
    );
}

#[test]
fn touching_rectangles_of_equal_span_merge_vertically() {
    let mut buffer = PixelBuffer::new_white(16, 16);
    buffer.fill_black(4, 2, 6, 3);
    buffer.fill_black(4, 5, 6, 3); // same x-span, directly below

    let regions = decompose(&buffer).unwrap();
    assert_eq!(regions, vec![RasterRegion { x: 4, y: 2, w: 6, h: 6 }]);
}

#[test]
fn drifting_rows_open_separate_regions() {
    let mut buffer = PixelBuffer::new_white(16, 4);
    buffer.fill_black(2, 0, 4, 1);
    buffer.fill_black(3, 1, 4, 1); // overlaps but shifted: new span

    let regions = decompose(&buffer).unwrap();
    assert_eq!(
        regions,
        vec![
            RasterRegion { x: 2, y: 0, w: 4, h: 1 },
            RasterRegion { x: 3, y: 1, w: 4, h: 1 },
        ]
    );
}

#[test]
fn blank_buffers_are_a_content_error() {
    let buffer = PixelBuffer::new_white(8, 8);
    let err = decompose(&buffer).unwrap_err();
    assert!(matches!(err, PlatemarkError::Content(_)));
    assert!(err.to_string().contains("no visible content"));
}

#[test]
fn excessive_region_counts_are_rejected() {
    // A checkerboard yields one single-pixel region per solid pixel: the
    // span never repeats on the next row, so nothing merges vertically.
    let side = 200u32; // 20_000 regions > MAX_REGIONS
    let mut buffer = PixelBuffer::new_white(side, side);
    for y in 0..side {
        for x in 0..side {
            if (x + y) % 2 == 0 {
                buffer.fill_black(x, y, 1, 1);
            }
        }
    }

    let err = decompose(&buffer).unwrap_err();
    assert!(matches!(err, PlatemarkError::Content(_)));
    assert!(err.to_string().contains("contour too complex"));
}

#[test]
fn contour_document_converts_regions_to_mm() {
    let mut buffer = PixelBuffer::new_white(40, 20);
    buffer.fill_black(4, 2, 8, 6);

    let source = VectorDocument::new(crate::foundation::core::MmSize {
        width: 10.0,
        height: 5.0,
    });
    let doc = contour_document(&source, &FixedRaster(buffer), 4.0).unwrap();

    assert_eq!(doc.width_mm, 10.0);
    assert_eq!(doc.primitives.len(), 1);
    let Primitive::ContourRect {
        x,
        y,
        width,
        height,
    } = &doc.primitives[0]
    else {
        panic!("expected a contour rect");
    };
    assert_eq!((*x, *y), (1.0, 0.5));
    assert_eq!((*width, *height), (2.0, 1.5));
}

#[test]
fn decomposition_is_idempotent_over_its_own_cover() {
    let mut buffer = PixelBuffer::new_white(24, 24);
    buffer.fill_black(1, 1, 10, 3);
    buffer.fill_black(14, 6, 2, 9);

    let first = decompose(&buffer).unwrap();

    // Re-paint exactly the cover and decompose again.
    let mut repaint = PixelBuffer::new_white(24, 24);
    for r in &first {
        repaint.fill_black(r.x, r.y, r.w, r.h);
    }
    let second = decompose(&repaint).unwrap();
    assert_eq!(first, second);
}
