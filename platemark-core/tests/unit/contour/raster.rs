use super::*;
use crate::{
    foundation::core::MmSize,
    render::document::{Primitive, VectorDocument},
};

#[test]
fn ink_classification_needs_dark_and_opaque() {
    assert!(is_solid_rgba(0, 0, 0, 255));
    assert!(is_solid_rgba(100, 100, 100, 200));
    // Too light.
    assert!(!is_solid_rgba(255, 255, 255, 255));
    assert!(!is_solid_rgba(200, 200, 200, 255));
    // Too transparent.
    assert!(!is_solid_rgba(0, 0, 0, 100));
    assert!(!is_solid_rgba(0, 0, 0, 140));
}

#[test]
fn buffer_length_must_match_dimensions() {
    assert!(PixelBuffer::from_rgba(2, 2, vec![0u8; 16]).is_ok());
    assert!(PixelBuffer::from_rgba(2, 2, vec![0u8; 15]).is_err());
}

#[test]
fn fill_black_marks_pixels_solid() {
    let mut buffer = PixelBuffer::new_white(8, 8);
    assert!(!buffer.is_solid(3, 3));
    buffer.fill_black(2, 2, 3, 3);
    assert!(buffer.is_solid(2, 2));
    assert!(buffer.is_solid(4, 4));
    assert!(!buffer.is_solid(5, 5));
    // Out of bounds is never solid.
    assert!(!buffer.is_solid(100, 0));
}

#[test]
fn rasterizer_rejects_degenerate_density() {
    let doc = VectorDocument::new(MmSize {
        width: 10.0,
        height: 10.0,
    });
    let rasterizer = ResvgRasterizer::new();
    assert!(rasterizer.rasterize(&doc, 0.0).is_err());
    assert!(rasterizer.rasterize(&doc, f64::NAN).is_err());
}

#[test]
fn rasterizer_renders_rects_over_a_white_backdrop() {
    let mut doc = VectorDocument::new(MmSize {
        width: 10.0,
        height: 10.0,
    });
    doc.push(Primitive::ContourRect {
        x: 2.0,
        y: 2.0,
        width: 4.0,
        height: 4.0,
    });

    let rasterizer = ResvgRasterizer::new();
    let buffer = rasterizer.rasterize(&doc, 4.0).unwrap();
    assert_eq!(buffer.width, 40);
    assert_eq!(buffer.height, 40);

    // Centre of the rect is ink, far corner is backdrop.
    assert!(buffer.is_solid(16, 16));
    assert!(!buffer.is_solid(38, 38));
}
