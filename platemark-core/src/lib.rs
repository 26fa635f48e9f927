//! Platemark is a layout and manufacturing-export engine for modular
//! nameplate tags.
//!
//! A tag is a small fixed-size plate carrying icons and text. Platemark
//! turns a [`TagConfig`] into precise vector artwork and, from there, into
//! manufacturing-ready geometry:
//!
//! 1. **Layout**: `TagConfig -> Vec<Zone>`, a deterministic partition of
//!    the printable area into per-slot rectangles
//! 2. **Fit**: binary-search font sizing against a pluggable
//!    [`TextMeasure`] capability
//! 3. **Compose**: zones + fitted text + embedded icon fragments
//!    -> [`VectorDocument`] (serializable to SVG)
//! 4. **Contour** (optional): rasterize and reduce ink to a minimal
//!    rectangle cover for CAD backends that cannot consume text or curves
//! 5. **Export**: single or batch conversion through an opaque
//!    [`CadBackend`], with geometry-mode fallback and a bounded worker pool
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: layout and composition are pure and
//!   stable for a given input and measurement capability.
//! - **Capabilities at the seams**: text measurement, icon resolution,
//!   rasterization and CAD conversion are traits; the engine owns only the
//!   geometry between them.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod contour;
mod export;
mod foundation;
mod layout;
mod render;
mod text;

pub use assets::catalog::{IconCatalog, IconEntry};
pub use config::model::{
    EditSession, IconRef, LeftLayout, MAX_SCALE_PERCENT, MIN_SCALE_PERCENT, RightLayout,
    SizeClass, TagConfig, TextAlign,
};
pub use config::record::{
    LIBRARY_FORMAT_VERSION, PREVIEW_SCHEMA_VERSION, TagLibrary, TagRecord, auto_name,
    export_portable, import_portable, sanitize_file_name,
};
pub use contour::decompose::{MAX_REGIONS, RasterRegion, contour_document, decompose};
pub use contour::raster::{
    DEFAULT_PX_PER_MM, PixelBuffer, Rasterize, ResvgRasterizer, is_solid_rgba,
};
pub use export::archive::{batch_file_name, package};
pub use export::backend::{
    BACKEND_TIMEOUT, CadBackend, ExportFormat, GeometryMode, StyleVariant, submit_with_timeout,
};
pub use export::orchestrator::{
    ExportArtifact, Exporter, NoProgress, ProgressObserver, batch_concurrency,
};
pub use foundation::core::{GenerationToken, MmSize, Point, Rect, RenderContext, Vec2};
pub use foundation::error::{PlatemarkError, PlatemarkResult};
pub use layout::zones::{
    EDGE_MARGIN_MM, ICON_TEXT_GAP_MM, SLOT_GAP_MM, SlotKind, Zone, compute_zones, icon_side_mm,
    printable_rect_mm,
};
pub use render::compose::{IconArtwork, IconLookup, compose, prefix_fragment_ids, render_tag};
pub use render::document::{
    MIN_STROKE_WIDTH_MM, Primitive, TEXT_FONT_FAMILY, TEXT_STROKE_RATIO, TextAnchor,
    VectorDocument, escape_xml,
};
pub use text::fit::{
    FIT_HEIGHT_CAP, FIT_ITERATIONS, FIT_WIDTH_RATIO, SVG_TEXT_SCALE, TextMeasure, TextMetrics,
    fit_font_size, visual_start_x,
};
pub use text::measure::{MeasureBrush, ParleyTextMeasure};
