use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{PlatemarkError, PlatemarkResult};

pub use kurbo::{Point, Rect, Vec2};

/// Physical plate dimensions in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MmSize {
    /// Plate width in mm.
    pub width: f64,
    /// Plate height in mm.
    pub height: f64,
}

impl MmSize {
    /// Construct a validated size; both dimensions must be finite and > 0.
    pub fn new(width: f64, height: f64) -> PlatemarkResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(PlatemarkError::validation(format!(
                "MmSize dimensions must be finite and > 0, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Full plate rectangle with the origin at the top-left corner.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Opaque token identifying one render generation. See [`RenderContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationToken(u64);

/// Shared mutable state threaded through every render.
///
/// Carries two atomic counters: a process-wide id source used to prefix SVG
/// fragment identifiers of embedded icons (so repeated embeds never collide),
/// and a generation counter that lets interactive callers discard the result
/// of a superseded render instead of displaying it out of order.
#[derive(Debug, Default)]
pub struct RenderContext {
    icon_ids: AtomicU64,
    generation: AtomicU64,
}

impl RenderContext {
    /// Construct a fresh context with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique prefix for the fragment ids of one embedded icon.
    pub fn next_icon_prefix(&self) -> String {
        format!("ic{}", self.icon_ids.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Start a new render generation, invalidating all earlier tokens.
    pub fn begin_generation(&self) -> GenerationToken {
        GenerationToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` still names the latest generation. A `false` result
    /// means a newer render started and this one should be discarded.
    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }
}
