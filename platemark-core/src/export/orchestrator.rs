use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use tracing::{debug, info};

use crate::{
    config::{
        model::TagConfig,
        record::{TagRecord, sanitize_file_name},
    },
    contour::{
        decompose::contour_document,
        raster::{DEFAULT_PX_PER_MM, Rasterize},
    },
    export::{
        archive,
        backend::{
            BACKEND_TIMEOUT, CadBackend, ExportFormat, GeometryMode, StyleVariant,
            submit_with_timeout,
        },
    },
    foundation::{
        core::RenderContext,
        error::{PlatemarkError, PlatemarkResult},
    },
    render::compose::{IconLookup, render_tag},
    text::fit::TextMeasure,
};

/// One finished export: the artifact bytes and their file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name including extension.
    pub file_name: String,
    /// Artifact bytes.
    pub bytes: Vec<u8>,
}

/// Batch progress callback; receives `(completed, total)` after each item.
pub trait ProgressObserver: Sync {
    /// Called once per finished item, in completion order.
    fn on_progress(&self, completed: usize, total: usize);
}

impl<F: Fn(usize, usize) + Sync> ProgressObserver for F {
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Observer that ignores progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Pick the worker count for a batch from the format and a parallelism hint
/// (typically the machine's logical CPU count). SVG exports are cheap and
/// local; CAD exports hold a backend call open, so their pool stays small.
pub fn batch_concurrency(format: ExportFormat, parallelism_hint: usize) -> usize {
    if format.is_cad() {
        let half = parallelism_hint / 2;
        let half = if half == 0 { 2 } else { half };
        half.clamp(2, 3)
    } else {
        parallelism_hint.clamp(2, 8)
    }
}

/// Drives single and batch exports over injected capabilities.
pub struct Exporter {
    ctx: RenderContext,
    icons: Arc<dyn IconLookup + Send + Sync>,
    measure: Arc<dyn TextMeasure + Send + Sync>,
    rasterizer: Arc<dyn Rasterize + Send + Sync>,
    backend: Arc<dyn CadBackend>,
    px_per_mm: f64,
    timeout: Duration,
}

impl Exporter {
    /// Build an exporter with the default raster density and backend deadline.
    pub fn new(
        icons: Arc<dyn IconLookup + Send + Sync>,
        measure: Arc<dyn TextMeasure + Send + Sync>,
        rasterizer: Arc<dyn Rasterize + Send + Sync>,
        backend: Arc<dyn CadBackend>,
    ) -> Self {
        Self {
            ctx: RenderContext::new(),
            icons,
            measure,
            rasterizer,
            backend,
            px_per_mm: DEFAULT_PX_PER_MM,
            timeout: BACKEND_TIMEOUT,
        }
    }

    /// Override the backend deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the contour raster density.
    pub fn with_px_per_mm(mut self, px_per_mm: f64) -> Self {
        self.px_per_mm = px_per_mm;
        self
    }

    /// Render a colour preview SVG for one record.
    pub fn render_preview(&self, record: &TagRecord) -> PlatemarkResult<String> {
        let config = record.config();
        let doc = render_tag(&config, &self.ctx, &*self.icons, &*self.measure, false)?;
        Ok(doc.to_svg())
    }

    /// Export one record to `format`.
    ///
    /// SVG exports serialize the colour document directly. CAD exports try
    /// the preferred geometry mode first and fall back to the other once;
    /// when both fail the error aggregates both causes so neither is lost.
    pub fn export_one(
        &self,
        record: &TagRecord,
        format: ExportFormat,
        style: StyleVariant,
        preferred: GeometryMode,
    ) -> PlatemarkResult<ExportArtifact> {
        let config = record.config();
        config.validate()?;
        let base_name = sanitize_file_name(if record.name.trim().is_empty() {
            "tag"
        } else {
            record.name.trim()
        });

        let bytes = if format.is_cad() {
            self.cad_bytes_with_fallback(&config, format, style, preferred)?
        } else {
            render_tag(&config, &self.ctx, &*self.icons, &*self.measure, false)?
                .to_svg()
                .into_bytes()
        };

        Ok(ExportArtifact {
            file_name: format!("{base_name}.{}", format.extension()),
            bytes,
        })
    }

    fn cad_bytes_with_fallback(
        &self,
        config: &TagConfig,
        format: ExportFormat,
        style: StyleVariant,
        preferred: GeometryMode,
    ) -> PlatemarkResult<Vec<u8>> {
        let size = config.size.dimensions_mm();
        let mut errors: Vec<String> = Vec::new();

        for mode in [preferred, preferred.fallback()] {
            match self.geometry_svg(config, mode) {
                Ok(svg) => {
                    debug!(mode = mode.as_str(), format = format.extension(), "submitting geometry");
                    match submit_with_timeout(
                        &self.backend,
                        svg,
                        size,
                        style,
                        format,
                        self.timeout,
                    ) {
                        Ok(bytes) => return Ok(bytes),
                        Err(e) => errors.push(format!("{}: {e}", mode.as_str())),
                    }
                }
                Err(e) => errors.push(format!("{}: {e}", mode.as_str())),
            }
        }

        Err(PlatemarkError::backend(format!(
            "all geometry modes failed. {}",
            errors.join(" | ")
        )))
    }

    /// Build the monochrome geometry SVG for one mode.
    fn geometry_svg(&self, config: &TagConfig, mode: GeometryMode) -> PlatemarkResult<String> {
        let doc = render_tag(config, &self.ctx, &*self.icons, &*self.measure, true)?;
        match mode {
            GeometryMode::Vector => Ok(doc.to_svg()),
            GeometryMode::Compat => {
                Ok(contour_document(&doc, &*self.rasterizer, self.px_per_mm)?.to_svg())
            }
        }
    }

    /// Export all records and package them into a zip archive.
    ///
    /// Runs a pool of scoped worker threads pulling record indices from a
    /// shared atomic cursor, so fast items never wait on slow ones. Results
    /// land in an index-addressed table; archive entries therefore keep the
    /// input order no matter the completion order. The first failure stops
    /// the pool (workers check a flag before pulling) and fails the batch.
    pub fn export_batch(
        &self,
        records: &[TagRecord],
        format: ExportFormat,
        style: StyleVariant,
        preferred: GeometryMode,
        observer: &dyn ProgressObserver,
    ) -> PlatemarkResult<Vec<u8>> {
        if records.is_empty() {
            return Err(PlatemarkError::validation("no tags to export"));
        }

        let total = records.len();
        let parallelism = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4);
        let workers = batch_concurrency(format, parallelism).min(total).max(1);
        info!(total, workers, format = format.extension(), "starting batch export");

        let cursor = AtomicUsize::new(0);
        let completed = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let results: Mutex<Vec<Option<ExportArtifact>>> =
            Mutex::new(vec![None; total]);
        let first_error: Mutex<Option<PlatemarkError>> = Mutex::new(None);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    loop {
                        if failed.load(Ordering::Relaxed) {
                            return;
                        }
                        let i = cursor.fetch_add(1, Ordering::Relaxed);
                        if i >= total {
                            return;
                        }
                        let record = &records[i];
                        match self.export_one(record, format, style, preferred) {
                            Ok(artifact) => {
                                let file_name =
                                    archive::batch_file_name(i, &record.name, format);
                                let mut slot = results.lock().unwrap_or_else(|e| e.into_inner());
                                slot[i] = Some(ExportArtifact {
                                    file_name,
                                    bytes: artifact.bytes,
                                });
                                drop(slot);
                                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                                observer.on_progress(done, total);
                            }
                            Err(e) => {
                                let mut slot =
                                    first_error.lock().unwrap_or_else(|e| e.into_inner());
                                if slot.is_none() {
                                    *slot = Some(e.for_item(&format!(
                                        "tag {} ('{}')",
                                        i + 1,
                                        record.name
                                    )));
                                }
                                failed.store(true, Ordering::Relaxed);
                                return;
                            }
                        }
                    }
                });
            }
        });

        if let Some(error) = first_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            return Err(error);
        }

        let results = results.into_inner().unwrap_or_else(|e| e.into_inner());
        let artifacts: Vec<ExportArtifact> = results.into_iter().flatten().collect();
        if artifacts.len() != total {
            return Err(PlatemarkError::backend(
                "batch finished with missing artifacts",
            ));
        }
        archive::package(&artifacts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/orchestrator.rs"]
mod tests;
