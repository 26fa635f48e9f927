use std::{
    sync::{Arc, mpsc},
    time::Duration,
};

use crate::foundation::{
    core::MmSize,
    error::{PlatemarkError, PlatemarkResult},
};

/// Deadline for one CAD backend call.
pub const BACKEND_TIMEOUT: Duration = Duration::from_secs(90);

/// Output artifact formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The vector document itself, serialized as SVG.
    Svg,
    /// STEP solid model produced by the CAD backend.
    Step,
    /// 3MF solid model produced by the CAD backend.
    #[serde(rename = "3mf")]
    ThreeMf,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Step => "step",
            Self::ThreeMf => "3mf",
        }
    }

    /// Whether this format requires the CAD backend.
    pub fn is_cad(self) -> bool {
        !matches!(self, Self::Svg)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = PlatemarkError;

    fn from_str(s: &str) -> PlatemarkResult<Self> {
        match s {
            "svg" => Ok(Self::Svg),
            "step" => Ok(Self::Step),
            "3mf" => Ok(Self::ThreeMf),
            other => Err(PlatemarkError::validation(format!(
                "unknown export format '{other}' (expected svg, step or 3mf)"
            ))),
        }
    }
}

/// How the solid model treats the content relative to the plate face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleVariant {
    /// Content sits flush with the plate face.
    #[default]
    Flush,
    /// Content is raised above the plate face.
    Raised,
}

impl StyleVariant {
    /// Wire value sent to the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flush => "flush",
            Self::Raised => "raised",
        }
    }
}

impl std::str::FromStr for StyleVariant {
    type Err = PlatemarkError;

    fn from_str(s: &str) -> PlatemarkResult<Self> {
        match s {
            "flush" => Ok(Self::Flush),
            "raised" => Ok(Self::Raised),
            other => Err(PlatemarkError::validation(format!(
                "unknown style variant '{other}' (expected flush or raised)"
            ))),
        }
    }
}

/// Which geometry the CAD backend receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryMode {
    /// The full vector document (text, icon fragments, curves).
    #[default]
    Vector,
    /// The rasterized rectangle-cover contour, for backends that cannot
    /// consume text or complex fragments.
    Compat,
}

impl GeometryMode {
    /// The other mode, used as the fallback attempt.
    pub fn fallback(self) -> Self {
        match self {
            Self::Vector => Self::Compat,
            Self::Compat => Self::Vector,
        }
    }

    /// Stable lowercase name for error aggregation and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Compat => "compat",
        }
    }
}

impl std::str::FromStr for GeometryMode {
    type Err = PlatemarkError;

    fn from_str(s: &str) -> PlatemarkResult<Self> {
        match s {
            "vector" => Ok(Self::Vector),
            "compat" => Ok(Self::Compat),
            other => Err(PlatemarkError::validation(format!(
                "unknown geometry mode '{other}' (expected vector or compat)"
            ))),
        }
    }
}

/// The opaque CAD conversion capability: SVG geometry in, solid model out.
pub trait CadBackend: Send + Sync {
    /// Convert `svg` into a solid-model artifact of `format`.
    fn submit(
        &self,
        svg: &str,
        size: MmSize,
        style: StyleVariant,
        format: ExportFormat,
    ) -> PlatemarkResult<Vec<u8>>;
}

/// Run one backend call with a hard deadline.
///
/// The call runs on a detached thread; on expiry the caller gets a
/// [`PlatemarkError::Timeout`] while the stray call finishes (and is
/// dropped) in the background. An empty artifact counts as a backend error.
pub fn submit_with_timeout(
    backend: &Arc<dyn CadBackend>,
    svg: String,
    size: MmSize,
    style: StyleVariant,
    format: ExportFormat,
    timeout: Duration,
) -> PlatemarkResult<Vec<u8>> {
    let (tx, rx) = mpsc::sync_channel(1);
    let backend = Arc::clone(backend);
    std::thread::spawn(move || {
        let result = backend.submit(&svg, size, style, format);
        let _ = tx.send(result);
    });

    let bytes = match rx.recv_timeout(timeout) {
        Ok(result) => result?,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            return Err(PlatemarkError::timeout(format!(
                "CAD backend call exceeded {}s",
                timeout.as_secs()
            )));
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            return Err(PlatemarkError::backend(
                "CAD backend worker terminated unexpectedly",
            ));
        }
    };

    if bytes.is_empty() {
        return Err(PlatemarkError::backend(format!(
            "backend returned an empty {} artifact",
            format.extension()
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/export/backend.rs"]
mod tests;
