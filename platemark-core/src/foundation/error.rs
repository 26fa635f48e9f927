/// Convenience result type used across Platemark.
pub type PlatemarkResult<T> = Result<T, PlatemarkError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PlatemarkError {
    /// Invalid user-provided or tag configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Renderable content is missing or unusable (no visible pixels, contour overflow).
    #[error("content error: {0}")]
    Content(String),

    /// Errors reported by or while talking to the CAD conversion backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// A backend call exceeded its deadline.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlatemarkError {
    /// Build a [`PlatemarkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlatemarkError::Content`] value.
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    /// Build a [`PlatemarkError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build a [`PlatemarkError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`PlatemarkError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for deadline expiry, which batch drivers surface differently
    /// from ordinary backend failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Re-wrap the error with the item it belongs to, keeping the variant.
    pub fn for_item(self, item: &str) -> Self {
        match self {
            Self::Validation(m) => Self::Validation(format!("{item}: {m}")),
            Self::Content(m) => Self::Content(format!("{item}: {m}")),
            Self::Backend(m) => Self::Backend(format!("{item}: {m}")),
            Self::Timeout(m) => Self::Timeout(format!("{item}: {m}")),
            Self::Serde(m) => Self::Serde(format!("{item}: {m}")),
            Self::Other(e) => Self::Other(e.context(item.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
