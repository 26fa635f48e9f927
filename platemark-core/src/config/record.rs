use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::{
    config::model::{IconRef, LeftLayout, RightLayout, SizeClass, TagConfig, TextAlign},
    foundation::error::{PlatemarkError, PlatemarkResult},
};

/// Version stamped on cached preview markup; bump when render output changes
/// so stale previews regenerate instead of displaying outdated artwork.
pub const PREVIEW_SCHEMA_VERSION: u32 = 4;

/// Version of the portable library JSON document.
pub const LIBRARY_FORMAT_VERSION: u32 = 1;

fn default_scale() -> u8 {
    crate::config::model::MAX_SCALE_PERCENT
}

fn default_foreground() -> String {
    "#000000".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn generate_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A saved tag: a [`TagConfig`] plus identity, naming and cache metadata.
///
/// This is the persistence boundary type; field names follow the camelCase
/// JSON convention of the portable library format.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    /// Stable unique id.
    #[serde(default = "generate_record_id")]
    pub id: String,
    /// Display name; auto-derived from content when saved without one.
    #[serde(default)]
    pub name: String,
    /// Plate size class.
    pub size: SizeClass,
    /// Icon-side layout.
    pub left_layout: LeftLayout,
    /// Text-side layout.
    pub right_layout: RightLayout,
    /// Icon slots.
    #[serde(default)]
    pub icons: Vec<Option<IconRef>>,
    /// Text slots.
    #[serde(default)]
    pub texts: Vec<String>,
    /// Text alignment.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Icon scale in percent.
    #[serde(default = "default_scale")]
    pub icon_size: u8,
    /// Text scale in percent.
    #[serde(default = "default_scale")]
    pub text_size: u8,
    /// Foreground colour.
    #[serde(default = "default_foreground")]
    pub content_color: String,
    /// Background colour.
    #[serde(default = "default_background")]
    pub background_color: String,
    /// Creation timestamp, ms since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
    /// Last-update timestamp, ms since the Unix epoch.
    #[serde(default)]
    pub updated_at: u64,
    /// Cached preview SVG markup, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Schema version of the cached preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_version: Option<u32>,
}

impl TagRecord {
    /// Create a record from a config, auto-naming it when `name` is empty.
    pub fn from_config(config: &TagConfig, name: &str) -> Self {
        let now = now_millis();
        let name = if name.trim().is_empty() {
            auto_name(config)
        } else {
            name.trim().to_string()
        };
        Self {
            id: generate_record_id(),
            name,
            size: config.size,
            left_layout: config.left,
            right_layout: config.right,
            icons: config.icons.to_vec(),
            texts: config.texts.to_vec(),
            text_align: config.text_align,
            icon_size: config.icon_scale,
            text_size: config.text_scale,
            content_color: config.foreground.clone(),
            background_color: config.background.clone(),
            created_at: now,
            updated_at: now,
            preview: None,
            preview_version: None,
        }
    }

    /// Reconstruct the renderable config, normalizing slot arrays.
    pub fn config(&self) -> TagConfig {
        let mut icons: [Option<IconRef>; 2] = [None, None];
        for (slot, value) in icons.iter_mut().zip(self.icons.iter()) {
            *slot = value.clone();
        }
        let mut texts: [String; 2] = [String::new(), String::new()];
        for (slot, value) in texts.iter_mut().zip(self.texts.iter()) {
            *slot = value.clone();
        }
        let mut config = TagConfig {
            size: self.size,
            left: self.left_layout,
            right: self.right_layout,
            icons,
            texts,
            text_align: self.text_align,
            icon_scale: self.icon_size,
            text_scale: self.text_size,
            foreground: self.content_color.clone(),
            background: self.background_color.clone(),
        };
        config.normalize();
        config
    }

    /// Whether the cached preview (if any) predates the current schema.
    pub fn preview_is_stale(&self) -> bool {
        self.preview.is_some() && self.preview_version != Some(PREVIEW_SCHEMA_VERSION)
    }

    /// Store freshly rendered preview markup with the current schema stamp.
    pub fn set_preview(&mut self, markup: String) {
        self.preview = Some(markup);
        self.preview_version = Some(PREVIEW_SCHEMA_VERSION);
    }

    /// Drop cached preview data (used before portable export).
    pub fn strip_preview(&mut self) {
        self.preview = None;
        self.preview_version = None;
    }
}

/// Derive a display name from content: icon display names first, then
/// non-empty trimmed texts, joined with " - "; "Untitled" when empty.
pub fn auto_name(config: &TagConfig) -> String {
    let mut parts: Vec<String> = Vec::new();
    for icon in config.icons[..config.left.icon_count().min(config.icons.len())]
        .iter()
        .flatten()
    {
        parts.push(icon.display_name());
    }
    for text in &config.texts[..config.right.text_count().min(config.texts.len())] {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }
    if parts.is_empty() {
        "Untitled".to_string()
    } else {
        parts.join(" - ")
    }
}

/// Replace every non-alphanumeric character with `_` for safe file names.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "tag".to_string()
    } else {
        sanitized
    }
}

fn default_library_version() -> u32 {
    LIBRARY_FORMAT_VERSION
}

/// Portable library document wrapping a set of records.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TagLibrary {
    /// Document format version.
    #[serde(default = "default_library_version")]
    pub version: u32,
    /// Export timestamp, ms since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
    /// The exported records, previews stripped.
    pub tags: Vec<TagRecord>,
}

/// Serialize records into the portable library JSON document.
///
/// Previews are stripped; exports carry only re-derivable content.
pub fn export_portable(records: &[TagRecord]) -> PlatemarkResult<String> {
    let tags: Vec<TagRecord> = records
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.strip_preview();
            r
        })
        .collect();
    let library = TagLibrary {
        version: LIBRARY_FORMAT_VERSION,
        timestamp: now_millis(),
        tags,
    };
    serde_json::to_string_pretty(&library)
        .map_err(|e| PlatemarkError::serde(format!("failed to serialize tag library: {e}")))
}

/// Parse a portable library document and append its records to `existing`.
///
/// Accepts either the wrapped `{ version, timestamp, tags }` document or a
/// bare array of records. Records without an id get a fresh one; records
/// whose id already exists in `existing` are skipped. Returns how many
/// records were appended.
pub fn import_portable(json: &str, existing: &mut Vec<TagRecord>) -> PlatemarkResult<usize> {
    let value: serde_json::Value = serde_json::from_str(json)
        .context("parse tag library JSON")
        .map_err(|e| PlatemarkError::serde(format!("{e:#}")))?;

    let tags: Vec<TagRecord> = if value.is_array() {
        serde_json::from_value(value)
            .context("parse tag record array")
            .map_err(|e| PlatemarkError::serde(format!("{e:#}")))?
    } else {
        let library: TagLibrary = serde_json::from_value(value)
            .context("parse tag library document")
            .map_err(|e| PlatemarkError::serde(format!("{e:#}")))?;
        if library.version > LIBRARY_FORMAT_VERSION {
            return Err(PlatemarkError::validation(format!(
                "library format version {} is newer than supported version {}",
                library.version, LIBRARY_FORMAT_VERSION
            )));
        }
        library.tags
    };

    let mut imported = 0usize;
    for mut record in tags {
        record.strip_preview();
        if record.id.trim().is_empty() {
            record.id = generate_record_id();
        }
        if existing.iter().any(|r| r.id == record.id) {
            continue;
        }
        existing.push(record);
        imported += 1;
    }
    Ok(imported)
}

#[cfg(test)]
#[path = "../../tests/unit/config/record.rs"]
mod tests;
