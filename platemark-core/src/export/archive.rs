use std::io::{Cursor, Write as _};

use anyhow::Context as _;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    config::record::sanitize_file_name,
    export::{backend::ExportFormat, orchestrator::ExportArtifact},
    foundation::error::PlatemarkResult,
};

/// Archive entry name for the item at `index`: `"<ordinal>_<name>.<ext>"`.
///
/// The 1-based ordinal keeps entries in library order inside the archive;
/// nameless records fall back to `tag_<ordinal>`.
pub fn batch_file_name(index: usize, name: &str, format: ExportFormat) -> String {
    let base = if name.trim().is_empty() {
        format!("tag_{}", index + 1)
    } else {
        name.trim().to_string()
    };
    format!(
        "{}_{}.{}",
        index + 1,
        sanitize_file_name(&base),
        format.extension()
    )
}

/// Package artifacts into a deflate-compressed zip, in slice order.
pub fn package(artifacts: &[ExportArtifact]) -> PlatemarkResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for artifact in artifacts {
        writer
            .start_file(artifact.file_name.as_str(), options)
            .with_context(|| format!("start zip entry '{}'", artifact.file_name))?;
        writer
            .write_all(&artifact.bytes)
            .with_context(|| format!("write zip entry '{}'", artifact.file_name))?;
    }

    let cursor = writer.finish().context("finalize zip archive")?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/export/archive.rs"]
mod tests;
