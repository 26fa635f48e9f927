use std::{
    io::Write as _,
    process::{Command, Stdio},
};

use platemark::{
    CadBackend, ExportFormat, MmSize, PlatemarkError, PlatemarkResult, StyleVariant,
};

/// CAD backend that posts geometry to a remote conversion service with the
/// system `curl` binary.
///
/// Using `curl` keeps the CLI free of an HTTP client stack; the service
/// endpoint receives a multipart form with the SVG geometry, the plate
/// dimensions and the style variant, and answers with the artifact bytes.
pub struct CurlCadBackend {
    base_url: String,
    timeout_secs: u64,
}

impl CurlCadBackend {
    /// Build a backend for a service base URL, checking `curl` is available.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> PlatemarkResult<Self> {
        if !is_curl_on_path() {
            return Err(PlatemarkError::backend(
                "curl is required for CAD export, but was not found on PATH",
            ));
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn endpoint(&self, format: ExportFormat) -> PlatemarkResult<String> {
        match format {
            ExportFormat::Step => Ok(format!("{}/api/export_step", self.base_url)),
            ExportFormat::ThreeMf => Ok(format!("{}/api/export_3mf", self.base_url)),
            ExportFormat::Svg => Err(PlatemarkError::validation(
                "svg exports never go through the CAD backend",
            )),
        }
    }
}

pub fn is_curl_on_path() -> bool {
    Command::new("curl")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

impl CadBackend for CurlCadBackend {
    fn submit(
        &self,
        svg: &str,
        size: MmSize,
        style: StyleVariant,
        format: ExportFormat,
    ) -> PlatemarkResult<Vec<u8>> {
        let url = self.endpoint(format)?;

        let mut cmd = Command::new("curl");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args([
            "-sS",
            "--fail",
            "-m",
            &self.timeout_secs.to_string(),
            "-F",
            "svg_file=@-;filename=label.svg;type=image/svg+xml",
            "-F",
            &format!("width={}", size.width),
            "-F",
            &format!("height={}", size.height),
            "-F",
            &format!("style={}", style.as_str()),
        ])
        .arg(&url);

        let mut child = cmd.spawn().map_err(|e| {
            PlatemarkError::backend(format!("failed to spawn curl (is it installed?): {e}"))
        })?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(PlatemarkError::backend("failed to open curl stdin"));
        };
        stdin
            .write_all(svg.as_bytes())
            .map_err(|e| PlatemarkError::backend(format!("failed to stream geometry: {e}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| PlatemarkError::backend(format!("failed to wait for curl: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlatemarkError::backend(format!(
                "CAD service call failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

/// Offline stand-in backend producing a deterministic placeholder artifact.
/// Useful for exercising the export pipeline without a conversion service.
pub struct StubCadBackend;

impl CadBackend for StubCadBackend {
    fn submit(
        &self,
        svg: &str,
        size: MmSize,
        style: StyleVariant,
        format: ExportFormat,
    ) -> PlatemarkResult<Vec<u8>> {
        Ok(format!(
            "stub-{} plate={}x{}mm style={} geometry-bytes={}\n",
            format.extension(),
            size.width,
            size.height,
            style.as_str(),
            svg.len()
        )
        .into_bytes())
    }
}
