mod backend;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use platemark::{
    CadBackend, ExportFormat, Exporter, GeometryMode, IconCatalog, IconLookup, IconRef,
    ParleyTextMeasure, PlatemarkResult, Rasterize, ResvgRasterizer, StyleVariant, TagLibrary,
    TagRecord, TextMeasure,
};

use backend::{CurlCadBackend, StubCadBackend};

#[derive(Parser, Debug)]
#[command(name = "platemark", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a colour preview SVG for one tag.
    Preview(PreviewArgs),
    /// Export one tag to SVG, STEP or 3MF.
    Export(ExportArgs),
    /// Export a whole tag library into a zip archive.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input tag record JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    assets: AssetArgs,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input tag record JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output artifact path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    conversion: ConversionArgs,

    #[command(flatten)]
    assets: AssetArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input tag library JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output zip path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    conversion: ConversionArgs,

    #[command(flatten)]
    assets: AssetArgs,
}

#[derive(Parser, Debug)]
struct ConversionArgs {
    /// Artifact format: svg, step or 3mf.
    #[arg(long, default_value = "svg")]
    format: ExportFormat,

    /// Solid-model style: flush or raised.
    #[arg(long, default_value = "flush")]
    style: StyleVariant,

    /// Preferred geometry mode: vector or compat.
    #[arg(long, default_value = "vector")]
    mode: GeometryMode,

    /// CAD conversion service base URL.
    #[arg(long)]
    backend: Option<String>,

    /// Use the offline stub backend instead of a service.
    #[arg(long, default_value_t = false)]
    stub_backend: bool,

    /// Per-call backend deadline in seconds.
    #[arg(long, default_value_t = 90)]
    timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct AssetArgs {
    /// Icon catalog directory.
    #[arg(long)]
    icons: Option<PathBuf>,

    /// Text font file for measurement and rasterization.
    #[arg(long)]
    font: Option<PathBuf>,
}

/// Lookup used when no icon directory is given; every icon degrades to a
/// placeholder rectangle.
struct NoIcons;

impl IconLookup for NoIcons {
    fn lookup(&self, _icon: &IconRef) -> PlatemarkResult<Option<platemark::IconArtwork>> {
        Ok(None)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn load_record(path: &PathBuf) -> anyhow::Result<TagRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read tag record '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse tag record '{}'", path.display()))
}

fn load_library(path: &PathBuf) -> anyhow::Result<Vec<TagRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read tag library '{}'", path.display()))?;
    let library: TagLibrary = serde_json::from_str(&json)
        .with_context(|| format!("parse tag library '{}'", path.display()))?;
    Ok(library.tags)
}

fn build_exporter(assets: &AssetArgs, conversion: Option<&ConversionArgs>) -> anyhow::Result<Exporter> {
    let icons: Arc<dyn IconLookup + Send + Sync> = match &assets.icons {
        Some(dir) => Arc::new(IconCatalog::scan(dir)?),
        None => Arc::new(NoIcons),
    };

    let measure: Arc<dyn TextMeasure + Send + Sync> = match &assets.font {
        Some(path) => Arc::new(ParleyTextMeasure::from_font_file(path)?),
        None => Arc::new(ParleyTextMeasure::system()),
    };

    let rasterizer: Arc<dyn Rasterize + Send + Sync> = match &assets.font {
        Some(path) => Arc::new(ResvgRasterizer::with_font_file(path)?),
        None => Arc::new(ResvgRasterizer::new()),
    };

    let (backend, timeout_secs): (Arc<dyn CadBackend>, u64) = match conversion {
        Some(c) if c.stub_backend => (Arc::new(StubCadBackend), c.timeout_secs),
        Some(c) => match &c.backend {
            Some(url) => (
                Arc::new(CurlCadBackend::new(url.clone(), c.timeout_secs)?),
                c.timeout_secs,
            ),
            None if c.format.is_cad() => anyhow::bail!(
                "CAD formats need --backend <url> or --stub-backend"
            ),
            None => (Arc::new(StubCadBackend), c.timeout_secs),
        },
        None => (Arc::new(StubCadBackend), 90),
    };

    Ok(Exporter::new(icons, measure, rasterizer, backend)
        .with_timeout(std::time::Duration::from_secs(timeout_secs)))
}

fn write_out(path: &PathBuf, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let record = load_record(&args.in_path)?;
    let exporter = build_exporter(&args.assets, None)?;
    let svg = exporter.render_preview(&record)?;
    write_out(&args.out, svg.as_bytes())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let record = load_record(&args.in_path)?;
    let exporter = build_exporter(&args.assets, Some(&args.conversion))?;
    let artifact = exporter.export_one(
        &record,
        args.conversion.format,
        args.conversion.style,
        args.conversion.mode,
    )?;
    write_out(&args.out, &artifact.bytes)
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let records = load_library(&args.in_path)?;
    let exporter = build_exporter(&args.assets, Some(&args.conversion))?;

    let progress = |completed: usize, total: usize| {
        eprintln!("exported {completed}/{total}");
    };
    let zip_bytes = exporter.export_batch(
        &records,
        args.conversion.format,
        args.conversion.style,
        args.conversion.mode,
        &progress,
    )?;
    write_out(&args.out, &zip_bytes)
}
