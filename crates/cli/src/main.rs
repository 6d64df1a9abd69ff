use aia_scope_core::{analyze_batch, format_output, AnalyzerConfig, ArchiveAnalyzer, OutputFormat};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aia-scope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventory components, extensions and media of App Inventor .aia projects")]
#[command(long_about = "A Rust-based tool that dissects App Inventor project archives (.aia). \
    For every archive it lists the declared components, AI-related components, bundled \
    extensions and media files, counts screens, operators, variables and event blocks, and \
    summarizes component usage per category (drawing and animation, maps, sensors, social, \
    storage, connectivity).\n\n\
    Archives that cannot be read are reported in place and never abort the batch.")]
pub struct Args {
    /// Archives to analyze
    #[arg(required = true)]
    pub archives: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json)]
    pub format: OutputFormatArg,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file overriding the component catalogs
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory in which scratch extraction directories are created
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Host reported as the project source
    #[arg(long)]
    pub source_host: Option<String>,

    /// Show verbose progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Parallel threads (1 = sequential, 0 = auto)
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    JsonCompact,
    Yaml,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::JsonCompact => OutputFormat::JsonCompact,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Build config
    let mut config = AnalyzerConfig::new().with_threads(args.threads);

    if let Some(catalog) = args.catalog {
        config = config
            .with_catalog_file(&catalog)
            .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
    }

    if let Some(scratch_dir) = args.scratch_dir {
        config = config.with_scratch_dir(scratch_dir);
    }

    if let Some(host) = args.source_host {
        config = config.with_source_host(host);
    }

    // Show progress if verbose
    let spinner = if args.verbose {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Analyzing {} archive(s)...", args.archives.len()));
        Some(pb)
    } else {
        None
    };

    let analyzer = ArchiveAnalyzer::new(config)?;
    let report = analyze_batch(&analyzer, &args.archives);

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Analyzed {} archive(s) in {}ms ({} failed)",
            report.stats.total_archives, report.metadata.duration_ms, report.stats.failed
        ));
    }

    let output = format_output(&report, args.format.into())?;

    // Write output
    if let Some(path) = args.output {
        fs::write(&path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Output written to: {}", path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}
