//! `refcard` command-line entry point.
//!
//! Loads configuration, initialises logging and dispatches to one of the
//! application use cases.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load AppConfig          -- --config file, else the platform config file
//!  └─ tracing_subscriber      -- RUST_LOG, else the config's log_level
//!  └─ subcommand
//!       ├─ generate           -- GenerateRefcardUseCase → JSON report
//!       ├─ blank              -- blank_template → JSON image plan
//!       ├─ validate-catalog   -- offline catalog consistency check
//!       └─ init-config        -- writes the default config file
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use refcard_cli::application::blank_template::blank_template;
use refcard_cli::application::generate_refcard::{GenerateRefcardUseCase, RefcardRequest};
use refcard_cli::infrastructure::measure::FontdueMeasurer;
use refcard_cli::infrastructure::output::write_json;
use refcard_cli::infrastructure::storage::catalog::{load_catalog, validate_catalog_file};
use refcard_cli::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, save_config_to, AppConfig, ConfigError,
};
use refcard_core::{MonospaceMeasurer, StylingMode, TextMeasurer};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Reference-card generator for exported game control bindings.
///
/// Reads a bindings file and a device catalog, and writes a JSON report with
/// one draw plan per device image plus any advisories.
#[derive(Debug, Parser)]
#[command(name = "refcard", about = "Reference-card draw plans from exported control bindings", version)]
struct Cli {
    /// Configuration file to use instead of the platform default.
    #[arg(long, global = true, env = "REFCARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the card for one bindings file.
    Generate(GenerateArgs),
    /// Plan a blank template with every hit-box outlined.
    Blank(BlankArgs),
    /// Check that no two catalog records handle the same device.
    ValidateCatalog {
        #[arg(long, env = "REFCARD_CATALOG")]
        catalog: PathBuf,
    },
    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Exported bindings XML file.
    #[arg(long)]
    binds: PathBuf,

    /// Catalog TOML file with commands, devices and hit-boxes.
    #[arg(long, env = "REFCARD_CATALOG")]
    catalog: PathBuf,

    /// Directory with the label font faces.  Overrides `render.font_dir`.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Label colouring: `none`, `group`, `category` or `modifier`.
    /// Overrides `render.styling`.
    #[arg(long)]
    styling: Option<String>,

    /// Control group to show; repeat for several.  Overrides
    /// `render.display_groups`.
    #[arg(long = "group")]
    groups: Vec<String>,

    /// Largest label size tried on device images.
    #[arg(long)]
    max_font_size: Option<u32>,

    /// Heading drawn on every image.
    #[arg(long)]
    title: Option<String>,

    /// Report file; standard output when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BlankArgs {
    #[arg(long, env = "REFCARD_CATALOG")]
    catalog: PathBuf,

    /// Catalog record name, e.g. `T16000M`.
    #[arg(long)]
    device: String,

    #[arg(long)]
    fonts: Option<PathBuf>,

    #[arg(long)]
    out: Option<PathBuf>,
}

impl GenerateArgs {
    /// Merges the flags over the configured defaults.
    fn into_request(self, binds: String, config: &AppConfig) -> RefcardRequest {
        let render = &config.render;
        RefcardRequest {
            binds,
            display_groups: if self.groups.is_empty() {
                render.display_groups.clone()
            } else {
                self.groups
            },
            styling: self
                .styling
                .as_deref()
                .map_or(render.styling, StylingMode::from_option),
            max_font_size: self.max_font_size.unwrap_or(render.max_font_size),
            device_indices: render.device_indices.clone(),
            benign_devices: config.devices.benign_devices.clone(),
            title: self.title,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = read_config(cli.config.as_deref())?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Generate(args) => generate(args, &config),
        Command::Blank(args) => blank(args, &config),
        Command::ValidateCatalog { catalog } => validate(&catalog),
        Command::InitConfig { force } => init_config(cli.config.as_deref(), force),
    }
}

fn generate(args: GenerateArgs, config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.catalog).context("loading catalog")?;
    let binds = std::fs::read_to_string(&args.binds)
        .with_context(|| format!("reading bindings file {}", args.binds.display()))?;
    let measurer = measurer(args.fonts.as_deref().or(config.render.font_dir.as_deref()))?;
    let out = args.out.clone();
    let request = args.into_request(binds, config);

    let report = GenerateRefcardUseCase::new(&catalog, measurer.as_ref()).execute(&request);

    for (channel, advisory) in [
        ("errors", &report.warnings.errors),
        ("unhandled_devices", &report.warnings.unhandled_devices),
        ("misconfiguration", &report.warnings.misconfiguration),
        ("device_software", &report.warnings.device_software),
    ] {
        if !advisory.is_empty() {
            warn!(run_id = %report.run_id, channel, "{advisory}");
        }
    }
    write_json(&report, out.as_deref()).context("writing report")?;
    Ok(())
}

fn blank(args: BlankArgs, config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.catalog).context("loading catalog")?;
    let measurer = measurer(args.fonts.as_deref().or(config.render.font_dir.as_deref()))?;
    let plan = blank_template(&catalog, measurer.as_ref(), &args.device)?;
    write_json(&plan, args.out.as_deref()).context("writing blank template")?;
    Ok(())
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let catalog = validate_catalog_file(path).with_context(|| format!("validating {}", path.display()))?;
    println!(
        "{}: {} controls, {} devices, no overlapping records",
        path.display(),
        catalog.controls.len(),
        catalog.devices.supported().count()
    );
    Ok(())
}

fn init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite it", path.display());
    }
    save_config_to(&AppConfig::default(), &path)?;
    info!(path = %path.display(), "default configuration written");
    println!("{}", path.display());
    Ok(())
}

/// Reads the configuration, falling back to defaults where the platform has
/// no config directory.
fn read_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let result = match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    match result {
        Ok(config) => Ok(config),
        Err(ConfigError::NoPlatformConfigDir) => Ok(AppConfig::default()),
        Err(e) => Err(e).context("loading configuration"),
    }
}

fn measurer(font_dir: Option<&Path>) -> anyhow::Result<Box<dyn TextMeasurer>> {
    match font_dir {
        Some(dir) => {
            let fonts = FontdueMeasurer::load_dir(dir).with_context(|| format!("loading fonts from {}", dir.display()))?;
            Ok(Box::new(fonts))
        }
        None => {
            info!("no font directory configured, using monospace metrics");
            Ok(Box::new(MonospaceMeasurer))
        }
    }
}
