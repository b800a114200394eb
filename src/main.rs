use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinct::assets::{AssetCategory, AssetLoader};
use tinct::error::RecolorError;
use tinct::models::{output_file_name, AppConfig, PaletteCatalog};
use tinct::rendering::{read_png, write_png};
use tinct::services::{ChunkScheduler, Origin, RecolorSession};

#[derive(Parser)]
#[command(name = "tinct")]
#[command(about = "Recolor images into named palettes in OKLab space")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recolor a PNG into a named palette
    Convert {
        /// Source PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Palette name ("original" copies the source unchanged)
        #[arg(short, long)]
        palette: String,

        /// Output PNG file (default: <input stem>-<palette>.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of chunk workers (default: from config, else CPUs - 1)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Config file (overrides CONFIG_FILE)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Palette catalog file (overrides PALETTES_FILE)
        #[arg(long)]
        palettes: Option<PathBuf>,
    },
    /// List the available palettes
    Palettes {
        /// Only show names containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Palette catalog file (overrides PALETTES_FILE)
        #[arg(long)]
        palettes: Option<PathBuf>,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract palettes.yaml
        #[arg(long)]
        palettes: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinct=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Convert {
            input,
            palette,
            output,
            workers,
            config,
            palettes,
        }) => run_convert_command(&input, &palette, output, workers, config, palettes).await,
        Some(Commands::Palettes { search, palettes }) => {
            run_palettes_command(search.as_deref(), palettes);
            Ok(())
        }
        Some(Commands::Init {
            palettes,
            config,
            all,
            force,
            list,
        }) => run_init_command(palettes, config, all, force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Asset loader from explicit flags, falling back to env vars
fn asset_loader(palettes: Option<PathBuf>, config: Option<PathBuf>) -> AssetLoader {
    let palettes = palettes.or_else(|| std::env::var("PALETTES_FILE").ok().map(PathBuf::from));
    let config = config.or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
    AssetLoader::new(palettes, config)
}

/// Recolor one PNG file into a palette
async fn run_convert_command(
    input: &Path,
    palette: &str,
    output: Option<PathBuf>,
    workers: Option<usize>,
    config: Option<PathBuf>,
    palettes: Option<PathBuf>,
) -> anyhow::Result<()> {
    let loader = asset_loader(palettes, config);
    let mut config = AppConfig::load_from_assets(&loader);
    if workers.is_some() {
        config.workers = workers;
    }
    let catalog = PaletteCatalog::load_from_assets(&loader);

    let selection = catalog
        .select(palette)
        .ok_or_else(|| RecolorError::UnknownPalette(palette.to_string()))
        .context("Run 'tinct palettes' to see the available names")?;

    let source =
        read_png(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let output = output.unwrap_or_else(|| {
        let source_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed.png".to_string());
        input.with_file_name(output_file_name(&source_name, selection.key()))
    });

    let session = RecolorSession::new(ChunkScheduler::from_config(&config));
    session.set_source(source).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<u8>();
    let printer = tokio::spawn(async move {
        let mut stderr = std::io::stderr();
        while let Some(percent) = rx.recv().await {
            let _ = write!(stderr, "\rConverting: {percent:>3}%");
            let _ = stderr.flush();
        }
    });

    let result = session.convert(selection, Some(tx)).await;
    // the job drops its sender when done, which ends the printer
    let _ = printer.await;
    let conversion = result?;
    if conversion.origin == Origin::Computed {
        eprintln!();
    }

    write_png(&output, &conversion.image)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({}x{}, palette: {})",
        output.display(),
        conversion.image.width(),
        conversion.image.height(),
        conversion.palette
    );
    Ok(())
}

/// List palette names, optionally filtered
fn run_palettes_command(search: Option<&str>, palettes: Option<PathBuf>) {
    let catalog = PaletteCatalog::load_from_assets(&asset_loader(palettes, None));
    let names = match search {
        Some(term) => catalog.search(term),
        None => catalog.names(),
    };

    for name in &names {
        match catalog.colors(name) {
            Some(colors) => println!("{name} ({} colors)", colors.len()),
            None => println!("{name}"),
        }
    }
    if names.is_empty() {
        eprintln!("No palettes match.");
    }
}

/// Extract embedded assets to filesystem
fn run_init_command(
    palettes: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        for f in AssetLoader::list_embedded() {
            println!("  {f}");
        }
        return Ok(());
    }

    let mut categories = Vec::new();
    if all || palettes {
        categories.push(AssetCategory::Palettes);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --palettes, or --config");
        eprintln!("\nRun 'tinct init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let report = asset_loader(None, None).init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let palettes_file = std::env::var("PALETTES_FILE").ok();

    println!("Tinct v{VERSION}");
    println!("Recolor images into named palettes\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  PALETTES_FILE = {}",
        palettes_file.as_deref().unwrap_or("(not set)")
    );

    fn source(path: Option<&str>) -> String {
        match path {
            Some(p) if Path::new(p).exists() => p.to_string(),
            Some(_) => "embedded (file not found)".to_string(),
            None => "embedded".to_string(),
        }
    }

    println!("\nAsset Sources:");
    println!("  Config:   {}", source(config_file.as_deref()));
    println!("  Palettes: {}", source(palettes_file.as_deref()));

    let loader = asset_loader(None, None);
    let config = AppConfig::load_from_assets(&loader);
    let catalog = PaletteCatalog::load_from_assets(&loader);

    println!("\nSettings:");
    println!("  Palettes:          {}", catalog.len());
    println!("  Workers:           {}", config.worker_count());
    println!("  Progress interval: {} pixels", config.progress_interval());

    println!("\nRun 'tinct --help' for usage information.");
}
