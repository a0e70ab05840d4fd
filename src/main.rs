//! quick-mosaic CLI - coupler mosaic generator.
//!
//! Builds the land/ocean fraction files, exchange grids and coupler mosaic
//! for a model whose atmosphere, land and ocean share one grid.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use quick_mosaic::config::{QuickMosaicConfig, DEFAULT_MOSAIC_NAME};
use quick_mosaic::io::NetcdfStore;
use quick_mosaic::pipeline::Pipeline;

/// Coupler mosaic generator for coincident atmosphere/land/ocean grids.
///
/// Without --ocean-topog the input is a coupled mosaic and land comes from its
/// atmosphere x land exchange grids. With --ocean-topog the input is a solo
/// mosaic and the topography decides land and ocean.
#[derive(Parser)]
#[command(name = "quick-mosaic")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input mosaic file (coupled, or solo with --ocean-topog).
    #[arg(long)]
    input_mosaic: PathBuf,

    /// Base name of the coupler mosaic; the file is <name>.nc.
    #[arg(long, default_value = DEFAULT_MOSAIC_NAME)]
    mosaic_name: String,

    /// Ocean topography file deciding the land/sea mask.
    #[arg(long)]
    ocean_topog: Option<PathBuf>,

    /// Cells deeper than this (meters) are ocean.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    sea_level: f64,

    /// Reproduce the numerics of older grid tools.
    #[arg(long)]
    reproduce_siena: bool,

    /// Directory receiving every output file.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log level.
    #[arg(short, long, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap_or_else(|e| {
        eprintln!("Error: failed to install logger: {}", e);
        std::process::exit(1);
    });

    let history = std::env::args().collect::<Vec<_>>().join(" ");
    let config = QuickMosaicConfig {
        input_mosaic: cli.input_mosaic,
        ocean_topog: cli.ocean_topog,
        sea_level: cli.sea_level,
        reproduce_siena: cli.reproduce_siena,
        mosaic_name: cli.mosaic_name,
        output_dir: cli.output_dir,
        history,
    };
    config.validate().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut store = NetcdfStore::new().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    std::fs::create_dir_all(&config.output_dir).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    println!("quick-mosaic - Coupler Mosaic Generator");
    println!("=======================================");
    println!("Input mosaic: {}", config.input_mosaic.display());
    if let Some(topog) = &config.ocean_topog {
        println!("Ocean topography: {}", topog.display());
    }
    println!("Output: {}", config.output_dir.join(config.mosaic_file()).display());
    println!();

    let start = Instant::now();
    let pipeline = Pipeline::quick_mosaic(config);
    let state = pipeline
        .run_with_callbacks(
            &mut store,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    println!("\nWrote {} files in {:.2?}", state.written.len(), start.elapsed());
}
