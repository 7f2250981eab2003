//! tmo - HDR tone mapping CLI
//!
//! Applies registered luminance operators to raw linear XYZ(A) float images.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::apply::ApplyArgs;
use commands::defaults::DefaultsArgs;

#[derive(Parser)]
#[command(name = "tmo")]
#[command(author, version, about = "HDR tone mapping for raw XYZ images")]
#[command(long_about = "
Tone maps linear XYZ(A) images stored as raw little-endian f32 samples,
interleaved, row-major. Only luminance (Y) is compressed; X and Z are
rescaled to keep chromaticity and alpha is copied through.

Examples:
  tmo list                                         # Show operators
  tmo defaults ashikhminO2 -o ashikhmin.yaml       # Dump default parameters
  tmo apply in.raw -o out.raw -W 1920 -H 1080
  tmo apply in.raw -o out.raw -W 64 -H 64 -c 4 --set Equation=4
  tmo apply in.raw -o out.raw -W 64 -H 64 --region 8,8,32,32 --config my.yaml
  tmo -vv -j 4 apply in.raw -o out.raw -W 1920 -H 1080 --min-policy observed
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (repeat for more detail; RUST_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tone-mapping operators
    #[command(visible_alias = "ls")]
    List,

    /// Print an operator's default configuration as YAML
    Defaults(DefaultsArgs),

    /// Tone map a raw XYZ image
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::List => commands::list::run(cli.verbose),
        Commands::Defaults(args) => commands::defaults::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
    }
}
