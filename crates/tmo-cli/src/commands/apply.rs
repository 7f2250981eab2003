//! Apply command.
//!
//! Loads a raw XYZ(A) image, tone maps it (optionally only a region) and
//! writes the result in the same layout.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tmo_core::Rect;
use tmo_ops::prelude::*;
use tmo_ops::ZeroLuminancePolicy;
use tracing::{info, warn};

use super::{load_raw, parse_region, save_raw};

/// Statistics minimum seeding.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MinPolicyArg {
    /// Minimum never above 0 (default)
    ZeroFloor,
    /// True minimum of the region
    Observed,
}

impl From<MinPolicyArg> for MinLuminancePolicy {
    fn from(arg: MinPolicyArg) -> Self {
        match arg {
            MinPolicyArg::ZeroFloor => MinLuminancePolicy::ZeroFloor,
            MinPolicyArg::Observed => MinLuminancePolicy::Observed,
        }
    }
}

/// Handling of pixels whose original luminance is zero.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ZeroLumaArg {
    /// Zero chroma, keep compressed Y
    Clamp,
    /// Divide anyway (Inf/NaN in X and Z)
    Propagate,
}

impl From<ZeroLumaArg> for ZeroLuminancePolicy {
    fn from(arg: ZeroLumaArg) -> Self {
        match arg {
            ZeroLumaArg::Clamp => ZeroLuminancePolicy::Clamp,
            ZeroLumaArg::Propagate => ZeroLuminancePolicy::Propagate,
        }
    }
}

/// Arguments for the `apply` command.
#[derive(Args)]
pub struct ApplyArgs {
    /// Input raw image (little-endian f32, interleaved XYZ or XYZA)
    pub input: PathBuf,

    /// Output raw image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(short = 'W', long)]
    pub width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long)]
    pub height: u32,

    /// Channels per pixel: 3 (XYZ) or 4 (XYZA)
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u8).range(3..=4))]
    pub channels: u8,

    /// Operator identifier
    #[arg(short = 't', long = "tmo", default_value = "ashikhminO2")]
    pub tmo: String,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override a parameter (key=value, repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Region to process as x,y,w,h (default: whole image)
    #[arg(long, value_parser = parse_region)]
    pub region: Option<Rect>,

    /// How statistics seed the minimum luminance
    #[arg(long, value_enum, default_value = "zero-floor")]
    pub min_policy: MinPolicyArg,

    /// How zero-luminance pixels are reconstructed
    #[arg(long, value_enum, default_value = "clamp")]
    pub zero_luma: ZeroLumaArg,

    /// Collect statistics on one thread
    #[arg(long)]
    pub serial: bool,
}

fn load_config(path: Option<&Path>, assignments: &[String]) -> Result<Configuration> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to load: {}", path.display()))?;
            Configuration::from_yaml(&text).with_context(|| format!("Invalid configuration: {}", path.display()))?
        }
        None => Configuration::new(),
    };
    for assignment in assignments {
        config.parse_assignment(assignment)?;
    }
    Ok(config)
}

/// Run the apply command.
pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    let registry = OperatorRegistry::with_builtin();
    // fail on an unknown id before reading any pixels
    let op = registry.lookup(&args.tmo)?;
    let config = load_config(args.config.as_deref(), &args.set)?;

    let mut image = load_raw(&args.input, args.width, args.height, args.channels as usize)?;
    let region = args.region.unwrap_or_else(|| image.bounds());

    info!(
        input = %args.input.display(),
        operator = op.identifier(),
        region = %region,
        "tone mapping"
    );
    if verbose > 1 {
        for (key, value) in config.iter() {
            info!("  {} = {}", key, value);
        }
    }

    let options = ToneMapOptions {
        min_policy: args.min_policy.into(),
        zero_luminance: args.zero_luma.into(),
        parallel: !args.serial,
    };
    let mapper = ToneMapper::with_options(&registry, options);

    let start = Instant::now();
    match mapper.apply_region(&args.tmo, &mut image, region, &config)? {
        Some(stats) => info!(
            avg = stats.avg_log_luminance,
            max = stats.max_luminance,
            min = stats.min_luminance,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "done"
        ),
        None => warn!(region = %region, "region is empty, output equals input"),
    }

    save_raw(&args.output, &image)?;
    info!(output = %args.output.display(), "saved");
    Ok(())
}
