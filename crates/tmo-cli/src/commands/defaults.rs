//! Defaults command.
//!
//! Writes an operator's default configuration as YAML, ready to edit and
//! pass back through `apply --config`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tmo_ops::registry::OperatorRegistry;
use tracing::info;

/// Arguments for the `defaults` command.
#[derive(Args)]
pub struct DefaultsArgs {
    /// Operator identifier
    pub id: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the defaults command.
pub fn run(args: DefaultsArgs, _verbose: u8) -> Result<()> {
    let registry = OperatorRegistry::with_builtin();
    let op = registry.lookup(&args.id)?;
    let yaml = op.default_configuration().to_yaml()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &yaml).with_context(|| format!("Failed to save: {}", path.display()))?;
            info!(id = %args.id, path = %path.display(), "defaults written");
        }
        None => print!("{}", yaml),
    }
    Ok(())
}
