//! List command.
//!
//! Prints every registered operator, with its defaults when verbose.

use std::io::{self, Write};

use anyhow::Result;
use tmo_ops::registry::OperatorRegistry;

/// Run the list command.
pub fn run(verbose: u8) -> Result<()> {
    let registry = OperatorRegistry::with_builtin();
    let stdout = io::stdout();
    write_list(&registry, verbose, &mut stdout.lock())?;
    Ok(())
}

fn write_list(registry: &OperatorRegistry, verbose: u8, out: &mut impl Write) -> io::Result<()> {
    for op in registry.operators() {
        writeln!(out, "{:<16} {}", op.identifier(), op.label())?;
        if verbose > 0 {
            for (key, value) in op.default_configuration().iter() {
                writeln!(out, "    {} = {} ({})", key, value, value.type_name())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_operator() {
        let registry = OperatorRegistry::with_builtin();
        let mut out = Vec::new();
        write_list(&registry, 0, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), registry.len());
        assert!(text.starts_with("ashikhminO2"));
        assert!(text.contains("Ashikhmin 02"));
    }

    #[test]
    fn verbose_lists_defaults() {
        let registry = OperatorRegistry::with_builtin();
        let mut out = Vec::new();
        write_list(&registry, 1, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("    Simple = "));
        assert!(text.contains("    Equation = "));
    }
}
