//! List policies command implementation.

use anyhow::{Context, Result};
use import_patterns_core::PolicySet;
use std::fmt::Write;
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Runs the list-policies command.
pub fn run(source: &ConfigSource, file: Option<&Path>) -> Result<()> {
    let config = crate::config_resolver::load(source)?;
    let policies = config
        .policy_set()
        .context("Config validation failed")?;

    print!("{}", render(&policies, file));
    Ok(())
}

fn render(policies: &PolicySet, file: Option<&Path>) -> String {
    let file = file.map(|f| f.to_string_lossy().replace('\\', "/"));
    let selected = file.as_deref().and_then(|f| policies.position(f));

    let mut out = String::new();
    let _ = writeln!(out, "   {:<4} {:<32} Restrictions", "#", "Target");
    let _ = writeln!(out, "{}", "-".repeat(80));

    for (i, policy) in policies.iter().enumerate() {
        let marker = if selected == Some(i) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker}  {:<4} {:<32} {}",
            i,
            policy.target(),
            policy.restrictions().join(" or ")
        );
    }

    if let Some(file) = file {
        let _ = writeln!(out);
        match selected {
            Some(i) => {
                let _ = writeln!(out, "{file} is governed by policy #{i}");
            }
            None => {
                let _ = writeln!(
                    out,
                    "{file} matches no policy target and would be reported as badFilename"
                );
            }
        }
    }

    out
}
