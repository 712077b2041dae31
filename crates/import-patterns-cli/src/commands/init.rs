//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# import-patterns configuration
#
# Every source file must be covered by exactly one policy: the first
# [[policies]] entry whose `target` glob matches the file path governs it.
# Files that no target matches are reported as unconfigured.
#
# An import is allowed when its resolved path matches at least one of the
# policy's `restrictions`. Relative specifiers ("./x", "../x") are resolved
# against the importing file's directory; bare specifiers ("react", "fs")
# are matched as written.

# severity = "error"
# docs = "https://example.com/source-organization"

[analyzer]
root = "."
exclude = ["**/node_modules/**", "**/out/**", "**/dist/**"]

[[policies]]
target = "src/common/**"
restrictions = "src/common/**"

[[policies]]
target = "src/browser/**"
restrictions = ["src/common/**", "src/browser/**"]

[[policies]]
target = "src/node/**"
restrictions = ["src/common/**", "src/node/**", "{fs,path,os}"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("import-patterns.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, CONFIG_TEMPLATE)?;

    println!("Created import-patterns.toml");
    println!();
    println!("Next steps:");
    println!("  1. Edit [[policies]] to describe your source layout");
    println!("  2. Run: import-patterns check");

    Ok(())
}
