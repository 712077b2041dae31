//! Check command implementation.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use import_patterns_core::{Config, LintResult};
use import_patterns_ts::{ImportPolicyEngine, LanguageExtractor, TypeScriptExtractor};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = crate::config_resolver::load(source)?;

    let result = lint(path, &config, exclude)?;

    super::output::print(&result, format)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Discovers and checks every supported file under `path`.
pub fn lint(path: &Path, config: &Config, extra_exclude: Vec<String>) -> Result<LintResult> {
    let policies = config
        .policy_set()
        .context("Config validation failed")?;
    let engine = ImportPolicyEngine::new(policies)
        .with_severity(config.severity)
        .with_doc_ref(config.docs.clone());
    let extractors = TypeScriptExtractor::all();

    let root = if config.analyzer.root.is_absolute() {
        config.analyzer.root.clone()
    } else {
        path.join(&config.analyzer.root)
    };

    let mut exclude = config.analyzer.exclude.clone();
    exclude.extend(extra_exclude);
    let exclude = build_globset(&exclude).context("Invalid exclude pattern")?;

    let files = discover_files(
        &root,
        &exclude,
        config.analyzer.respect_gitignore,
        &extractors,
    )?;

    info!(
        "Checking {} files against {} policies",
        files.len(),
        engine.policies().len()
    );

    let mut result = LintResult::new();

    for file_path in &files {
        let Some(extractor) = extractor_for(&extractors, file_path) else {
            continue;
        };

        let source = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;

        let mut analysis = match extractor.analyze(&source) {
            Ok(analysis) => analysis,
            Err(e) if !config.fail_on_parse_error => {
                warn!("Skipping {}: {e}", file_path.display());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to parse {}", file_path.display()))
            }
        };
        analysis.file_path = relative_to(&root, file_path);

        result.violations.extend(engine.check(&analysis));
        result.files_checked += 1;
    }

    result.sort();

    info!(
        "Check complete: {} violations in {} files",
        result.violations.len(),
        result.files_checked
    );

    Ok(result)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p).with_context(|| format!("bad glob '{p}'"))?);
    }
    Ok(builder.build()?)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

fn extractor_for<'a>(
    extractors: &'a [Box<dyn LanguageExtractor>],
    path: &Path,
) -> Option<&'a dyn LanguageExtractor> {
    let ext = extension_of(path);
    extractors
        .iter()
        .find(|e| e.handles(&ext))
        .map(|e| &**e)
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn discover_files(
    root: &Path,
    exclude: &GlobSet,
    respect_gitignore: bool,
    extractors: &[Box<dyn LanguageExtractor>],
) -> Result<Vec<PathBuf>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore)
        .git_exclude(respect_gitignore)
        .require_git(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || extractor_for(extractors, path).is_none() {
            continue;
        }

        let rel = relative_to(root, path);
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        if exclude.is_match(&rel_str) {
            debug!("Excluding: {rel_str}");
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_patterns_core::{PolicyEntry, ViolationKind};
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config() -> Config {
        Config {
            policies: vec![
                PolicyEntry::new("src/common/**", ["src/common/**"]),
                PolicyEntry::new("src/browser/**", ["src/common/**", "src/browser/**"]),
            ],
            ..Config::default()
        }
    }

    #[test]
    fn checks_discovered_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/common/a.ts", "import { b } from \"../browser/b\";\n");
        write(tmp.path(), "src/browser/b.tsx", "import { a } from \"../common/a\";\n");
        write(tmp.path(), "README.md", "not source");

        let result = lint(tmp.path(), &config(), Vec::new()).unwrap();
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("src/common/a.ts")
        );
        assert!(result.has_errors());
    }

    #[test]
    fn unconfigured_files_are_reported() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "tools/gen.js", "const fs = require(\"fs\");\n");

        let result = lint(tmp.path(), &config(), Vec::new()).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].kind, ViolationKind::BadFilename);
    }

    #[test]
    fn excludes_apply_to_relative_paths() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "node_modules/pkg/index.js", "require(\"x\");\n");
        write(tmp.path(), "tools/gen.js", "require(\"x\");\n");
        write(tmp.path(), "src/common/a.ts", "export {};\n");

        let result = lint(tmp.path(), &config(), vec!["tools/**".into()]).unwrap();
        assert_eq!(result.files_checked, 1);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn gitignored_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".gitignore", "out/\n");
        write(tmp.path(), "out/bundle.js", "require(\"x\");\n");
        write(tmp.path(), "src/common/a.ts", "export {};\n");

        let result = lint(tmp.path(), &config(), Vec::new()).unwrap();
        assert_eq!(result.files_checked, 1);
    }

    #[test]
    fn severity_override_clears_errors() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "tools/gen.js", "");

        let config = Config {
            severity: import_patterns_core::Severity::Warning,
            ..config()
        };
        let result = lint(tmp.path(), &config, Vec::new()).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert!(!result.has_errors());
    }

    #[test]
    fn missing_policies_fail() {
        let tmp = TempDir::new().unwrap();
        let err = lint(tmp.path(), &Config::default(), Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("no [[policies]] defined"));
    }
}
