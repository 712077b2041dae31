//! # import-patterns-core
//!
//! Policy checker for directional import restrictions.
//!
//! A file whose path matches a policy's *target* glob may only import
//! modules whose resolved path matches one of that policy's *restriction*
//! globs. This crate holds the pure evaluation layer and knows nothing
//! about how imports are discovered:
//!
//! - [`PolicySet`] for selecting the governing policy and checking a file
//! - [`Policy`] for evaluating a single [`ImportReference`]
//! - [`Violation`] and [`LintResult`] for representing findings
//! - [`Config`] for the TOML configuration layer
//!
//! ## Example
//!
//! ```ignore
//! use import_patterns_core::{ImportReference, PolicyEntry, PolicySet};
//!
//! let policies = PolicySet::new(vec![PolicyEntry::new(
//!     "src/browser/**",
//!     ["src/browser/**"],
//! )])?;
//!
//! let imports = [ImportReference::new("../node/bar", "src/browser/foo.ts", 1, 20)];
//! let violations = policies.check_file("src/browser/foo.ts", imports);
//! assert_eq!(violations.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod policy;
mod resolve;
mod types;

pub use config::{AnalyzerConfig, Config, ConfigError};
pub use policy::{ImportReference, Policy, PolicyEntry, PolicyError, PolicySet, Verdict};
pub use resolve::resolve_import_path;
pub use types::{LintResult, Location, Severity, Violation, ViolationKind};
