//! # import-patterns-ts
//!
//! Tree-sitter powered import extraction feeding the policy checker in
//! `import-patterns-core`. It adds:
//!
//! - [`LanguageExtractor`] trait for pluggable language support
//! - [`TypeScriptExtractor`] for TypeScript, TSX and JavaScript sources
//! - [`ImportPolicyEngine`] for running a [`FileAnalysis`] through a
//!   [`PolicySet`](import_patterns_core::PolicySet)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod extractor;
pub mod typescript;

pub use engine::ImportPolicyEngine;
pub use extractor::{ExtractError, FileAnalysis, ImportInfo, LanguageExtractor};
pub use typescript::TypeScriptExtractor;
