//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the extension point for adding new languages.
//! Implement it to teach import-patterns how to find import specifiers in
//! a new language via Tree-sitter.

use std::path::PathBuf;

/// A single import specifier extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// Line number of the specifier literal (1-indexed).
    pub line: usize,
    /// Column of the specifier literal (1-indexed).
    pub column: usize,
    /// Specifier without quotes (e.g., `../node/bar`).
    pub path: String,
}

/// Result of analyzing a single source file with Tree-sitter.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Path relative to project root.
    pub file_path: PathBuf,
    /// All import specifiers found, in document order.
    pub imports: Vec<ImportInfo>,
}

/// Errors raised while extracting imports.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Detail from tree-sitter.
        message: String,
    },
    /// Tree-sitter returned no tree.
    #[error("tree-sitter produced no {language} syntax tree")]
    Parse {
        /// Language identifier.
        language: &'static str,
    },
}

/// Trait for language-specific Tree-sitter extraction.
///
/// The extractor receives raw source text and returns a [`FileAnalysis`]
/// with `file_path` left empty for the caller to fill in.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".ts", ".mts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract import specifiers from source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or parsing yields
    /// no tree.
    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError>;

    /// Whether this extractor handles `ext` (given with leading dot).
    fn handles(&self, ext: &str) -> bool {
        self.extensions().contains(&ext)
    }
}
