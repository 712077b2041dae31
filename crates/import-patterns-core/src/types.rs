//! Core types for policy violations and results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rule name attached to every violation.
pub const RULE_NAME: &str = "import-patterns";

/// Severity level for policy violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as it was matched against policy targets.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location of the first character of a file.
    #[must_use]
    pub fn file_start(file: impl Into<PathBuf>) -> Self {
        Self::new(file, 1, 1)
    }
}

/// Which kind of policy breach a violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    /// An import whose resolved path matches none of the restrictions.
    BadImport,
    /// A file that no policy target covers.
    BadFilename,
}

impl ViolationKind {
    /// Stable code for this kind (e.g., `"IMP001"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::BadImport => "IMP001",
            Self::BadFilename => "IMP002",
        }
    }

    /// Message id as reported to tooling (`badImport` / `badFilename`).
    #[must_use]
    pub fn message_id(self) -> &'static str {
        match self {
            Self::BadImport => "badImport",
            Self::BadFilename => "badFilename",
        }
    }
}

/// A policy violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// What was violated.
    pub kind: ViolationKind,
    /// Rule code (e.g., "IMP001").
    pub code: String,
    /// Rule name.
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Allowed patterns for a rejected import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Vec<String>>,
    /// Reference to documentation explaining the policy layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Violation {
    /// Creates a violation for an import rejected by `restrictions`.
    #[must_use]
    pub fn bad_import(location: Location, restrictions: &[String]) -> Self {
        let kind = ViolationKind::BadImport;
        Self {
            kind,
            code: kind.code().to_owned(),
            rule: RULE_NAME.to_owned(),
            severity: Severity::Error,
            location,
            message: format!(
                "import violates '{}' restrictions",
                join_restrictions(restrictions)
            ),
            restrictions: Some(restrictions.to_vec()),
            doc_ref: None,
        }
    }

    /// Creates a violation for a file no policy covers.
    #[must_use]
    pub fn bad_filename(file: impl Into<PathBuf>) -> Self {
        let kind = ViolationKind::BadFilename;
        Self {
            kind,
            code: kind.code().to_owned(),
            rule: RULE_NAME.to_owned(),
            severity: Severity::Error,
            location: Location::file_start(file),
            message: "missing definition in import policies for this file".to_owned(),
            restrictions: None,
            doc_ref: None,
        }
    }

    /// Overrides the severity of this violation.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a documentation reference to this violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Restrictions joined for display (`"a/** or b/**"`).
    #[must_use]
    pub fn restrictions_display(&self) -> Option<String> {
        self.restrictions.as_deref().map(join_restrictions)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )?;
        if let Some(doc_ref) = &self.doc_ref {
            write!(f, " (see: {doc_ref})")?;
        }
        Ok(())
    }
}

fn join_restrictions(restrictions: &[String]) -> String {
    restrictions.join(" or ")
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations.iter().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Counts violations by kind as `(bad_import, bad_filename)`.
    #[must_use]
    pub fn count_by_kind(&self) -> (usize, usize) {
        let bad_import = self
            .violations
            .iter()
            .filter(|v| v.kind == ViolationKind::BadImport)
            .count();
        (bad_import, self.violations.len() - bad_import)
    }

    /// Sorts violations by file, then line, then column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restrictions() -> Vec<String> {
        vec!["a/**".into(), "b/**".into()]
    }

    #[test]
    fn bad_import_message_joins_restrictions() {
        let v = Violation::bad_import(Location::new("x.ts", 3, 8), &restrictions());
        assert_eq!(v.kind, ViolationKind::BadImport);
        assert_eq!(v.code, "IMP001");
        assert_eq!(v.message, "import violates 'a/** or b/**' restrictions");
        assert_eq!(v.restrictions_display().as_deref(), Some("a/** or b/**"));
    }

    #[test]
    fn bad_filename_anchors_at_file_start() {
        let v = Violation::bad_filename("src/common/baz.ts");
        assert_eq!(v.kind, ViolationKind::BadFilename);
        assert_eq!(v.location, Location::new("src/common/baz.ts", 1, 1));
        assert!(v.restrictions.is_none());
    }

    #[test]
    fn kind_serializes_as_message_id() {
        let json = serde_json::to_string(&ViolationKind::BadFilename).unwrap();
        assert_eq!(json, format!("\"{}\"", ViolationKind::BadFilename.message_id()));
    }

    #[test]
    fn display_includes_doc_ref() {
        let v = Violation::bad_filename("a.ts").with_doc_ref("docs/layers.md");
        assert!(format!("{v}").contains("(see: docs/layers.md)"));
    }

    #[test]
    fn display_omits_doc_ref_when_none() {
        let v = Violation::bad_filename("a.ts");
        assert!(!format!("{v}").contains("see:"));
    }

    #[test]
    fn severity_threshold() {
        let mut result = LintResult::new();
        result
            .violations
            .push(Violation::bad_filename("a.ts").with_severity(Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_violations_at(Severity::Warning));
        assert_eq!(result.count_by_severity(), (0, 1, 0));
    }

    #[test]
    fn sort_orders_by_file_line_column() {
        let mut result = LintResult::new();
        let r = restrictions();
        result.violations.push(Violation::bad_import(Location::new("b.ts", 1, 1), &r));
        result.violations.push(Violation::bad_import(Location::new("a.ts", 2, 5), &r));
        result.violations.push(Violation::bad_import(Location::new("a.ts", 2, 1), &r));
        result.sort();

        let order: Vec<(String, usize, usize)> = result
            .violations
            .iter()
            .map(|v| {
                (
                    v.location.file.display().to_string(),
                    v.location.line,
                    v.location.column,
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.ts".into(), 2, 1),
                ("a.ts".into(), 2, 5),
                ("b.ts".into(), 1, 1)
            ]
        );
    }

    #[test]
    fn count_by_kind_splits_imports_and_filenames() {
        let mut result = LintResult::new();
        result
            .violations
            .push(Violation::bad_import(Location::new("a.ts", 1, 1), &restrictions()));
        result.violations.push(Violation::bad_filename("b.ts"));
        assert_eq!(result.count_by_kind(), (1, 1));
    }
}
