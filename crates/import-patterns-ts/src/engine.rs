//! Import policy engine.
//!
//! Streams the imports of a [`FileAnalysis`] through a [`PolicySet`],
//! producing [`Violation`]s from import-patterns-core.

use import_patterns_core::{ImportReference, PolicySet, Severity, Violation};
use tracing::debug;

use crate::extractor::FileAnalysis;

/// Evaluates import policies against extracted file analysis.
pub struct ImportPolicyEngine {
    policies: PolicySet,
    severity: Severity,
    doc_ref: Option<String>,
}

impl ImportPolicyEngine {
    /// Create a new engine reporting at `Severity::Error`.
    #[must_use]
    pub fn new(policies: PolicySet) -> Self {
        Self {
            policies,
            severity: Severity::Error,
            doc_ref: None,
        }
    }

    /// Sets the severity assigned to every violation.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches a documentation reference to every violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: Option<String>) -> Self {
        self.doc_ref = doc_ref;
        self
    }

    /// The policies this engine checks against.
    #[must_use]
    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Check a single file analysis for policy violations.
    #[must_use]
    pub fn check(&self, analysis: &FileAnalysis) -> Vec<Violation> {
        let file = policy_path(analysis);

        match self.policies.select(&file) {
            Some(policy) => debug!(
                "{file}: governed by '{}' ({} imports)",
                policy.target(),
                analysis.imports.len()
            ),
            None => debug!("{file}: no policy target matches"),
        }

        let imports = analysis
            .imports
            .iter()
            .map(|imp| ImportReference::new(&imp.path, &file, imp.line, imp.column));

        self.policies
            .check_file(&file, imports)
            .into_iter()
            .map(|v| self.decorate(v))
            .collect()
    }

    fn decorate(&self, violation: Violation) -> Violation {
        let violation = violation.with_severity(self.severity);
        match &self.doc_ref {
            Some(doc_ref) => violation.with_doc_ref(doc_ref.clone()),
            None => violation,
        }
    }
}

/// Path of the analyzed file as matched against globs: `/`-separated.
fn policy_path(analysis: &FileAnalysis) -> String {
    analysis.file_path.to_string_lossy().replace('\\', "/")
}
