//! Policy selection and import evaluation.
//!
//! A [`PolicySet`] is an ordered list of compiled [`Policy`] entries. For
//! each file the first policy whose target glob matches the file path
//! governs every import in that file. Files without a governing policy
//! yield a single `BadFilename` violation.

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::resolve::resolve_import_path;
use crate::types::{Location, Violation};

/// Errors raised while compiling policy entries.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A target or restriction is not a valid glob.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        source: globset::Error,
    },

    /// A policy entry allows nothing.
    #[error("policies[{index}] (target '{target}'): restrictions must not be empty")]
    EmptyRestrictions {
        /// Position of the entry in declaration order.
        index: usize,
        /// Target pattern of the entry.
        target: String,
    },
}

/// One configured policy as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    /// Glob selecting the files this entry governs.
    pub target: String,

    /// Globs an import's resolved path must match; a single string is
    /// accepted and treated as a one-element list.
    #[serde(deserialize_with = "one_or_many")]
    pub restrictions: Vec<String>,
}

impl PolicyEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new<I, S>(target: impl Into<String>, restrictions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target: target.into(),
            restrictions: restrictions.into_iter().map(Into::into).collect(),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// A single import statement found in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReference<'a> {
    /// Specifier exactly as written (e.g., `"../node/bar"`).
    pub raw_path: &'a str,
    /// `/`-separated path of the file containing the import.
    pub source_file: &'a str,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl<'a> ImportReference<'a> {
    /// Creates a new import reference.
    #[must_use]
    pub fn new(raw_path: &'a str, source_file: &'a str, line: usize, column: usize) -> Self {
        Self {
            raw_path,
            source_file,
            line,
            column,
        }
    }

    /// The specifier after relative-path resolution.
    #[must_use]
    pub fn resolved_path(&self) -> String {
        resolve_import_path(self.source_file, self.raw_path)
    }
}

/// Outcome of evaluating one import against a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// At least one restriction matched.
    Permitted,
    /// No restriction matched; carries every allowed pattern.
    Denied(&'a [String]),
}

/// A policy entry with its globs compiled.
#[derive(Debug, Clone)]
pub struct Policy {
    entry: PolicyEntry,
    target: GlobMatcher,
    restrictions: Vec<GlobMatcher>,
}

impl Policy {
    fn compile(index: usize, entry: PolicyEntry) -> Result<Self, PolicyError> {
        if entry.restrictions.is_empty() {
            return Err(PolicyError::EmptyRestrictions {
                index,
                target: entry.target,
            });
        }

        let target = compile_glob(&entry.target)?;
        let restrictions = entry
            .restrictions
            .iter()
            .map(|p| compile_glob(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            entry,
            target,
            restrictions,
        })
    }

    /// Target glob as written.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.entry.target
    }

    /// Restriction globs as written, in declaration order.
    #[must_use]
    pub fn restrictions(&self) -> &[String] {
        &self.entry.restrictions
    }

    /// Whether this policy governs `file_path`.
    #[must_use]
    pub fn matches_file(&self, file_path: &str) -> bool {
        self.target.is_match(file_path)
    }

    /// Whether an already-resolved import path is allowed.
    #[must_use]
    pub fn permits(&self, resolved_path: &str) -> bool {
        self.restrictions.iter().any(|g| g.is_match(resolved_path))
    }

    /// Evaluates one import against this policy's restrictions.
    #[must_use]
    pub fn evaluate(&self, import: &ImportReference<'_>) -> Verdict<'_> {
        if self.permits(&import.resolved_path()) {
            Verdict::Permitted
        } else {
            Verdict::Denied(self.restrictions())
        }
    }
}

/// `*` and `?` stop at `/`, matching shell semantics for paths.
fn compile_glob(pattern: &str) -> Result<GlobMatcher, PolicyError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|source| PolicyError::InvalidGlob {
            pattern: pattern.to_owned(),
            source,
        })
}

/// Ordered, compiled policies. The first matching target wins.
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    policies: Vec<Policy>,
}

impl PolicySet {
    /// Compiles entries in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob is invalid or an entry has no
    /// restrictions.
    pub fn new(entries: impl IntoIterator<Item = PolicyEntry>) -> Result<Self, PolicyError> {
        let policies = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Policy::compile(i, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { policies })
    }

    /// Number of policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true if no policies are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Iterates policies in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Policy> {
        self.policies.iter()
    }

    /// Position of the policy governing `file_path`, if any.
    #[must_use]
    pub fn position(&self, file_path: &str) -> Option<usize> {
        self.policies.iter().position(|p| p.matches_file(file_path))
    }

    /// The policy governing `file_path`, if any.
    #[must_use]
    pub fn select(&self, file_path: &str) -> Option<&Policy> {
        self.position(file_path).map(|i| &self.policies[i])
    }

    /// Checks every import of one file.
    ///
    /// `imports` is only consumed when a policy governs the file. An
    /// ungoverned file yields exactly one `BadFilename` violation.
    pub fn check_file<'a, I>(&self, file_path: &str, imports: I) -> Vec<Violation>
    where
        I: IntoIterator<Item = ImportReference<'a>>,
    {
        let Some(policy) = self.select(file_path) else {
            trace!(file = file_path, "no policy target matched");
            return vec![Violation::bad_filename(file_path)];
        };

        trace!(file = file_path, policy = policy.target(), "policy selected");

        imports
            .into_iter()
            .filter_map(|import| match policy.evaluate(&import) {
                Verdict::Permitted => None,
                Verdict::Denied(restrictions) => Some(Violation::bad_import(
                    Location::new(file_path, import.line, import.column),
                    restrictions,
                )),
            })
            .collect()
    }
}
