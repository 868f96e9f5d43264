//! Import results
//!
//! An import never fails as a whole once it has started. Everything it has
//! to say is collected, in order, into an [`ImportReport`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diff::NameDiff;

/// Severity of an [`OperationResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Error,
    Warning,
    Info,
    Log,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Log => write!(f, "log"),
        }
    }
}

/// One line of import output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    #[serde(rename = "result")]
    pub kind: ResultKind,
    pub text: String,
}

impl OperationResult {
    pub fn new(kind: ResultKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ResultKind::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(ResultKind::Warning, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(ResultKind::Info, text)
    }

    pub fn log(text: impl Into<String>) -> Self {
        Self::new(ResultKind::Log, text)
    }
}

/// Ordered list of results produced by one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportReport {
    results: Vec<OperationResult>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: OperationResult) {
        self.results.push(result);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(OperationResult::error(text));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(OperationResult::warning(text));
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(OperationResult::info(text));
    }

    pub fn log(&mut self, text: impl Into<String>) {
        self.push(OperationResult::log(text));
    }

    /// Results in emission order
    pub fn results(&self) -> &[OperationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<OperationResult> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of results of the given kind
    pub fn count(&self, kind: ResultKind) -> usize {
        self.results.iter().filter(|r| r.kind == kind).count()
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.kind == ResultKind::Error)
    }

    /// Append the dry-run preview.
    ///
    /// `diff` is taken over the whole namespace, `local_diff` over local
    /// variables only; the latter's `removed` names are what this import
    /// would leave behind.
    pub fn push_dry_run(&mut self, diff: &NameDiff, local_diff: &NameDiff) {
        self.info(format!("Variables to add: {}", diff.added.len()));
        for name in &diff.added {
            self.log(format!("{} will be added", name));
        }

        self.info(format!("Variables to update: {}", diff.updated.len()));
        for name in &diff.updated {
            self.log(format!("{} will be updated", name));
        }

        self.warning(format!(
            "Variables in the local library not included in this import: {}",
            local_diff.removed.len()
        ));
        for name in &local_diff.removed {
            self.log(format!("{} is not in this import", name));
        }
    }

    /// Append the closing summary of an applied import.
    ///
    /// Only error results count as failures; warnings about the inventory
    /// or the documents do not.
    pub fn push_apply_summary(&mut self, created: usize, updated: usize) {
        let errors = self.count(ResultKind::Error);
        let changed = created > 0 || updated > 0;

        if changed && errors > 0 {
            self.warning(format!(
                "{} variables were created and {} other updates were made, but {} had errors.",
                created, updated, errors
            ));
        } else if changed {
            self.info(format!(
                "{} variables were created and {} other updates were made.",
                created, updated
            ));
        } else if errors > 0 {
            self.error("Failed to create or update any variables due to errors.");
        } else {
            self.info("No variables needed to be created or updated.");
        }
    }
}

impl IntoIterator for ImportReport {
    type Item = OperationResult;
    type IntoIter = std::vec::IntoIter<OperationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
