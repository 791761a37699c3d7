use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::error::{MergeError, PathError};
use crate::domain::path::DottedPath;
use crate::domain::tree::DomainTree;
use crate::domain::xml::SerializeOptions;

/// A requested assignment of a scalar value to a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub path: String,
    pub value: String,
}

impl Override {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

impl Display for Override {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}

#[derive(Debug, Error)]
#[error("Override '{0}' must be written as PATH=VALUE")]
pub struct OverrideSyntaxError(String);

impl FromStr for Override {
    type Err = OverrideSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((path, value)) if !path.is_empty() => Ok(Override::new(path, value)),
            _ => Err(OverrideSyntaxError(s.to_string())),
        }
    }
}

/// Receives the outcome of every override applied by a [PathMerger].
pub trait MergeReporter {
    /// Called after an override has been written to the tree.
    fn applied(&self, _ov: &Override) {}

    /// Called when an override could not be written and was skipped.
    fn skipped(&self, ov: &Override, error: &PathError);
}

/// Reports merge outcomes through the `log` facade.
pub struct LogReporter;

impl MergeReporter for LogReporter {
    fn applied(&self, ov: &Override) {
        debug!("Set '{}' to '{}'", ov.path, ov.value);
    }

    fn skipped(&self, ov: &Override, error: &PathError) {
        warn!(
            "Failed to set value '{}' to path '{}', skipping: {}",
            ov.value, ov.path, error
        );
    }
}

/// Outcome of the overrides of one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number of overrides written to the document.
    pub applied: usize,
    /// Overrides that were skipped, with the reason.
    pub skipped: Vec<(Override, PathError)>,
}

/// The merged document and what happened to the overrides.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub document: Vec<u8>,
    pub summary: MergeSummary,
}

/// Applies dotted-path overrides to domain documents.
///
/// Parsing the document, creating the parents of an override path and
/// serializing the result are fatal when they fail. Assigning a single value is
/// not: a failed assignment is reported and the remaining overrides are still
/// applied.
pub struct PathMerger<'a> {
    reporter: &'a dyn MergeReporter,
    options: SerializeOptions,
}

impl Default for PathMerger<'static> {
    fn default() -> Self {
        Self::new(&LogReporter)
    }
}

impl<'a> PathMerger<'a> {
    pub fn new(reporter: &'a dyn MergeReporter) -> Self {
        Self {
            reporter,
            options: SerializeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply overrides to an already parsed tree, in order.
    ///
    /// # Arguments
    ///
    /// * `tree`: The tree to modify in place
    /// * `overrides`: The overrides to apply; later ones win
    ///
    /// returns: Result<MergeSummary, MergeError>
    pub fn apply(
        &self,
        tree: &mut DomainTree,
        overrides: &[Override],
    ) -> Result<MergeSummary, MergeError> {
        let mut summary = MergeSummary::default();

        for ov in overrides {
            let path = match DottedPath::parse(&ov.path) {
                Ok(path) => path,
                Err(error) => {
                    self.skip(&mut summary, ov, error);
                    continue;
                }
            };

            tree.ensure_path(&path)
                .map_err(|source| MergeError::Ensure {
                    path: ov.path.clone(),
                    source,
                })?;

            match tree.set_value(&path, &ov.value) {
                Ok(()) => {
                    self.reporter.applied(ov);
                    summary.applied += 1;
                }
                Err(error) => {
                    tree.collapse_empty(&path);
                    self.skip(&mut summary, ov, error);
                }
            }
        }

        Ok(summary)
    }

    /// Parse a domain document, apply the overrides and serialize the result.
    ///
    /// # Arguments
    ///
    /// * `document`: The domain XML
    /// * `overrides`: The overrides to apply; later ones win
    ///
    /// returns: Result<MergeOutput, MergeError>
    pub fn merge(&self, document: &[u8], overrides: &[Override]) -> Result<MergeOutput, MergeError> {
        let mut tree = DomainTree::parse(document).map_err(MergeError::Parse)?;
        let summary = self.apply(&mut tree, overrides)?;
        let document = tree.to_xml(self.options).map_err(MergeError::Serialize)?;
        Ok(MergeOutput { document, summary })
    }

    fn skip(&self, summary: &mut MergeSummary, ov: &Override, error: PathError) {
        self.reporter.skipped(ov, &error);
        summary.skipped.push((ov.clone(), error));
    }
}
