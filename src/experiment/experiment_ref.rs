//! Experiment reference - one entry of the experiment listing

use serde::{Deserialize, Serialize};

use super::ExperimentId;

/// A single experiment as reported by `dvc exp list`.
///
/// Serializes as `{"commit_hash": "...", "experiment_name": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentRef {
    commit_hash: String,
    experiment_name: String,
}

impl ExperimentRef {
    /// Create a new experiment reference.
    #[must_use]
    pub fn new(commit_hash: impl Into<String>, experiment_name: impl Into<String>) -> Self {
        Self {
            commit_hash: commit_hash.into(),
            experiment_name: experiment_name.into(),
        }
    }

    /// Get the (possibly abbreviated) commit hash.
    #[must_use]
    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    /// Get the experiment name.
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    /// Check whether `id` designates this experiment.
    ///
    /// Matches the exact name, the exact commit hash, or a prefix of the
    /// commit hash.
    #[must_use]
    pub fn matches(&self, id: &ExperimentId) -> bool {
        let id = id.as_str();
        self.experiment_name == id || self.commit_hash.starts_with(id)
    }
}

/// Find the first experiment in `experiments` that `id` designates.
///
/// List order decides when several entries match, e.g. when a name happens
/// to look like a prefix of another experiment's hash.
#[must_use]
pub fn resolve<'a>(
    experiments: &'a [ExperimentRef],
    id: &ExperimentId,
) -> Option<&'a ExperimentRef> {
    experiments.iter().find(|exp| exp.matches(id))
}
