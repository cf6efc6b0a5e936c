//! Apply outcome - acknowledgment returned after applying an experiment

use serde::{Deserialize, Serialize};

/// Acknowledgment of a successful `dvc exp apply`.
///
/// Failures never produce this type; they surface as `Error`, so a caller
/// cannot mistake a failed apply for a successful one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplyOutcome {
    success: bool,
    message: String,
    experiment_name: String,
}

impl ApplyOutcome {
    /// Build the outcome from the tool's stdout.
    ///
    /// Uses the trimmed stdout as the message, or a generic confirmation when
    /// the tool printed nothing.
    #[must_use]
    pub fn from_stdout(experiment_name: impl Into<String>, stdout: &str) -> Self {
        let experiment_name = experiment_name.into();
        let trimmed = stdout.trim();
        let message = if trimmed.is_empty() {
            format!("Experiment '{experiment_name}' applied successfully")
        } else {
            trimmed.to_string()
        };
        Self {
            success: true,
            message,
            experiment_name,
        }
    }

    /// Always `true`; kept in the payload for clients that branch on it.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Get the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the name of the applied experiment.
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }
}
