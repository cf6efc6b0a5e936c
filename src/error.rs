//! Error types for dvc-exp-api
//!
//! Every failure falls in one of three classes: the caller sent something
//! unusable (400), the experiment or its parameters do not exist (404), or the
//! wrapped `dvc` tool misbehaved (500). Messages never carry raw process stderr.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// dvc-exp-api error types
#[derive(Error, Debug)]
pub enum Error {
    /// Identifier failed syntactic validation (never reaches the tool)
    #[error("Invalid experiment identifier '{id}': {reason}")]
    InvalidExperimentId {
        /// The rejected identifier, as received
        id: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Identifier not known to the tool
    #[error("Experiment '{0}' not found")]
    ExperimentNotFound(String),

    /// Neither the primary nor the fallback parameter file exists for the experiment
    #[error("Parameters not found for experiment '{0}'")]
    ParamsNotFound(String),

    /// A parameter file exists but could not be read as a mapping
    #[error("Malformed parameters for experiment '{experiment}': {reason}")]
    MalformedParams {
        /// Experiment whose parameter file is malformed
        experiment: String,
        /// Short description of the problem
        reason: String,
    },

    /// The tool exited with a non-zero status
    #[error("Command '{command}' failed with {status}")]
    CommandFailed {
        /// Rendered command line, e.g. `dvc exp list`
        command: String,
        /// Exit status description
        status: String,
    },

    /// The tool could not be started at all
    #[error("Failed to run '{command}': {source}")]
    CommandSpawn {
        /// Rendered command line
        command: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The tool did not finish within the configured timeout
    #[error("Command '{command}' timed out after {secs}s")]
    CommandTimeout {
        /// Rendered command line
        command: String,
        /// Configured timeout in seconds
        secs: u64,
    },

    /// The tool produced output we could not interpret
    #[error("Unexpected output from '{command}': {reason}")]
    UnexpectedOutput {
        /// Rendered command line
        command: String,
        /// What was wrong with it
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller error (400)
    BadRequest,
    /// Unknown experiment or parameters (404)
    NotFound,
    /// Tool or server failure (500)
    Internal,
}

impl Error {
    /// Classify the error into one of the three response classes.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidExperimentId { .. } | Self::MalformedParams { .. } => {
                ErrorClass::BadRequest
            }
            Self::ExperimentNotFound(_) | Self::ParamsNotFound(_) => ErrorClass::NotFound,
            Self::CommandFailed { .. }
            | Self::CommandSpawn { .. }
            | Self::CommandTimeout { .. }
            | Self::UnexpectedOutput { .. }
            | Self::Config(_)
            | Self::Io(_) => ErrorClass::Internal,
        }
    }

    /// Stable machine-readable code for the error body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidExperimentId { .. } => "invalid_experiment_id",
            Self::ExperimentNotFound(_) => "experiment_not_found",
            Self::ParamsNotFound(_) => "params_not_found",
            Self::MalformedParams { .. } => "malformed_params",
            Self::CommandFailed { .. } => "command_failed",
            Self::CommandSpawn { .. } => "command_spawn_failed",
            Self::CommandTimeout { .. } => "command_timeout",
            Self::UnexpectedOutput { .. } => "unexpected_output",
            Self::Config(_) | Self::Io(_) => "internal",
        }
    }
}
