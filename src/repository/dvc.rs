//! `dvc` CLI-backed repository.
//!
//! Commands used:
//!
//! | Operation | Command |
//! |-----------|---------|
//! | list      | `dvc exp list` |
//! | params    | `dvc exp list`, then `dvc exp show --json` |
//! | apply     | `dvc exp list`, then `dvc exp apply <name>` |

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use super::ExperimentRepository;
use crate::command::CommandRunner;
use crate::experiment::{ApplyOutcome, ExperimentId, ExperimentRef, ParameterSet};
use crate::mapper::{extract_params, parse_experiment_list, ParamsLookup};
use crate::{Error, Result};

/// Parameter file written by DVCLive for each experiment.
pub const DEFAULT_PRIMARY_PARAMS_FILE: &str = "dvclive/params.yaml";

/// Repository-level parameter file, used when the primary one is absent.
pub const DEFAULT_FALLBACK_PARAMS_FILE: &str = "params.yaml";

/// Repository backed by the `dvc` executable.
///
/// Stateless: every call runs fresh commands, so results always reflect the
/// current working tree. Concurrent `apply` calls are not serialized.
#[derive(Debug, Clone)]
pub struct DvcRepository {
    runner: CommandRunner,
    primary_params_file: String,
    fallback_params_file: String,
}

impl DvcRepository {
    /// Create a repository running `dvc` (looked up on `PATH`) in `repo_dir`.
    #[must_use]
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self::builder(repo_dir).build()
    }

    /// Create a builder for a repository rooted at `repo_dir`.
    #[must_use]
    pub fn builder(repo_dir: impl Into<PathBuf>) -> DvcRepositoryBuilder {
        DvcRepositoryBuilder::new(repo_dir)
    }

    /// Get the command runner.
    #[must_use]
    pub const fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    /// Get the preferred parameter file path.
    #[must_use]
    pub fn primary_params_file(&self) -> &str {
        &self.primary_params_file
    }

    /// Get the fallback parameter file path.
    #[must_use]
    pub fn fallback_params_file(&self) -> &str {
        &self.fallback_params_file
    }
}

impl ExperimentRepository for DvcRepository {
    async fn list(&self) -> Result<Vec<ExperimentRef>> {
        let output = self.runner.run(&["exp", "list"]).await?.into_success()?;
        let experiments = parse_experiment_list(&output.stdout);
        debug!(count = experiments.len(), "listed experiments");
        Ok(experiments)
    }

    async fn params(&self, id: &ExperimentId) -> Result<ParameterSet> {
        let experiment = self.find(id).await?;

        let output = self
            .runner
            .run(&["exp", "show", "--json"])
            .await?
            .into_success()?;
        let show: serde_json::Value =
            serde_json::from_str(&output.stdout).map_err(|e| Error::UnexpectedOutput {
                command: output.command.clone(),
                reason: format!("invalid JSON: {e}"),
            })?;

        match extract_params(
            &show,
            experiment.commit_hash(),
            &self.primary_params_file,
            &self.fallback_params_file,
        ) {
            ParamsLookup::Found { source, params } if !params.is_empty() => {
                debug!(experiment = experiment.experiment_name(), %source, "resolved parameters");
                Ok(params)
            }
            ParamsLookup::Found { .. } | ParamsLookup::Missing => {
                Err(Error::ParamsNotFound(id.to_string()))
            }
            ParamsLookup::Malformed { source, reason } => Err(Error::MalformedParams {
                experiment: id.to_string(),
                reason: format!("{source}: {reason}"),
            }),
        }
    }

    async fn apply(&self, id: &ExperimentId) -> Result<ApplyOutcome> {
        let experiment = self.find(id).await?;
        let name = experiment.experiment_name();

        let output = self
            .runner
            .run(&["exp", "apply", name])
            .await?
            .into_success()?;

        info!(experiment = name, "applied experiment to workspace");
        Ok(ApplyOutcome::from_stdout(name, &output.stdout))
    }
}

/// Builder for `DvcRepository`.
#[derive(Debug)]
pub struct DvcRepositoryBuilder {
    repo_dir: PathBuf,
    dvc_bin: PathBuf,
    primary_params_file: String,
    fallback_params_file: String,
    timeout: Option<Duration>,
}

impl DvcRepositoryBuilder {
    /// Create a builder with defaults: `dvc` on `PATH`, DVCLive and
    /// repository-level parameter files, no timeout.
    #[must_use]
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            dvc_bin: PathBuf::from("dvc"),
            primary_params_file: DEFAULT_PRIMARY_PARAMS_FILE.to_string(),
            fallback_params_file: DEFAULT_FALLBACK_PARAMS_FILE.to_string(),
            timeout: None,
        }
    }

    /// Set the `dvc` executable.
    #[must_use]
    pub fn dvc_bin(mut self, dvc_bin: impl Into<PathBuf>) -> Self {
        self.dvc_bin = dvc_bin.into();
        self
    }

    /// Set the preferred parameter file.
    #[must_use]
    pub fn primary_params_file(mut self, path: impl Into<String>) -> Self {
        self.primary_params_file = path.into();
        self
    }

    /// Set the fallback parameter file.
    #[must_use]
    pub fn fallback_params_file(mut self, path: impl Into<String>) -> Self {
        self.fallback_params_file = path.into();
        self
    }

    /// Set a per-command timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the `DvcRepository`.
    #[must_use]
    pub fn build(self) -> DvcRepository {
        DvcRepository {
            runner: CommandRunner::new(self.dvc_bin, self.repo_dir).with_timeout(self.timeout),
            primary_params_file: self.primary_params_file,
            fallback_params_file: self.fallback_params_file,
        }
    }
}
