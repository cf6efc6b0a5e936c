//! Experiment repository
//!
//! The collaborator the HTTP layer talks to. It owns identifier resolution and
//! all knowledge of how experiments are stored, so handlers never see a
//! process or a file path.
//!
//! - [`DvcRepository`] shells out to the `dvc` CLI
//! - [`MemoryRepository`] keeps experiments in memory (tests, demos)
//!
//! # Example
//!
//! ```rust
//! use dvc_exp_api::experiment::{ExperimentId, ExperimentRef, ParameterSet};
//! use dvc_exp_api::repository::{ExperimentRepository, MemoryRepository};
//!
//! # async fn example() -> dvc_exp_api::Result<()> {
//! let repo = MemoryRepository::new();
//! repo.insert(
//!     ExperimentRef::new("ded11c0", "addle-hill"),
//!     ParameterSet::from_yaml_str("data_ingestion:\n  test_size: 0.2\n").unwrap(),
//! );
//!
//! let id = ExperimentId::parse("addle-hill")?;
//! let params = repo.params(&id).await?;
//! assert!(params.group("data_ingestion").is_some());
//! # Ok(())
//! # }
//! ```

mod dvc;
mod memory;

pub use dvc::{DvcRepository, DEFAULT_FALLBACK_PARAMS_FILE, DEFAULT_PRIMARY_PARAMS_FILE};
pub use memory::MemoryRepository;

use crate::experiment::{resolve, ApplyOutcome, ExperimentId, ExperimentRef, ParameterSet};
use crate::{Error, Result};
use std::future::Future;

/// Source of experiments and the only way to act on them.
pub trait ExperimentRepository: Send + Sync {
    /// List all experiments in the repository's order.
    ///
    /// An empty repository yields an empty vector, not an error.
    fn list(&self) -> impl Future<Output = Result<Vec<ExperimentRef>>> + Send;

    /// Get the parameters of the experiment designated by `id`.
    ///
    /// # Errors
    ///
    /// `Error::ExperimentNotFound`, `Error::ParamsNotFound`,
    /// `Error::MalformedParams`, or a command error.
    fn params(&self, id: &ExperimentId) -> impl Future<Output = Result<ParameterSet>> + Send;

    /// Apply the experiment designated by `id` to the workspace.
    ///
    /// Mutates the working tree in place. There is no rollback.
    fn apply(&self, id: &ExperimentId) -> impl Future<Output = Result<ApplyOutcome>> + Send;

    /// Resolve `id` to a listed experiment.
    ///
    /// Default implementation lists and picks the first match.
    fn find(&self, id: &ExperimentId) -> impl Future<Output = Result<ExperimentRef>> + Send {
        async move {
            let experiments = self.list().await?;
            resolve(&experiments, id)
                .cloned()
                .ok_or_else(|| Error::ExperimentNotFound(id.to_string()))
        }
    }
}
