//! In-memory repository using `DashMap`.
//!
//! Stands in for a DVC repository in tests and demos; nothing touches disk.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use dashmap::DashMap;

use super::ExperimentRepository;
use crate::experiment::{ApplyOutcome, ExperimentId, ExperimentRef, ParameterSet};
use crate::{Error, Result};

#[derive(Debug, Clone)]
enum StoredParams {
    Present(ParameterSet),
    Missing,
    Malformed(String),
}

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    experiment: ExperimentRef,
    params: StoredParams,
}

/// In-memory experiment repository.
///
/// Listing order is insertion order. `apply` records the experiment as the
/// current workspace state, which can be read back with [`Self::applied`].
///
/// # Example
///
/// ```rust
/// use dvc_exp_api::experiment::{ExperimentId, ExperimentRef};
/// use dvc_exp_api::repository::{ExperimentRepository, MemoryRepository};
///
/// # async fn example() -> dvc_exp_api::Result<()> {
/// let repo = MemoryRepository::new();
/// repo.insert_without_params(ExperimentRef::new("ded11c0", "addle-hill"));
///
/// let outcome = repo.apply(&ExperimentId::parse("ded11c0")?).await?;
/// assert_eq!(outcome.experiment_name(), "addle-hill");
/// assert_eq!(repo.applied().as_deref(), Some("addle-hill"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: DashMap<String, Entry>,
    next_seq: AtomicU64,
    applied: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, experiment: ExperimentRef, params: StoredParams) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            experiment.experiment_name().to_string(),
            Entry {
                seq,
                experiment,
                params,
            },
        );
    }

    /// Add an experiment with its parameters.
    ///
    /// Re-inserting a name replaces the entry and moves it to the end.
    pub fn insert(&self, experiment: ExperimentRef, params: ParameterSet) {
        self.store(experiment, StoredParams::Present(params));
    }

    /// Add an experiment that has no parameter file.
    pub fn insert_without_params(&self, experiment: ExperimentRef) {
        self.store(experiment, StoredParams::Missing);
    }

    /// Add an experiment whose parameter file cannot be parsed.
    pub fn insert_malformed(&self, experiment: ExperimentRef, reason: impl Into<String>) {
        self.store(experiment, StoredParams::Malformed(reason.into()));
    }

    /// Name of the most recently applied experiment.
    #[must_use]
    pub fn applied(&self) -> Option<String> {
        self.applied.lock().ok().and_then(|applied| applied.clone())
    }

    /// Number of repository operations served so far.
    ///
    /// Lets callers check that rejected requests never reached the repository.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Number of stored experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the repository has no experiments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sorted_entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.entries.iter().map(|e| e.value().clone()).collect();
        entries.sort_by_key(|e| e.seq);
        entries
    }

    fn find_entry(&self, id: &ExperimentId) -> Result<Entry> {
        self.sorted_entries()
            .into_iter()
            .find(|e| e.experiment.matches(id))
            .ok_or_else(|| Error::ExperimentNotFound(id.to_string()))
    }
}

impl ExperimentRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<ExperimentRef>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .sorted_entries()
            .into_iter()
            .map(|e| e.experiment)
            .collect())
    }

    async fn params(&self, id: &ExperimentId) -> Result<ParameterSet> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let entry = self.find_entry(id)?;
        match entry.params {
            StoredParams::Present(params) => Ok(params),
            StoredParams::Missing => Err(Error::ParamsNotFound(id.to_string())),
            StoredParams::Malformed(reason) => Err(Error::MalformedParams {
                experiment: id.to_string(),
                reason,
            }),
        }
    }

    async fn apply(&self, id: &ExperimentId) -> Result<ApplyOutcome> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let entry = self.find_entry(id)?;
        let name = entry.experiment.experiment_name().to_string();
        if let Ok(mut applied) = self.applied.lock() {
            *applied = Some(name.clone());
        }
        let message =
            format!("Changes for experiment '{name}' have been applied to your current workspace.");
        Ok(ApplyOutcome::from_stdout(name, &message))
    }
}
