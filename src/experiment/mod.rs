//! Experiment domain types
//!
//! Request-scoped values derived from `dvc` output. Nothing here is persisted;
//! every request rebuilds what it needs from the repository.
//!
//! ```text
//! ExperimentId ──resolve──> ExperimentRef ──params──> ParameterSet
//!                                  └──────apply─────> ApplyOutcome
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use dvc_exp_api::experiment::{resolve, ExperimentId, ExperimentRef};
//!
//! let listing = vec![ExperimentRef::new("ded11c0", "addle-hill")];
//!
//! // Names and (abbreviated) hashes are interchangeable
//! let by_name = ExperimentId::parse("addle-hill")?;
//! let by_hash = ExperimentId::parse("ded11")?;
//! assert_eq!(resolve(&listing, &by_name), resolve(&listing, &by_hash));
//!
//! // Anything path- or shell-like is rejected up front
//! assert!(ExperimentId::parse("../params.yaml").is_err());
//! # Ok::<(), dvc_exp_api::Error>(())
//! ```

mod apply_outcome;
mod experiment_id;
mod experiment_ref;
mod parameter_set;

pub use apply_outcome::ApplyOutcome;
pub use experiment_id::{ExperimentId, ID_PUNCTUATION, MAX_ID_LEN};
pub use experiment_ref::{resolve, ExperimentRef};
pub use parameter_set::ParameterSet;
