//! # dvc-exp-api: HTTP API for DVC Experiments
//!
//! A thin HTTP facade over the `dvc` command-line tool. It lists experiments,
//! returns their parameters, and applies an experiment to the workspace. All
//! state lives in the DVC repository; nothing is cached or persisted here.
//!
//! ## Layers
//!
//! - [`command`]: runs `dvc` as a child process and captures its output
//! - [`mapper`]: parses `dvc exp list` / `dvc exp show --json` output
//! - [`repository`]: the [`repository::ExperimentRepository`] seam, with a
//!   `dvc`-backed and an in-memory implementation
//! - [`api`]: axum router, handlers and error-to-status mapping
//! - [`report`]: plain-text listing of every experiment with its parameters
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dvc_exp_api::api::build_router;
//! use dvc_exp_api::experiment::{ExperimentRef, ParameterSet};
//! use dvc_exp_api::repository::MemoryRepository;
//!
//! let repo = Arc::new(MemoryRepository::new());
//! repo.insert(
//!     ExperimentRef::new("ded11c0", "addle-hill"),
//!     ParameterSet::from_yaml_str("data_ingestion:\n  test_size: 0.2\n").unwrap(),
//! );
//! let app = build_router(repo);
//! # drop(app);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod experiment;
pub mod mapper;
pub mod report;
pub mod repository;

pub use config::Config;
pub use error::{Error, ErrorClass, Result};
