//! Plain-text experiment report
//!
//! Lists every experiment followed by its parameters, one block per
//! experiment. Experiments whose parameters cannot be retrieved are still
//! listed, with a note instead of the parameters.

use std::fmt::Write as _;

use tracing::warn;

use crate::experiment::{ExperimentId, ParameterSet};
use crate::repository::ExperimentRepository;
use crate::Result;

const RULE_WIDTH: usize = 60;

/// Render the report for every experiment in `repo`.
///
/// Returns `Ok(None)` when the repository has no experiments.
///
/// # Errors
///
/// Fails only if listing fails; per-experiment parameter errors are rendered
/// inline.
pub async fn render_report<R: ExperimentRepository>(repo: &R) -> Result<Option<String>> {
    let experiments = repo.list().await?;
    if experiments.is_empty() {
        return Ok(None);
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    for exp in &experiments {
        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(
            out,
            "Experiment: {} ({})",
            exp.experiment_name(),
            exp.commit_hash()
        );
        let _ = writeln!(out, "{rule}");

        let params = match ExperimentId::parse(exp.commit_hash()) {
            Ok(id) => repo.params(&id).await,
            Err(e) => Err(e),
        };
        match params {
            Ok(params) => out.push_str(&format_params(&params)),
            Err(e) => {
                warn!(
                    experiment = exp.experiment_name(),
                    error = %e,
                    "could not retrieve parameters"
                );
                out.push_str("  Could not retrieve parameters for this experiment\n");
            }
        }
    }
    Ok(Some(out))
}

/// Format a parameter set as indented YAML.
#[must_use]
pub fn format_params(params: &ParameterSet) -> String {
    if params.is_empty() {
        return "  No parameters available\n".to_string();
    }
    match params.to_yaml_string() {
        Ok(yaml) => yaml
            .lines()
            .map(|line| format!("  {line}\n"))
            .collect(),
        Err(_) => "  No parameters available\n".to_string(),
    }
}
