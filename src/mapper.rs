//! Response mapper
//!
//! Turns raw `dvc` output into domain values:
//!
//! - `dvc exp list` text → [`ExperimentRef`]s
//! - `dvc exp show --json` → [`ParameterSet`] for one revision, honouring the
//!   primary/fallback parameter file rule

use serde_json::Value;
use tracing::warn;

use crate::experiment::{ExperimentRef, ParameterSet};

/// Parse the text printed by `dvc exp list`.
///
/// Expected shape:
///
/// ```text
/// main:
///         ded11c0 [addle-hill]
///         1a2b3c4 [bushy-oaks]
/// ```
///
/// Blank lines and branch headers (lines ending in `:`) are skipped, as are
/// lines that do not look like `<hash> [<name>]`.
#[must_use]
pub fn parse_experiment_list(stdout: &str) -> Vec<ExperimentRef> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .filter_map(|line| {
            let parsed = parse_list_line(line);
            if parsed.is_none() {
                warn!(line, "skipping unrecognised 'dvc exp list' line");
            }
            parsed
        })
        .collect()
}

/// Parse one `<hash> [<name>]` line.
fn parse_list_line(line: &str) -> Option<ExperimentRef> {
    let hash_end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    if hash_end == 0 {
        return None;
    }
    let (hash, rest) = line.split_at(hash_end);

    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }
    let inner = after_ws.strip_prefix('[')?;
    let close = inner.rfind(']')?;
    let name = &inner[..close];
    if name.is_empty() {
        return None;
    }

    Some(ExperimentRef::new(hash, name))
}

/// Outcome of looking up parameters in `dvc exp show --json` output.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsLookup {
    /// Parameters found in one of the candidate files
    Found {
        /// Which file they came from
        source: String,
        /// The parameters
        params: ParameterSet,
    },
    /// A candidate file exists but DVC reported an error for it, or its data
    /// is not a mapping
    Malformed {
        /// File that could not be read
        source: String,
        /// Reason reported by DVC or by us
        reason: String,
    },
    /// No matching revision, or neither candidate file is present
    Missing,
}

/// Select the parameters of the revision matching `commit_hash`.
///
/// Walks `[*].experiments[*].revs[*]` and considers every rev whose `rev`
/// field contains `commit_hash`, in order. Within a rev's `data.params`,
/// `primary` wins when it has data and no error; otherwise `fallback` is used
/// whenever it has data. The first rev yielding parameters wins; later revs
/// are only consulted while nothing has been found.
#[must_use]
pub fn extract_params(
    show: &Value,
    commit_hash: &str,
    primary: &str,
    fallback: &str,
) -> ParamsLookup {
    let mut malformed = None;
    for rev in matching_revs(show, commit_hash) {
        match lookup_in_rev(rev, primary, fallback) {
            found @ ParamsLookup::Found { .. } => return found,
            bad @ ParamsLookup::Malformed { .. } => {
                malformed.get_or_insert(bad);
            }
            ParamsLookup::Missing => {}
        }
    }
    malformed.unwrap_or(ParamsLookup::Missing)
}

fn matching_revs<'a>(show: &'a Value, commit_hash: &'a str) -> impl Iterator<Item = &'a Value> {
    show.as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("experiments")?.as_array())
        .flatten()
        .filter_map(|exp| exp.get("revs")?.as_array())
        .flatten()
        .filter(move |rev| {
            rev.get("rev")
                .and_then(Value::as_str)
                .is_some_and(|rev_hash| rev_hash.contains(commit_hash))
        })
}

fn lookup_in_rev(rev: &Value, primary: &str, fallback: &str) -> ParamsLookup {
    let Some(params_data) = rev.get("data").and_then(|data| data.get("params")) else {
        return ParamsLookup::Missing;
    };

    let mut malformed = None;
    for (file, strict) in [(primary, true), (fallback, false)] {
        let Some(entry) = params_data.get(file) else {
            continue;
        };
        match read_params_entry(entry, strict) {
            Ok(params) => {
                return ParamsLookup::Found {
                    source: file.to_string(),
                    params,
                }
            }
            Err(reason) => {
                malformed.get_or_insert(ParamsLookup::Malformed {
                    source: file.to_string(),
                    reason,
                });
            }
        }
    }

    malformed.unwrap_or(ParamsLookup::Missing)
}

/// Read one params-file entry. A `strict` entry is rejected whenever DVC
/// reports an error for it; otherwise reported data is used regardless.
fn read_params_entry(entry: &Value, strict: bool) -> Result<ParameterSet, String> {
    let error = entry.get("error");
    let data = match (entry.get("data"), error) {
        (Some(data), None) => data,
        (Some(data), Some(_)) if !strict => data,
        (_, Some(error)) => return Err(describe_dvc_error(error)),
        (None, None) => return Err("no data reported".to_string()),
    };
    ParameterSet::from_value(data.clone())
        .ok_or_else(|| "parameters are not a mapping".to_string())
}

fn describe_dvc_error(error: &Value) -> String {
    error
        .get("msg")
        .or_else(|| error.get("type"))
        .and_then(Value::as_str)
        .map_or_else(|| "file could not be parsed".to_string(), str::to_string)
}
