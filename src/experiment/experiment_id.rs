//! Experiment identifier - opaque lookup key accepted by every per-experiment endpoint

use std::fmt;

use crate::{Error, Result};

/// Upper bound on identifier length in bytes.
pub const MAX_ID_LEN: usize = 256;

/// Punctuation allowed besides ASCII alphanumerics.
///
/// A subset of what git accepts in a ref name. None of these mean anything
/// to a shell or to a path, and the tool receives the identifier as a single
/// argv entry.
pub const ID_PUNCTUATION: &[u8] = b"-_.=+,@%";

/// Validated experiment identifier.
///
/// The same token may be an experiment name (`addle-hill`) or a commit hash
/// (`ded11c0`, possibly abbreviated). No attempt is made to tell the two apart;
/// resolution belongs to the repository.
///
/// Construction rejects anything that could be read as a path or a command-line
/// option, so a value of this type is always safe to hand to the tool as a
/// single argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExperimentId(String);

impl ExperimentId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidExperimentId` if the identifier is empty, too
    /// long, starts with `-` or `.`, contains `..`, or contains any character
    /// other than ASCII alphanumerics and [`ID_PUNCTUATION`].
    pub fn parse(raw: &str) -> Result<Self> {
        let reject = |reason| Error::InvalidExperimentId {
            id: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(reject("must not be empty"));
        }
        if raw.len() > MAX_ID_LEN {
            return Err(reject("too long"));
        }
        if raw.starts_with('-') {
            return Err(reject("must not start with '-'"));
        }
        if raw.starts_with('.') {
            return Err(reject("must not start with '.'"));
        }
        if raw.contains("..") {
            return Err(reject("must not contain '..'"));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || ID_PUNCTUATION.contains(&b))
        {
            return Err(reject(
                "only letters, digits and '-', '_', '.', '=', '+', ',', '@', '%' are allowed",
            ));
        }

        Ok(Self(raw.to_string()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExperimentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ExperimentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
