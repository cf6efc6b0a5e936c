//! Command invoker
//!
//! Runs the `dvc` executable as a child process in the repository directory
//! and captures its stdout, stderr and exit status. Arguments are passed as an
//! argv vector, never through a shell.
//!
//! # Example
//!
//! ```rust,no_run
//! use dvc_exp_api::command::CommandRunner;
//!
//! # async fn example() -> dvc_exp_api::Result<()> {
//! let runner = CommandRunner::new("dvc", ".");
//! let output = runner.run(&["exp", "list"]).await?.into_success()?;
//! println!("{}", output.stdout);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Captured result of one finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Rendered command line, for messages and logs
    pub command: String,
    /// Exit status
    pub status: ExitStatus,
    /// Captured stdout (lossy UTF-8)
    pub stdout: String,
    /// Captured stderr (lossy UTF-8)
    pub stderr: String,
}

impl CommandOutput {
    /// Check whether the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Turn a non-zero exit into `Error::CommandFailed`.
    ///
    /// Stderr is logged here and dropped, so it never ends up in an error
    /// message shown to API clients.
    ///
    /// # Errors
    ///
    /// Returns `Error::CommandFailed` if the command did not succeed.
    pub fn into_success(self) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        warn!(
            command = %self.command,
            status = %self.status,
            stderr = %self.stderr.trim(),
            "command exited unsuccessfully"
        );
        Err(Error::CommandFailed {
            command: self.command,
            status: self.status.to_string(),
        })
    }
}

/// Runs one program in a fixed working directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: PathBuf,
    workdir: PathBuf,
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// Create a runner for `program` executed inside `workdir`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
            timeout: None,
        }
    }

    /// Kill the child and fail when it runs longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Get the working directory.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Render `args` as a command line for logs and error messages.
    #[must_use]
    pub fn render(&self, args: &[&str]) -> String {
        let program = self
            .program
            .file_name()
            .map_or_else(|| self.program.to_string_lossy(), |name| name.to_string_lossy());
        std::iter::once(program.as_ref())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the program with `args` and wait for it to finish.
    ///
    /// A non-zero exit is not an error at this level; use
    /// [`CommandOutput::into_success`] for that.
    ///
    /// # Errors
    ///
    /// Returns `Error::CommandSpawn` if the process cannot be started and
    /// `Error::CommandTimeout` if it outlives the configured timeout.
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let command = self.render(args);
        debug!(command = %command, workdir = %self.workdir.display(), "spawning command");

        let child = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::CommandSpawn {
                command: command.clone(),
                source,
            })?;

        let started = Instant::now();
        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
                warn!(command = %command, secs = limit.as_secs(), "command timed out");
                Error::CommandTimeout {
                    command: command.clone(),
                    secs: limit.as_secs(),
                }
            })?,
            None => wait.await,
        }?;

        debug!(
            command = %command,
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis(),
            "command finished"
        );

        Ok(CommandOutput {
            command,
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
