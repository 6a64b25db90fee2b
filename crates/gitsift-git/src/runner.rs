// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! External command execution
//!
//! Every git invocation goes through a [`ProcessRunner`]. The runner only
//! spawns and waits: it reports what the process printed and whether it
//! succeeded, and leaves interpreting a failure to [`classify_failure`].
//! A [`GitContext`] travels with each call and carries the cancellation
//! token and optional credentials.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::GitError;

/// Substring git prints on stderr when a remote rejects credentials
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Default helper script handed to git through `GIT_ASKPASS`
pub const DEFAULT_ASKPASS: &str = "/git-ask-pass.sh";

const UNKNOWN_REVISION_MARKERS: [&str; 3] = [
    "unknown revision",
    "bad revision",
    "ambiguous argument",
];

/// Username/password pair for remotes that need them
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Password or access token
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Per-call execution context
///
/// Cloning shares the cancellation token, so cancelling any clone aborts
/// commands started with the others.
#[derive(Debug, Clone, Default)]
pub struct GitContext {
    cancel: CancellationToken,
    credentials: Option<Credentials>,
}

impl GitContext {
    /// Context with a fresh token and no credentials
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Attach credentials
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Cancel every command running under this context
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the context has been cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The underlying cancellation token
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Attached credentials, if any
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

/// What a finished command printed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit code, `None` if killed by a signal
    pub code: Option<i32>,
    /// Whether the process exited successfully
    pub success: bool,
}

impl CommandOutput {
    /// Successful output with the given stdout
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            code: Some(0),
            success: true,
            ..Default::default()
        }
    }

    /// Failed output with the given stderr and exit code
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
            code: Some(code),
            success: false,
            ..Default::default()
        }
    }
}

/// Runs external commands on behalf of the git backends
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` and capture its output
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`], not
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns `GitError::Cancelled` if the context is cancelled before or
    /// while the command runs, and `GitError::Spawn` if it cannot start.
    async fn run(
        &self,
        ctx: &GitContext,
        program: &str,
        args: &[String],
    ) -> Result<CommandOutput, GitError>;
}

/// [`ProcessRunner`] backed by `tokio::process`
///
/// Children are killed when the context is cancelled. Git is never allowed
/// to prompt on the terminal; when the context carries credentials they are
/// exported as `GIT_USERNAME`/`GIT_PASSWORD` for the askpass helper.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    askpass: Option<PathBuf>,
}

impl TokioProcessRunner {
    /// Runner without an askpass helper
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `GIT_ASKPASS` at the given helper when credentials are present
    #[must_use]
    pub fn with_askpass(mut self, path: impl Into<PathBuf>) -> Self {
        self.askpass = Some(path.into());
        self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        ctx: &GitContext,
        program: &str,
        args: &[String],
    ) -> Result<CommandOutput, GitError> {
        if ctx.is_cancelled() {
            return Err(GitError::Cancelled);
        }

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);

        if let Some(credentials) = ctx.credentials() {
            cmd.env("GIT_USERNAME", &credentials.username)
                .env("GIT_PASSWORD", &credentials.password);
            if let Some(askpass) = &self.askpass {
                cmd.env("GIT_ASKPASS", askpass);
            }
        }

        let child = cmd.spawn().map_err(|source| GitError::Spawn {
            command: command_line(program, args),
            source,
        })?;

        // Dropping the wait future drops the child, which kills it.
        tokio::select! {
            biased;
            () = ctx.cancellation().cancelled() => {
                debug!(program, "command cancelled");
                Err(GitError::Cancelled)
            }
            output = child.wait_with_output() => {
                let output = output.map_err(|source| GitError::Spawn {
                    command: command_line(program, args),
                    source,
                })?;
                let stdout = String::from_utf8(output.stdout).map_err(|e| {
                    GitError::decode(format!(
                        "{} wrote non-UTF-8 output: {e}",
                        command_line(program, args)
                    ))
                })?;
                Ok(CommandOutput {
                    stdout,
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    code: output.status.code(),
                    success: output.status.success(),
                })
            }
        }
    }
}

/// Render a command line for logs and error messages
#[must_use]
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a failed command into the most specific error available
///
/// Classification is a best-effort substring match on stderr: an
/// authentication failure wins, then an unknown revision, and anything else
/// is a plain process failure.
#[must_use]
pub fn classify_failure(command: impl Into<String>, output: &CommandOutput) -> GitError {
    let command = command.into();
    let stderr = output.stderr.trim().to_string();

    if stderr.contains(AUTHENTICATION_FAILED) {
        return GitError::Authentication { command, stderr };
    }
    if let Some(reference) = unknown_revision(&stderr) {
        return GitError::NotFound { reference };
    }
    GitError::Process {
        command,
        code: output.code,
        stderr,
    }
}

/// Extract the revision git complained about, if it did
fn unknown_revision(stderr: &str) -> Option<String> {
    let line = stderr
        .lines()
        .find(|line| UNKNOWN_REVISION_MARKERS.iter().any(|m| line.contains(m)))?;
    let reference = line
        .split('\'')
        .nth(1)
        .filter(|r| !r.is_empty())
        .unwrap_or(line);
    Some(reference.to_string())
}
