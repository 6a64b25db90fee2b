// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the gitsift command
//!
//! Global options select the checkout, the backend and how git is invoked;
//! each subcommand maps to one repository operation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gitsift_git::runner::DEFAULT_ASKPASS;
use gitsift_git::{Backend, Credentials, GitContext, ManagerOptions};

/// gitsift - commit history and diff statistics from git checkouts
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gitsift")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Operation to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path of the git checkout
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, global = true, env = "GITSIFT_REPO")]
    pub repo: Option<PathBuf>,

    /// Backend used to read the repository (cli or libgit2)
    #[arg(long, global = true, env = "GITSIFT_BACKEND", default_value_t = Backend::Cli)]
    pub backend: Backend,

    /// git executable used by the cli backend
    #[arg(long, global = true, env = "GITSIFT_GIT")]
    pub git_binary: Option<String>,

    /// Askpass helper handed to git when credentials are given
    ///
    /// Defaults to /git-ask-pass.sh when a username is set.
    #[arg(long, global = true, env = "GITSIFT_ASKPASS")]
    pub askpass: Option<PathBuf>,

    /// Username exported to git as GIT_USERNAME
    #[arg(long, global = true, env = "GITSIFT_USERNAME")]
    pub username: Option<String>,

    /// Password exported to git as GIT_PASSWORD
    #[arg(long, global = true, env = "GITSIFT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Cancel git work after this many seconds
    #[arg(long, global = true, env = "GITSIFT_TIMEOUT")]
    pub timeout_secs: Option<u64>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so stdout stays pure JSON.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - only warnings and errors are logged
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a repository and register its origin remote
    Init {
        /// Directory to initialize (created if missing)
        dir: PathBuf,

        /// URL registered as `origin`
        remote_url: String,

        /// Create a bare repository
        #[arg(long)]
        bare: bool,
    },

    /// List commits of a branch, optionally bounded by commit hashes
    ///
    /// Example:
    ///   gitsift log --branch origin/main --from 1a2b3c -n 50
    Log {
        /// Reference the history is read from
        #[arg(short, long, default_value = "HEAD")]
        branch: String,

        /// Oldest commit to include
        #[arg(long)]
        from: Option<String>,

        /// Newest commit to include; takes precedence over --branch
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of commits
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
    },

    /// Show a single commit by tag or hash
    Show {
        /// Tag, hash or other revision
        reference: String,
    },

    /// Per-file change counts of a commit
    Stats {
        /// Commit whose changes are counted
        reference: String,

        /// Diff against this revision instead of the commit's parent
        #[arg(long)]
        against: Option<String>,
    },
}

impl Config {
    /// Get the checkout path, using the current directory as default
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        self.repo
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Credentials to export, if a username was given
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        self.username.as_ref().map(|username| {
            Credentials::new(username.clone(), self.password.clone().unwrap_or_default())
        })
    }

    /// Options used to construct the backend
    #[must_use]
    pub fn manager_options(&self) -> ManagerOptions {
        let askpass = self.askpass.clone().or_else(|| {
            self.username
                .as_ref()
                .map(|_| PathBuf::from(DEFAULT_ASKPASS))
        });
        ManagerOptions {
            git_binary: self
                .git_binary
                .clone()
                .unwrap_or_else(|| "git".to_string()),
            askpass,
        }
    }

    /// Context for git calls, carrying credentials and a fresh cancellation token
    #[must_use]
    pub fn git_context(&self) -> GitContext {
        let ctx = GitContext::new();
        match self.credentials() {
            Some(credentials) => ctx.with_credentials(credentials),
            None => ctx,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both `--verbose` and `--quiet` are set
    /// - `log` is asked for zero commits
    /// - A read command targets a checkout that doesn't exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verbose && self.quiet {
            return Err(ConfigError::ConflictingVerbosity);
        }

        match &self.command {
            Some(Command::Init { .. }) | None => Ok(()),
            Some(command) => {
                if let Command::Log { count: 0, .. } = command {
                    return Err(ConfigError::ZeroCount);
                }
                let repo = self.repo_path();
                if !repo.exists() {
                    return Err(ConfigError::RepoNotFound(repo));
                }
                if !repo.is_dir() {
                    return Err(ConfigError::RepoNotDirectory(repo));
                }
                Ok(())
            }
        }
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Checkout path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Checkout path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoNotDirectory(PathBuf),

    /// `log -n 0`
    #[error("Commit count must be at least 1")]
    ZeroCount,

    /// `--verbose` together with `--quiet`
    #[error("--verbose and --quiet cannot be used together")]
    ConflictingVerbosity,
}
