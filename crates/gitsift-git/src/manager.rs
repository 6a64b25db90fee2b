// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository facade shared by the git backends
//!
//! [`GitManager`] is the capability callers program against. Two backends
//! implement it: [`CliGitManager`](crate::cli::CliGitManager) drives the
//! `git` binary and [`LibGit2Manager`](crate::libgit::LibGit2Manager) uses
//! libgit2 in-process. The backend is picked once through [`manager`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cli::CliGitManager;
use crate::commit::Commit;
use crate::error::GitError;
use crate::iterator::CommitIterator;
use crate::libgit::LibGit2Manager;
use crate::runner::{GitContext, TokioProcessRunner};
use crate::stats::FileStats;

/// Parameters of a history query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IteratorRequest {
    /// Reference the history is read from, e.g. `origin/main`
    pub branch_ref: String,
    /// Human-readable branch name
    pub branch: String,
    /// Maximum number of commits to return
    pub commit_count: usize,
    /// Oldest commit of the range; its ancestors are excluded
    pub from_commit_hash: Option<String>,
    /// Newest commit of the range
    pub to_commit_hash: Option<String>,
}

impl IteratorRequest {
    /// The `count` most recent commits of `branch_ref`
    #[must_use]
    pub fn latest(branch_ref: impl Into<String>, count: usize) -> Self {
        let branch_ref = branch_ref.into();
        Self {
            branch: branch_ref.clone(),
            branch_ref,
            commit_count: count,
            from_commit_hash: None,
            to_commit_hash: None,
        }
    }

    /// Set the human-readable branch name
    #[must_use]
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Start the range at this commit
    #[must_use]
    pub fn from(mut self, hash: impl Into<String>) -> Self {
        self.from_commit_hash = Some(hash.into());
        self
    }

    /// End the range at this commit
    #[must_use]
    pub fn to(mut self, hash: impl Into<String>) -> Self {
        self.to_commit_hash = Some(hash.into());
        self
    }
}

/// Handle to a checkout that has been validated to hold git metadata
///
/// Only a path: it owns no process or file handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepository {
    root_dir: PathBuf,
}

impl GitRepository {
    pub(crate) fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    /// Absolute path of the checkout
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

/// Validate a checkout and return a handle to it
///
/// The path is made absolute, then checked for a `.git` entry (a directory,
/// or a file for worktrees) or a bare layout (`HEAD` plus `objects/`).
///
/// # Errors
///
/// Returns `GitError::Io` if the path cannot be made absolute and
/// `GitError::NotARepository` if no metadata is found. Probe errors other
/// than "not found" are logged and treated as a repository.
pub fn open_checkout(checkout_path: &Path) -> Result<GitRepository, GitError> {
    let root_dir = std::path::absolute(checkout_path).map_err(|source| GitError::Io {
        path: checkout_path.display().to_string(),
        source,
    })?;

    match std::fs::symlink_metadata(root_dir.join(".git")) {
        Ok(_) => Ok(GitRepository::new(root_dir)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if root_dir.join("HEAD").is_file() && root_dir.join("objects").is_dir() {
                Ok(GitRepository::new(root_dir))
            } else {
                Err(GitError::NotARepository {
                    path: root_dir.display().to_string(),
                })
            }
        }
        Err(e) => {
            warn!(path = %root_dir.display(), error = %e, "Could not inspect git metadata, assuming repository");
            Ok(GitRepository::new(root_dir))
        }
    }
}

/// Commit-history capability implemented by each backend
#[async_trait]
pub trait GitManager: Send + Sync {
    /// Which backend this is
    fn backend(&self) -> Backend;

    /// Create `root_dir`, initialize metadata in it, and register
    /// `remote_url` as `origin`
    ///
    /// A remote failure does not undo the initialization.
    ///
    /// # Errors
    ///
    /// `GitError::Io` if the directory cannot be created, `GitError::Init`
    /// if initialization fails, `GitError::Remote` if the remote cannot be
    /// added.
    async fn init(
        &self,
        ctx: &GitContext,
        root_dir: &Path,
        remote_url: &str,
        is_bare: bool,
    ) -> Result<(), GitError>;

    /// Open an existing checkout
    ///
    /// # Errors
    ///
    /// See [`open_checkout`].
    fn open_existing(&self, checkout_path: &Path) -> Result<GitRepository, GitError> {
        open_checkout(checkout_path)
    }

    /// Fetch the commits selected by `request` in one query
    ///
    /// # Errors
    ///
    /// Propagates process, decode and cancellation failures. Never retries.
    async fn commits_for_range(
        &self,
        ctx: &GitContext,
        repository: &GitRepository,
        request: &IteratorRequest,
    ) -> Result<CommitIterator, GitError>;

    /// Resolve a tag or hash to exactly one commit
    ///
    /// # Errors
    ///
    /// Returns `GitError::NotFound` if the reference yields no commit.
    async fn commit_by_tag_or_hash(
        &self,
        ctx: &GitContext,
        checkout_path: &Path,
        reference: &str,
    ) -> Result<Commit, GitError>;

    /// Resolve a commit hash
    ///
    /// # Errors
    ///
    /// See [`GitManager::commit_by_tag_or_hash`].
    async fn commit_for_hash(
        &self,
        ctx: &GitContext,
        checkout_path: &Path,
        hash: &str,
    ) -> Result<Commit, GitError> {
        self.commit_by_tag_or_hash(ctx, checkout_path, hash).await
    }

    /// Resolve a tag
    ///
    /// # Errors
    ///
    /// See [`GitManager::commit_by_tag_or_hash`].
    async fn commit_for_tag(
        &self,
        ctx: &GitContext,
        checkout_path: &Path,
        tag: &str,
    ) -> Result<Commit, GitError> {
        self.commit_by_tag_or_hash(ctx, checkout_path, tag).await
    }

    /// Per-file change counts from `rev_a` to `rev_b`
    ///
    /// With `rev_b` unset (or empty) the stats describe what `rev_a` itself
    /// changed relative to its first parent.
    ///
    /// # Errors
    ///
    /// Propagates process, decode and cancellation failures.
    async fn diff_stats_between(
        &self,
        ctx: &GitContext,
        checkout_path: &Path,
        rev_a: &str,
        rev_b: Option<&str>,
    ) -> Result<FileStats, GitError>;

    /// Per-file change counts introduced by `commit`
    ///
    /// # Errors
    ///
    /// See [`GitManager::diff_stats_between`].
    async fn stats_for_commit(
        &self,
        ctx: &GitContext,
        commit: &Commit,
    ) -> Result<FileStats, GitError> {
        self.diff_stats_between(ctx, Path::new(commit.checkout_path()), commit.hash(), None)
            .await
    }
}

/// Available [`GitManager`] implementations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Drive the `git` executable
    #[default]
    Cli,
    /// Use libgit2 in-process
    LibGit2,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cli => "cli",
            Self::LibGit2 => "libgit2",
        })
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" | "git" => Ok(Self::Cli),
            "libgit2" | "git2" => Ok(Self::LibGit2),
            other => Err(format!("unknown backend '{other}' (expected cli or libgit2)")),
        }
    }
}

/// Settings used when constructing a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Executable used by the CLI backend
    pub git_binary: String,
    /// Askpass helper exported when credentials are present
    pub askpass: Option<PathBuf>,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            askpass: None,
        }
    }
}

/// Construct the selected backend
#[must_use]
pub fn manager(backend: Backend, options: ManagerOptions) -> Box<dyn GitManager> {
    match backend {
        Backend::Cli => {
            let runner = match options.askpass {
                Some(path) => TokioProcessRunner::new().with_askpass(path),
                None => TokioProcessRunner::new(),
            };
            Box::new(CliGitManager::new(runner).with_git_binary(options.git_binary))
        }
        Backend::LibGit2 => Box::new(LibGit2Manager::new()),
    }
}
