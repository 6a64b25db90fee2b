// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! [`GitManager`] backend that drives the `git` executable

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::commit::Commit;
use crate::decode::{DATE_FORMAT, LOG_FORMAT, decode_log_output};
use crate::error::GitError;
use crate::iterator::CommitIterator;
use crate::manager::{Backend, GitManager, GitRepository, IteratorRequest};
use crate::range::{check_revision, resolve_range};
use crate::runner::{GitContext, ProcessRunner, TokioProcessRunner, classify_failure, command_line};
use crate::stats::{FileStats, parse_numstat_z};

/// Build the `git log` arguments for a history query
///
/// # Errors
///
/// Returns `GitError::InvalidReference` if a revision looks like an option.
pub fn log_args(root_dir: &Path, request: &IteratorRequest) -> Result<Vec<String>, GitError> {
    let mut args = vec![
        "-C".to_string(),
        root_dir.display().to_string(),
        "log".to_string(),
    ];
    args.extend(resolve_range(
        &request.branch_ref,
        request.from_commit_hash.as_deref(),
        request.to_commit_hash.as_deref(),
    )?);
    args.extend([
        "-n".to_string(),
        request.commit_count.to_string(),
        DATE_FORMAT.to_string(),
        LOG_FORMAT.to_string(),
    ]);
    Ok(args)
}

/// Build the `git show` arguments for a single-commit query
///
/// The reference is peeled with `^{commit}` so an annotated tag shows the
/// commit it points at rather than the tag object.
///
/// # Errors
///
/// Returns `GitError::InvalidReference` if the reference looks like an option.
pub fn show_args(root_dir: &Path, reference: &str) -> Result<Vec<String>, GitError> {
    let reference = check_revision(reference)?;
    Ok(vec![
        "-C".to_string(),
        root_dir.display().to_string(),
        "show".to_string(),
        format!("{reference}^{{commit}}"),
        DATE_FORMAT.to_string(),
        LOG_FORMAT.to_string(),
        "-s".to_string(),
    ])
}

/// Build the `git diff --numstat` arguments
///
/// Without `rev_b` the diff runs from the first parent of `rev_a` to
/// `rev_a`, so additions are the lines that commit introduced. Output is
/// NUL-separated with rename detection off, matching the libgit2 backend.
///
/// # Errors
///
/// Returns `GitError::InvalidReference` if a revision looks like an option.
pub fn diff_stat_args(
    root_dir: &Path,
    rev_a: &str,
    rev_b: Option<&str>,
) -> Result<Vec<String>, GitError> {
    let rev_a = check_revision(rev_a)?;
    let (old, new) = match rev_b.filter(|r| !r.is_empty()) {
        Some(rev_b) => (rev_a.to_string(), check_revision(rev_b)?.to_string()),
        None => (format!("{rev_a}^"), rev_a.to_string()),
    };
    Ok(vec![
        "-C".to_string(),
        root_dir.display().to_string(),
        "diff".to_string(),
        "--numstat".to_string(),
        "-z".to_string(),
        "--no-renames".to_string(),
        old,
        new,
    ])
}

/// Backend running `git` through a [`ProcessRunner`]
#[derive(Debug, Clone)]
pub struct CliGitManager<R = TokioProcessRunner> {
    runner: R,
    git_binary: String,
}

impl Default for CliGitManager<TokioProcessRunner> {
    fn default() -> Self {
        Self::new(TokioProcessRunner::new())
    }
}

impl<R: ProcessRunner> CliGitManager<R> {
    /// Backend using `runner` and the `git` found on `PATH`
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            git_binary: "git".to_string(),
        }
    }

    /// Use a specific git executable
    #[must_use]
    pub fn with_git_binary(mut self, git_binary: impl Into<String>) -> Self {
        self.git_binary = git_binary.into();
        self
    }

    /// The runner commands go through
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run git and return stdout, classifying any failure
    async fn git(&self, ctx: &GitContext, args: Vec<String>) -> Result<String, GitError> {
        let rendered = command_line(&self.git_binary, &args);
        debug!(command = %rendered, "Running git");

        let output = self.runner.run(ctx, &self.git_binary, &args).await?;
        debug!(
            command = %rendered,
            success = output.success,
            stdout_bytes = output.stdout.len(),
            stderr = %output.stderr.trim(),
            "git finished"
        );

        if !output.success {
            return Err(classify_failure(rendered, &output));
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl<R: ProcessRunner> GitManager for CliGitManager<R> {
    fn backend(&self) -> Backend {
        Backend::Cli
    }

    async fn init(
        &self,
        ctx: &GitContext,
        root_dir: &Path,
        remote_url: &str,
        is_bare: bool,
    ) -> Result<(), GitError> {
        if remote_url.starts_with('-') {
            return Err(GitError::Remote {
                url: remote_url.to_string(),
                reason: "URL must not start with '-'".to_string(),
            });
        }

        tokio::fs::create_dir_all(root_dir)
            .await
            .map_err(|source| GitError::Io {
                path: root_dir.display().to_string(),
                source,
            })?;

        let dir = root_dir.display().to_string();
        let mut init = vec!["-C".to_string(), dir.clone(), "init".to_string()];
        if is_bare {
            init.push("--bare".to_string());
        }
        self.git(ctx, init).await.map_err(|e| match e {
            GitError::Cancelled => GitError::Cancelled,
            other => GitError::Init {
                path: dir.clone(),
                reason: other.to_string(),
            },
        })?;

        let remote = ["-C", dir.as_str(), "remote", "add", "origin", remote_url]
            .map(String::from)
            .to_vec();
        self.git(ctx, remote).await.map_err(|e| match e {
            GitError::Cancelled => GitError::Cancelled,
            other => GitError::Remote {
                url: remote_url.to_string(),
                reason: other.to_string(),
            },
        })?;
        Ok(())
    }

    async fn commits_for_range(
        &self,
        ctx: &GitContext,
        repository: &GitRepository,
        request: &IteratorRequest,
    ) -> Result<CommitIterator, GitError> {
        let root_dir = repository.root_dir();
        let result = async {
            let output = self.git(ctx, log_args(root_dir, request)?).await?;
            decode_log_output(&output, &root_dir.display().to_string())
        }
        .await;

        match result {
            Ok(commits) => Ok(CommitIterator::new(commits)),
            Err(e) => {
                error!(path = %root_dir.display(), error = %e, "Error fetching commits");
                Err(e)
            }
        }
    }

    async fn commit_by_tag_or_hash(
        &self,
        ctx: &GitContext,
        checkout_path: &Path,
        reference: &str,
    ) -> Result<Commit, GitError> {
        let output = self
            .git(ctx, show_args(checkout_path, reference)?)
            .await
            .map_err(|e| match e {
                GitError::NotFound { .. } => GitError::not_found(reference),
                other => other,
            })?;
        decode_log_output(&output, &checkout_path.display().to_string())?
            .into_iter()
            .next()
            .ok_or_else(|| GitError::not_found(reference))
    }

    async fn diff_stats_between(
        &self,
        ctx: &GitContext,
        checkout_path: &Path,
        rev_a: &str,
        rev_b: Option<&str>,
    ) -> Result<FileStats, GitError> {
        let result = async {
            let output = self
                .git(ctx, diff_stat_args(checkout_path, rev_a, rev_b)?)
                .await?;
            parse_numstat_z(&output)
        }
        .await;

        result.inspect_err(|e| {
            error!(
                commit = rev_a,
                path = %checkout_path.display(),
                error = %e,
                "Error fetching file stats"
            );
        })
    }
}
