// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Subcommand execution
//!
//! Each subcommand calls one [`GitManager`] operation and renders the result
//! as a JSON value for stdout.

use std::path::Path;

use gitsift_git::{Commit, GitContext, GitError, GitManager, IteratorRequest};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::Command;

/// Errors from running a subcommand
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The repository operation failed
    #[error(transparent)]
    Git(#[from] GitError),

    /// The result could not be rendered
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Run `command` against the checkout at `repo`
///
/// # Errors
///
/// Returns the first error from the underlying git operation.
pub async fn run(
    git: &dyn GitManager,
    ctx: &GitContext,
    repo: &Path,
    command: &Command,
) -> Result<Value, CommandError> {
    debug!(backend = %git.backend(), repo = %repo.display(), ?command, "Running command");

    match command {
        Command::Init {
            dir,
            remote_url,
            bare,
        } => {
            git.init(ctx, dir, remote_url, *bare).await?;
            info!(path = %dir.display(), remote = %remote_url, "Repository initialized");
            Ok(json!({
                "path": dir.display().to_string(),
                "remote": remote_url,
                "bare": bare,
            }))
        }
        Command::Log {
            branch,
            from,
            to,
            count,
        } => {
            let handle = git.open_existing(repo)?;
            let mut request = IteratorRequest::latest(branch.as_str(), *count);
            request.from_commit_hash = from.clone();
            request.to_commit_hash = to.clone();

            let mut commits = git.commits_for_range(ctx, &handle, &request).await?;
            let mut out: Vec<Commit> = Vec::with_capacity(commits.remaining());
            while commits.has_next() {
                out.push(commits.next_commit()?);
            }
            info!(count = out.len(), "Fetched commits");
            Ok(serde_json::to_value(out)?)
        }
        Command::Show { reference } => {
            let commit = git.commit_by_tag_or_hash(ctx, repo, reference).await?;
            Ok(serde_json::to_value(commit)?)
        }
        Command::Stats { reference, against } => {
            let stats = git
                .diff_stats_between(ctx, repo, reference, against.as_deref())
                .await?;
            Ok(json!({
                "commit": reference,
                "against": against,
                "additions": stats.total_additions(),
                "deletions": stats.total_deletions(),
                "binary": stats.binary_files(),
                "files": serde_json::to_value(&stats)?,
            }))
        }
    }
}
