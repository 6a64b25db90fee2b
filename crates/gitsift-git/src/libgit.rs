// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! [`GitManager`] backend that uses libgit2 in-process
//!
//! Mirrors the CLI backend's contracts: the same range precedence and cap,
//! newest-first order, committer signatures, ISO-8601 strict dates and
//! numstat-style per-file counts. libgit2 calls block, so each operation
//! runs on the blocking pool and is abandoned if the context is cancelled.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use git2::{Diff, DiffOptions, ErrorCode, Oid, Patch, Repository, RepositoryInitOptions, Sort};
use tracing::{debug, error};

use crate::commit::Commit;
use crate::error::GitError;
use crate::iterator::CommitIterator;
use crate::manager::{Backend, GitManager, GitRepository, IteratorRequest};
use crate::range::{RevisionRange, check_revision};
use crate::runner::GitContext;
use crate::stats::{FileStat, FileStats};

/// Backend built on the `git2` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct LibGit2Manager;

impl LibGit2Manager {
    /// Create the backend
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Run blocking libgit2 work unless the context is cancelled first
async fn run_blocking<T, F>(ctx: &GitContext, op: F) -> Result<T, GitError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, GitError> + Send + 'static,
{
    if ctx.is_cancelled() {
        return Err(GitError::Cancelled);
    }
    let task = tokio::task::spawn_blocking(op);
    tokio::select! {
        biased;
        () = ctx.cancellation().cancelled() => Err(GitError::Cancelled),
        joined = task => joined?,
    }
}

fn open(path: &Path) -> Result<Repository, GitError> {
    Repository::open(path).map_err(|e| match e.code() {
        ErrorCode::NotFound => GitError::NotARepository {
            path: path.display().to_string(),
        },
        _ => GitError::Git2(e),
    })
}

/// Resolve a revision to a commit id, mapping lookup failures to NotFound
fn resolve_commit(repo: &Repository, reference: &str) -> Result<Oid, GitError> {
    check_revision(reference)?;
    repo.revparse_single(reference)
        .and_then(|obj| obj.peel_to_commit())
        .map(|commit| commit.id())
        .map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous => {
                GitError::not_found(reference)
            }
            _ => GitError::Git2(e),
        })
}

fn iso_strict(time: git2::Time) -> Result<String, GitError> {
    FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|offset| {
            DateTime::from_timestamp(time.seconds(), 0).map(|utc| utc.with_timezone(&offset))
        })
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
        .ok_or_else(|| {
            GitError::decode(format!(
                "Commit time out of range: {} offset {}",
                time.seconds(),
                time.offset_minutes()
            ))
        })
}

fn to_commit(commit: &git2::Commit<'_>, checkout_path: &str) -> Result<Commit, GitError> {
    let committer = commit.committer();
    Ok(Commit::from_parts(
        commit.id().to_string(),
        committer.name().unwrap_or(""),
        committer.email().unwrap_or(""),
        iso_strict(commit.time())?,
        commit.summary().unwrap_or(""),
        commit.body().unwrap_or(""),
        checkout_path,
    ))
}

fn walk(
    root_dir: &Path,
    branch_ref: &str,
    from: Option<&str>,
    to: Option<&str>,
    limit: usize,
) -> Result<Vec<Commit>, GitError> {
    let repo = open(root_dir)?;
    let range = RevisionRange::resolve(branch_ref, from, to);

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;
    revwalk.push(resolve_commit(&repo, range.tip())?)?;

    if let Some(from) = range.boundary() {
        let boundary = repo.find_commit(resolve_commit(&repo, from)?)?;
        // `from^` is the first parent only; a root commit has none.
        let parent = boundary
            .parent_id(0)
            .map_err(|_| GitError::not_found(format!("{from}^")))?;
        revwalk.hide(parent)?;
    }

    let checkout = root_dir.display().to_string();
    revwalk
        .take(limit)
        .map(|oid| {
            let commit = repo.find_commit(oid?)?;
            to_commit(&commit, &checkout)
        })
        .collect()
}

fn numstat(diff: &Diff<'_>) -> Result<FileStats, GitError> {
    let mut stats = FileStats::new();
    for idx in 0..diff.deltas().len() {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };
        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        let stat = match Patch::from_diff(diff, idx)? {
            Some(patch) if !patch.delta().flags().is_binary() => {
                let (_, additions, deletions) = patch.line_stats()?;
                FileStat::Text {
                    additions: additions as u64,
                    deletions: deletions as u64,
                }
            }
            _ => FileStat::Binary,
        };
        stats.insert(path, stat);
    }
    Ok(stats)
}

fn diff_stats(root_dir: &Path, rev_a: &str, rev_b: Option<&str>) -> Result<FileStats, GitError> {
    let repo = open(root_dir)?;
    let commit_a = repo.find_commit(resolve_commit(&repo, rev_a)?)?;

    let (old, new) = match rev_b.filter(|r| !r.is_empty()) {
        Some(rev_b) => {
            let commit_b = repo.find_commit(resolve_commit(&repo, rev_b)?)?;
            (commit_a.tree()?, commit_b.tree()?)
        }
        None => {
            let parent = commit_a
                .parent(0)
                .map_err(|_| GitError::not_found(format!("{rev_a}^")))?;
            (parent.tree()?, commit_a.tree()?)
        }
    };

    let mut opts = DiffOptions::new();
    let diff = repo.diff_tree_to_tree(Some(&old), Some(&new), Some(&mut opts))?;
    numstat(&diff)
}

#[async_trait]
impl GitManager for LibGit2Manager {
    fn backend(&self) -> Backend {
        Backend::LibGit2
    }

    async fn init(
        &self,
        ctx: &GitContext,
        root_dir: &Path,
        remote_url: &str,
        is_bare: bool,
    ) -> Result<(), GitError> {
        let root: PathBuf = root_dir.to_path_buf();
        let url = remote_url.to_string();

        run_blocking(ctx, move || {
            std::fs::create_dir_all(&root).map_err(|source| GitError::Io {
                path: root.display().to_string(),
                source,
            })?;

            let mut opts = RepositoryInitOptions::new();
            opts.bare(is_bare).no_reinit(false);
            let repo = Repository::init_opts(&root, &opts).map_err(|e| GitError::Init {
                path: root.display().to_string(),
                reason: e.message().to_string(),
            })?;
            debug!(path = %root.display(), bare = is_bare, "Initialized repository");

            repo.remote("origin", &url).map_err(|e| GitError::Remote {
                url: url.clone(),
                reason: e.message().to_string(),
            })?;
            Ok(())
        })
        .await
    }

    async fn commits_for_range(
        &self,
        ctx: &GitContext,
        repository: &GitRepository,
        request: &IteratorRequest,
    ) -> Result<CommitIterator, GitError> {
        let root = repository.root_dir().to_path_buf();
        let request = request.clone();
        let path = root.clone();

        let result = run_blocking(ctx, move || {
            walk(
                &root,
                &request.branch_ref,
                request.from_commit_hash.as_deref(),
                request.to_commit_hash.as_deref(),
                request.commit_count,
            )
        })
        .await;

        match result {
            Ok(commits) => Ok(CommitIterator::new(commits)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error fetching commits");
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
        let root = checkout_path.to_path_buf();
        let reference = reference.to_string();

        run_blocking(ctx, move || {
            let repo = open(&root)?;
            let commit = repo.find_commit(resolve_commit(&repo, &reference)?)?;
            to_commit(&commit, &root.display().to_string())
        })
        .await
    }

    async fn diff_stats_between(
        &self,
        ctx: &GitContext,
        checkout_path: &Path,
        rev_a: &str,
        rev_b: Option<&str>,
    ) -> Result<FileStats, GitError> {
        let root = checkout_path.to_path_buf();
        let a = rev_a.to_string();
        let b = rev_b.map(str::to_string);

        run_blocking(ctx, move || diff_stats(&root, &a, b.as_deref()))
            .await
            .inspect_err(|e| {
                error!(
                    commit = rev_a,
                    path = %checkout_path.display(),
                    error = %e,
                    "Error fetching file stats"
                );
            })
    }
}
