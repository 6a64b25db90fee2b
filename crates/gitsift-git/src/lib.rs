// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitsift-git: commit history and diff statistics from git checkouts
//!
//! This library crate drives git to list commits over a revision range,
//! resolve tags and hashes to commits, and report per-file change counts.
//! Two interchangeable backends sit behind [`GitManager`]: one spawns the
//! `git` executable and decodes its output, the other uses libgit2.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gitsift_git::prelude::*;
//!
//! # async fn demo() -> Result<(), GitError> {
//! let git = manager(Backend::Cli, ManagerOptions::default());
//! let ctx = GitContext::new();
//! let repo = git.open_existing(std::path::Path::new("."))?;
//!
//! let mut commits = git
//!     .commits_for_range(&ctx, &repo, &IteratorRequest::latest("HEAD", 10))
//!     .await?;
//! while commits.has_next() {
//!     let commit = commits.next_commit()?;
//!     let stats = git.stats_for_commit(&ctx, &commit).await?;
//!     println!("{} {} (+{})", commit.short_hash(), commit.subject(), stats.total_additions());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commit;
pub mod decode;
pub mod error;
pub mod iterator;
pub mod libgit;
pub mod manager;
pub mod range;
pub mod runner;
pub mod stats;

pub use cli::CliGitManager;
pub use commit::Commit;
pub use error::{ErrorKind, GitError};
pub use iterator::CommitIterator;
pub use libgit::LibGit2Manager;
pub use manager::{
    Backend, GitManager, GitRepository, IteratorRequest, ManagerOptions, manager, open_checkout,
};
pub use range::{RevisionRange, resolve_range};
pub use runner::{CommandOutput, Credentials, GitContext, ProcessRunner, TokioProcessRunner};
pub use stats::{FileStat, FileStats};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::Commit;
    pub use crate::error::{ErrorKind, GitError};
    pub use crate::iterator::CommitIterator;
    pub use crate::manager::{
        Backend, GitManager, GitRepository, IteratorRequest, ManagerOptions, manager,
    };
    pub use crate::runner::{Credentials, GitContext};
    pub use crate::stats::{FileStat, FileStats};
}
