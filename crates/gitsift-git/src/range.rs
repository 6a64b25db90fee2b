// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Revision range resolution for history queries
//!
//! A history query is bounded by an optional `from` commit, an optional `to`
//! commit, and the branch it runs on. Exactly one of four shapes applies,
//! checked in this order:
//!
//! | `from` | `to` | range            |
//! |--------|------|------------------|
//! | set    | set  | `from^..to`      |
//! | set    | -    | `from^..branch`  |
//! | -      | set  | `to`             |
//! | -      | -    | `branch`         |
//!
//! Empty strings count as unset. Revisions starting with `-` are rejected
//! by [`check_revision`] so they never reach git as options.

use std::fmt;

use crate::error::GitError;

/// The shape of a history query's revision range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionRange<'a> {
    /// Commits reachable from `to`, stopping at the parents of `from`
    Between {
        /// Oldest commit to include
        from: &'a str,
        /// Tip of the range
        to: &'a str,
    },
    /// Everything on the branch from `from` onwards
    SinceOnBranch {
        /// Oldest commit to include
        from: &'a str,
        /// Branch reference used as the tip
        branch_ref: &'a str,
    },
    /// A single endpoint and its ancestors
    UpTo {
        /// Tip of the range
        to: &'a str,
    },
    /// The branch tip and its ancestors
    Branch {
        /// Branch reference used as the tip
        branch_ref: &'a str,
    },
}

impl<'a> RevisionRange<'a> {
    /// Pick the range shape for the given boundaries
    #[must_use]
    pub fn resolve(branch_ref: &'a str, from: Option<&'a str>, to: Option<&'a str>) -> Self {
        match (non_empty(from), non_empty(to)) {
            (Some(from), Some(to)) => Self::Between { from, to },
            (Some(from), None) => Self::SinceOnBranch { from, branch_ref },
            (None, Some(to)) => Self::UpTo { to },
            (None, None) => Self::Branch { branch_ref },
        }
    }

    /// The revision the walk starts from
    #[must_use]
    pub fn tip(&self) -> &'a str {
        match *self {
            Self::Between { to, .. } | Self::UpTo { to } => to,
            Self::SinceOnBranch { branch_ref, .. } | Self::Branch { branch_ref } => branch_ref,
        }
    }

    /// The commit whose parents bound the walk, if any
    #[must_use]
    pub fn boundary(&self) -> Option<&'a str> {
        match *self {
            Self::Between { from, .. } | Self::SinceOnBranch { from, .. } => Some(from),
            Self::UpTo { .. } | Self::Branch { .. } => None,
        }
    }

    /// Every caller-supplied revision in the range
    #[must_use]
    pub fn revisions(&self) -> Vec<&'a str> {
        self.boundary().into_iter().chain([self.tip()]).collect()
    }

    /// Render as the positional arguments of `git log`
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if a revision looks like an option.
    pub fn to_args(&self) -> Result<Vec<String>, GitError> {
        for revision in self.revisions() {
            check_revision(revision)?;
        }
        Ok(vec![self.to_string()])
    }
}

impl fmt::Display for RevisionRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.boundary() {
            Some(from) => write!(f, "{from}^..{}", self.tip()),
            None => f.write_str(self.tip()),
        }
    }
}

/// Resolve boundaries straight to `git log` range arguments
///
/// # Errors
///
/// Returns `GitError::InvalidReference` if a revision looks like an option.
pub fn resolve_range(
    branch_ref: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<String>, GitError> {
    RevisionRange::resolve(branch_ref, from, to).to_args()
}

/// Reject a revision git would parse as an option
///
/// # Errors
///
/// Returns `GitError::InvalidReference` if `revision` starts with `-`.
pub fn check_revision(revision: &str) -> Result<&str, GitError> {
    if revision.starts_with('-') {
        return Err(GitError::InvalidReference {
            reference: revision.to_string(),
        });
    }
    Ok(revision)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
