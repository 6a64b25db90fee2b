// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gitsift-git

use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    /// Filesystem operation failed
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path being operated on
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Repository metadata could not be initialized
    #[error("Failed to initialize repository at {path}: {reason}")]
    Init {
        /// Directory that was being initialized
        path: String,
        /// What the backend reported
        reason: String,
    },

    /// The `origin` remote could not be registered
    #[error("Failed to add remote {url}: {reason}")]
    Remote {
        /// Remote URL that was being registered
        url: String,
        /// What the backend reported
        reason: String,
    },

    /// No version-control metadata at the given path
    #[error("Not a git repository: {path}")]
    NotARepository {
        /// The path that was checked
        path: String,
    },

    /// The external command could not be started
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The external command exited abnormally
    #[error("`{command}` failed (exit code {code:?}): {stderr}")]
    Process {
        /// Rendered command line
        command: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The remote rejected our credentials
    #[error("Authentication failed for `{command}`: {stderr}")]
    Authentication {
        /// Rendered command line
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// Query output could not be decoded
    #[error("Failed to decode git output: {reason}")]
    Decode {
        /// Description of the malformed content
        reason: String,
    },

    /// A reference resolved to no commit
    #[error("No commit found for reference: {reference}")]
    NotFound {
        /// The reference string that could not be resolved
        reference: String,
    },

    /// A caller-supplied revision that git would parse as an option
    #[error("Invalid reference: {reference}")]
    InvalidReference {
        /// The rejected reference string
        reference: String,
    },

    /// The context was cancelled while the operation was in flight
    #[error("Operation cancelled")]
    Cancelled,

    /// A commit iterator was advanced past its end
    #[error("Commit iterator exhausted after {consumed} commits")]
    Exhausted {
        /// Number of commits handed out before exhaustion
        consumed: usize,
    },

    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// A blocking worker task panicked or was aborted
    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Flat classification of a [`GitError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Filesystem failure
    Io,
    /// Metadata initialization failure
    Init,
    /// Remote registration failure
    Remote,
    /// Path holds no repository
    NotARepository,
    /// External command failure
    Process,
    /// Credentials rejected
    Authentication,
    /// Malformed output
    Decode,
    /// Unresolvable reference
    NotFound,
    /// Reference rejected before reaching git
    InvalidReference,
    /// Context cancelled
    Cancelled,
    /// Iterator past its end
    Exhausted,
}

impl GitError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Init { .. } => ErrorKind::Init,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::NotARepository { .. } => ErrorKind::NotARepository,
            Self::Spawn { .. } | Self::Process { .. } | Self::Worker(_) => ErrorKind::Process,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidReference { .. } => ErrorKind::InvalidReference,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Exhausted { .. } => ErrorKind::Exhausted,
            Self::Git2(e) => match e.code() {
                git2::ErrorCode::Auth | git2::ErrorCode::Certificate => ErrorKind::Authentication,
                git2::ErrorCode::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::Process,
            },
        }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(reference: impl Into<String>) -> Self {
        Self::NotFound {
            reference: reference.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_plain_variants() {
        assert_eq!(GitError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(GitError::Exhausted { consumed: 3 }.kind(), ErrorKind::Exhausted);
        assert_eq!(GitError::decode("bad").kind(), ErrorKind::Decode);
        assert_eq!(GitError::not_found("v9").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_invalid_reference_kind() {
        let err = GitError::InvalidReference {
            reference: "--output=x".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidReference);
        assert!(err.to_string().contains("--output=x"));
    }

    #[test]
    fn test_spawn_is_a_process_failure() {
        let err = GitError::Spawn {
            command: "git log".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.kind(), ErrorKind::Process);
        assert!(err.to_string().contains("git log"));
    }

    #[test]
    fn test_git2_auth_code_maps_to_authentication() {
        let err = GitError::from(git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Http,
            "bad credentials",
        ));
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_git2_not_found_code_maps_to_not_found() {
        let err = GitError::from(git2::Error::new(
            git2::ErrorCode::NotFound,
            git2::ErrorClass::Reference,
            "missing",
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_display_includes_context() {
        let err = GitError::Process {
            command: "git -C /repo log".to_string(),
            code: Some(128),
            stderr: "fatal: bad object".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("128"));
        assert!(msg.contains("fatal: bad object"));
    }
}
