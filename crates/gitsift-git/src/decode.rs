// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Decoding of `git log` / `git show` output into commits
//!
//! History queries run with [`LOG_FORMAT`], which makes git print one JSON
//! object per commit followed by a `,`. The stream as a whole is not valid
//! JSON: it has no enclosing brackets and ends with a dangling separator.
//! [`repair_fragment_stream`] turns it into an array, and
//! [`decode_log_output`] parses that array into [`Commit`]s.
//!
//! Decoding is all-or-nothing. Field values are not escaped by git, so a
//! quote or newline inside a subject breaks the whole batch and no commits
//! are returned.

use serde::Deserialize;

use crate::commit::Commit;
use crate::error::GitError;

/// `--pretty` argument producing one JSON fragment per commit
pub const LOG_FORMAT: &str = r#"--pretty=format:{"commit":"%H","commiter":{"name":"%cn","email":"%ce","date":"%cd"},"subject":"%s","body":"%b"},"#;

/// Date mode paired with [`LOG_FORMAT`] so `%cd` is ISO-8601 strict
pub const DATE_FORMAT: &str = "--date=iso-strict";

/// Character git appends after every fragment
pub const FRAGMENT_SEPARATOR: char = ',';

#[derive(Debug, Deserialize)]
struct CommitFragment {
    commit: String,
    #[serde(rename = "commiter")]
    committer: Signature,
    subject: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct Signature {
    name: String,
    email: String,
    date: String,
}

/// Turn raw fragment output into a JSON array
///
/// Returns `Ok(None)` when git printed nothing, which is a normal outcome
/// for a range with no commits. Trailing line terminators are ignored; the
/// final character after that must be [`FRAGMENT_SEPARATOR`].
///
/// # Errors
///
/// Returns `GitError::Decode` if the output does not end with the separator.
pub fn repair_fragment_stream(raw: &str) -> Result<Option<String>, GitError> {
    let trimmed = raw.trim_end_matches(['\n', '\r']);
    if trimmed.trim().is_empty() {
        return Ok(None);
    }
    let body = trimmed.strip_suffix(FRAGMENT_SEPARATOR).ok_or_else(|| {
        GitError::decode(format!(
            "output does not end with '{FRAGMENT_SEPARATOR}' fragment separator"
        ))
    })?;
    Ok(Some(format!("[{body}]")))
}

/// Decode history output into commits, in the order git printed them
///
/// # Errors
///
/// Returns `GitError::Decode` if any fragment is malformed. No commits are
/// returned in that case.
pub fn decode_log_output(raw: &str, checkout_path: &str) -> Result<Vec<Commit>, GitError> {
    let Some(array) = repair_fragment_stream(raw)? else {
        return Ok(Vec::new());
    };

    let fragments: Vec<CommitFragment> =
        serde_json::from_str(&array).map_err(|e| GitError::decode(e.to_string()))?;

    fragments
        .into_iter()
        .map(|fragment| {
            if fragment.commit.is_empty() {
                return Err(GitError::decode("fragment has an empty commit hash"));
            }
            Ok(Commit::from_parts(
                fragment.commit,
                &fragment.committer.name,
                &fragment.committer.email,
                fragment.committer.date,
                &fragment.subject,
                &fragment.body,
                checkout_path,
            ))
        })
        .collect()
}
