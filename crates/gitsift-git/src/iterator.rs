// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Forward-only view over a fetched batch of commits

use crate::commit::Commit;
use crate::error::GitError;

/// Sequential access to commits that were already fetched in one query
///
/// No further git commands are issued while iterating. The iterator takes
/// the batch by value, so handing it over never copies the commits.
#[derive(Debug)]
pub struct CommitIterator {
    commits: std::vec::IntoIter<Commit>,
    consumed: usize,
}

impl CommitIterator {
    /// Wrap a batch, keeping its order
    #[must_use]
    pub fn new(batch: Vec<Commit>) -> Self {
        Self {
            commits: batch.into_iter(),
            consumed: 0,
        }
    }

    /// Whether another commit is available
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.commits.as_slice().is_empty()
    }

    /// Take the next commit
    ///
    /// # Errors
    ///
    /// Returns `GitError::Exhausted` once every commit has been handed out.
    pub fn next_commit(&mut self) -> Result<Commit, GitError> {
        let commit = self.commits.next().ok_or(GitError::Exhausted {
            consumed: self.consumed,
        })?;
        self.consumed += 1;
        Ok(commit)
    }

    /// Commits not yet handed out
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.commits.len()
    }
}

impl Iterator for CommitIterator {
    type Item = Commit;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_commit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.commits.size_hint()
    }
}

impl ExactSizeIterator for CommitIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_log_output;
    use crate::error::ErrorKind;
    use similar_asserts::assert_eq;

    fn batch(n: usize) -> Vec<Commit> {
        let raw: String = (0..n)
            .map(|i| {
                format!(
                    r#"{{"commit":"{i:040x}","commiter":{{"name":"N","email":"e@x.io","date":"2024-01-01T00:00:00Z"}},"subject":"Commit {i}","body":""}},"#
                )
            })
            .collect();
        decode_log_output(&raw, "/repo").expect("decode")
    }

    #[test]
    fn test_empty_batch_has_nothing() {
        let mut iter = CommitIterator::new(Vec::new());
        assert!(!iter.has_next());
        let err = iter.next_commit().expect_err("exhausted");
        assert_eq!(err.kind(), ErrorKind::Exhausted);
    }

    #[test]
    fn test_yields_exactly_n_then_exhausted() {
        let mut iter = CommitIterator::new(batch(3));
        for i in 0..3 {
            assert!(iter.has_next());
            let commit = iter.next_commit().expect("commit available");
            assert_eq!(commit.subject(), format!("Commit {i}").as_str());
        }
        assert!(!iter.has_next());
        match iter.next_commit() {
            Err(GitError::Exhausted { consumed }) => assert_eq!(consumed, 3),
            other => panic!("Expected Exhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let mut iter = CommitIterator::new(batch(1));
        iter.next_commit().expect("first");
        assert!(iter.next_commit().is_err());
        assert!(iter.next_commit().is_err());
    }

    #[test]
    fn test_std_iterator_preserves_order() {
        let expected: Vec<String> = batch(4).iter().map(|c| c.hash().to_string()).collect();
        let iter = CommitIterator::new(batch(4));
        assert_eq!(iter.len(), 4);
        let hashes: Vec<String> = iter.map(|c| c.hash().to_string()).collect();
        assert_eq!(hashes, expected);
    }
}
