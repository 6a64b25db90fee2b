// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-file diff statistics
//!
//! Parses `git diff --numstat` output, one line per changed file:
//!
//! ```text
//! 3	1	src/main.rs
//! -	-	assets/logo.png
//! ```
//!
//! A `-` (or anything else non-numeric) in a count column marks the file as
//! binary.
//!
//! Line output C-quotes unusual paths (`"caf\303\251.txt"`), so queries run
//! with `-z` and go through [`parse_numstat_z`], which sees raw paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GitError;

/// Change counts for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileStat {
    /// Line-based change counts
    Text {
        /// Lines added
        additions: u64,
        /// Lines deleted
        deletions: u64,
    },
    /// Binary content; git reports no line counts
    Binary,
}

impl FileStat {
    /// Whether this file was reported as binary
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary)
    }
}

/// Change counts keyed by file path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileStats {
    files: BTreeMap<String, FileStat>,
}

impl FileStats {
    /// Create an empty set of stats
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the stats for a path, replacing any earlier entry
    pub fn insert(&mut self, path: impl Into<String>, stat: FileStat) {
        self.files.insert(path.into(), stat);
    }

    /// Stats for a single path
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileStat> {
        self.files.get(path)
    }

    /// Number of changed files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over `(path, stat)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileStat)> {
        self.files.iter().map(|(path, stat)| (path.as_str(), stat))
    }

    /// Total lines added across text files
    #[must_use]
    pub fn total_additions(&self) -> u64 {
        self.files
            .values()
            .map(|stat| match stat {
                FileStat::Text { additions, .. } => *additions,
                FileStat::Binary => 0,
            })
            .sum()
    }

    /// Total lines deleted across text files
    #[must_use]
    pub fn total_deletions(&self) -> u64 {
        self.files
            .values()
            .map(|stat| match stat {
                FileStat::Text { deletions, .. } => *deletions,
                FileStat::Binary => 0,
            })
            .sum()
    }

    /// Paths reported as binary
    #[must_use]
    pub fn binary_files(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, stat)| stat.is_binary())
            .map(|(path, _)| path)
            .collect()
    }
}

/// Parse `git diff --numstat` output
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns `GitError::Decode` if a line does not have three tab-separated
/// columns or has an empty path.
pub fn parse_numstat(raw: &str) -> Result<FileStats, GitError> {
    let mut stats = FileStats::new();

    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let (stat, path) = split_record(line)?;
        if path.is_empty() {
            return Err(GitError::decode(format!("numstat line without path: {line:?}")));
        }
        stats.insert(path, stat);
    }

    Ok(stats)
}

/// Parse `git diff --numstat -z` output
///
/// Records are NUL-terminated and paths are not quoted. A record with an
/// empty path column is a rename or copy: the old and new paths follow as
/// two more NUL-terminated fields, and the stats are keyed by the new path.
///
/// # Errors
///
/// Returns `GitError::Decode` if a record is malformed or a rename record
/// is missing its paths.
pub fn parse_numstat_z(raw: &str) -> Result<FileStats, GitError> {
    let mut stats = FileStats::new();
    let mut fields = raw.split('\0');

    while let Some(record) = fields.next() {
        let record = record.trim_start_matches('\n');
        if record.is_empty() {
            continue;
        }
        let (stat, path) = split_record(record)?;
        let path = if path.is_empty() {
            let (Some(_old), Some(new)) = (fields.next(), fields.next()) else {
                return Err(GitError::decode(format!(
                    "rename record without paths: {record:?}"
                )));
            };
            new
        } else {
            path
        };
        if path.is_empty() {
            return Err(GitError::decode(format!("numstat record without path: {record:?}")));
        }
        stats.insert(path, stat);
    }

    Ok(stats)
}

fn split_record(record: &str) -> Result<(FileStat, &str), GitError> {
    let mut columns = record.splitn(3, '\t');
    let (Some(added), Some(deleted), Some(path)) =
        (columns.next(), columns.next(), columns.next())
    else {
        return Err(GitError::decode(format!("malformed numstat line: {record:?}")));
    };

    let stat = match (added.trim().parse::<u64>(), deleted.trim().parse::<u64>()) {
        (Ok(additions), Ok(deletions)) => FileStat::Text {
            additions,
            deletions,
        },
        _ => FileStat::Binary,
    };
    Ok((stat, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use similar_asserts::assert_eq;

    #[test]
    fn test_text_line() {
        let stats = parse_numstat("3\t1\tsrc/main.go\n").expect("parse");
        assert_eq!(
            stats.get("src/main.go"),
            Some(&FileStat::Text {
                additions: 3,
                deletions: 1
            })
        );
    }

    #[test]
    fn test_binary_line_is_not_zero() {
        let stats = parse_numstat("-\t-\tbinary.png").expect("parse");
        assert_eq!(stats.get("binary.png"), Some(&FileStat::Binary));
        assert_eq!(stats.binary_files(), vec!["binary.png"]);
    }

    #[test]
    fn test_mixed_output_and_totals() {
        let raw = "10\t2\tREADME.md\n-\t-\tlogo.png\n0\t7\tsrc/old.rs\n";
        let stats = parse_numstat(raw).expect("parse");
        assert_eq!(stats.len(), 3);
        assert_eq!(stats.total_additions(), 10);
        assert_eq!(stats.total_deletions(), 9);
    }

    #[test]
    fn test_empty_output() {
        let stats = parse_numstat("").expect("parse");
        assert!(stats.is_empty());
    }

    #[test]
    fn test_path_with_tab_and_spaces_kept_verbatim() {
        let stats = parse_numstat("1\t1\tdocs/my file\twith tab.md").expect("parse");
        assert!(stats.get("docs/my file\twith tab.md").is_some());
    }

    #[test]
    fn test_rename_path_kept_verbatim() {
        let stats = parse_numstat("0\t0\tsrc/{old => new}/lib.rs").expect("parse");
        assert!(stats.get("src/{old => new}/lib.rs").is_some());
    }

    #[test]
    fn test_malformed_line_fails() {
        let err = parse_numstat("3 1 src/main.rs").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_missing_path_fails() {
        let err = parse_numstat("3\t1\t").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_nul_records_keep_raw_paths() {
        let raw = "1\t0\tcaf\u{e9}.txt\0-\t-\tlogo.png\02\t2\tdir/with \"quote\".md\0";
        let stats = parse_numstat_z(raw).expect("parse");
        assert_eq!(stats.len(), 3);
        assert_eq!(
            stats.get("caf\u{e9}.txt"),
            Some(&FileStat::Text {
                additions: 1,
                deletions: 0
            })
        );
        assert_eq!(stats.get("logo.png"), Some(&FileStat::Binary));
        assert!(stats.get("dir/with \"quote\".md").is_some());
    }

    #[test]
    fn test_nul_rename_keyed_by_new_path() {
        let raw = "3\t1\t\0src/old.rs\0src/new.rs\0";
        let stats = parse_numstat_z(raw).expect("parse");
        assert_eq!(stats.len(), 1);
        assert_eq!(
            stats.get("src/new.rs"),
            Some(&FileStat::Text {
                additions: 3,
                deletions: 1
            })
        );
    }

    #[test]
    fn test_nul_truncated_rename_fails() {
        let err = parse_numstat_z("3\t1\t\0src/old.rs").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_nul_empty_output() {
        assert!(parse_numstat_z("").expect("parse").is_empty());
        assert!(parse_numstat_z("\n").expect("parse").is_empty());
    }

    #[test]
    fn test_serializes_as_map() {
        let stats = parse_numstat("3\t1\ta.rs\n-\t-\tb.bin").expect("parse");
        let json = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(json["a.rs"]["kind"], serde_json::json!("text"));
        assert_eq!(json["a.rs"]["additions"], serde_json::json!(3));
        assert_eq!(json["b.bin"]["kind"], serde_json::json!("binary"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: numeric columns round into Text with the same counts
        #[test]
        fn prop_numeric_counts(additions in 0u64..100_000, deletions in 0u64..100_000, path in "[a-z/]{1,30}\\.rs") {
            let stats = parse_numstat(&format!("{additions}\t{deletions}\t{path}")).expect("parse");
            prop_assert_eq!(stats.get(&path), Some(&FileStat::Text { additions, deletions }));
        }

        /// Property: parsing arbitrary text never panics
        #[test]
        fn prop_parse_never_panics(raw in ".*") {
            let _ = parse_numstat(&raw);
            let _ = parse_numstat_z(&raw);
        }

        /// Property: line and NUL forms agree on plain paths
        #[test]
        fn prop_line_and_nul_forms_agree(rows in proptest::collection::vec((0u64..1000, 0u64..1000, "[a-z]{1,8}/[a-z]{1,8}\\.rs"), 0..10)) {
            let lines: String = rows.iter().map(|(a, d, p)| format!("{a}\t{d}\t{p}\n")).collect();
            let records: String = rows.iter().map(|(a, d, p)| format!("{a}\t{d}\t{p}\0")).collect();
            prop_assert_eq!(parse_numstat(&lines).expect("lines"), parse_numstat_z(&records).expect("records"));
        }
    }
}
