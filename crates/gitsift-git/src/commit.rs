// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit record produced by the log decoders

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A commit as reported by a history or show query
///
/// Values are immutable once built; the display fields (`author`, `message`)
/// are derived from the raw signature and message parts at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    hash: String,
    author: String,
    date: String,
    message: String,
    checkout_path: String,
}

impl Commit {
    /// Build a commit from the parts a history query reports
    pub(crate) fn from_parts(
        hash: impl Into<String>,
        name: &str,
        email: &str,
        date: impl Into<String>,
        subject: &str,
        body: &str,
        checkout_path: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author: format!("{name} <{email}>"),
            date: date.into(),
            message: format!("{subject}\n{body}"),
            checkout_path: checkout_path.into(),
        }
    }

    /// The full commit hash
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Committer in `Name <email>` form
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Committer date, ISO-8601 strict, verbatim from the query
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Subject and body joined by a newline
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Checkout the commit was read from
    #[must_use]
    pub fn checkout_path(&self) -> &str {
        &self.checkout_path
    }

    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(self.hash.as_str())
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Parse the committer date, keeping its UTC offset
    ///
    /// # Errors
    ///
    /// Returns a parse error if the stored date is not RFC 3339.
    pub fn timestamp(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.date)
    }
}
