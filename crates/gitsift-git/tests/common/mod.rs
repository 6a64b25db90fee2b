// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Git repository scaffolding shared by the integration tests

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Whether a usable `git` executable is on PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Return early from a test when git is missing
macro_rules! require_git {
    () => {
        if !common::git_available() {
            eprintln!("git not available, skipping");
            return;
        }
    };
}

/// Run git in `dir`, panicking on failure
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    run_git_with_env(dir, args, &[])
}

fn run_git_with_env(dir: &Path, args: &[&str], env: &[(&str, String)]) -> String {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir).args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd.output().expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A throwaway repository on a `main` branch with a fixed committer
pub struct TestGitRepo {
    dir: TempDir,
    commits: usize,
}

impl TestGitRepo {
    /// Initialize an empty repository
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path();
        run_git(path, &["init", "--quiet"]);
        run_git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(path, &["config", "user.email", "test@example.com"]);
        run_git(path, &["config", "user.name", "Test Author"]);
        run_git(path, &["config", "commit.gpgsign", "false"]);
        Self { dir, commits: 0 }
    }

    /// Path of the checkout
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file without staging it
    pub fn write(&self, relative_path: &str, content: &[u8]) {
        let file = self.dir.path().join(relative_path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(file, content).expect("Failed to write file");
    }

    fn next_date(&mut self) -> Vec<(&'static str, String)> {
        self.commits += 1;
        let date = format!("2024-01-{:02}T10:00:00+02:00", self.commits);
        vec![
            ("GIT_AUTHOR_DATE", date.clone()),
            ("GIT_COMMITTER_DATE", date),
        ]
    }

    /// Stage everything and commit; commit dates advance one day per commit
    pub fn commit_all(&mut self, message: &str) -> String {
        let env = self.next_date();
        run_git(self.path(), &["add", "-A"]);
        run_git_with_env(
            self.path(),
            &["commit", "--quiet", "--allow-empty", "-m", message],
            &env,
        );
        self.head()
    }

    /// Create a branch at HEAD and switch to it
    pub fn branch(&self, name: &str) {
        run_git(self.path(), &["checkout", "--quiet", "-b", name]);
    }

    /// Switch to an existing branch
    pub fn checkout(&self, name: &str) {
        run_git(self.path(), &["checkout", "--quiet", name]);
    }

    /// Merge `branch` into the current branch, always creating a merge commit
    pub fn merge(&mut self, branch: &str, message: &str) -> String {
        let env = self.next_date();
        run_git_with_env(
            self.path(),
            &["merge", "--quiet", "--no-ff", "-m", message, branch],
            &env,
        );
        self.head()
    }

    /// Write a file and commit it
    pub fn create_and_commit(&mut self, relative_path: &str, content: &str, message: &str) -> String {
        self.write(relative_path, content.as_bytes());
        self.commit_all(message)
    }

    /// Create `count` commits touching `file-N.txt`, oldest first
    pub fn create_commits(&mut self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                self.create_and_commit(
                    &format!("file-{i}.txt"),
                    &format!("content {i}\n"),
                    &format!("Commit {i}"),
                )
            })
            .collect()
    }

    /// Lightweight tag at HEAD
    pub fn tag(&self, name: &str) {
        run_git(self.path(), &["tag", name]);
    }

    /// Annotated tag at HEAD
    pub fn tag_annotated(&self, name: &str, message: &str) {
        run_git(self.path(), &["tag", "-a", name, "-m", message]);
    }

    /// Full hash of HEAD
    pub fn head(&self) -> String {
        run_git(self.path(), &["rev-parse", "HEAD"])
    }
}
