// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test utilities for gitsift-cli integration tests

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

fn run_git(dir: &Path, args: &[&str], date: Option<&str>) -> String {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir).args(args);
    if let Some(date) = date {
        cmd.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
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

/// Repository with `count` commits on `main`, each adding `file-N.txt`
///
/// Returns the directory and the commit hashes, oldest first.
pub fn repo_with_commits(count: usize) -> (TempDir, Vec<String>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path();
    run_git(path, &["init", "--quiet"], None);
    run_git(path, &["symbolic-ref", "HEAD", "refs/heads/main"], None);
    run_git(path, &["config", "user.email", "test@example.com"], None);
    run_git(path, &["config", "user.name", "Test Author"], None);
    run_git(path, &["config", "commit.gpgsign", "false"], None);

    let hashes = (0..count)
        .map(|i| {
            std::fs::write(path.join(format!("file-{i}.txt")), format!("line {i}\n"))
                .expect("Failed to write file");
            let date = format!("2024-02-{:02}T09:30:00+01:00", i + 1);
            run_git(path, &["add", "-A"], None);
            run_git(
                path,
                &["commit", "--quiet", "-m", &format!("Commit {i}")],
                Some(&date),
            );
            run_git(path, &["rev-parse", "HEAD"], None)
        })
        .collect();
    (dir, hashes)
}
