// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitsift: commit history and diff statistics from git checkouts
//!
//! Prints the result of each subcommand as pretty JSON on stdout. Logs go
//! to stderr.

use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use gitsift_git::{GitContext, manager};
use tracing::{info, warn};

use gitsift_cli::commands;
use gitsift_cli::config::Config;

/// Cancel `ctx` on Ctrl-C or once the timeout elapses
fn install_cancellation(ctx: &GitContext, timeout: Option<Duration>) {
    let on_signal = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling git work");
            on_signal.cancel();
        }
    });

    if let Some(timeout) = timeout {
        let on_timeout = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!(?timeout, "Timed out, cancelling git work");
            on_timeout.cancel();
        });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    config.validate().context("Invalid configuration")?;

    let Some(command) = config.command.clone() else {
        Config::command().print_help()?;
        return Ok(());
    };

    let git = manager(config.backend, config.manager_options());
    let ctx = config.git_context();
    install_cancellation(&ctx, config.timeout_secs.map(Duration::from_secs));

    let repo = config.repo_path();
    info!(backend = %config.backend, repo = %repo.display(), "Starting gitsift");

    let output = commands::run(git.as_ref(), &ctx, &repo, &command)
        .await
        .context("Command failed")?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
