// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! rawlog: commit history from the raw git log
//!
//! This binary lists, shows, diffs and counts commits by running `git` and
//! printing the results as JSON on stdout. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use rawlog_cli::commands;
use rawlog_cli::config::Config;
use rawlog_git::GitRepo;
use tracing::debug;

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
    debug!(?config, "Starting rawlog");

    let repo = GitRepo::with_config(config.git_config());
    let command = config.command.clone().unwrap_or_default();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&command, &repo, &mut out).await?;
    Ok(())
}
