// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command runners
//!
//! Each subcommand reads history through a [`GitRepo`] and writes JSON (or a
//! bare count) to the given writer.

use std::io::Write;

use rawlog_git::{CommitRecord, DiffRequest, FileDiff, GitError, GitRepo, ListOptions, ObjectId};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::Command;

/// Command errors
#[derive(Debug, Error)]
pub enum CommandError {
    /// Git operation failed
    #[error("Git operation failed: {0}")]
    Git(#[from] GitError),

    /// The argument is not a full commit id
    #[error("Invalid commit id '{0}'. Expected 40 hexadecimal characters.")]
    InvalidId(String),

    /// JSON serialization error
    #[error("Failed to produce JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output failed
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Output of `show`
#[derive(Debug, Clone, Serialize)]
pub struct ShowOutput {
    /// Short form of the commit id as git abbreviates it
    pub abbreviated_id: String,
    /// The commit itself
    #[serde(flatten)]
    pub commit: CommitRecord,
    /// Changes against the first parent, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffs: Option<Vec<FileDiff>>,
}

/// Run `command` against `repo`, writing its output to `out`
///
/// # Errors
///
/// Returns `CommandError` if git fails, an id is malformed, or the output
/// cannot be written.
pub async fn run<W: Write>(
    command: &Command,
    repo: &GitRepo,
    out: &mut W,
) -> Result<(), CommandError> {
    match command {
        Command::Log {
            reference,
            max_count,
        } => {
            let mut options = ListOptions::raw();
            if let Some(n) = max_count {
                options = options.max_count(*n);
            }
            let commits = repo.commits(reference.as_deref(), options).await?;
            let mut records = Vec::with_capacity(commits.len());
            for commit in &commits {
                records.push(commit.to_record().await?);
            }
            write_json(out, &records)
        }
        Command::Show { id, diff } => {
            let output = show(repo, id, *diff).await?;
            write_json(out, &output)
        }
        Command::Diff { from, to, paths } => {
            let mut request = DiffRequest::new(from.as_str()).paths(paths.iter().cloned());
            if let Some(to) = to {
                request = request.to(to.as_str());
            }
            let diffs = repo.diff(&request).await?;
            info!(files = diffs.len(), "Diffed revisions");
            write_json(out, &diffs)
        }
        Command::Count { reference } => {
            let total = repo.count(reference.as_deref()).await?;
            writeln!(out, "{total}")?;
            Ok(())
        }
    }
}

async fn show(repo: &GitRepo, id: &str, with_diff: bool) -> Result<ShowOutput, CommandError> {
    let id: ObjectId = id
        .parse()
        .map_err(|_| CommandError::InvalidId(id.to_string()))?;
    let commit = repo.find(id).await?;

    let abbreviated_id = commit.abbreviated_id().await?.to_string();
    let record = commit.to_record().await?;
    let diffs = if with_diff {
        Some(commit.diffs().await?)
    } else {
        None
    };

    Ok(ShowOutput {
        abbreviated_id,
        commit: record,
        diffs,
    })
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CommandError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
