// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Diffs between revisions
//!
//! [`diff`] runs `git diff` through the executor and hands the text to a
//! [`DiffParser`]. This module never looks inside the hunks themselves.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GitError, ParseError};
use crate::exec::{DiffOptions, GitExecutor};

/// What to diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRequest {
    /// Left-hand revision
    pub from: String,
    /// Right-hand revision
    ///
    /// `None` compares `from` against the working tree, as `git diff <rev>`
    /// does. Commit diffs always set both endpoints.
    pub to: Option<String>,
    /// Restrict the diff to these paths
    pub paths: Vec<String>,
    /// Request complete object identifiers on `index` lines
    pub full_index: bool,
}

impl DiffRequest {
    /// Diff starting from `from`
    #[must_use]
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: None,
            paths: Vec::new(),
            full_index: true,
        }
    }

    /// Set the right-hand revision
    #[must_use]
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Restrict to the given paths
    #[must_use]
    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Options passed to the executor
    #[must_use]
    pub fn options(&self) -> DiffOptions {
        DiffOptions {
            full_index: self.full_index,
        }
    }
}

/// Changes to one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Path before the change
    pub a_path: String,
    /// Path after the change
    pub b_path: String,
    /// Blob before the change
    pub a_blob: Option<String>,
    /// Blob after the change
    pub b_blob: Option<String>,
    /// Mode before the change
    pub a_mode: Option<String>,
    /// Mode after the change
    pub b_mode: Option<String>,
    /// The file was created
    pub new_file: bool,
    /// The file was removed
    pub deleted_file: bool,
    /// The file was renamed
    pub renamed_file: bool,
    /// Rename similarity in percent
    pub similarity_index: u8,
    /// Hunk text
    pub diff: String,
}

/// Turns `git diff` output into per-file entries
pub trait DiffParser: Send + Sync {
    /// Parse a complete diff
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the text does not follow the diff grammar.
    fn parse(&self, text: &str) -> Result<Vec<FileDiff>, ParseError>;
}

/// Parser for git's extended unified diff format
#[derive(Debug, Clone, Copy, Default)]
pub struct GitDiffParser;

impl DiffParser for GitDiffParser {
    fn parse(&self, text: &str) -> Result<Vec<FileDiff>, ParseError> {
        parse_diff(text)
    }
}

/// Diff two revisions and parse the result with [`GitDiffParser`]
///
/// # Errors
///
/// Returns `GitError` if git fails or its output cannot be parsed.
pub async fn diff(repo: &dyn GitExecutor, request: &DiffRequest) -> Result<Vec<FileDiff>, GitError> {
    diff_with(repo, request, &GitDiffParser).await
}

/// Diff two revisions and parse the result with `parser`
///
/// # Errors
///
/// Returns `GitError` if git fails or its output cannot be parsed.
pub async fn diff_with(
    repo: &dyn GitExecutor,
    request: &DiffRequest,
    parser: &dyn DiffParser,
) -> Result<Vec<FileDiff>, GitError> {
    debug!(from = %request.from, to = ?request.to, paths = request.paths.len(), "Diffing");
    let text = repo
        .diff(
            &request.options(),
            &request.from,
            request.to.as_deref(),
            &request.paths,
        )
        .await?;
    Ok(parser.parse(&text)?)
}

/// Parse `git diff` output
///
/// # Errors
///
/// Returns `ParseError` if an entry does not start with a `diff --git` header.
pub fn parse_diff(text: &str) -> Result<Vec<FileDiff>, ParseError> {
    let mut lines = text.lines().enumerate().peekable();
    let mut diffs = Vec::new();

    while let Some((index, header)) = lines.next() {
        let line = index + 1;
        let (a_path, b_path) = parse_header(header)
            .ok_or_else(|| ParseError::unexpected(line, "`diff --git a/<path> b/<path>`", header))?;
        let mut entry = FileDiff {
            a_path,
            b_path,
            ..FileDiff::default()
        };

        if let Some(mode) = lines.next_if(|(_, l)| l.starts_with("old mode ")) {
            entry.a_mode = Some(mode.1["old mode ".len()..].to_string());
            if let Some(mode) = lines.next_if(|(_, l)| l.starts_with("new mode ")) {
                entry.b_mode = Some(mode.1["new mode ".len()..].to_string());
            }
        }

        if let Some((_, l)) = lines.next_if(|(_, l)| l.starts_with("new file mode ")) {
            entry.b_mode = Some(l["new file mode ".len()..].to_string());
            entry.a_mode = None;
            entry.new_file = true;
        } else if let Some((_, l)) = lines.next_if(|(_, l)| l.starts_with("deleted file mode ")) {
            entry.a_mode = Some(l["deleted file mode ".len()..].to_string());
            entry.b_mode = None;
            entry.deleted_file = true;
        } else if let Some((index, l)) = lines.next_if(|(_, l)| l.starts_with("similarity index ")) {
            entry.similarity_index = l["similarity index ".len()..]
                .strip_suffix('%')
                .and_then(|percent| percent.parse::<u8>().ok())
                .filter(|percent| *percent <= 100)
                .ok_or_else(|| ParseError::unexpected(index + 1, "similarity percentage", l))?;
            entry.renamed_file = true;
            while lines
                .next_if(|(_, l)| l.starts_with("rename from ") || l.starts_with("rename to "))
                .is_some()
            {}
        }

        if let Some((_, l)) = lines.next_if(|(_, l)| l.starts_with("index ")) {
            parse_index(&l["index ".len()..], &mut entry);
        }

        let mut body = Vec::new();
        while let Some((_, l)) = lines.next_if(|(_, l)| !l.starts_with("diff --git ")) {
            body.push(l);
        }
        entry.diff = body.join("\n");
        diffs.push(entry);
    }

    Ok(diffs)
}

/// Split `diff --git a/<a> b/<b>` into its two paths
fn parse_header(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("diff --git a/")?;
    let split = rest.find(" b/")?;
    Some((rest[..split].to_string(), rest[split + 3..].to_string()))
}

/// Read `<a>..<b> [mode]` from an `index` line
fn parse_index(rest: &str, entry: &mut FileDiff) {
    let mut parts = rest.splitn(2, ' ');
    if let Some((a, b)) = parts.next().and_then(|blobs| blobs.split_once("..")) {
        entry.a_blob = Some(a.to_string());
        entry.b_blob = Some(b.to_string());
    }
    if let Some(mode) = parts.next().map(str::trim).filter(|m| !m.is_empty()) {
        entry.b_mode = Some(mode.to_string());
    }
}
