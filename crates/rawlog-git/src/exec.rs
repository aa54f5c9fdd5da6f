// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Running git subcommands
//!
//! All history access goes through the [`GitExecutor`] trait. [`GitCli`]
//! implements it by spawning the `git` program; tests use
//! [`MockExecutor`](crate::mock::MockExecutor).

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecutionError;

/// Default limit on how long a single git invocation may run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default length of abbreviated identifiers
pub const DEFAULT_ABBREV_LEN: usize = 7;

/// Options for listing revisions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Pretty format name (`raw` for commit parsing, none for bare ids)
    pub pretty: Option<String>,
    /// Maximum number of revisions to list
    pub max_count: Option<usize>,
    /// List revisions reachable from every ref
    pub all: bool,
}

impl ListOptions {
    /// Options producing the raw commit format
    #[must_use]
    pub fn raw() -> Self {
        Self {
            pretty: Some("raw".to_string()),
            ..Default::default()
        }
    }

    /// Limit the listing to `n` revisions
    #[must_use]
    pub fn max_count(mut self, n: usize) -> Self {
        self.max_count = Some(n);
        self
    }

    /// List across all refs
    #[must_use]
    pub fn all(mut self) -> Self {
        self.all = true;
        self
    }
}

/// Options for the diff subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Print complete object identifiers on `index` lines
    pub full_index: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { full_index: true }
    }
}

/// Options for abbreviating an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbbreviateOptions {
    /// Requested length of the short form
    pub length: usize,
}

impl Default for AbbreviateOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_ABBREV_LEN,
        }
    }
}

/// Executes git subcommands and returns their standard output
///
/// Implementations own their concurrency policy; callers may issue requests
/// from several tasks at once.
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// List revisions reachable from `reference` (or all refs)
    async fn list_revisions(
        &self,
        options: &ListOptions,
        reference: Option<&str>,
    ) -> Result<String, ExecutionError>;

    /// Diff `a` against `b` (or the working tree when `b` is `None`)
    async fn diff(
        &self,
        options: &DiffOptions,
        a: &str,
        b: Option<&str>,
        paths: &[String],
    ) -> Result<String, ExecutionError>;

    /// Produce the short form of an identifier
    async fn abbreviate(
        &self,
        options: &AbbreviateOptions,
        id: &str,
    ) -> Result<String, ExecutionError>;
}

/// Marks the end of options so a revision starting with `-` stays a revision
pub const END_OF_OPTIONS: &str = "--end-of-options";

/// Build the argument list for `git rev-list`
#[must_use]
pub fn rev_list_args(options: &ListOptions, reference: Option<&str>) -> Vec<String> {
    let mut args = vec!["rev-list".to_string()];
    if let Some(ref pretty) = options.pretty {
        args.push(format!("--pretty={pretty}"));
    }
    if let Some(n) = options.max_count {
        args.push(format!("--max-count={n}"));
    }
    if options.all {
        args.push("--all".to_string());
    }
    if let Some(reference) = reference {
        args.push(END_OF_OPTIONS.to_string());
        args.push(reference.to_string());
    }
    args
}

/// Build the argument list for `git diff`
///
/// Revisions follow `--end-of-options` so they are never read as options,
/// and paths follow a `--` marker so they are never read as revisions.
#[must_use]
pub fn diff_args(options: &DiffOptions, a: &str, b: Option<&str>, paths: &[String]) -> Vec<String> {
    let mut args = vec!["diff".to_string()];
    if options.full_index {
        args.push("--full-index".to_string());
    }
    args.push(END_OF_OPTIONS.to_string());
    args.push(a.to_string());
    if let Some(b) = b {
        args.push(b.to_string());
    }
    if !paths.is_empty() {
        args.push("--".to_string());
        args.extend(paths.iter().cloned());
    }
    args
}

/// Build the argument list for `git rev-parse --short`
#[must_use]
pub fn abbreviate_args(options: &AbbreviateOptions, id: &str) -> Vec<String> {
    vec![
        "rev-parse".to_string(),
        format!("--short={}", options.length),
        id.to_string(),
    ]
}

/// Configuration for [`GitCli`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCliConfig {
    /// The git program to run
    pub program: PathBuf,
    /// Repository to run in (passed as `-C`); `None` uses the current directory
    pub repo_path: Option<PathBuf>,
    /// Limit on each invocation
    pub timeout: Duration,
}

impl Default for GitCliConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            repo_path: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GitCliConfig {
    /// Run against the repository at `path`
    #[must_use]
    pub fn repo(mut self, path: impl Into<PathBuf>) -> Self {
        self.repo_path = Some(path.into());
        self
    }

    /// Use a specific git program
    #[must_use]
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the per-invocation timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Executor backed by the `git` command-line program
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    config: GitCliConfig,
}

impl GitCli {
    /// Create an executor with the given configuration
    #[must_use]
    pub fn new(config: GitCliConfig) -> Self {
        Self { config }
    }

    /// The executor's configuration
    #[must_use]
    pub fn config(&self) -> &GitCliConfig {
        &self.config
    }

    /// Run git with `args` and return its standard output
    ///
    /// The child is killed if the call is cancelled or times out.
    async fn run(&self, args: Vec<String>) -> Result<String, ExecutionError> {
        let command_line = format!("git {}", args.join(" "));
        let mut cmd = Command::new(&self.config.program);
        if let Some(ref path) = self.config.repo_path {
            cmd.arg("-C").arg(path);
        }
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(command = %command_line, "Running git");
        let output = tokio::time::timeout(self.config.timeout, cmd.output())
            .await
            .map_err(|_| ExecutionError::Timeout {
                command: command_line.clone(),
                after: self.config.timeout,
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExecutionError::ProgramNotFound {
                        program: self.config.program.display().to_string(),
                    }
                } else {
                    ExecutionError::Io(e)
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            let status = output.status.code().unwrap_or(-1);
            debug!(command = %command_line, status, "Git command failed");
            Err(ExecutionError::CommandFailed {
                command: command_line,
                status,
                stderr,
            })
        }
    }
}

#[async_trait]
impl GitExecutor for GitCli {
    async fn list_revisions(
        &self,
        options: &ListOptions,
        reference: Option<&str>,
    ) -> Result<String, ExecutionError> {
        self.run(rev_list_args(options, reference)).await
    }

    async fn diff(
        &self,
        options: &DiffOptions,
        a: &str,
        b: Option<&str>,
        paths: &[String],
    ) -> Result<String, ExecutionError> {
        self.run(diff_args(options, a, b, paths)).await
    }

    async fn abbreviate(
        &self,
        options: &AbbreviateOptions,
        id: &str,
    ) -> Result<String, ExecutionError> {
        self.run(abbreviate_args(options, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_rev_list_args_raw() {
        let options = ListOptions::raw().max_count(1);
        assert_eq!(
            rev_list_args(&options, Some("HEAD")),
            vec!["rev-list", "--pretty=raw", "--max-count=1", "--end-of-options", "HEAD"]
        );
    }

    #[test]
    fn test_rev_list_args_all_without_reference() {
        let options = ListOptions::default().all();
        assert_eq!(rev_list_args(&options, None), vec!["rev-list", "--all"]);
    }

    #[test]
    fn test_diff_args_two_revisions() {
        assert_eq!(
            diff_args(&DiffOptions::default(), "a1", Some("b2"), &[]),
            vec!["diff", "--full-index", "--end-of-options", "a1", "b2"]
        );
    }

    #[test]
    fn test_diff_args_paths_follow_separator() {
        let paths = vec!["src/lib.rs".to_string(), "HEAD".to_string()];
        assert_eq!(
            diff_args(&DiffOptions::default(), "a1", None, &paths),
            vec!["diff", "--full-index", "--end-of-options", "a1", "--", "src/lib.rs", "HEAD"]
        );
    }

    #[test]
    fn test_diff_args_without_full_index() {
        let options = DiffOptions { full_index: false };
        assert_eq!(
            diff_args(&options, "a1", Some("b2"), &[]),
            vec!["diff", "--end-of-options", "a1", "b2"]
        );
    }

    #[test]
    fn test_dash_prefixed_revisions_stay_revisions() {
        let diff = diff_args(&DiffOptions::default(), "--output=/tmp/x", Some("-R"), &[]);
        let marker = diff.iter().position(|arg| arg == END_OF_OPTIONS).unwrap();
        assert_eq!(&diff[marker + 1..], ["--output=/tmp/x", "-R"]);

        let rev_list = rev_list_args(&ListOptions::raw(), Some("--all"));
        assert_eq!(&rev_list[rev_list.len() - 2..], ["--end-of-options", "--all"]);
    }

    #[test]
    fn test_abbreviate_args() {
        assert_eq!(
            abbreviate_args(&AbbreviateOptions::default(), "abc"),
            vec!["rev-parse", "--short=7", "abc"]
        );
    }

    #[test]
    fn test_config_builder() {
        let config = GitCliConfig::default()
            .repo("/tmp/repo")
            .program("/usr/bin/git")
            .timeout(Duration::from_secs(5));
        assert_eq!(config.repo_path, Some(PathBuf::from("/tmp/repo")));
        assert_eq!(config.program, PathBuf::from("/usr/bin/git"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_defaults() {
        let config = GitCliConfig::default();
        assert_eq!(config.program, PathBuf::from("git"));
        assert!(config.repo_path.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let cli = GitCli::new(GitCliConfig::default().program("/nonexistent/git-binary-12345"));
        let err = cli
            .list_revisions(&ListOptions::default(), Some("HEAD"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ExecutionError::ProgramNotFound { ref program } if program.contains("git-binary-12345")),
            "unexpected error: {err}"
        );
    }
}
