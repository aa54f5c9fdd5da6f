// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for rawlog-git

use std::time::Duration;

use thiserror::Error;

use crate::object_id::ObjectId;

/// Malformed text handed to one of the parsers
///
/// Carries the 1-based line where parsing stopped, the construct the grammar
/// required there, and what was found instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {line}: expected {expected}, found {}", .found.as_deref().unwrap_or("end of input"))]
pub struct ParseError {
    /// Line number (1-based) of the offending line
    pub line: usize,
    /// The construct the grammar required
    pub expected: String,
    /// The offending line, or `None` when the input ran out
    pub found: Option<String>,
}

impl ParseError {
    /// Create a parse error for a line that did not match
    #[must_use]
    pub fn unexpected(line: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            line,
            expected: expected.into(),
            found: Some(found.into()),
        }
    }

    /// Create a parse error for input that ended mid-record
    #[must_use]
    pub fn end_of_input(line: usize, expected: impl Into<String>) -> Self {
        Self {
            line,
            expected: expected.into(),
            found: None,
        }
    }

    /// Check whether the input was exhausted rather than malformed
    #[must_use]
    pub fn is_end_of_input(&self) -> bool {
        self.found.is_none()
    }
}

/// Failures reported while running a git subcommand
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The git program could not be found
    #[error("Git program not found: {program}")]
    ProgramNotFound {
        /// The program that was looked up
        program: String,
    },

    /// Spawning or talking to the child process failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The subcommand exited unsuccessfully
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Exit code, or -1 when killed by a signal
        status: i32,
        /// Captured standard error
        stderr: String,
    },

    /// The subcommand did not finish in time and was killed
    #[error("Command `{command}` timed out after {after:?}")]
    Timeout {
        /// The command line that was run
        command: String,
        /// The configured limit
        after: Duration,
    },
}

/// Errors that can occur during git history operations
#[derive(Debug, Error)]
pub enum GitError {
    /// Raw log or diff text did not match its grammar
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The command executor reported a failure
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// A forced reload of a commit failed; the commit kept its prior state
    #[error("Failed to load commit {id}: {source}")]
    Load {
        /// The commit that was being loaded
        id: ObjectId,
        /// What went wrong
        #[source]
        source: Box<GitError>,
    },

    /// A single-commit lookup returned no record
    #[error("Commit not found: {id}")]
    CommitNotFound {
        /// The identifier that was looked up
        id: ObjectId,
    },
}
