// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! rawlog-git: commit history from the raw git log
//!
//! This library crate runs `git rev-list --pretty=raw` (and friends) through
//! a pluggable executor, parses the text into commit records, and resolves
//! commits known only by id on demand.
//!
//! # Example
//!
//! ```no_run
//! use rawlog_git::{GitRepo, ListOptions};
//!
//! # async fn run() -> Result<(), rawlog_git::GitError> {
//! let repo = GitRepo::open(".");
//! let commits = repo.commits(Some("HEAD"), ListOptions::raw().max_count(10)).await?;
//!
//! for c in &commits {
//!     println!("{} - {}", c.id().short(), c.short_message().await?);
//!     for parent in c.parents().await? {
//!         // Parents are stubs; reading a field fetches them once
//!         println!("  parent: {}", parent.short_message().await?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod actor;
pub mod commit;
pub mod count;
pub mod diff;
pub mod error;
pub mod exec;
pub mod mock;
pub mod object_id;
pub mod parser;
pub mod repo;

pub use actor::Actor;
pub use commit::{Commit, CommitData, CommitRecord, SharedExecutor};
pub use diff::{DiffParser, DiffRequest, FileDiff, GitDiffParser};
pub use error::{ExecutionError, GitError, ParseError};
pub use exec::{AbbreviateOptions, DiffOptions, GitCli, GitCliConfig, GitExecutor, ListOptions};
pub use object_id::{EMPTY_TREE_ID, ObjectId};
pub use parser::{RawCommit, parse_raw_log};
pub use repo::GitRepo;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::Commit;
    pub use crate::diff::{DiffRequest, FileDiff};
    pub use crate::error::GitError;
    pub use crate::exec::{GitExecutor, ListOptions};
    pub use crate::object_id::ObjectId;
    pub use crate::repo::GitRepo;
}
