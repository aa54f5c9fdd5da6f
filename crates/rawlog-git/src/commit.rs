// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Git commit types and operations
//!
//! A [`Commit`] is a cheap handle to a commit entity. Entities produced by a
//! full listing carry their data from the start; entities known only by id
//! (parent references, or [`Commit::new`]) are stubs and fetch their record
//! on first access.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::actor::Actor;
use crate::diff::{self, DiffRequest, FileDiff};
use crate::error::{GitError, ParseError};
use crate::exec::{AbbreviateOptions, GitExecutor, ListOptions};
use crate::object_id::ObjectId;
use crate::parser::{self, RawCommit};

/// Shared handle to the command executor
pub type SharedExecutor = Arc<dyn GitExecutor>;

/// Everything a commit record holds besides its id
#[derive(Debug, Clone)]
pub struct CommitData {
    /// Parent commits, mainline first; stubs until resolved
    pub parents: Vec<Commit>,
    /// Tree identifier
    pub tree: ObjectId,
    /// Who wrote the change
    pub author: Actor,
    /// When the change was written
    pub authored_date: DateTime<Utc>,
    /// Who recorded the commit
    pub committer: Actor,
    /// When the commit was recorded
    pub committed_date: DateTime<Utc>,
    /// Message lines
    pub message: Vec<String>,
}

impl CommitData {
    /// Build the data of a parsed record; parents become stubs on `repo`
    fn from_raw(repo: &SharedExecutor, raw: RawCommit) -> Self {
        let RawCommit {
            id: _,
            tree,
            parents,
            author,
            committer,
            message,
        } = raw;
        Self {
            parents: parents
                .into_iter()
                .map(|id| Commit::new(Arc::clone(repo), id))
                .collect(),
            tree,
            authored_date: author.timestamp,
            author,
            committed_date: committer.timestamp,
            committer,
            message,
        }
    }
}

struct CommitInner {
    id: ObjectId,
    repo: SharedExecutor,
    /// Resolution guard: held across a lookup so only one runs at a time
    data: Mutex<Option<Arc<CommitData>>>,
    resolved: AtomicBool,
    id_abbrev: OnceCell<String>,
}

/// A commit entity
///
/// Clones share state: resolving one handle resolves all of them.
#[derive(Clone)]
pub struct Commit {
    inner: Arc<CommitInner>,
}

impl Commit {
    /// Create a stub known only by its id
    #[must_use]
    pub fn new(repo: SharedExecutor, id: ObjectId) -> Self {
        Self::with_state(repo, id, None)
    }

    fn with_state(repo: SharedExecutor, id: ObjectId, data: Option<CommitData>) -> Self {
        let resolved = data.is_some();
        Self {
            inner: Arc::new(CommitInner {
                id,
                repo,
                data: Mutex::new(data.map(Arc::new)),
                resolved: AtomicBool::new(resolved),
                id_abbrev: OnceCell::new(),
            }),
        }
    }

    /// Build fully materialized commits from raw log text
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the text is not a valid raw log.
    pub fn list_from_string(repo: &SharedExecutor, text: &str) -> Result<Vec<Self>, ParseError> {
        Ok(parser::parse_raw_log(text)?
            .into_iter()
            .map(|raw| Self::from_raw(repo, raw))
            .collect())
    }

    fn from_raw(repo: &SharedExecutor, raw: RawCommit) -> Self {
        let id = raw.id.clone();
        let data = CommitData::from_raw(repo, raw);
        Self::with_state(Arc::clone(repo), id, Some(data))
    }

    /// List commits reachable from `reference`, or from every ref when `None`
    ///
    /// The pretty format defaults to `raw`.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails or its output cannot be parsed.
    pub async fn find_all(
        repo: &SharedExecutor,
        reference: Option<&str>,
        mut options: ListOptions,
    ) -> Result<Vec<Self>, GitError> {
        if options.pretty.is_none() {
            options.pretty = Some("raw".to_string());
        }
        if reference.is_none() {
            options.all = true;
        }
        let text = repo.list_revisions(&options, reference).await?;
        Ok(Self::list_from_string(repo, &text)?)
    }

    /// The commit identifier; never triggers a lookup
    #[must_use]
    pub fn id(&self) -> &ObjectId {
        &self.inner.id
    }

    /// The executor this commit resolves through
    #[must_use]
    pub fn repo(&self) -> &SharedExecutor {
        &self.inner.repo
    }

    /// Whether the entity holds a full record
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.resolved.load(Ordering::Acquire)
    }

    /// Fetch this commit's record with a single-record listing
    async fn lookup(&self) -> Result<CommitData, GitError> {
        let id = self.id();
        debug!(%id, "Looking up commit");
        let options = ListOptions::raw().max_count(1);
        let text = self
            .inner
            .repo
            .list_revisions(&options, Some(id.as_str()))
            .await?;
        let raw = parser::parse_raw_log(&text)?
            .into_iter()
            .next()
            .ok_or_else(|| GitError::CommitNotFound { id: id.clone() })?;
        Ok(CommitData::from_raw(&self.inner.repo, raw))
    }

    /// Return the record, fetching it first if this is a stub
    ///
    /// The guard is held across the lookup, so concurrent callers wait for
    /// the first one instead of issuing their own. If the lookup fails or is
    /// cancelled nothing is stored.
    async fn resolve(&self) -> Result<Arc<CommitData>, GitError> {
        let mut data = self.inner.data.lock().await;
        if let Some(ref resolved) = *data {
            return Ok(Arc::clone(resolved));
        }
        let fetched = Arc::new(self.lookup().await?);
        *data = Some(Arc::clone(&fetched));
        self.inner.resolved.store(true, Ordering::Release);
        Ok(fetched)
    }

    /// Fetch the record again and overwrite every field
    ///
    /// # Errors
    ///
    /// Returns `GitError::Load` if the lookup fails; the commit keeps its
    /// previous state.
    pub async fn load(&self) -> Result<&Self, GitError> {
        let mut data = self.inner.data.lock().await;
        match self.lookup().await {
            Ok(fetched) => {
                *data = Some(Arc::new(fetched));
                self.inner.resolved.store(true, Ordering::Release);
                Ok(self)
            }
            Err(source) => {
                warn!(id = %self.id(), error = %source, "Failed to load commit");
                Err(GitError::Load {
                    id: self.id().clone(),
                    source: Box::new(source),
                })
            }
        }
    }

    /// The full record
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn data(&self) -> Result<Arc<CommitData>, GitError> {
        self.resolve().await
    }

    /// Parent commits, mainline first
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn parents(&self) -> Result<Vec<Commit>, GitError> {
        Ok(self.resolve().await?.parents.clone())
    }

    /// Tree identifier
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn tree(&self) -> Result<ObjectId, GitError> {
        Ok(self.resolve().await?.tree.clone())
    }

    /// Author identity and time
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn author(&self) -> Result<Actor, GitError> {
        Ok(self.resolve().await?.author.clone())
    }

    /// When the change was written
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn authored_date(&self) -> Result<DateTime<Utc>, GitError> {
        Ok(self.resolve().await?.authored_date)
    }

    /// Committer identity and time
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn committer(&self) -> Result<Actor, GitError> {
        Ok(self.resolve().await?.committer.clone())
    }

    /// When the commit was recorded
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn committed_date(&self) -> Result<DateTime<Utc>, GitError> {
        Ok(self.resolve().await?.committed_date)
    }

    /// The message lines joined with newlines
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn message(&self) -> Result<String, GitError> {
        Ok(self.resolve().await?.message.join("\n"))
    }

    /// The message as individual lines
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn message_lines(&self) -> Result<Vec<String>, GitError> {
        Ok(self.resolve().await?.message.clone())
    }

    /// First message line with non-blank content, or empty
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn short_message(&self) -> Result<String, GitError> {
        Ok(parser::short_message(&self.resolve().await?.message).to_string())
    }

    /// Short form of the id, fetched from git once and cached
    ///
    /// Independent of record resolution.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails or prints nothing.
    pub async fn abbreviated_id(&self) -> Result<&str, GitError> {
        let abbrev = self
            .inner
            .id_abbrev
            .get_or_try_init(|| async {
                let options = AbbreviateOptions::default();
                let output = self
                    .inner
                    .repo
                    .abbreviate(&options, self.id().as_str())
                    .await?;
                let short: String = output.trim_end().chars().take(options.length).collect();
                if short.is_empty() {
                    return Err(GitError::Parse(ParseError::end_of_input(
                        1,
                        "abbreviated object id",
                    )));
                }
                Ok::<_, GitError>(short)
            })
            .await?;
        Ok(abbrev.as_str())
    }

    /// Diffs this commit introduced, against its mainline parent
    ///
    /// A root commit is diffed against the empty tree.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if resolution, git, or diff parsing fails.
    pub async fn diffs(&self) -> Result<Vec<FileDiff>, GitError> {
        let parents = self.parents().await?;
        let from = parents
            .first()
            .map_or_else(ObjectId::empty_tree, |parent| parent.id().clone());
        let request = DiffRequest::new(from.as_str()).to(self.id().as_str());
        diff::diff(self.repo().as_ref(), &request).await
    }

    /// A serializable snapshot of the resolved record
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit is a stub and the lookup fails.
    pub async fn to_record(&self) -> Result<CommitRecord, GitError> {
        let data = self.resolve().await?;
        Ok(CommitRecord {
            id: self.id().clone(),
            parents: data.parents.iter().map(|p| p.id().clone()).collect(),
            tree: data.tree.clone(),
            author: data.author.clone(),
            authored_date: data.authored_date,
            committer: data.committer.clone(),
            committed_date: data.committed_date,
            short_message: parser::short_message(&data.message).to_string(),
            message: data.message.clone(),
        })
    }
}

impl fmt::Debug for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit")
            .field("id", self.id())
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Commit {}

/// Serializable snapshot of a resolved commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit SHA (40 hex characters)
    pub id: ObjectId,
    /// Parent commit SHAs, mainline first
    pub parents: Vec<ObjectId>,
    /// Tree SHA
    pub tree: ObjectId,
    /// Author identity and time
    pub author: Actor,
    /// When the change was written
    pub authored_date: DateTime<Utc>,
    /// Committer identity and time
    pub committer: Actor,
    /// When the commit was recorded
    pub committed_date: DateTime<Utc>,
    /// Message lines
    pub message: Vec<String>,
    /// First non-blank message line
    pub short_message: String,
}

impl CommitRecord {
    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
