// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository handle
//!
//! [`GitRepo`] bundles an executor with the history operations so callers
//! do not have to thread `Arc<dyn GitExecutor>` through every call.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::commit::{Commit, SharedExecutor};
use crate::count;
use crate::diff::{self, DiffRequest, FileDiff};
use crate::error::GitError;
use crate::exec::{GitCli, GitCliConfig, GitExecutor, ListOptions};
use crate::object_id::ObjectId;

/// A git repository accessed through its textual log
#[derive(Clone)]
pub struct GitRepo {
    executor: SharedExecutor,
}

impl GitRepo {
    /// Use the `git` program against the repository at `path`
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::with_config(GitCliConfig::default().repo(path.as_ref()))
    }

    /// Use the `git` program with a full configuration
    #[must_use]
    pub fn with_config(config: GitCliConfig) -> Self {
        Self::from_executor(Arc::new(GitCli::new(config)))
    }

    /// Use any executor, such as a mock
    #[must_use]
    pub fn from_executor(executor: Arc<dyn GitExecutor>) -> Self {
        Self { executor }
    }

    /// The underlying executor
    #[must_use]
    pub fn executor(&self) -> &SharedExecutor {
        &self.executor
    }

    /// List commits reachable from `reference`, or from every ref when `None`
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails or its output cannot be parsed.
    pub async fn commits(
        &self,
        reference: Option<&str>,
        options: ListOptions,
    ) -> Result<Vec<Commit>, GitError> {
        let commits = Commit::find_all(&self.executor, reference, options).await?;
        info!(reference = ?reference, count = commits.len(), "Listed commits");
        Ok(commits)
    }

    /// A stub for `id`; nothing is fetched until a field is read
    #[must_use]
    pub fn commit(&self, id: ObjectId) -> Commit {
        Commit::new(Arc::clone(&self.executor), id)
    }

    /// A fully loaded commit for `id`
    ///
    /// # Errors
    ///
    /// Returns `GitError::Load` if the commit cannot be fetched.
    pub async fn find(&self, id: ObjectId) -> Result<Commit, GitError> {
        let commit = self.commit(id);
        commit.load().await?;
        Ok(commit)
    }

    /// Count revisions reachable from `reference`, or from every ref
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails.
    pub async fn count(&self, reference: Option<&str>) -> Result<usize, GitError> {
        count::count(self.executor.as_ref(), reference).await
    }

    /// Diff two revisions
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails or its output cannot be parsed.
    pub async fn diff(&self, request: &DiffRequest) -> Result<Vec<FileDiff>, GitError> {
        diff::diff(self.executor.as_ref(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExecutor;
    use similar_asserts::assert_eq;

    const ID_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const TREE: &str = "1111111111111111111111111111111111111111";

    fn single_block() -> String {
        format!(
            "commit {ID_A}\ntree {TREE}\n\
             author A <a@example.com> 1000000000 +0000\n\
             committer A <a@example.com> 1000000000 +0000\n\n    Initial commit\n"
        )
    }

    #[tokio::test]
    async fn test_commit_is_stub() {
        let mock = Arc::new(MockExecutor::new());
        let repo = GitRepo::from_executor(mock.clone());
        let commit = repo.commit(ID_A.parse().unwrap());
        assert!(!commit.is_resolved());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_find_loads() {
        let mock = Arc::new(MockExecutor::new().with_raw_listing(Some(ID_A), single_block()));
        let repo = GitRepo::from_executor(mock.clone());
        let commit = repo.find(ID_A.parse().unwrap()).await.expect("found");
        assert!(commit.is_resolved());
        assert_eq!(commit.short_message().await.unwrap(), "Initial commit");
        assert_eq!(mock.list_revisions_count(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_is_load_error() {
        let repo = GitRepo::from_executor(Arc::new(MockExecutor::new()));
        let err = repo.find(ID_A.parse().unwrap()).await.unwrap_err();
        assert!(matches!(err, GitError::Load { .. }));
    }

    #[tokio::test]
    async fn test_commits_from_reference() {
        let mock = Arc::new(MockExecutor::new().with_raw_listing(Some("main"), single_block()));
        let repo = GitRepo::from_executor(mock);
        let commits = repo
            .commits(Some("main"), ListOptions::raw().max_count(10))
            .await
            .expect("listed");
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].id().as_str(), ID_A);
    }

    #[tokio::test]
    async fn test_count_delegates() {
        let mock = Arc::new(MockExecutor::new().with_id_listing(Some("HEAD"), format!("{ID_A}\n")));
        let repo = GitRepo::from_executor(mock);
        assert_eq!(repo.count(Some("HEAD")).await.unwrap(), 1);
    }
}
