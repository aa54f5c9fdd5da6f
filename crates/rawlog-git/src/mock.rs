// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Mock executor for unit testing.
//!
//! Records every call and answers from canned output keyed by the request,
//! so tests can count how many lookups a piece of code performed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecutionError;
use crate::exec::{AbbreviateOptions, DiffOptions, GitExecutor, ListOptions};

/// A recorded call to the mock executor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MockCall {
    ListRevisions {
        options: ListOptions,
        reference: Option<String>,
    },
    Diff {
        options: DiffOptions,
        a: String,
        b: Option<String>,
        paths: Vec<String>,
    },
    Abbreviate {
        options: AbbreviateOptions,
        id: String,
    },
}

/// Key for canned `list_revisions` output: reference and pretty format.
type ListKey = (Option<String>, Option<String>);

#[derive(Default)]
struct Responses {
    listings: HashMap<ListKey, String>,
    diffs: HashMap<(String, Option<String>), String>,
    abbreviations: HashMap<String, String>,
    failure: Option<String>,
    delay: Option<Duration>,
}

/// Mock implementation of `GitExecutor` for testing.
///
/// Requests without canned output fail with `CommandFailed`, the way git
/// reports an unknown revision.
#[derive(Default)]
pub struct MockExecutor {
    responses: Mutex<Responses>,
    calls: Mutex<Vec<MockCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl MockExecutor {
    /// Create a mock with no canned output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `list_revisions(pretty = raw, reference)` with `text`.
    pub fn with_raw_listing(self, reference: Option<&str>, text: impl Into<String>) -> Self {
        lock(&self.responses).listings.insert(
            (reference.map(str::to_string), Some("raw".to_string())),
            text.into(),
        );
        self
    }

    /// Answer `list_revisions` without a pretty format (bare ids) with `text`.
    pub fn with_id_listing(self, reference: Option<&str>, text: impl Into<String>) -> Self {
        lock(&self.responses)
            .listings
            .insert((reference.map(str::to_string), None), text.into());
        self
    }

    /// Answer `diff(a, b)` with `text`, whatever paths are given.
    pub fn with_diff(self, a: &str, b: Option<&str>, text: impl Into<String>) -> Self {
        lock(&self.responses)
            .diffs
            .insert((a.to_string(), b.map(str::to_string)), text.into());
        self
    }

    /// Answer `abbreviate(id)` with `text`.
    pub fn with_abbreviation(self, id: &str, text: impl Into<String>) -> Self {
        lock(&self.responses)
            .abbreviations
            .insert(id.to_string(), text.into());
        self
    }

    /// Delay every response, to widen windows for concurrency tests.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(Some(delay));
        self
    }

    /// Change the response delay on a shared executor.
    pub fn set_delay(&self, delay: Option<Duration>) {
        lock(&self.responses).delay = delay;
    }

    /// Make every call fail with `stderr` (or stop failing with `None`).
    pub fn set_failure(&self, stderr: Option<&str>) {
        lock(&self.responses).failure = stderr.map(str::to_string);
    }

    /// Return all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Return the number of recorded calls.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Return the number of `list_revisions` calls.
    pub fn list_revisions_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, MockCall::ListRevisions { .. }))
            .count()
    }

    /// Return the number of `abbreviate` calls.
    pub fn abbreviate_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, MockCall::Abbreviate { .. }))
            .count()
    }

    fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
    }

    /// Apply the configured delay, then the configured failure.
    async fn respond(
        &self,
        command: String,
        lookup: impl FnOnce(&Responses) -> Option<String>,
    ) -> Result<String, ExecutionError> {
        let delay = lock(&self.responses).delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let responses = lock(&self.responses);
        if let Some(ref stderr) = responses.failure {
            return Err(ExecutionError::CommandFailed {
                command,
                status: 128,
                stderr: stderr.clone(),
            });
        }
        lookup(&*responses).ok_or_else(|| ExecutionError::CommandFailed {
            command,
            status: 128,
            stderr: "fatal: bad revision".to_string(),
        })
    }
}

#[async_trait]
impl GitExecutor for MockExecutor {
    async fn list_revisions(
        &self,
        options: &ListOptions,
        reference: Option<&str>,
    ) -> Result<String, ExecutionError> {
        self.record(MockCall::ListRevisions {
            options: options.clone(),
            reference: reference.map(str::to_string),
        });
        let key = (reference.map(str::to_string), options.pretty.clone());
        self.respond(format!("rev-list {reference:?}"), |r| {
            r.listings.get(&key).cloned()
        })
        .await
    }

    async fn diff(
        &self,
        options: &DiffOptions,
        a: &str,
        b: Option<&str>,
        paths: &[String],
    ) -> Result<String, ExecutionError> {
        self.record(MockCall::Diff {
            options: *options,
            a: a.to_string(),
            b: b.map(str::to_string),
            paths: paths.to_vec(),
        });
        let key = (a.to_string(), b.map(str::to_string));
        self.respond(format!("diff {a} {b:?}"), |r| r.diffs.get(&key).cloned())
            .await
    }

    async fn abbreviate(
        &self,
        options: &AbbreviateOptions,
        id: &str,
    ) -> Result<String, ExecutionError> {
        self.record(MockCall::Abbreviate {
            options: *options,
            id: id.to_string(),
        });
        self.respond(format!("rev-parse {id}"), |r| {
            r.abbreviations.get(id).cloned()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockExecutor::new().with_id_listing(Some("main"), "a\nb\n");
        let text = mock
            .list_revisions(&ListOptions::default(), Some("main"))
            .await
            .expect("canned listing");
        assert_eq!(text, "a\nb\n");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(
            mock.calls()[0],
            MockCall::ListRevisions {
                options: ListOptions::default(),
                reference: Some("main".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_request_fails() {
        let mock = MockExecutor::new();
        let err = mock.abbreviate(&AbbreviateOptions::default(), "abc").await;
        assert!(matches!(err, Err(ExecutionError::CommandFailed { .. })));
        assert_eq!(mock.abbreviate_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mock = MockExecutor::new().with_abbreviation("abc", "abc1234\n");
        mock.set_failure(Some("fatal: not a git repository"));
        let err = mock
            .abbreviate(&AbbreviateOptions::default(), "abc")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a git repository"));

        mock.set_failure(None);
        assert!(mock.abbreviate(&AbbreviateOptions::default(), "abc").await.is_ok());
    }
}
