// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Revision counting

use tracing::debug;

use crate::error::GitError;
use crate::exec::{GitExecutor, ListOptions};

/// Count revisions reachable from `reference`, or from every ref when `None`
///
/// # Errors
///
/// Returns `GitError` if git fails.
pub async fn count(repo: &dyn GitExecutor, reference: Option<&str>) -> Result<usize, GitError> {
    let options = ListOptions {
        all: reference.is_none(),
        ..ListOptions::default()
    };
    let text = repo.list_revisions(&options, reference).await?;
    let total = count_revisions(&text);
    debug!(reference = ?reference, total, "Counted revisions");
    Ok(total)
}

/// Number of identifier lines in a bare revision listing
#[must_use]
pub fn count_revisions(listing: &str) -> usize {
    listing.lines().filter(|line| !line.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCall, MockExecutor};

    const LISTING: &str = "\
aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa
bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb
cccccccccccccccccccccccccccccccccccccccc
";

    #[test]
    fn test_count_identifier_lines() {
        assert_eq!(count_revisions(LISTING), 3);
    }

    #[test]
    fn test_count_empty_listing() {
        assert_eq!(count_revisions(""), 0);
        assert_eq!(count_revisions("\n"), 0);
    }

    #[test]
    fn test_count_without_trailing_newline() {
        assert_eq!(count_revisions(LISTING.trim_end()), 3);
    }

    #[tokio::test]
    async fn test_count_reference() {
        let mock = MockExecutor::new().with_id_listing(Some("main"), LISTING);
        assert_eq!(count(&mock, Some("main")).await.unwrap(), 3);
        assert_eq!(
            mock.calls(),
            vec![MockCall::ListRevisions {
                options: ListOptions::default(),
                reference: Some("main".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_count_all_refs() {
        let mock = MockExecutor::new().with_id_listing(None, LISTING);
        assert_eq!(count(&mock, None).await.unwrap(), 3);
        assert_eq!(
            mock.calls(),
            vec![MockCall::ListRevisions {
                options: ListOptions::default().all(),
                reference: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_count_propagates_failure() {
        let mock = MockExecutor::new();
        assert!(matches!(
            count(&mock, Some("missing")).await,
            Err(GitError::Execution(_))
        ));
    }
}
