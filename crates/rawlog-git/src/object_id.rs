// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Object identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Identifier of the empty tree, used as the left side when diffing a root commit
pub const EMPTY_TREE_ID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Length of a full object identifier in hex characters
pub const OBJECT_ID_LEN: usize = 40;

/// A full, 40-character hex identifier naming a commit, tree or blob
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Validate that a string is a 40-character hex identifier
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        id.len() == OBJECT_ID_LEN && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Parse an identifier, reporting `line` on failure
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if `id` is not 40 hex characters.
    pub fn parse_at(id: &str, line: usize) -> Result<Self, ParseError> {
        if Self::is_valid(id) {
            Ok(Self(id.to_ascii_lowercase()))
        } else {
            Err(ParseError::unexpected(
                line,
                "40-character hex object id",
                id,
            ))
        }
    }

    /// The identifier of the empty tree
    #[must_use]
    pub fn empty_tree() -> Self {
        Self(EMPTY_TREE_ID.to_string())
    }

    /// Borrow the full identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the conventional 7-character short form without asking git
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..7]
    }
}

impl FromStr for ObjectId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_at(s, 1)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
