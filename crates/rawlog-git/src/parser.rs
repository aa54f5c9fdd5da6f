// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Raw log parsing
//!
//! Turns the output of `git rev-list --pretty=raw` into [`RawCommit`]
//! records. Each commit block has the shape
//!
//! ```text
//! commit <id>
//! tree <id>
//! parent <id>            (zero or more)
//! author <actor>
//! committer <actor>
//! encoding <value>       (optional, discarded)
//!
//!     message line       (indented by four spaces, zero or more)
//!
//! ```
//!
//! The parser is a single forward pass over the lines driven by [`State`];
//! it never backtracks and never returns a partially populated record.

use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use tracing::trace;

use crate::actor::Actor;
use crate::error::ParseError;
use crate::object_id::ObjectId;

/// Prefix git puts in front of every message line in raw format
const MESSAGE_INDENT: &str = "    ";

/// One commit block as written in the raw log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// Commit identifier
    pub id: ObjectId,
    /// Tree the commit points at
    pub tree: ObjectId,
    /// Parent identifiers, mainline first
    pub parents: Vec<ObjectId>,
    /// Who wrote the change
    pub author: Actor,
    /// Who recorded the commit
    pub committer: Actor,
    /// Message lines with the indentation stripped
    pub message: Vec<String>,
}

impl RawCommit {
    /// First message line with non-blank content
    #[must_use]
    pub fn short_message(&self) -> &str {
        short_message(&self.message)
    }
}

/// First line with non-blank content, or `""`
#[must_use]
pub fn short_message(lines: &[String]) -> &str {
    lines
        .iter()
        .find(|line| !line.trim().is_empty())
        .map_or("", String::as_str)
}

/// Parse a complete raw log into commit records, in listing order
///
/// # Errors
///
/// Returns `ParseError` if a mandatory line is missing or malformed, or the
/// input ends in the middle of a commit block.
pub fn parse_raw_log(text: &str) -> Result<Vec<RawCommit>, ParseError> {
    RawLogParser::new(text).run()
}

/// Parser states, one per grammar position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectCommit,
    ExpectTree,
    Parents,
    ExpectAuthor,
    ExpectCommitter,
    OptionalEncoding,
    ExpectBlank,
    MessageBody,
    TrailingBlank,
}

/// Fields collected for the block under construction
#[derive(Default)]
struct PendingCommit {
    id: Option<ObjectId>,
    tree: Option<ObjectId>,
    parents: Vec<ObjectId>,
    author: Option<Actor>,
    committer: Option<Actor>,
    message: Vec<String>,
}

impl PendingCommit {
    fn finish(self, line: usize) -> Result<RawCommit, ParseError> {
        let missing = |what: &str| ParseError::end_of_input(line, what);
        Ok(RawCommit {
            id: self.id.ok_or_else(|| missing("`commit` line"))?,
            tree: self.tree.ok_or_else(|| missing("`tree` line"))?,
            parents: self.parents,
            author: self.author.ok_or_else(|| missing("`author` line"))?,
            committer: self.committer.ok_or_else(|| missing("`committer` line"))?,
            message: self.message,
        })
    }
}

struct RawLogParser<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
    /// Number of the next line to be read (1-based)
    line_no: usize,
}

impl<'a> RawLogParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
            line_no: 1,
        }
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.lines.peek().map(|&(_, line)| line)
    }

    fn advance(&mut self) {
        if let Some((index, _)) = self.lines.next() {
            self.line_no = index + 2;
        }
    }

    /// Consume a mandatory `<keyword> <value>` line and return the value
    fn header(&mut self, keyword: &str) -> Result<(&'a str, usize), ParseError> {
        let line = self.line_no;
        let expected = format!("`{keyword}` line");
        let text = self
            .peek()
            .ok_or_else(|| ParseError::end_of_input(line, expected.as_str()))?;
        let value = text
            .strip_prefix(keyword)
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or_else(|| ParseError::unexpected(line, expected.as_str(), text))?;
        self.advance();
        Ok((value, line))
    }

    fn header_id(&mut self, keyword: &str) -> Result<ObjectId, ParseError> {
        let (value, line) = self.header(keyword)?;
        ObjectId::parse_at(value, line)
    }

    fn header_actor(&mut self, keyword: &str) -> Result<Actor, ParseError> {
        let (value, line) = self.header(keyword)?;
        Actor::parse(value, line)
    }

    fn run(mut self) -> Result<Vec<RawCommit>, ParseError> {
        let mut commits = Vec::new();
        let mut pending = PendingCommit::default();
        let mut state = State::ExpectCommit;

        loop {
            state = match state {
                State::ExpectCommit => {
                    if self.peek().is_none() {
                        break;
                    }
                    pending.id = Some(self.header_id("commit")?);
                    State::ExpectTree
                }
                State::ExpectTree => {
                    pending.tree = Some(self.header_id("tree")?);
                    State::Parents
                }
                State::Parents => match self.peek() {
                    Some(text) if text.starts_with("parent ") => {
                        pending.parents.push(self.header_id("parent")?);
                        State::Parents
                    }
                    _ => State::ExpectAuthor,
                },
                State::ExpectAuthor => {
                    pending.author = Some(self.header_actor("author")?);
                    State::ExpectCommitter
                }
                State::ExpectCommitter => {
                    pending.committer = Some(self.header_actor("committer")?);
                    State::OptionalEncoding
                }
                State::OptionalEncoding => {
                    if self.peek().is_some_and(|text| text.starts_with("encoding ")) {
                        self.advance();
                    }
                    State::ExpectBlank
                }
                State::ExpectBlank => match self.peek() {
                    Some("") => {
                        self.advance();
                        State::MessageBody
                    }
                    Some(text) => {
                        return Err(ParseError::unexpected(self.line_no, "blank line", text));
                    }
                    None => return Err(ParseError::end_of_input(self.line_no, "blank line")),
                },
                State::MessageBody => {
                    match self.peek().and_then(|text| text.strip_prefix(MESSAGE_INDENT)) {
                        Some(body) => {
                            pending.message.push(body.to_string());
                            self.advance();
                            State::MessageBody
                        }
                        None => {
                            let commit = std::mem::take(&mut pending).finish(self.line_no)?;
                            trace!(id = %commit.id, parents = commit.parents.len(), "Parsed commit");
                            commits.push(commit);
                            State::TrailingBlank
                        }
                    }
                }
                State::TrailingBlank => match self.peek() {
                    Some("") => {
                        self.advance();
                        State::TrailingBlank
                    }
                    _ => State::ExpectCommit,
                },
            };
        }

        Ok(commits)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn sha_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[0-9a-f]{40}").expect("valid regex")
    }

    /// Message lines as they appear after stripping the indentation
    fn message_strategy() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[ -~]{0,30}", 0..5)
    }

    fn render(id: &str, tree: &str, parents: &[String], message: &[String]) -> String {
        let mut text = format!("commit {id}\ntree {tree}\n");
        for parent in parents {
            text.push_str(&format!("parent {parent}\n"));
        }
        text.push_str("author A U Thor <author@example.com> 1000000000 +0000\n");
        text.push_str("committer C O Mitter <committer@example.com> 1000000000 +0000\n\n");
        for line in message {
            text.push_str(&format!("    {line}\n"));
        }
        text.push('\n');
        text
    }

    proptest! {
        /// Property: N rendered blocks parse back to N records with the same fields
        #[test]
        fn prop_blocks_parse_in_order(
            blocks in proptest::collection::vec(
                (sha_strategy(), sha_strategy(), proptest::collection::vec(sha_strategy(), 0..4), message_strategy()),
                0..6,
            )
        ) {
            let text: String = blocks
                .iter()
                .map(|(id, tree, parents, message)| render(id, tree, parents, message))
                .collect();
            let commits = parse_raw_log(&text).expect("valid log");

            prop_assert_eq!(commits.len(), blocks.len());
            for (commit, (id, tree, parents, message)) in commits.iter().zip(&blocks) {
                prop_assert_eq!(commit.id.as_str(), id.as_str());
                prop_assert_eq!(commit.tree.as_str(), tree.as_str());
                prop_assert_eq!(commit.parents.len(), parents.len());
                for (parsed, expected) in commit.parents.iter().zip(parents) {
                    prop_assert_eq!(parsed.as_str(), expected.as_str());
                }
                prop_assert_eq!(&commit.message, message);
            }
        }

        /// Property: short_message is the first non-blank line or empty
        #[test]
        fn prop_short_message_is_first_non_blank(message in message_strategy()) {
            let expected = message
                .iter()
                .find(|l| !l.trim().is_empty())
                .cloned()
                .unwrap_or_default();
            prop_assert_eq!(short_message(&message), expected.as_str());
        }

        /// Property: the parser never panics on arbitrary input
        #[test]
        fn prop_parser_never_panics(text in "\\PC{0,200}") {
            let _ = parse_raw_log(&text);
        }
    }
}
