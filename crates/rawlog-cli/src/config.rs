// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the rawlog command line
//!
//! Global options select the repository, the git program and its time limit;
//! each may also come from a `RAWLOG_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rawlog_git::GitCliConfig;
use rawlog_git::exec::DEFAULT_TIMEOUT;

/// Rawlog - commit history from the raw git log
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "rawlog")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to `log` over every ref)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Repository to read
    ///
    /// Passed to git as `-C <path>`. Defaults to the current directory.
    #[arg(short = 'C', long, env = "RAWLOG_REPO")]
    pub repo: Option<PathBuf>,

    /// The git program to run
    #[arg(long, env = "RAWLOG_GIT")]
    pub git: Option<PathBuf>,

    /// Seconds to wait for a single git invocation
    #[arg(long, env = "RAWLOG_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs every git invocation and commit resolution to stderr.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print commits as a JSON array, newest first
    Log {
        /// Start from this ref (every ref when omitted)
        reference: Option<String>,

        /// Stop after this many commits
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// Print one commit and its abbreviated id as JSON
    Show {
        /// Full 40-character commit id
        id: String,

        /// Include the changes against the first parent
        #[arg(long)]
        diff: bool,
    },

    /// Print the file changes between two revisions as JSON
    Diff {
        /// Old revision
        from: String,

        /// New revision (the working tree when omitted)
        to: Option<String>,

        /// Restrict the diff to these paths
        #[arg(long = "path")]
        paths: Vec<String>,
    },

    /// Print the number of reachable revisions
    Count {
        /// Count from this ref (every ref when omitted)
        reference: Option<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Log {
            reference: None,
            max_count: None,
        }
    }
}

impl Config {
    /// Get the per-invocation time limit, using 30 seconds if not specified
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout.map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Build the executor configuration from the global options
    #[must_use]
    pub fn git_config(&self) -> GitCliConfig {
        let mut config = GitCliConfig::default().timeout(self.timeout());
        if let Some(ref repo) = self.repo {
            config = config.repo(repo);
        }
        if let Some(ref git) = self.git {
            config = config.program(git);
        }
        config
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository path is specified but doesn't exist
    /// - The repository path is not a directory
    /// - The timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref repo) = self.repo {
            if !repo.exists() {
                return Err(ConfigError::RepoNotFound(repo.clone()));
            }
            if !repo.is_dir() {
                return Err(ConfigError::RepoNotDirectory(repo.clone()));
            }
        }

        if self.timeout == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoNotDirectory(PathBuf),

    /// A zero timeout would fail every call
    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.command.is_none());
        assert!(config.repo.is_none());
        assert!(config.git.is_none());
        assert!(config.timeout.is_none());
        assert!(!config.verbose);
        assert!(!config.quiet);
    }

    #[test]
    fn test_timeout_default() {
        assert_eq!(Config::default().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_custom() {
        let config = Config {
            timeout: Some(5),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_git_config_default() {
        let git = Config::default().git_config();
        assert_eq!(git.program, PathBuf::from("git"));
        assert!(git.repo_path.is_none());
        assert_eq!(git.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_git_config_custom() {
        let config = Config {
            repo: Some(PathBuf::from("/tmp")),
            git: Some(PathBuf::from("/usr/local/bin/git")),
            timeout: Some(3),
            ..Default::default()
        };
        let git = config.git_config();
        assert_eq!(git.program, PathBuf::from("/usr/local/bin/git"));
        assert_eq!(git.repo_path, Some(PathBuf::from("/tmp")));
        assert_eq!(git.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_default_command_is_log() {
        assert_eq!(
            Command::default(),
            Command::Log {
                reference: None,
                max_count: None
            }
        );
    }

    #[test]
    fn test_log_level_default() {
        let config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_nonexistent_repo() {
        let config = Config {
            repo: Some(PathBuf::from("/nonexistent/path/12345")),
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::RepoNotFound(_))));
    }

    #[test]
    fn test_validate_repo_is_file() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let config = Config {
            repo: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::RepoNotDirectory(_))));
    }

    #[test]
    fn test_validate_valid_repo() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config {
            repo: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = Config {
            timeout: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
