// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! rawlog-cli library
//!
//! This module exports the command-line configuration and command runners
//! for use in integration tests and by the `rawlog` binary.

pub mod commands;
pub mod config;
