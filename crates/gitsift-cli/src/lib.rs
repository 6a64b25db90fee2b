// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitsift-cli library
//!
//! This module exports the configuration and subcommand runner of the
//! `gitsift` binary for use in integration tests.

pub mod commands;
pub mod config;
