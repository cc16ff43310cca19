//! MongoDB build acquisition library.
//!
//! This crate resolves a requested MongoDB server build to its published
//! archive, downloads it, and unpacks it with original file modes and
//! timestamps. It is used by the `mongodb-repro` CLI binary and can be
//! consumed programmatically for testing or custom reproduction workflows.
//!
//! # Modules
//!
//! - [`acquire`] - Download-and-unpack pipeline with the already-present rule
//! - [`artefact`] - Build descriptors, archive naming, fetching, and extraction
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Settings loaded from TOML and command-line overrides
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Top-level error type for the CLI
//! - [`get`] - Handlers for the `get` and `url` commands
//! - [`list`] - Handler for the `list` command
//! - [`list_output`] - Output formatting for build listings
//! - [`output`] - Progress and report formatting
//! - [`scanner`] - Inventory scanner for unpacked builds

pub mod acquire;
pub mod artefact;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod get;
pub mod list;
pub mod list_output;
pub mod output;
pub mod scanner;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
