//! Core library for the pyplag similarity checker.
//!
//! Python sources are parsed and reduced to a canonical structural string,
//! which makes the comparison insensitive to formatting and comments. Pairs
//! of canonical strings are then scored by normalized edit distance.

#![allow(
    clippy::type_complexity,
    clippy::similar_names,
    clippy::format_push_string,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module turning Python source into its canonical form.
/// This wraps the parser and the structural serializer.
pub mod canonical;

/// Module computing edit distances and similarity scores.
pub mod similarity;

/// Module reading the pairs manifest.
pub mod manifest;

/// Module running a manifest's comparisons in parallel.
pub mod batch;

/// Module for loading configuration.
pub mod config;

/// Module containing utility functions.
/// This includes helper functions used across the application.
pub mod utils;

/// Module defining the entry point logic shared by both binaries.
pub mod entry_point;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module for rich CLI output formatting with colored text and progress bars.
pub mod output;

/// Module defining the command-line interface arguments and structs.
pub mod cli;
