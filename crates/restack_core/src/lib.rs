//! # restack
//!
//! Wide-to-long reshaping of repeated-measures trial logs.
//!
//! Each subject session of the hierarchy-learning tasks leaves a log with
//! one JSON record per line. This crate turns a directory of such logs into
//! an analysis-ready long table:
//!
//! 1. [`flatten()`] each log into one wide row (`0.rt`, `0.correct`, ...)
//! 2. [`fill_missing_columns`] to align all rows on one column union
//! 3. [`cut_and_stack`] to fold repeated column blocks into rows
//! 4. write CSV, optionally with a per-column mean / SEM [`summarize`]
//!
//! [`pipeline::run`] strings these together from a [`RestackConfig`].

pub mod cell;
pub mod config;
pub mod error;
pub mod fill;
pub mod flatten;
pub mod naming;
pub mod pipeline;
pub mod reshape;
pub mod stats;
pub mod table;
pub mod trials;

pub use cell::Cell;
pub use config::RestackConfig;
pub use error::ReshapeError;
pub use fill::fill_missing_columns;
pub use flatten::flatten;
pub use naming::{longest_common_substring, CommonSubstring, MergeNaming, PatternNaming};
pub use pipeline::PipelineReport;
pub use reshape::{cut_and_stack, CutSpec};
pub use stats::summarize;
pub use table::Table;
