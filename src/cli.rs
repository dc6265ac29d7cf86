//! Command line interface for Pilum.
//!
//! `pilum index` loads a JSONL file into an index directory and
//! `pilum search` runs term and range clauses against it, optionally paging
//! through the results interactively.

pub mod args;
pub mod commands;
pub mod output;

pub use args::*;
pub use commands::*;
pub use output::*;
