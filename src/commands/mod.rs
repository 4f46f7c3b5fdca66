//! CLI command implementations.
//!
//! osort has a single command: sort (or check) the given paths.

pub mod sort;

pub use sort::{run, sort_file, sort_files, RunOptions};
