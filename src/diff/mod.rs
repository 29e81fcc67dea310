//! Diff module - Change classification, diff rendering, and result queries.

mod diff;
mod types;

#[cfg(test)]
mod diff_test;


pub use diff::*;
pub use types::*;
