//! Filter module - Narrowing manifest collections before comparison.

mod filter;

pub use filter::*;
