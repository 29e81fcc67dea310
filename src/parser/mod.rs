//! Parser module - Multi-document YAML/JSON parsing and the standalone
//! filter-and-mask surface.

mod api;
mod parser;

pub use api::*;
pub use parser::*;
