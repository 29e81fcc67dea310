//! Value module - In-memory representation of YAML/JSON documents.
//!
//! This module provides the generic tree type manifests are parsed into.

mod value;

pub use value::*;
