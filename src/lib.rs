//! # K8s Manifest Diff
//!
//! A Rust library for comparing Kubernetes manifests.
//!
//! Given two collections of parsed manifests (base and head), this library
//! matches resources by identity, classifies each one as created, deleted,
//! changed, or unchanged, and renders a unified diff per resource. Secret
//! data values are masked consistently and non-reversibly before rendering.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`resource`] - Manifest documents and their identity keys
//! - [`filter`] - Narrowing collections by kind, label, and annotation
//! - [`masking`] - Consistent masking of Secret data values
//! - [`diff`] - Change classification, diff rendering, and result queries
//! - [`parser`] - Multi-document YAML/JSON parsing

pub mod diff;
pub mod filter;
pub mod masking;
pub mod parser;
pub mod resource;
pub mod value;

pub use diff::{ChangeType, DiffError, DiffResult, Options, Results, Statistics};
pub use masking::{MaskError, Masker};
pub use parser::{parse_yaml, ParseError};
pub use resource::{Resource, ResourceKey};
pub use value::Value;
