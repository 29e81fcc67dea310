//! Masking module - Consistent, non-reversible redaction of Secret values.

mod secret;


pub use secret::*;
