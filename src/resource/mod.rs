//! Resource module - Manifest documents and their identity keys.

mod key;
mod resource;

pub use key::*;
pub use resource::*;
