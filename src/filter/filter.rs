//! Selector filtering for manifest collections.

use std::collections::BTreeMap;

use crate::resource::Resource;

/// Options controls which resources survive filtering.
///
/// The three criteria combine with logical AND. An empty criterion matches
/// everything, so the default Options is the identity filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Kinds to drop entirely.
    pub exclude_kinds: Vec<String>,
    /// Required label key/value pairs (exact match only).
    pub label_selector: BTreeMap<String, String>,
    /// Required annotation key/value pairs (exact match only).
    pub annotation_selector: BTreeMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }
}

/// Returns the resources matching every criterion in `opts`.
///
/// Input documents are never mutated; the result borrows from the input
/// slice in its original order.
pub fn resources<'a>(objs: &'a [Resource], opts: &Options) -> Vec<&'a Resource> {
    objs.iter().filter(|obj| matches(obj, opts)).collect()
}

/// Returns true if the resource satisfies every supplied criterion.
pub fn matches(obj: &Resource, opts: &Options) -> bool {
    if opts.exclude_kinds.iter().any(|kind| kind == obj.kind()) {
        return false;
    }

    for (key, value) in &opts.label_selector {
        if obj.label(key) != Some(value.as_str()) {
            return false;
        }
    }

    for (key, value) in &opts.annotation_selector {
        if obj.annotation(key) != Some(value.as_str()) {
            return false;
        }
    }

    true
}
