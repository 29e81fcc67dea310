//! Standalone filter-and-mask surface.
//!
//! This is the library behind the `parse` CLI subcommand: read a manifest
//! stream, drop filtered-out resources, mask Secret values, and render the
//! survivors back to YAML, keyed by identity.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::filter;
use crate::masking::{MaskError, Masker};
use crate::parser::{parse_yaml, ParseError};
use crate::resource::{Resource, ResourceKey};

/// Options controls parsing, filtering, and masking behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub filter: filter::Options,
    /// Disable masking of Secret data values (default: mask).
    pub disable_masking_secrets: bool,
}

/// ParserError represents a failure while processing a manifest stream.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mask(#[from] MaskError),
}

/// ManifestSet is a collection of processed resources keyed by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestSet {
    entries: BTreeMap<ResourceKey, Resource>,
}

impl ManifestSet {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&Resource> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &Resource)> {
        self.entries.iter()
    }

    pub fn resource_keys(&self) -> Vec<ResourceKey> {
        self.entries.keys().cloned().collect()
    }

    /// Renders the set as a YAML stream: a comment header listing the
    /// contained resources, then the documents joined by `---` separators,
    /// in key order.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        if self.entries.is_empty() {
            return Ok(String::new());
        }

        let mut out = format!("# Resources ({})\n", self.entries.len());
        for key in self.entries.keys() {
            if key.namespace.is_empty() {
                out.push_str(&format!("# {}/{} {}\n", key.group, key.kind, key.name));
            } else {
                out.push_str(&format!(
                    "# {}/{} {}/{}\n",
                    key.group, key.kind, key.namespace, key.name
                ));
            }
        }
        out.push('\n');

        let mut parts = Vec::with_capacity(self.entries.len());
        for obj in self.entries.values() {
            parts.push(obj.to_yaml()?.trim_end().to_string());
        }
        out.push_str(&parts.join("\n---\n"));
        out.push('\n');
        Ok(out)
    }
}

/// Processes a YAML string: parse, filter, and mask.
///
/// A fresh [`Masker`] is used per call, so repeated invocations do not share
/// value mappings.
pub fn yaml(input: &str, opts: &Options) -> Result<ManifestSet, ParserError> {
    let objects = parse_yaml(input)?;
    let filtered = filter::resources(&objects, &opts.filter);

    let masker = Masker::new();
    let mut entries = BTreeMap::new();
    for obj in filtered {
        let obj = if opts.disable_masking_secrets {
            obj.clone()
        } else {
            masker.mask_secret_data(obj)?
        };
        entries.insert(obj.resource_key(), obj);
    }

    Ok(ManifestSet { entries })
}
