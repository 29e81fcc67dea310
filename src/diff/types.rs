//! Result types and the query surface over a comparison.

use std::collections::BTreeMap;
use std::fmt;

use crate::filter;
use crate::resource::ResourceKey;

/// ChangeType represents the kind of change observed for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// The resource exists in both base and head with no changes.
    Unchanged,
    /// The resource exists in both base and head with changes.
    Changed,
    /// The resource exists only in head (newly created).
    Created,
    /// The resource exists only in base (deleted).
    Deleted,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeType::Unchanged => "unchanged",
            ChangeType::Changed => "changed",
            ChangeType::Created => "created",
            ChangeType::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// DiffResult holds the verdict and rendered diff for one resource.
///
/// The diff text is empty for [`ChangeType::Unchanged`]; for every other
/// verdict it starts with a `===== group/kind namespace/name ======` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub change_type: ChangeType,
    pub diff: String,
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diff)
    }
}

/// Statistics holds per-verdict counts for a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub changed: usize,
    pub created: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

/// Results maps each resource identity to its diff result.
///
/// Exactly one entry exists per distinct [`ResourceKey`] present in the
/// filtered base or head collection. Entries are kept in key order, so
/// iteration, concatenated diff text, and summaries are reproducible.
///
/// All query methods are read-only and return new values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Results {
    entries: BTreeMap<ResourceKey, DiffResult>,
}

impl Results {
    pub fn new() -> Self {
        Results::default()
    }

    pub fn insert(&mut self, key: ResourceKey, result: DiffResult) {
        self.entries.insert(key, result);
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&DiffResult> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &DiffResult)> {
        self.entries.iter()
    }

    /// Returns the entries with the given change type.
    pub fn filter_by_type(&self, change_type: ChangeType) -> Results {
        self.apply(|_, result| result.change_type == change_type)
    }

    /// Returns only the changed entries.
    pub fn filter_changed(&self) -> Results {
        self.filter_by_type(ChangeType::Changed)
    }

    /// Returns only the created entries.
    pub fn filter_created(&self) -> Results {
        self.filter_by_type(ChangeType::Created)
    }

    /// Returns only the deleted entries.
    pub fn filter_deleted(&self) -> Results {
        self.filter_by_type(ChangeType::Deleted)
    }

    /// Returns only the unchanged entries.
    pub fn filter_unchanged(&self) -> Results {
        self.filter_by_type(ChangeType::Unchanged)
    }

    /// Returns the entries whose resource has the given kind.
    pub fn filter_by_kind(&self, kind: &str) -> Results {
        self.apply(|key, _| key.kind == kind)
    }

    /// Returns the entries whose resource lives in the given namespace.
    pub fn filter_by_namespace(&self, namespace: &str) -> Results {
        self.apply(|key, _| key.namespace == namespace)
    }

    /// Returns the entries whose resource has the given name.
    pub fn filter_by_resource_name(&self, name: &str) -> Results {
        self.apply(|key, _| key.name == name)
    }

    /// Returns the entries matching an arbitrary predicate.
    pub fn apply<F>(&self, predicate: F) -> Results
    where
        F: Fn(&ResourceKey, &DiffResult) -> bool,
    {
        Results {
            entries: self
                .entries
                .iter()
                .filter(|&(key, result)| predicate(key, result))
                .map(|(key, result)| (key.clone(), result.clone()))
                .collect(),
        }
    }

    /// Returns true if any resource was created, changed, or deleted.
    pub fn has_changes(&self) -> bool {
        self.entries
            .values()
            .any(|result| result.change_type != ChangeType::Unchanged)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn count_by_type(&self, change_type: ChangeType) -> usize {
        self.entries
            .values()
            .filter(|result| result.change_type == change_type)
            .count()
    }

    /// Returns all resource keys in sorted order.
    pub fn resource_keys(&self) -> Vec<ResourceKey> {
        self.entries.keys().cloned().collect()
    }

    /// Returns the resource keys with the given change type, in sorted order.
    pub fn resource_keys_by_type(&self, change_type: ChangeType) -> Vec<ResourceKey> {
        self.entries
            .iter()
            .filter(|(_, result)| result.change_type == change_type)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Returns per-verdict counts.
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            total: self.entries.len(),
            ..Default::default()
        };
        for result in self.entries.values() {
            match result.change_type {
                ChangeType::Unchanged => stats.unchanged += 1,
                ChangeType::Changed => stats.changed += 1,
                ChangeType::Created => stats.created += 1,
                ChangeType::Deleted => stats.deleted += 1,
            }
        }
        stats
    }

    /// Concatenates all non-empty diff texts in key order.
    pub fn to_diff_string(&self) -> String {
        let mut out = String::new();
        for result in self.entries.values() {
            out.push_str(&result.diff);
        }
        out
    }

    /// Renders a summary grouped into Unchanged, Changed, Create, and Delete
    /// sections, each listing `kind/namespace/name` (namespace omitted for
    /// cluster-scoped resources).
    pub fn to_summary_string(&self) -> String {
        let mut out = String::new();

        let mut write_section = |title: &str, change_type: ChangeType| {
            let keys = self.resource_keys_by_type(change_type);
            if keys.is_empty() {
                return;
            }
            out.push_str(title);
            out.push_str(":\n");
            for key in keys {
                out.push_str("  ");
                out.push_str(&key.short_name());
                out.push('\n');
            }
            out.push('\n');
        };

        write_section("Unchanged", ChangeType::Unchanged);
        write_section("Changed", ChangeType::Changed);
        write_section("Create", ChangeType::Created);
        write_section("Delete", ChangeType::Deleted);

        out.trim_end_matches('\n').to_string()
    }
}

impl IntoIterator for Results {
    type Item = (ResourceKey, DiffResult);
    type IntoIter = std::collections::btree_map::IntoIter<ResourceKey, DiffResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Options controls the comparison behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Which resources take part in the comparison at all.
    pub filter: filter::Options,
    /// Number of context lines in diff output.
    pub context: usize,
    /// Disable masking of Secret data values in diff output.
    pub disable_mask_secrets: bool,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            filter: filter::Options::default(),
            context: DEFAULT_CONTEXT,
            disable_mask_secrets: false,
        }
    }
}

/// Default number of unified-diff context lines.
pub const DEFAULT_CONTEXT: usize = 3;
