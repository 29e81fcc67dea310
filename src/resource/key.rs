//! Resource identity keys.

use std::fmt;

/// ResourceKey uniquely identifies a Kubernetes resource within a manifest
/// collection.
///
/// Equality is exact-string on all four fields. The namespace is empty for
/// cluster-scoped resources and the group is empty for the core API group.
/// The derived `Ord` gives the total order (group, kind, namespace, name)
/// used for reproducible diff and summary output.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    pub group: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(
        group: impl Into<String>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        ResourceKey {
            group: group.into(),
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns `kind/namespace/name`, omitting the namespace segment for
    /// cluster-scoped resources. Used in summary listings.
    pub fn short_name(&self) -> String {
        if self.namespace.is_empty() {
            format!("{}/{}", self.kind, self.name)
        } else {
            format!("{}/{}/{}", self.kind, self.namespace, self.name)
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}/{}/{}", self.group, self.kind, self.name)
        } else {
            write!(
                f,
                "{}/{}/{}/{}",
                self.group, self.kind, self.namespace, self.name
            )
        }
    }
}
