//! Generic manifest documents.

use crate::resource::ResourceKey;
use crate::value::{self, Map, Value};

/// Resource represents one parsed manifest: a tree-structured document whose
/// root is a map carrying `apiVersion`, `kind`, and a `metadata` sub-map.
///
/// Resources are treated as immutable by the comparison pipeline; operations
/// that need to alter one (masking) work on a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    root: Map,
}

impl Resource {
    /// Wraps a map-rooted value. Returns `None` for any other value type.
    pub fn from_value(value: Value) -> Option<Resource> {
        match value {
            Value::Map(root) => Some(Resource { root }),
            _ => None,
        }
    }

    /// Parses a single YAML document into a Resource.
    pub fn from_yaml(yaml: &str) -> Result<Resource, serde_yaml::Error> {
        let value = value::from_yaml(yaml)?;
        Resource::from_value(value).ok_or_else(|| {
            serde::de::Error::custom("manifest root must be a mapping")
        })
    }

    /// Serializes the document to canonical (key-ordered) YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        value::to_yaml(&Value::Map(self.root.clone()))
    }

    pub fn root(&self) -> &Map {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Map {
        &mut self.root
    }

    pub fn api_version(&self) -> &str {
        self.root.get_str("apiVersion").unwrap_or("")
    }

    /// The API group, empty for the core group (`apiVersion: v1`).
    pub fn group(&self) -> &str {
        match self.api_version().split_once('/') {
            Some((group, _)) => group,
            None => "",
        }
    }

    pub fn kind(&self) -> &str {
        self.root.get_str("kind").unwrap_or("")
    }

    fn metadata(&self) -> Option<&Map> {
        self.root.get_map("metadata")
    }

    pub fn name(&self) -> &str {
        self.metadata()
            .and_then(|m| m.get_str("name"))
            .unwrap_or("")
    }

    pub fn generate_name(&self) -> &str {
        self.metadata()
            .and_then(|m| m.get_str("generateName"))
            .unwrap_or("")
    }

    pub fn namespace(&self) -> &str {
        self.metadata()
            .and_then(|m| m.get_str("namespace"))
            .unwrap_or("")
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get_map("labels"))
            .and_then(|labels| labels.get_str(key))
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get_map("annotations"))
            .and_then(|annotations| annotations.get_str(key))
    }

    /// Extracts the identity key for this document.
    ///
    /// When `metadata.name` is absent the `metadata.generateName` template is
    /// used in its place; a document with neither still gets a best-effort
    /// key with an empty name rather than being dropped.
    pub fn resource_key(&self) -> ResourceKey {
        let mut name = self.name();
        if name.is_empty() {
            name = self.generate_name();
        }
        ResourceKey::new(self.group(), self.kind(), self.namespace(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key_extraction() {
        let res = Resource::from_yaml(
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: default\n",
        )
        .unwrap();
        assert_eq!(
            res.resource_key(),
            ResourceKey::new("apps", "Deployment", "default", "web")
        );
    }

    #[test]
    fn test_core_group_is_empty() {
        let res =
            Resource::from_yaml("apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\n").unwrap();
        assert_eq!(res.group(), "");
        assert_eq!(res.api_version(), "v1");
        assert_eq!(res.resource_key(), ResourceKey::new("", "Pod", "", "p"));
    }

    #[test]
    fn test_generate_name_fallback() {
        let res = Resource::from_yaml(
            "apiVersion: batch/v1\nkind: Job\nmetadata:\n  generateName: migrate-\n",
        )
        .unwrap();
        assert_eq!(res.resource_key().name, "migrate-");
    }

    #[test]
    fn test_missing_name_yields_best_effort_key() {
        let res = Resource::from_yaml("apiVersion: v1\nkind: Pod\nmetadata: {}\n").unwrap();
        assert_eq!(res.resource_key(), ResourceKey::new("", "Pod", "", ""));
    }

    #[test]
    fn test_labels_and_annotations() {
        let res = Resource::from_yaml(
            "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\n  labels:\n    app: nginx\n  annotations:\n    team: infra\n",
        )
        .unwrap();
        assert_eq!(res.label("app"), Some("nginx"));
        assert_eq!(res.label("missing"), None);
        assert_eq!(res.annotation("team"), Some("infra"));
        assert_eq!(res.annotation("app"), None);
    }

    #[test]
    fn test_non_map_root_rejected() {
        assert!(Resource::from_yaml("- just\n- a\n- list\n").is_err());
        assert!(Resource::from_value(Value::Int(3)).is_none());
    }
}
