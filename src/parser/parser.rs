//! Multi-document manifest parsing.

use serde::Deserialize;
use thiserror::Error;

use crate::resource::Resource;
use crate::value::Value;

/// ParseError represents a failure while decoding a manifest stream.
///
/// The documents decoded before the failure point are carried inside the
/// error, so callers can keep the partial result if they choose to.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to unmarshal manifest at document {index}: {source}")]
    Yaml {
        index: usize,
        documents: Vec<Resource>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("manifest at document {index} is not a mapping")]
    NotAMapping { index: usize, documents: Vec<Resource> },
}

impl ParseError {
    /// The zero-based index of the document that failed to decode.
    pub fn index(&self) -> usize {
        match self {
            ParseError::Yaml { index, .. } | ParseError::NotAMapping { index, .. } => *index,
        }
    }

    /// Consumes the error, returning the documents decoded before the
    /// failure point.
    pub fn into_documents(self) -> Vec<Resource> {
        match self {
            ParseError::Yaml { documents, .. } | ParseError::NotAMapping { documents, .. } => {
                documents
            }
        }
    }
}

/// Parses a YAML or JSON stream into resources.
///
/// Documents are separated by `---`. Empty documents are skipped. JSON input
/// works because YAML is a superset of it. On error, the documents read up
/// until the error are available via [`ParseError::into_documents`].
pub fn parse_yaml(input: &str) -> Result<Vec<Resource>, ParseError> {
    let mut documents = Vec::new();

    for (index, deserializer) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let value = match Value::deserialize(deserializer) {
            Ok(value) => value,
            Err(source) => {
                return Err(ParseError::Yaml {
                    index,
                    documents,
                    source,
                })
            }
        };

        if value.is_null() {
            continue;
        }

        match Resource::from_value(value) {
            Some(resource) => documents.push(resource),
            None => return Err(ParseError::NotAMapping { index, documents }),
        }
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_document_stream() {
        let input = "\
apiVersion: v1
kind: Pod
metadata:
  name: a
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: b
";
        let docs = parse_yaml(input).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].kind(), "Pod");
        assert_eq!(docs[1].kind(), "ConfigMap");
    }

    #[test]
    fn test_empty_documents_skipped() {
        let input = "---\n---\napiVersion: v1\nkind: Pod\nmetadata:\n  name: a\n---\n";
        let docs = parse_yaml(input).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_yaml("").unwrap().is_empty());
    }

    #[test]
    fn test_json_input() {
        let input = r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "p"}}"#;
        let docs = parse_yaml(input).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name(), "p");
    }

    #[test]
    fn test_partial_documents_survive_failure() {
        let input = "\
apiVersion: v1
kind: Pod
metadata:
  name: a
---
- this
- is
- a list
";
        let err = parse_yaml(input).unwrap_err();
        assert_eq!(err.index(), 1);
        let partial = err.into_documents();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].name(), "a");
    }

    #[test]
    fn test_invalid_yaml_reports_source() {
        let input = "apiVersion: v1\nkind: Pod\nmetadata: {unclosed\n";
        let err = parse_yaml(input).unwrap_err();
        assert!(matches!(err, ParseError::Yaml { .. }));
    }
}
