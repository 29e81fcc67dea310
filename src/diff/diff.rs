//! The comparison pipeline: pairing, classification, and diff rendering.

use std::collections::BTreeMap;

use similar::TextDiff;
use thiserror::Error;

use crate::diff::{ChangeType, DiffResult, Options, Results};
use crate::filter;
use crate::masking::{is_secret, MaskError, Masker};
use crate::parser::{parse_yaml, ParseError};
use crate::resource::{Resource, ResourceKey};

/// DiffError represents a failure while comparing two manifest collections.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to parse {side} manifests: {source}")]
    Parse {
        side: &'static str,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Mask(#[from] MaskError),

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: ResourceKey,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Compares two YAML manifest streams.
pub fn yaml(base: &str, head: &str, opts: &Options) -> Result<Results, DiffError> {
    let base_objs = parse_yaml(base).map_err(|source| DiffError::Parse {
        side: "base",
        source,
    })?;
    let head_objs = parse_yaml(head).map_err(|source| DiffError::Parse {
        side: "head",
        source,
    })?;
    objects(&base_objs, &head_objs, opts)
}

/// Compares two collections of parsed resources.
///
/// A fresh [`Masker`] is created for this comparison, so masks never leak
/// between runs. Use [`objects_with_masker`] to share an instance.
pub fn objects(base: &[Resource], head: &[Resource], opts: &Options) -> Result<Results, DiffError> {
    objects_with_masker(base, head, opts, &Masker::new())
}

/// Compares two collections of parsed resources using the given masker.
///
/// Both collections are filtered by `opts.filter` first; the result contains
/// exactly one entry per distinct [`ResourceKey`] present in either filtered
/// collection. Diff text is rendered for every verdict except
/// [`ChangeType::Unchanged`].
pub fn objects_with_masker(
    base: &[Resource],
    head: &[Resource],
    opts: &Options,
    masker: &Masker,
) -> Result<Results, DiffError> {
    let base = filter::resources(base, &opts.filter);
    let head = filter::resources(head, &opts.filter);

    let mut results = Results::new();
    for (key, pair) in pair_by_key(&base, &head) {
        let change_type = determine_change_type(pair.base, pair.head);

        let diff = if change_type == ChangeType::Unchanged {
            String::new()
        } else {
            render_diff(&key, pair.base, pair.head, opts, masker)?
        };

        results.insert(key, DiffResult { change_type, diff });
    }

    Ok(results)
}

struct BaseHead<'a> {
    base: Option<&'a Resource>,
    head: Option<&'a Resource>,
}

/// Builds the union of identities across both sides.
///
/// If the same identity appears more than once within one side, the later
/// occurrence overwrites the earlier one (last-write-wins). This is a
/// deliberate policy, not an accident; callers needing strict uniqueness
/// must check their inputs beforehand.
fn pair_by_key<'a>(
    base: &[&'a Resource],
    head: &[&'a Resource],
) -> BTreeMap<ResourceKey, BaseHead<'a>> {
    let mut pairs: BTreeMap<ResourceKey, BaseHead<'a>> = BTreeMap::new();

    for obj in base {
        pairs.insert(
            obj.resource_key(),
            BaseHead {
                base: Some(obj),
                head: None,
            },
        );
    }

    for obj in head {
        match pairs.get_mut(&obj.resource_key()) {
            Some(pair) => pair.head = Some(obj),
            None => {
                pairs.insert(
                    obj.resource_key(),
                    BaseHead {
                        base: None,
                        head: Some(obj),
                    },
                );
            }
        }
    }

    pairs
}

/// Determines the verdict for one identity.
///
/// Equality is deep structural equality over the whole document tree: map
/// key order is irrelevant, list order matters, and values of different
/// types are never equal.
fn determine_change_type(base: Option<&Resource>, head: Option<&Resource>) -> ChangeType {
    match (base, head) {
        (None, Some(_)) => ChangeType::Created,
        (Some(_), None) => ChangeType::Deleted,
        (Some(base), Some(head)) if base == head => ChangeType::Unchanged,
        _ => ChangeType::Changed,
    }
}

/// Renders the header plus unified diff for one non-Unchanged resource.
fn render_diff(
    key: &ResourceKey,
    base: Option<&Resource>,
    head: Option<&Resource>,
    opts: &Options,
    masker: &Masker,
) -> Result<String, DiffError> {
    let needs_mask = !opts.disable_mask_secrets
        && (base.is_some_and(is_secret) || head.is_some_and(is_secret));

    let masked_base;
    let masked_head;
    let (base, head) = if needs_mask {
        masked_base = base.map(|obj| masker.mask_secret_data(obj)).transpose()?;
        masked_head = head.map(|obj| masker.mask_secret_data(obj)).transpose()?;
        (masked_base.as_ref(), masked_head.as_ref())
    } else {
        (base, head)
    };

    let base_text = serialize(key, base)?;
    let head_text = serialize(key, head)?;

    let header = format!(
        "===== {}/{} {}/{} ======\n",
        key.group, key.kind, key.namespace, key.name
    );

    Ok(header + &unified_diff(&base_text, &head_text, key, opts.context))
}

/// Serializes one side to canonical YAML; an absent side becomes the empty
/// string.
fn serialize(key: &ResourceKey, obj: Option<&Resource>) -> Result<String, DiffError> {
    match obj {
        None => Ok(String::new()),
        Some(obj) => obj.to_yaml().map_err(|source| DiffError::Serialize {
            key: key.clone(),
            source,
        }),
    }
}

/// Line-based unified diff between the two canonical texts. Returns an empty
/// string when the texts are line-identical.
fn unified_diff(base_text: &str, head_text: &str, key: &ResourceKey, context: usize) -> String {
    TextDiff::from_lines(base_text, head_text)
        .unified_diff()
        .context_radius(context)
        .header(
            &format!("{}-base.yaml", key.name),
            &format!("{}-head.yaml", key.name),
        )
        .to_string()
}
