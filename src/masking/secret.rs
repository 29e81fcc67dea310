//! Secret masking.
//!
//! Masking replaces every string value under a Secret's `data` and
//! `stringData` fields with a run of `+` characters. The same plaintext
//! always maps to the same mask within one [`Masker`] instance, and every
//! distinct plaintext gets a mask of a distinct length, so a reader can tell
//! whether two secret values differ without learning either value.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::resource::Resource;
use crate::value::Value;

/// The mask assigned to the first novel value seen by a Masker.
const BASE_MASK: &str = "++++++++++++++++";

/// The two top-level Secret fields whose values are masked.
const SECRET_DATA_FIELDS: [&str; 2] = ["data", "stringData"];

/// MaskError represents a Secret that does not have the shape masking
/// requires.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("invalid {field} field for Secret {resource}: expected a mapping, got {actual}")]
    FieldNotAMapping {
        field: &'static str,
        resource: String,
        actual: &'static str,
    },

    #[error("invalid {field} field for Secret {resource}: key '{key}' has non-string value of type {actual}")]
    NonStringValue {
        field: &'static str,
        resource: String,
        key: String,
        actual: &'static str,
    },
}

/// Masker assigns consistent masks to secret values.
///
/// State lives behind a mutex so one instance can be shared across threads;
/// the table is read-mostly and only written when a novel value appears.
#[derive(Debug)]
pub struct Masker {
    state: Mutex<MaskerState>,
}

#[derive(Debug)]
struct MaskerState {
    value_to_replacement: HashMap<String, String>,
    current_replacement: String,
}

impl MaskerState {
    fn new() -> Self {
        MaskerState {
            value_to_replacement: HashMap::new(),
            current_replacement: BASE_MASK.to_string(),
        }
    }
}

impl Default for Masker {
    fn default() -> Self {
        Masker::new()
    }
}

impl Masker {
    /// Creates a new Masker with fresh state.
    pub fn new() -> Self {
        Masker {
            state: Mutex::new(MaskerState::new()),
        }
    }

    /// Returns a consistent mask for the given value.
    ///
    /// The same value always gets the same mask; each novel value gets a
    /// mask one character longer than the previous novel one, so distinct
    /// values always get distinct masks. Empty strings are masked like any
    /// other value, which keeps the consistency rule uniform at the cost of
    /// spending a mask length on a zero-information value.
    pub fn mask_value(&self, value: &str) -> String {
        let mut state = self.state.lock().expect("masker lock poisoned");

        if let Some(replacement) = state.value_to_replacement.get(value) {
            return replacement.clone();
        }

        let replacement = state.current_replacement.clone();
        state
            .value_to_replacement
            .insert(value.to_string(), replacement.clone());
        state.current_replacement.push('+');
        replacement
    }

    /// Returns a masked deep copy of the Secret object.
    ///
    /// Non-Secret documents are returned unchanged. The Secret is validated
    /// first: if any `data`/`stringData` value is not a string the whole
    /// operation fails and nothing is masked. The input is never mutated.
    pub fn mask_secret_data(&self, obj: &Resource) -> Result<Resource, MaskError> {
        if !is_secret(obj) {
            return Ok(obj.clone());
        }

        validate_secret(obj)?;

        let mut masked = obj.clone();
        for field in SECRET_DATA_FIELDS {
            let Some(data) = masked.root_mut().get_mut(field).and_then(Value::as_map_mut)
            else {
                continue;
            };
            for value in data.fields.values_mut() {
                if let Value::String(plaintext) = value {
                    *value = Value::String(self.mask_value(plaintext));
                }
            }
        }

        Ok(masked)
    }

    /// Clears the value table and resets the mask-length cursor, so the next
    /// comparison run shares no mappings with previous ones.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("masker lock poisoned");
        *state = MaskerState::new();
    }
}

/// Returns true if the document is a Secret.
pub fn is_secret(obj: &Resource) -> bool {
    obj.kind() == "Secret"
}

/// Validates that every value under the Secret's `data` and `stringData`
/// fields is a string, as the Kubernetes API requires.
pub fn validate_secret(obj: &Resource) -> Result<(), MaskError> {
    let resource = secret_identifier(obj);

    for field in SECRET_DATA_FIELDS {
        let Some(value) = obj.root().get(field) else {
            continue;
        };
        let Some(data) = value.as_map() else {
            return Err(MaskError::FieldNotAMapping {
                field,
                resource,
                actual: value.type_name(),
            });
        };
        for (key, entry) in data.iter() {
            if !entry.is_string() {
                return Err(MaskError::NonStringValue {
                    field,
                    resource,
                    key: key.clone(),
                    actual: entry.type_name(),
                });
            }
        }
    }

    Ok(())
}

fn secret_identifier(obj: &Resource) -> String {
    let name = obj.name();
    let namespace = obj.namespace();
    if namespace.is_empty() && name.is_empty() {
        "unnamed".to_string()
    } else if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", namespace, name)
    }
}

// Package-level default masker for single-shot use, e.g. one CLI
// invocation. It is never reset implicitly, so unrelated comparisons that go
// through it share value mappings; long-lived callers should construct their
// own Masker instead.
static DEFAULT_MASKER: Lazy<Masker> = Lazy::new(Masker::new);

/// Masks a value using the process-wide default masker.
pub fn mask_value(value: &str) -> String {
    DEFAULT_MASKER.mask_value(value)
}

/// Masks a Secret using the process-wide default masker.
pub fn mask_secret_data(obj: &Resource) -> Result<Resource, MaskError> {
    DEFAULT_MASKER.mask_secret_data(obj)
}

/// Resets the process-wide default masker.
pub fn reset_masking_state() {
    DEFAULT_MASKER.reset()
}
