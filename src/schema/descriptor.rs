//! Descriptor type definitions.
//!
//! A descriptor declares, for one object level, which keys are permitted and
//! what shape each key's value must take:
//!
//! - `bools`: strict JSON booleans
//! - `fields`: scalar values (never a sequence or a nested object)
//! - `lists`: sequences; elements are plain scalars unless the key has a
//!   sub-descriptor under `list_entries`, in which case every element is an
//!   object validated against it
//! - `objects`: single nested objects validated against the sub-descriptor
//!   under `object_entries`
//!
//! Descriptors are trees: recursion terminates at leaves with empty `lists`
//! and `objects`. They are plain data, constructed in code through the
//! builder methods or deserialized from JSON configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The category a descriptor assigns to a declared key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Strict boolean value.
    Bool,
    /// Scalar value.
    Field,
    /// Sequence value.
    List,
    /// Nested object value.
    Object,
}

impl KeyKind {
    /// Returns the category name for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Bool => "bools",
            KeyKind::Field => "fields",
            KeyKind::List => "lists",
            KeyKind::Object => "objects",
        }
    }
}

/// Structural declaration for one object level of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Keys whose value must be a strict boolean.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bools: Vec<String>,

    /// Keys whose value must be a scalar.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Keys whose value must be a sequence.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lists: Vec<String>,

    /// Keys whose value must be a nested object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<String>,

    /// Sub-descriptors for `lists` keys whose elements are objects.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub list_entries: HashMap<String, Descriptor>,

    /// Sub-descriptors for `objects` keys.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub object_entries: HashMap<String, Descriptor>,
}

impl Descriptor {
    /// Create an empty descriptor declaring no keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare boolean keys.
    pub fn with_bools<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bools.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declare scalar field keys.
    pub fn with_fields<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declare list keys. Elements are treated as plain scalars unless the
    /// key is also given a sub-descriptor via [`with_list_entry`].
    ///
    /// [`with_list_entry`]: Descriptor::with_list_entry
    pub fn with_lists<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declare nested object keys. Every key declared here needs a matching
    /// [`with_object_entry`] sub-descriptor for its contents to validate.
    ///
    /// [`with_object_entry`]: Descriptor::with_object_entry
    pub fn with_objects<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objects.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Attach a sub-descriptor for a list key whose elements are objects.
    pub fn with_list_entry(mut self, key: impl Into<String>, entry: Descriptor) -> Self {
        self.list_entries.insert(key.into(), entry);
        self
    }

    /// Attach a sub-descriptor for a nested object key.
    pub fn with_object_entry(mut self, key: impl Into<String>, entry: Descriptor) -> Self {
        self.object_entries.insert(key.into(), entry);
        self
    }

    /// Returns the category a key is declared under, or `None` if the key is
    /// undeclared at this level.
    pub fn category_of(&self, key: &str) -> Option<KeyKind> {
        if self.bools.iter().any(|k| k == key) {
            Some(KeyKind::Bool)
        } else if self.fields.iter().any(|k| k == key) {
            Some(KeyKind::Field)
        } else if self.lists.iter().any(|k| k == key) {
            Some(KeyKind::List)
        } else if self.objects.iter().any(|k| k == key) {
            Some(KeyKind::Object)
        } else {
            None
        }
    }

    /// Sub-descriptor for a list key, if one was declared.
    pub fn list_entry(&self, key: &str) -> Option<&Descriptor> {
        self.list_entries.get(key)
    }

    /// Sub-descriptor for a nested object key, if one was declared.
    pub fn object_entry(&self, key: &str) -> Option<&Descriptor> {
        self.object_entries.get(key)
    }
}
