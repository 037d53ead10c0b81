use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

/// Name of a form input, as carried by the input's `name` attribute.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(Cow<'static, str>);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn owned(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for FieldKey {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self::owned(value)
    }
}

/// Current text values of a form's inputs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldSet {
    values: BTreeMap<FieldKey, String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins.
    pub fn set_field(&mut self, key: impl Into<FieldKey>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of `key`, or the empty string when the input was never written.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.values.iter().map(|(key, value)| (key, value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSet
where
    K: Into<FieldKey>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.set_field(key, value);
        }
        set
    }
}

/// Per-field validation messages. A field missing from the map is valid.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<FieldKey, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<FieldKey>, message: impl Into<String>) {
        self.errors.insert(key.into(), message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn is_invalid(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.errors.keys()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a FieldKey, &'a String);
    type IntoIter = btree_map::Iter<'a, FieldKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldErrors
where
    K: Into<FieldKey>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (key, message) in iter {
            errors.insert(key, message);
        }
        errors
    }
}

/// Typed view over a [`FieldSet`], usually generated by `#[derive(FormModel)]`.
pub trait FormModel: Sized {
    type Fields;

    fn fields() -> Self::Fields;
    fn field_keys() -> &'static [FieldKey];
    fn from_field_set(fields: &FieldSet) -> Self;
    fn to_field_set(&self) -> FieldSet;
}

/// Input event as delivered by the rendering layer, keyed by the input's `name`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputEvent {
    pub name: FieldKey,
    pub value: String,
}

impl InputEvent {
    pub fn new(name: impl Into<FieldKey>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
