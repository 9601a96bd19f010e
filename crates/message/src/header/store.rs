//! Case-insensitive, case-preserving, ordered header collection.
//!
//! [`HeaderStore`] keeps a single ordered map keyed by the ASCII-lowercased
//! header name. Each entry remembers the spelling most recently used to set or
//! add the header (the "display" name) together with its trimmed values, so the
//! lowercase view and the display view can never drift apart.
//!
//! The map lives behind a reference-counted pointer. Cloning a store is cheap
//! and every `with_*` operation copies the map on write, leaving the receiver
//! untouched.
//!
//! # Ordering
//!
//! Headers enumerate in the order they were introduced, with one exception:
//! [`HeaderStore::with_header`] on a name that is already present moves that
//! header to the end. [`HeaderStore::with_added_header`] keeps the position.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;
use triomphe::Arc;

use crate::header::values::{HeaderValues, trim};

/// A header as stored: the display spelling plus its trimmed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl HeaderEntry {
    /// The spelling most recently used for this header.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Clone)]
pub struct HeaderStore {
    entries: Arc<IndexMap<String, HeaderEntry>>,
}

impl Default for HeaderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderStore {
    pub fn new() -> Self {
        Self { entries: Arc::new(IndexMap::new()) }
    }

    /// Builds a store from raw `(name, value)` pairs in iteration order.
    ///
    /// Names and values are trimmed. Pairs whose names only differ in case
    /// accumulate into one header: it keeps the position of the first pair and
    /// displays the spelling of the last one.
    pub fn from_raw<I, K, V>(raw: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValues>,
    {
        let mut entries: IndexMap<String, HeaderEntry> = IndexMap::new();
        for (name, value) in raw {
            let name = trim(name.as_ref());
            let values = value.into().into_trimmed();
            match entries.entry(name.to_ascii_lowercase()) {
                Entry::Occupied(mut occupied) => {
                    let entry = occupied.get_mut();
                    name.clone_into(&mut entry.name);
                    entry.values.extend(values);
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(HeaderEntry { name: name.to_owned(), values });
                }
            }
        }
        Self { entries: Arc::new(entries) }
    }

    /// Number of distinct headers, ignoring case.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Values for `name`, or an empty slice when the header is absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.entry(name).map(HeaderEntry::values).unwrap_or_default()
    }

    /// Values for `name` joined with `", "`; empty when the header is absent.
    pub fn line(&self, name: &str) -> String {
        self.values(name).join(", ")
    }

    pub fn entry(&self, name: &str) -> Option<&HeaderEntry> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    /// Iterates `(display name, values)` in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.values().map(|entry| (entry.name(), entry.values()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(HeaderEntry::name)
    }

    /// Copies the display view into an owned ordered map.
    pub fn to_raw(&self) -> IndexMap<String, Vec<String>> {
        self.iter().map(|(name, values)| (name.to_owned(), values.to_vec())).collect()
    }

    /// Returns true when both stores share the same underlying map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Replaces every value of `name`, moving the header to the end.
    pub fn with_header(&self, name: &str, value: impl Into<HeaderValues>) -> Self {
        let name = trim(name);
        let key = name.to_ascii_lowercase();
        let entry = HeaderEntry { name: name.to_owned(), values: value.into().into_trimmed() };

        let mut new = self.clone();
        let entries = Arc::make_mut(&mut new.entries);
        if entries.shift_remove(&key).is_some() {
            trace!(header = name, "replace header");
        }
        entries.insert(key, entry);
        new
    }

    /// Appends values to `name`, keeping its position. The name is trimmed
    /// before checking whether the header is present.
    ///
    /// Behaves like [`HeaderStore::with_header`] when the header is absent.
    pub fn with_added_header(&self, name: &str, value: impl Into<HeaderValues>) -> Self {
        let name = trim(name);
        let key = name.to_ascii_lowercase();
        if !self.entries.contains_key(&key) {
            return self.with_header(name, value);
        }

        let values = value.into().into_trimmed();
        let mut new = self.clone();
        if let Some(entry) = Arc::make_mut(&mut new.entries).get_mut(&key) {
            name.clone_into(&mut entry.name);
            entry.values.extend(values);
        }
        new
    }

    /// Removes `name`. When it is absent the result shares this store's map.
    pub fn without_header(&self, name: &str) -> Self {
        let key = name.to_ascii_lowercase();
        if !self.entries.contains_key(&key) {
            return self.clone();
        }

        let mut new = self.clone();
        Arc::make_mut(&mut new.entries).shift_remove(&key);
        new
    }

    /// Sets `name` and moves it to the front of the enumeration order.
    pub(crate) fn with_header_first(&self, name: &str, value: impl Into<HeaderValues>) -> Self {
        let name = trim(name);
        let key = name.to_ascii_lowercase();
        let entry = HeaderEntry { name: name.to_owned(), values: value.into().into_trimmed() };

        let mut new = self.clone();
        let entries = Arc::make_mut(&mut new.entries);
        entries.shift_remove(&key);
        entries.shift_insert(0, key, entry);
        new
    }
}

/// Stores are equal when they hold the same headers, spellings, values and order.
impl PartialEq for HeaderStore {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for HeaderStore {}

impl fmt::Debug for HeaderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a HeaderStore {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderStore
where
    K: AsRef<str>,
    V: Into<HeaderValues>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_raw(iter)
    }
}

/// Serializes as an ordered map from display name to the list of values.
impl Serialize for HeaderStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, values) in self.iter() {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}
