//! Ordered records and the typed projection step.
//!
//! Every extractor first produces an [`OrderedMap`] keyed by the labels found in
//! the file, in file order. Fixed-shape records implement [`FromRaw`] to project
//! that mapping onto named, strictly-typed fields.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;

use crate::numeric::Value;

/// Insertion-ordered string-keyed map.
///
/// Kernel files are small (tens of labels), so a vector with linear lookup
/// keeps file order without pulling in a dedicated map type. Re-inserting a
/// key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

/// Generic label → value mapping produced directly by parsing.
pub type RawRecord = OrderedMap<Value>;

/// Column name → counter mapping for one device or protocol block.
pub type Counters = OrderedMap<u64>;

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Inserts or replaces `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.position(key)?;
        Some(&mut self.entries[idx].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Index<&str> for OrderedMap<V> {
    type Output = V;

    /// Panics when `key` is absent, like `HashMap`'s `Index`.
    fn index(&self, key: &str) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not found: {key}"),
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Lookups with the zero-fill policy: an absent or malformed label reads as zero.
impl RawRecord {
    pub fn i32_or_zero(&self, label: &str) -> i32 {
        self.get(label).and_then(Value::to_i32).unwrap_or(0)
    }

    pub fn u32_or_zero(&self, label: &str) -> u32 {
        self.get(label).and_then(Value::to_u32).unwrap_or(0)
    }

    pub fn i64_or_zero(&self, label: &str) -> i64 {
        self.get(label).and_then(Value::to_i64).unwrap_or(0)
    }

    pub fn u64_or_zero(&self, label: &str) -> u64 {
        self.get(label).and_then(Value::to_u64).unwrap_or(0)
    }

    /// String field, or the empty string. Numbers are rendered in decimal.
    pub fn str_or_empty(&self, label: &str) -> String {
        self.get(label).map(Value::to_string).unwrap_or_default()
    }
}

/// Projection of a [`RawRecord`] onto a fixed-shape record.
///
/// Implementations must be total: every known label is looked up and coerced,
/// and anything absent or malformed becomes the field type's zero.
pub trait FromRaw: Sized {
    fn from_raw(raw: &RawRecord) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut map: Counters = OrderedMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        assert_eq!(map.insert("b", 3), Some(1));

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map["b"], 3);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_get_missing() {
        let map: Counters = [("x", 1u64)].into_iter().collect();
        assert!(map.get("y").is_none());
        assert!(!map.contains_key("y"));
        assert!(map.contains_key("x"));
    }

    #[test]
    #[should_panic(expected = "key not found: missing")]
    fn test_index_missing_panics() {
        let map: Counters = OrderedMap::new();
        let _ = map["missing"];
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let map: Counters = [("zeta", 1u64), ("alpha", 2)].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"zeta":1,"alpha":2}"#
        );
    }

    #[test]
    fn test_zero_fill_lookups() {
        let mut raw = RawRecord::new();
        raw.insert("pid", Value::I32(42));
        raw.insert("state", Value::Str("S".into()));
        raw.insert("big", Value::U64(u64::MAX));

        assert_eq!(raw.i32_or_zero("pid"), 42);
        assert_eq!(raw.u64_or_zero("pid"), 42);
        assert_eq!(raw.i32_or_zero("missing"), 0);
        assert_eq!(raw.i32_or_zero("state"), 0);
        assert_eq!(raw.i64_or_zero("big"), 0);
        assert_eq!(raw.u64_or_zero("big"), u64::MAX);
        assert_eq!(raw.str_or_empty("state"), "S");
        assert_eq!(raw.str_or_empty("missing"), "");
    }
}
