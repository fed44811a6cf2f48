//! Item normalization: sequences and mappings of pairs.
//!
//! # Design
//! Callers hand in either an ordered list of pairs (duplicates allowed, as
//! multi-valued form fields need) or a map. Both are first collected into
//! [`Items`], an ordered list, so the encoders only ever see one shape.
//!
//! A map contributes its pairs in its own iteration order: unspecified for
//! `HashMap`, key order for `BTreeMap`. Sequences keep their order exactly.
//! Nothing is sorted afterwards.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::charset::Charset;
use crate::value::{normalize_key, normalize_value, Key, NormalizedValue, Value};

/// A key and value after normalization.
pub type NormalizedItem = (Vec<u8>, NormalizedValue);

/// An ordered list of key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct Items(Vec<(Key, Value)>);

impl Items {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Key, Value)> {
        self.0.iter()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Items {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Items(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<Key>, V: Into<Value>> From<Vec<(K, V)>> for Items {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<Key>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Items {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<Key>, V: Into<Value>, S: BuildHasher> From<HashMap<K, V, S>> for Items {
    fn from(map: HashMap<K, V, S>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<Key>, V: Into<Value>> From<BTreeMap<K, V>> for Items {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Items {
    type Item = &'a (Key, Value);
    type IntoIter = std::slice::Iter<'a, (Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Normalize every pair: values through [`normalize_value`], text keys
/// through the charset. Order and duplicates are preserved.
pub fn normalize_items(items: impl Into<Items>, charset: Charset) -> Vec<NormalizedItem> {
    let items = items.into();
    items
        .iter()
        .map(|(key, value)| (normalize_key(key, charset), normalize_value(value, charset)))
        .collect()
}
