//! Ordered, duplicate-free keyed slots.
//!
//! This module provides [`SlotMap`], a wrapper around [`IndexMap`] that backs every
//! object, both in schemas ([`crate::ObjectSchema`]) and in bound instances
//! ([`crate::Instance::Object`]).
//!
//! ## Why IndexMap?
//!
//! Declaration order is serialization order. `IndexMap` keeps insertion order while
//! still giving constant-time lookup by key, and [`SlotMap::try_insert`] turns a
//! repeated key into a [`DefinitionError`] instead of silently replacing the slot.
//!
//! ## Examples
//!
//! ```rust
//! use typed_yaml::SlotMap;
//!
//! let mut map = SlotMap::new();
//! map.try_insert("first", 1).unwrap();
//! map.try_insert("second", 2).unwrap();
//! assert!(map.try_insert("first", 3).is_err());
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["first", "second"]);
//! ```

use crate::error::DefinitionError;
use indexmap::IndexMap;
use serde::Serialize;

/// An insertion-ordered map of unique string keys to slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SlotMap<T>(IndexMap<String, T>);

impl<T> SlotMap<T> {
    /// Creates an empty `SlotMap`.
    #[must_use]
    pub fn new() -> Self {
        SlotMap(IndexMap::new())
    }

    /// Creates an empty `SlotMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SlotMap(IndexMap::with_capacity(capacity))
    }

    /// Appends a slot, refusing keys that are already present.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateKey`] if `key` is already declared.
    pub fn try_insert(&mut self, key: impl Into<String>, value: T) -> Result<(), DefinitionError> {
        let key = key.into();
        if self.0.contains_key(&key) {
            return Err(DefinitionError::DuplicateKey { key });
        }
        self.0.insert(key, value);
        Ok(())
    }

    /// A map with the same keys in the same order, each slot passed through `f`.
    ///
    /// The source keys are already unique, so this cannot fail.
    pub(crate) fn map_slots<U, F>(&self, mut f: F) -> SlotMap<U>
    where
        F: FnMut(&T) -> U,
    {
        SlotMap(self.0.iter().map(|(key, slot)| (key.clone(), f(slot))).collect())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, T> {
        self.0.keys()
    }

    /// Returns an iterator over the slots of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, T> {
        self.0.values()
    }

    /// Returns an iterator over the key-slot pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, T> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, T> {
        self.0.iter_mut()
    }
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for SlotMap<T> {
    type Item = (String, T);
    type IntoIter = indexmap::map::IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a SlotMap<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = indexmap::map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, T> TryFrom<Vec<(K, T)>> for SlotMap<T> {
    type Error = DefinitionError;

    fn try_from(slots: Vec<(K, T)>) -> Result<Self, Self::Error> {
        let mut map = SlotMap::with_capacity(slots.len());
        for (key, value) in slots {
            map.try_insert(key, value)?;
        }
        Ok(map)
    }
}
