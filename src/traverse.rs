//! Schema-order traversal shared by every format.
//!
//! Array and object nodes, whether schema ([`crate::Node`]) or bound data
//! ([`crate::Instance`]), expose their children through [`Traverse::slots`]: an
//! exact-size iterator of `(Locator, child)` pairs in declared order. The YAML
//! emitter, the YAML parser, the JSON emitter and the schema outline all recurse
//! through this one primitive and contain no ordering logic of their own.
//!
//! ```rust
//! use typed_yaml::{schema, Locator, Traverse};
//!
//! let point = schema!({ "x": int, "y": int }).unwrap();
//! let mut seen = Vec::new();
//! point.for_each_slot(|locator, _child| seen.push(locator.to_string()));
//! assert_eq!(seen, ["x", "y"]);
//! ```

use crate::map::SlotMap;
use std::fmt;
use std::iter::Enumerate;

/// Identifies one slot of an object (by key) or of an array (by index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Locator<'a> {
    Key(&'a str),
    Index(usize),
}

impl<'a> Locator<'a> {
    #[must_use]
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Locator::Key(key) => Some(key),
            Locator::Index(_) => None,
        }
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Locator::Key(_) => None,
            Locator::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for Locator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Key(key) => f.write_str(key),
            Locator::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl<'a> From<&'a str> for Locator<'a> {
    fn from(key: &'a str) -> Self {
        Locator::Key(key)
    }
}

impl<'a> From<&'a String> for Locator<'a> {
    fn from(key: &'a String) -> Self {
        Locator::Key(key)
    }
}

impl From<usize> for Locator<'_> {
    fn from(index: usize) -> Self {
        Locator::Index(index)
    }
}

/// Children of a node in declared order.
pub enum Slots<'a, T> {
    Empty,
    Array(Enumerate<std::slice::Iter<'a, T>>),
    Object(indexmap::map::Iter<'a, String, T>),
}

impl<'a, T> Slots<'a, T> {
    pub(crate) fn array(items: &'a [T]) -> Self {
        Slots::Array(items.iter().enumerate())
    }

    pub(crate) fn object(map: &'a SlotMap<T>) -> Self {
        Slots::Object(map.iter())
    }
}

impl<'a, T> Iterator for Slots<'a, T> {
    type Item = (Locator<'a>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Slots::Empty => None,
            Slots::Array(iter) => iter.next().map(|(i, child)| (Locator::Index(i), child)),
            Slots::Object(iter) => iter
                .next()
                .map(|(key, child)| (Locator::Key(key.as_str()), child)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Slots::Empty => (0, Some(0)),
            Slots::Array(iter) => iter.size_hint(),
            Slots::Object(iter) => iter.size_hint(),
        }
    }
}

impl<T> ExactSizeIterator for Slots<'_, T> {}

/// Mutable children of a node in declared order.
pub enum SlotsMut<'a, T> {
    Empty,
    Array(Enumerate<std::slice::IterMut<'a, T>>),
    Object(indexmap::map::IterMut<'a, String, T>),
}

impl<'a, T> SlotsMut<'a, T> {
    pub(crate) fn array(items: &'a mut [T]) -> Self {
        SlotsMut::Array(items.iter_mut().enumerate())
    }

    pub(crate) fn object(map: &'a mut SlotMap<T>) -> Self {
        SlotsMut::Object(map.iter_mut())
    }
}

impl<'a, T> Iterator for SlotsMut<'a, T> {
    type Item = (Locator<'a>, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SlotsMut::Empty => None,
            SlotsMut::Array(iter) => iter.next().map(|(i, child)| (Locator::Index(i), child)),
            SlotsMut::Object(iter) => iter
                .next()
                .map(|(key, child)| (Locator::Key(key.as_str()), child)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SlotsMut::Empty => (0, Some(0)),
            SlotsMut::Array(iter) => iter.size_hint(),
            SlotsMut::Object(iter) => iter.size_hint(),
        }
    }
}

impl<T> ExactSizeIterator for SlotsMut<'_, T> {}

/// Read-only traversal over the slots of a node.
///
/// Value nodes have no slots; callers handle them as leaves.
pub trait Traverse: Sized {
    fn slots(&self) -> Slots<'_, Self>;

    fn slot_count(&self) -> usize {
        self.slots().len()
    }

    /// Invokes `visit` once per slot in declared order.
    fn for_each_slot<F>(&self, mut visit: F)
    where
        F: FnMut(Locator<'_>, &Self),
    {
        for (locator, child) in self.slots() {
            visit(locator, child);
        }
    }

    /// Like [`Traverse::for_each_slot`], stopping at the first error.
    fn try_for_each_slot<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(Locator<'_>, &Self) -> Result<(), E>,
    {
        for (locator, child) in self.slots() {
            visit(locator, child)?;
        }
        Ok(())
    }
}

/// Mutable traversal over the slots of a node, used to populate bound data.
pub trait TraverseMut: Traverse {
    fn slots_mut(&mut self) -> SlotsMut<'_, Self>;

    fn try_for_each_slot_mut<E, F>(&mut self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(Locator<'_>, &mut Self) -> Result<(), E>,
    {
        for (locator, child) in self.slots_mut() {
            visit(locator, child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::Key("foo-int").to_string(), "foo-int");
        assert_eq!(Locator::Index(3).to_string(), "[3]");
    }

    #[test]
    fn test_slots_are_exact_size() {
        let items = vec![1, 2, 3];
        let mut slots = Slots::array(&items);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots.next(), Some((Locator::Index(0), &1)));
        assert_eq!(slots.len(), 2);

        let map = SlotMap::try_from(vec![("a", 1)]).unwrap();
        let collected: Vec<_> = Slots::object(&map).collect();
        assert_eq!(collected, [(Locator::Key("a"), &1)]);
    }

    #[test]
    fn test_try_for_each_slot_stops_at_first_error() {
        let node = crate::schema!([int, string, bool]).unwrap();
        let mut visited = Vec::new();
        let result = node.try_for_each_slot(|locator, child| {
            visited.push(locator.index());
            if matches!(child.kind(), crate::NodeKind::Value(_)) && locator.index() == Some(1) {
                return Err(locator.to_string());
            }
            Ok(())
        });
        assert_eq!(result, Err("[1]".to_string()));
        assert_eq!(visited, [Some(0), Some(1)]);

        let mut count = 0;
        let ok: Result<(), ()> = node.try_for_each_slot(|_, _| {
            count += 1;
            Ok(())
        });
        assert!(ok.is_ok());
        assert_eq!(count, 3);
    }

    #[test]
    fn test_slots_mut_writes_through() {
        let mut items = vec![1, 2, 3];
        for (locator, item) in SlotsMut::array(&mut items) {
            *item *= 10 + locator.index().unwrap_or(0) as i32;
        }
        assert_eq!(items, [10, 22, 36]);
    }
}
