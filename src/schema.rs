//! Schema declarations: the type-level shape of data.
//!
//! A schema is a tree of [`Node`]s. Leaves are [`Node::Value`]s carrying a
//! [`ScalarType`]; inner nodes are fixed-arity [`ArraySchema`]s (each index may hold
//! a differently typed node) and [`ObjectSchema`]s (named slots in declaration order).
//!
//! Uniqueness is checked when a schema is constructed: an object with a repeated key
//! or an array whose indices do not cover exactly `0..size` is a [`DefinitionError`],
//! and no schema value is produced.
//!
//! ## Declaring schemas
//!
//! ```rust
//! use typed_yaml::{ArraySchema, Node, NodeKind, ObjectSchema, ScalarType};
//!
//! let foo = ObjectSchema::builder()
//!     .value("foo-int", ScalarType::Int)
//!     .value("foo-float", ScalarType::Float)
//!     .build()
//!     .unwrap();
//!
//! let bar = ObjectSchema::builder()
//!     .object("bar-foo", foo)
//!     .array("int-arr", ArraySchema::repeat(3, Node::Value(ScalarType::Int)))
//!     .build()
//!     .unwrap();
//!
//! let root = Node::from(bar);
//! assert!(root.lookup("bar-foo", NodeKind::Object).is_ok());
//! assert!(root.lookup("bar-foo", NodeKind::Array).is_err());
//! ```
//!
//! ## Extension
//!
//! [`ObjectSchema::extend`] and [`ArraySchema::extend`] append slots to a copy of an
//! existing schema and re-check uniqueness over the combined set.

use crate::error::DefinitionError;
use crate::map::SlotMap;
use crate::traverse::{Locator, Slots, Traverse};
use crate::value::ScalarType;
use serde::Serialize;
use std::fmt;

/// A schema node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum Node {
    Value(ScalarType),
    Array(ArraySchema),
    Object(ObjectSchema),
}

/// The part of a node's type that lookups match against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Value(ScalarType),
    Array,
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Value(ty) => write!(f, "{}", ty),
            NodeKind::Array => f.write_str("array"),
            NodeKind::Object => f.write_str("object"),
        }
    }
}

/// A fixed-arity array; slot `i` is declared with index `i`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArraySchema {
    slots: Vec<Node>,
}

/// A set of named slots in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObjectSchema {
    slots: SlotMap<Node>,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Value(ty) => NodeKind::Value(*ty),
            Node::Array(_) => NodeKind::Array,
            Node::Object(_) => NodeKind::Object,
        }
    }

    /// The slot at `locator`, regardless of its kind.
    #[must_use]
    pub fn get<'k>(&self, locator: impl Into<Locator<'k>>) -> Option<&Node> {
        match (self, locator.into()) {
            (Node::Array(array), Locator::Index(index)) => array.slots.get(index),
            (Node::Object(object), Locator::Key(key)) => object.slots.get(key),
            _ => None,
        }
    }

    /// The slot at `locator`, which must also be of `kind`.
    ///
    /// A slot that exists with a different kind or payload type is reported as not
    /// found: the locator and the kind together identify a slot.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NotFound`] if no such slot is declared.
    pub fn lookup<'k>(
        &self,
        locator: impl Into<Locator<'k>>,
        kind: NodeKind,
    ) -> Result<&Node, DefinitionError> {
        let locator = locator.into();
        self.get(locator)
            .filter(|node| node.kind() == kind)
            .ok_or_else(|| DefinitionError::NotFound {
                locator: locator.to_string(),
                kind: kind.to_string(),
            })
    }

    /// Number of value leaves in this subtree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Value(_) => 1,
            _ => self.slots().map(|(_, child)| child.leaf_count()).sum(),
        }
    }

    /// Renders an indented outline of the slots below this node.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        write_outline(self, 0, &mut out);
        out
    }
}

fn write_outline(node: &Node, depth: usize, out: &mut String) {
    node.for_each_slot(|locator, child| {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&locator.to_string());
        out.push_str(": ");
        match child {
            Node::Array(array) => out.push_str(&format!("array[{}]", array.len())),
            other => out.push_str(&other.kind().to_string()),
        }
        out.push('\n');
        write_outline(child, depth + 1, out);
    });
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value(ty) => writeln!(f, "{}", ty),
            _ => f.write_str(&self.outline()),
        }
    }
}

impl Traverse for Node {
    fn slots(&self) -> Slots<'_, Node> {
        match self {
            Node::Value(_) => Slots::Empty,
            Node::Array(array) => Slots::array(&array.slots),
            Node::Object(object) => Slots::object(&object.slots),
        }
    }
}

impl From<ScalarType> for Node {
    fn from(ty: ScalarType) -> Self {
        Node::Value(ty)
    }
}

impl From<ArraySchema> for Node {
    fn from(array: ArraySchema) -> Self {
        Node::Array(array)
    }
}

impl From<ObjectSchema> for Node {
    fn from(object: ObjectSchema) -> Self {
        Node::Object(object)
    }
}

impl ArraySchema {
    /// Declares an array from explicitly indexed slots, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateIndex`] or
    /// [`DefinitionError::IndexOutOfRange`] unless the indices are exactly
    /// `0..slots.len()`.
    pub fn new(slots: impl IntoIterator<Item = (usize, Node)>) -> Result<Self, DefinitionError> {
        let slots: Vec<(usize, Node)> = slots.into_iter().collect();
        let size = slots.len();
        let mut placed: Vec<Option<Node>> = vec![None; size];

        for (index, node) in slots {
            let cell = placed
                .get_mut(index)
                .ok_or(DefinitionError::IndexOutOfRange { index, size })?;
            if cell.is_some() {
                return Err(DefinitionError::DuplicateIndex { index });
            }
            *cell = Some(node);
        }

        // n distinct indices below n leave no gaps
        Ok(ArraySchema {
            slots: placed.into_iter().flatten().collect(),
        })
    }

    /// Declares an array whose slots are given in index order.
    #[must_use]
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        ArraySchema { slots: nodes }
    }

    /// Declares `size` slots of the same node.
    #[must_use]
    pub fn repeat(size: usize, node: Node) -> Self {
        ArraySchema {
            slots: vec![node; size],
        }
    }

    /// Returns a new array with `slots` appended after the existing ones.
    ///
    /// New indices continue from the current size; the combined set is checked again.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if the combined indices are not contiguous.
    pub fn extend(
        &self,
        slots: impl IntoIterator<Item = (usize, Node)>,
    ) -> Result<Self, DefinitionError> {
        let existing = self.slots.iter().cloned().enumerate();
        ArraySchema::new(existing.chain(slots))
    }

    /// The number of slots, which is the array's fixed arity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The node declared at `index`, if the array has that many slots.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.slots.get(index)
    }

    /// Iterates the slot nodes in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.slots.iter()
    }
}

impl ObjectSchema {
    /// Declares an object from keyed slots in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateKey`] if a key is repeated.
    pub fn new<K: Into<String>>(
        slots: impl IntoIterator<Item = (K, Node)>,
    ) -> Result<Self, DefinitionError> {
        let mut map = SlotMap::new();
        for (key, node) in slots {
            map.try_insert(key, node)?;
        }
        Ok(ObjectSchema { slots: map })
    }

    pub(crate) fn from_slots(slots: SlotMap<Node>) -> Self {
        ObjectSchema { slots }
    }

    pub(crate) fn slots(&self) -> &SlotMap<Node> {
        &self.slots
    }

    #[must_use]
    pub fn builder() -> ObjectSchemaBuilder {
        ObjectSchemaBuilder::default()
    }

    /// Returns a new object with `slots` appended after the existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateKey`] if any key repeats across the
    /// combined set.
    pub fn extend<K: Into<String>>(
        &self,
        slots: impl IntoIterator<Item = (K, Node)>,
    ) -> Result<Self, DefinitionError> {
        let mut extended = self.clone();
        for (key, node) in slots {
            extended.slots.try_insert(key, node)?;
        }
        Ok(extended)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The node declared under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.slots.get(key)
    }

    /// Iterates the keys in declaration order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Node> {
        self.slots.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.slots.iter()
    }
}

/// Collects object slots; uniqueness is checked by [`ObjectSchemaBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct ObjectSchemaBuilder {
    slots: Vec<(String, Node)>,
}

impl ObjectSchemaBuilder {
    /// Declares a value slot.
    #[must_use]
    pub fn value(self, key: impl Into<String>, ty: ScalarType) -> Self {
        self.field(key, Node::Value(ty))
    }

    /// Declares an array slot.
    #[must_use]
    pub fn array(self, key: impl Into<String>, array: ArraySchema) -> Self {
        self.field(key, Node::Array(array))
    }

    /// Declares an object slot.
    #[must_use]
    pub fn object(self, key: impl Into<String>, object: ObjectSchema) -> Self {
        self.field(key, Node::Object(object))
    }

    /// Declares a slot of any kind.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, node: Node) -> Self {
        self.slots.push((key.into(), node));
        self
    }

    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateKey`] if a key was declared twice.
    pub fn build(self) -> Result<ObjectSchema, DefinitionError> {
        ObjectSchema::new(self.slots)
    }
}
