//! Live data bound to a schema.
//!
//! An [`Instance`] mirrors the shape of a [`Node`] and attaches a [`Binding`] to every
//! value leaf. A leaf either owns its scalar, forwards to a Rust value owned
//! elsewhere, or is still unbound. The mode is chosen per leaf when the instance is
//! built; a forwarding instance borrows its targets mutably for `'a`, so the borrow
//! checker guarantees it never outlives them and that nothing else writes to them
//! while it exists.
//!
//! ## Owning
//!
//! ```rust
//! use typed_yaml::{schema, Instance, Scalar};
//!
//! let foo = schema!({ "foo-int": int, "foo-float": float }).unwrap();
//! let mut inst = Instance::bind_owned(&foo, [Scalar::Int(5), Scalar::Float(0.5)]).unwrap();
//!
//! inst.set("foo-int", 6).unwrap();
//! assert_eq!(inst.value_at("foo-int").unwrap(), Some(Scalar::Int(6)));
//! ```
//!
//! ## Forwarding
//!
//! ```rust
//! use typed_yaml::{schema, Instance, Primitive};
//!
//! let foo = schema!({ "foo-int": int, "foo-float": float }).unwrap();
//! let (mut a, mut b) = (5i32, 0.5f64);
//! {
//!     let refs: Vec<&mut dyn Primitive> = vec![&mut a, &mut b];
//!     let mut inst = Instance::bind_forwarding(&foo, refs).unwrap();
//!     inst.set("foo-int", 7).unwrap();
//! }
//! assert_eq!(a, 7);
//! ```

use crate::error::{DefinitionError, Result, ScalarError};
use crate::map::SlotMap;
use crate::schema::{ArraySchema, Node, NodeKind, ObjectSchema};
use crate::traverse::{Locator, Slots, SlotsMut, Traverse, TraverseMut};
use crate::value::{Primitive, Scalar, ScalarType};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Where a leaf's data lives.
pub enum Binding<'a> {
    Unbound,
    /// Storage allocated and owned by the instance.
    Owned(Scalar),
    /// A view over storage owned by the caller.
    Forwarded(&'a mut dyn Primitive),
}

impl fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Unbound => f.write_str("Unbound"),
            Binding::Owned(value) => f.debug_tuple("Owned").field(value).finish(),
            Binding::Forwarded(target) => f.debug_tuple("Forwarded").field(&target.load()).finish(),
        }
    }
}

/// A value leaf: its declared type and its current binding.
#[derive(Debug)]
pub struct Leaf<'a> {
    ty: ScalarType,
    binding: Binding<'a>,
}

impl<'a> Leaf<'a> {
    #[must_use]
    pub fn unbound(ty: ScalarType) -> Self {
        Leaf {
            ty,
            binding: Binding::Unbound,
        }
    }

    #[must_use]
    pub fn owned(value: Scalar) -> Self {
        Leaf {
            ty: value.scalar_type(),
            binding: Binding::Owned(value),
        }
    }

    pub fn forwarded(target: &'a mut dyn Primitive) -> Self {
        Leaf {
            ty: target.scalar_type(),
            binding: Binding::Forwarded(target),
        }
    }

    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        self.ty
    }

    #[must_use]
    pub fn binding(&self) -> &Binding<'a> {
        &self.binding
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        !matches!(self.binding, Binding::Unbound)
    }

    #[must_use]
    pub fn is_forwarded(&self) -> bool {
        matches!(self.binding, Binding::Forwarded(_))
    }

    /// The current value, or `None` while unbound.
    #[must_use]
    pub fn get(&self) -> Option<Scalar> {
        match &self.binding {
            Binding::Unbound => None,
            Binding::Owned(value) => Some(value.clone()),
            Binding::Forwarded(target) => Some(target.load()),
        }
    }

    /// Writes `value` through the current binding.
    ///
    /// An unbound leaf becomes owned; a forwarded leaf writes to its target.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarError`] if `value` is not of the leaf's type or does not fit
    /// the forwarded target.
    pub fn set(&mut self, value: Scalar) -> std::result::Result<(), ScalarError> {
        if value.scalar_type() != self.ty {
            return Err(ScalarError::TypeMismatch {
                expected: self.ty,
                found: value.scalar_type(),
            });
        }
        match &mut self.binding {
            Binding::Forwarded(target) => target.store(value),
            binding => {
                *binding = Binding::Owned(value);
                Ok(())
            }
        }
    }

    /// Replaces the binding, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarError::TypeMismatch`] if the new binding holds another type.
    pub fn rebind(&mut self, binding: Binding<'a>) -> std::result::Result<Binding<'a>, ScalarError> {
        let found = match &binding {
            Binding::Unbound => self.ty,
            Binding::Owned(value) => value.scalar_type(),
            Binding::Forwarded(target) => target.scalar_type(),
        };
        if found != self.ty {
            return Err(ScalarError::TypeMismatch {
                expected: self.ty,
                found,
            });
        }
        Ok(std::mem::replace(&mut self.binding, binding))
    }
}

/// A bound realization of a schema.
#[derive(Debug)]
pub enum Instance<'a> {
    Value(Leaf<'a>),
    Array(Vec<Instance<'a>>),
    Object(SlotMap<Instance<'a>>),
}

impl<'a> Instance<'a> {
    /// Mirrors `schema` with every leaf unbound.
    #[must_use]
    pub fn new(schema: &Node) -> Self {
        match schema {
            Node::Value(ty) => Instance::Value(Leaf::unbound(*ty)),
            Node::Array(array) => Instance::Array(array.iter().map(Instance::new).collect()),
            Node::Object(object) => Instance::Object(object.slots().map_slots(Instance::new)),
        }
    }

    /// An owning leaf.
    #[must_use]
    pub fn owned(value: impl Into<Scalar>) -> Self {
        Instance::Value(Leaf::owned(value.into()))
    }

    /// An unbound leaf of type `ty`.
    #[must_use]
    pub fn unbound(ty: ScalarType) -> Self {
        Instance::Value(Leaf::unbound(ty))
    }

    /// Binds `schema` to owned copies of `values`, one per leaf in depth-first
    /// declared order.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Arity`] if the number of values differs from the
    /// number of leaves, or [`DefinitionError::TypeMismatch`] for a mistyped value.
    pub fn bind_owned(
        schema: &Node,
        values: impl IntoIterator<Item = Scalar>,
    ) -> std::result::Result<Self, DefinitionError> {
        let leaves: Vec<Leaf<'a>> = values.into_iter().map(Leaf::owned).collect();
        Instance::from_leaves(schema, leaves)
    }

    /// A forwarding leaf over `target`.
    pub fn forward<T: Primitive + 'a>(target: &'a mut T) -> Self {
        Instance::Value(Leaf::forwarded(target))
    }

    /// An array instance from its elements, in index order.
    #[must_use]
    pub fn array(items: Vec<Instance<'a>>) -> Self {
        Instance::Array(items)
    }

    /// An object instance from keyed children, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateKey`] if a key repeats.
    pub fn object<K: Into<String>>(
        slots: Vec<(K, Instance<'a>)>,
    ) -> std::result::Result<Self, DefinitionError> {
        SlotMap::try_from(slots).map(Instance::Object)
    }

    /// Binds `schema` to forwarding views over `targets`, one per leaf in depth-first
    /// declared order.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Arity`] if the number of targets differs from the
    /// number of leaves, or [`DefinitionError::TypeMismatch`] for a mistyped target.
    pub fn bind_forwarding(
        schema: &Node,
        targets: Vec<&'a mut dyn Primitive>,
    ) -> std::result::Result<Self, DefinitionError> {
        let leaves: Vec<Leaf<'a>> = targets.into_iter().map(Leaf::forwarded).collect();
        Instance::from_leaves(schema, leaves)
    }

    /// Binds an array or object `schema` from one already-built child per slot.
    ///
    /// Children may mix owned, forwarded and unbound leaves freely.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NotAContainer`] for a value schema,
    /// [`DefinitionError::Arity`] on a slot count mismatch, or
    /// [`DefinitionError::TypeMismatch`] if a child does not conform to its slot.
    pub fn bind(
        schema: &Node,
        children: Vec<Instance<'a>>,
    ) -> std::result::Result<Self, DefinitionError> {
        let expected = schema.slot_count();
        if let Node::Value(ty) = schema {
            return Err(DefinitionError::NotAContainer {
                kind: ty.to_string(),
            });
        }
        if children.len() != expected {
            return Err(DefinitionError::Arity {
                expected,
                found: children.len(),
            });
        }

        let mut items = Vec::with_capacity(expected);
        let mut map = SlotMap::with_capacity(expected);
        for ((locator, slot), child) in schema.slots().zip(children) {
            child.check(slot, &locator.to_string())?;
            match locator {
                Locator::Index(_) => items.push(child),
                Locator::Key(key) => map.try_insert(key, child)?,
            }
        }

        Ok(match schema {
            Node::Array(_) => Instance::Array(items),
            _ => Instance::Object(map),
        })
    }

    fn from_leaves(
        schema: &Node,
        leaves: Vec<Leaf<'a>>,
    ) -> std::result::Result<Self, DefinitionError> {
        let expected = schema.leaf_count();
        if leaves.len() != expected {
            return Err(DefinitionError::Arity {
                expected,
                found: leaves.len(),
            });
        }
        let mut leaves = leaves.into_iter();
        let instance = assemble(schema, &mut leaves, "")?;
        Ok(instance)
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Instance::Value(leaf) => NodeKind::Value(leaf.ty),
            Instance::Array(_) => NodeKind::Array,
            Instance::Object(_) => NodeKind::Object,
        }
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Instance::Value(_))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Instance::Array(_))
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Instance::Object(_))
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf<'a>> {
        match self {
            Instance::Value(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf<'a>> {
        match self {
            Instance::Value(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// The shape this instance realizes.
    #[must_use]
    pub fn schema(&self) -> Node {
        match self {
            Instance::Value(leaf) => Node::Value(leaf.ty),
            Instance::Array(items) => Node::Array(ArraySchema::from_nodes(
                items.iter().map(Instance::schema).collect(),
            )),
            Instance::Object(map) => {
                Node::Object(ObjectSchema::from_slots(map.map_slots(Instance::schema)))
            }
        }
    }

    /// Checks that this instance has exactly the shape and leaf types of `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::TypeMismatch`] naming the first differing slot.
    pub fn conforms_to(&self, schema: &Node) -> std::result::Result<(), DefinitionError> {
        self.check(schema, "")
    }

    fn check(&self, schema: &Node, at: &str) -> std::result::Result<(), DefinitionError> {
        let mismatch = |found: String| DefinitionError::TypeMismatch {
            at: display_path(at),
            expected: describe(schema),
            found,
        };

        match (self, schema) {
            (Instance::Value(leaf), Node::Value(ty)) if leaf.ty == *ty => Ok(()),
            (Instance::Array(_), Node::Array(_)) | (Instance::Object(_), Node::Object(_)) => {
                if self.slot_count() != schema.slot_count() {
                    return Err(mismatch(describe(&self.schema())));
                }
                for ((locator, child), (slot_locator, slot)) in self.slots().zip(schema.slots()) {
                    if locator != slot_locator {
                        return Err(mismatch(describe(&self.schema())));
                    }
                    child.check(slot, &child_path(at, locator))?;
                }
                Ok(())
            }
            _ => Err(mismatch(describe(&self.schema()))),
        }
    }

    /// The child at `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NotAContainer`] on a leaf, or
    /// [`DefinitionError::NotFound`] if no slot matches.
    pub fn get<'k>(
        &self,
        locator: impl Into<Locator<'k>>,
    ) -> std::result::Result<&Instance<'a>, DefinitionError> {
        let locator = locator.into();
        let found = match (self, locator) {
            (Instance::Value(leaf), _) => {
                return Err(DefinitionError::NotAContainer {
                    kind: leaf.ty.to_string(),
                })
            }
            (Instance::Array(items), Locator::Index(index)) => items.get(index),
            (Instance::Object(map), Locator::Key(key)) => map.get(key),
            _ => None,
        };
        found.ok_or_else(|| not_found(locator))
    }

    /// The child at `locator`, mutably.
    ///
    /// # Errors
    ///
    /// As [`Instance::get`].
    pub fn get_mut<'k>(
        &mut self,
        locator: impl Into<Locator<'k>>,
    ) -> std::result::Result<&mut Instance<'a>, DefinitionError> {
        let locator = locator.into();
        let found = match (self, locator) {
            (Instance::Value(leaf), _) => {
                return Err(DefinitionError::NotAContainer {
                    kind: leaf.ty.to_string(),
                })
            }
            (Instance::Array(items), Locator::Index(index)) => items.get_mut(index),
            (Instance::Object(map), Locator::Key(key)) => map.get_mut(key),
            _ => None,
        };
        found.ok_or_else(|| not_found(locator))
    }

    /// The value of this leaf; `None` for containers and unbound leaves.
    #[must_use]
    pub fn value(&self) -> Option<Scalar> {
        self.as_leaf().and_then(Leaf::get)
    }

    /// The value of the leaf at `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NotALeaf`] if the slot is an array or object.
    pub fn value_at<'k>(
        &self,
        locator: impl Into<Locator<'k>>,
    ) -> std::result::Result<Option<Scalar>, DefinitionError> {
        let locator = locator.into();
        match self.get(locator)? {
            Instance::Value(leaf) => Ok(leaf.get()),
            _ => Err(DefinitionError::NotALeaf {
                locator: locator.to_string(),
            }),
        }
    }

    /// Writes `value` into the leaf at `locator`, through its binding.
    ///
    /// # Errors
    ///
    /// Returns a definition error if the slot is missing, is not a value, or has
    /// another type; returns [`crate::Error::Scalar`] if a forwarded target rejects
    /// the value.
    pub fn set<'k>(&mut self, locator: impl Into<Locator<'k>>, value: impl Into<Scalar>) -> Result<()> {
        let locator = locator.into();
        let value = value.into();
        let leaf = self
            .get_mut(locator)?
            .as_leaf_mut()
            .ok_or_else(|| DefinitionError::NotALeaf {
                locator: locator.to_string(),
            })?;
        if leaf.ty != value.scalar_type() {
            return Err(DefinitionError::TypeMismatch {
                at: locator.to_string(),
                expected: leaf.ty.to_string(),
                found: value.scalar_type().to_string(),
            }
            .into());
        }
        leaf.set(value)?;
        Ok(())
    }

    /// Replaces the child at `locator` with `child`, returning the old one.
    ///
    /// The replacement must have the shape of the slot it replaces. Dropping the
    /// returned instance releases any storage it owned.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if the slot is missing or the shapes differ.
    pub fn rebind<'k>(
        &mut self,
        locator: impl Into<Locator<'k>>,
        child: Instance<'a>,
    ) -> std::result::Result<Instance<'a>, DefinitionError> {
        let locator = locator.into();
        let slot = self.get_mut(locator)?;
        child.check(&slot.schema(), &locator.to_string())?;
        Ok(std::mem::replace(slot, child))
    }

    /// All leaf values in depth-first declared order.
    #[must_use]
    pub fn leaves(&self) -> Vec<Option<Scalar>> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// An owning copy of the current values, detached from any forwarded storage.
    #[must_use]
    pub fn snapshot<'b>(&self) -> Instance<'b> {
        match self {
            Instance::Value(leaf) => match leaf.get() {
                Some(value) => Instance::owned(value),
                None => Instance::unbound(leaf.ty),
            },
            Instance::Array(items) => Instance::Array(items.iter().map(Instance::snapshot).collect()),
            Instance::Object(map) => Instance::Object(map.map_slots(Instance::snapshot)),
        }
    }
}

fn assemble<'a>(
    schema: &Node,
    leaves: &mut std::vec::IntoIter<Leaf<'a>>,
    at: &str,
) -> std::result::Result<Instance<'a>, DefinitionError> {
    match schema {
        Node::Value(ty) => {
            let leaf = leaves.next().ok_or(DefinitionError::Arity {
                expected: schema.leaf_count(),
                found: 0,
            })?;
            if leaf.ty != *ty {
                return Err(DefinitionError::TypeMismatch {
                    at: display_path(at),
                    expected: ty.to_string(),
                    found: leaf.ty.to_string(),
                });
            }
            Ok(Instance::Value(leaf))
        }
        Node::Array(array) => {
            let mut items = Vec::with_capacity(array.len());
            for (index, child) in array.iter().enumerate() {
                items.push(assemble(child, leaves, &child_path(at, Locator::Index(index)))?);
            }
            Ok(Instance::Array(items))
        }
        Node::Object(object) => {
            let mut map = SlotMap::with_capacity(object.len());
            for (key, child) in object.iter() {
                let built = assemble(child, leaves, &child_path(at, Locator::Key(key)))?;
                map.try_insert(key.clone(), built)?;
            }
            Ok(Instance::Object(map))
        }
    }
}

fn collect_leaves(instance: &Instance<'_>, out: &mut Vec<Option<Scalar>>) {
    match instance {
        Instance::Value(leaf) => out.push(leaf.get()),
        _ => instance.for_each_slot(|_, child| collect_leaves(child, out)),
    }
}

fn child_path(parent: &str, locator: Locator<'_>) -> String {
    match locator {
        Locator::Key(key) if parent.is_empty() => key.to_string(),
        Locator::Key(key) => format!("{}.{}", parent, key),
        Locator::Index(index) => format!("{}[{}]", parent, index),
    }
}

fn display_path(at: &str) -> String {
    if at.is_empty() {
        "<root>".to_string()
    } else {
        at.to_string()
    }
}

fn describe(node: &Node) -> String {
    match node {
        Node::Array(array) => format!("array[{}]", array.len()),
        other => other.kind().to_string(),
    }
}

fn not_found(locator: Locator<'_>) -> DefinitionError {
    DefinitionError::NotFound {
        locator: locator.to_string(),
        kind: "declared".to_string(),
    }
}

impl<'a> Traverse for Instance<'a> {
    fn slots(&self) -> Slots<'_, Instance<'a>> {
        match self {
            Instance::Value(_) => Slots::Empty,
            Instance::Array(items) => Slots::array(items),
            Instance::Object(map) => Slots::object(map),
        }
    }
}

impl<'a> TraverseMut for Instance<'a> {
    fn slots_mut(&mut self) -> SlotsMut<'_, Instance<'a>> {
        match self {
            Instance::Value(_) => SlotsMut::Empty,
            Instance::Array(items) => SlotsMut::array(items),
            Instance::Object(map) => SlotsMut::object(map),
        }
    }
}

/// Leaf-by-leaf equality of shape, types and current values, ignoring binding mode.
impl PartialEq for Instance<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Instance::Value(a), Instance::Value(b)) => a.ty == b.ty && a.get() == b.get(),
            (Instance::Array(a), Instance::Array(b)) => a == b,
            (Instance::Object(a), Instance::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            _ => false,
        }
    }
}

impl Serialize for Instance<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Instance::Value(leaf) => match leaf.get() {
                Some(value) => value.serialize(serializer),
                None => serializer.serialize_none(),
            },
            Instance::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Instance::Object(map) => {
                let mut object = serializer.serialize_map(Some(map.len()))?;
                for (key, child) in map {
                    object.serialize_entry(key, child)?;
                }
                object.end()
            }
        }
    }
}
