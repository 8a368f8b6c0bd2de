//! Mapping arbitrary Rust types onto schema nodes.
//!
//! A type implements [`Rule`] to describe its shape once and then travel through the
//! emitter and the parser like any built-in value. [`Rule::to_instance`] takes an
//! owned snapshot for emission; [`Rule::bind`] hands out a forwarding view so a parse
//! writes straight into the value's fields.
//!
//! ```rust
//! use typed_yaml::{schema, Instance, Node, Rule};
//!
//! struct Vec3 {
//!     x: f64,
//!     y: f64,
//!     z: f64,
//! }
//!
//! impl Rule for Vec3 {
//!     fn schema() -> Node {
//!         <[f64; 3]>::schema()
//!     }
//!
//!     fn to_instance(&self) -> Instance<'static> {
//!         [self.x, self.y, self.z].to_instance()
//!     }
//!
//!     fn bind(&mut self) -> Instance<'_> {
//!         Instance::array(vec![
//!             Instance::forward(&mut self.x),
//!             Instance::forward(&mut self.y),
//!             Instance::forward(&mut self.z),
//!         ])
//!     }
//! }
//!
//! let mut v = Vec3 { x: 1.0, y: 2.0, z: 3.0 };
//! assert_eq!(typed_yaml::encode(&v), "- 1\n- 2\n- 3\n");
//!
//! typed_yaml::decode_into(&mut v, "- 4\n- 5.5\n- 6\n").unwrap();
//! assert_eq!(v.y, 5.5);
//! # let _ = schema!(Vec3).unwrap();
//! ```

use crate::instance::Instance;
use crate::schema::{ArraySchema, Node};
use crate::value::Primitive;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;

/// A Rust type with a fixed schema.
pub trait Rule {
    /// The shape every value of this type has.
    fn schema() -> Node;

    /// An owning instance holding a copy of the current value.
    fn to_instance(&self) -> Instance<'static>;

    /// A forwarding instance whose leaves write into `self`.
    fn bind(&mut self) -> Instance<'_>;
}

macro_rules! impl_rule_primitive {
    ($($t:ty),*) => {
        $(
            impl Rule for $t {
                fn schema() -> Node {
                    Node::Value(Primitive::scalar_type(&<$t>::default()))
                }

                fn to_instance(&self) -> Instance<'static> {
                    Instance::owned(self.load())
                }

                fn bind(&mut self) -> Instance<'_> {
                    Instance::forward(self)
                }
            }
        )*
    };
}

impl_rule_primitive!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, char, String, BigInt);

impl Rule for DateTime<Utc> {
    fn schema() -> Node {
        Node::Value(crate::ScalarType::Timestamp)
    }

    fn to_instance(&self) -> Instance<'static> {
        Instance::owned(self.load())
    }

    fn bind(&mut self) -> Instance<'_> {
        Instance::forward(self)
    }
}

impl<T: Rule, const N: usize> Rule for [T; N] {
    fn schema() -> Node {
        Node::Array(ArraySchema::repeat(N, T::schema()))
    }

    fn to_instance(&self) -> Instance<'static> {
        Instance::Array(self.iter().map(Rule::to_instance).collect())
    }

    fn bind(&mut self) -> Instance<'_> {
        Instance::Array(self.iter_mut().map(Rule::bind).collect())
    }
}

macro_rules! impl_rule_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Rule),+> Rule for ($($name,)+) {
            fn schema() -> Node {
                Node::Array(ArraySchema::from_nodes(vec![$($name::schema()),+]))
            }

            fn to_instance(&self) -> Instance<'static> {
                Instance::Array(vec![$(self.$idx.to_instance()),+])
            }

            fn bind(&mut self) -> Instance<'_> {
                Instance::Array(vec![$(self.$idx.bind()),+])
            }
        }
    };
}

impl_rule_tuple!(A: 0, B: 1);
impl_rule_tuple!(A: 0, B: 1, C: 2);
impl_rule_tuple!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Scalar, ScalarType};

    #[test]
    fn test_primitive_schemas() {
        assert_eq!(i32::schema(), Node::Value(ScalarType::Int));
        assert_eq!(u8::schema(), Node::Value(ScalarType::Int));
        assert_eq!(f32::schema(), Node::Value(ScalarType::Float));
        assert_eq!(String::schema(), Node::Value(ScalarType::Str));
        assert_eq!(BigInt::schema(), Node::Value(ScalarType::BigInt));
        assert_eq!(<DateTime<Utc>>::schema(), Node::Value(ScalarType::Timestamp));
    }

    #[test]
    fn test_array_rule() {
        let schema = <[i32; 3]>::schema();
        assert_eq!(
            schema,
            Node::Array(ArraySchema::repeat(3, Node::Value(ScalarType::Int)))
        );
        let values = [9, 7, 5];
        assert_eq!(
            values.to_instance().leaves(),
            vec![Some(Scalar::Int(9)), Some(Scalar::Int(7)), Some(Scalar::Int(5))]
        );
    }

    #[test]
    fn test_tuple_rule_is_heterogeneous() {
        let schema = <(i32, String, bool)>::schema();
        assert_eq!(
            schema,
            Node::Array(ArraySchema::from_nodes(vec![
                Node::Value(ScalarType::Int),
                Node::Value(ScalarType::Str),
                Node::Value(ScalarType::Bool),
            ]))
        );
    }

    #[test]
    fn test_bind_writes_into_fields() {
        let mut pair = (1i64, 'a');
        {
            let mut inst = pair.bind();
            inst.set(0usize, 2).unwrap();
            inst.set(1usize, 'z').unwrap();
        }
        assert_eq!(pair, (2, 'z'));
    }
}
