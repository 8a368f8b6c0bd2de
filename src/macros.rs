/// Declares a schema [`Node`](crate::Node) with a JSON-like syntax.
///
/// Scalar leaves are written as `bool`, `int`, `float`, `char`, `string`,
/// `timestamp` or `bigint`. `[a, b]` declares an array typed per index, `[t; n]` an
/// array of `n` identical slots, and `{ "key": t, ... }` an object in declaration
/// order. Any other type path is resolved through its [`Rule`](crate::Rule).
///
/// Evaluates to `Result<Node, DefinitionError>`; a repeated key is reported there.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::{schema, Node, ScalarType};
///
/// let bar = schema!({
///     "bar-foo": { "foo-int": int, "foo-float": float },
///     "int-arr": [int; 3],
///     "pair": [string, (i32, bool)],
/// })
/// .unwrap();
///
/// assert_eq!(bar.leaf_count(), 8);
/// assert!(schema!({ "a": int, "a": float }).is_err());
/// assert_eq!(schema!(int).unwrap(), Node::Value(ScalarType::Int));
/// ```
#[macro_export]
macro_rules! schema {
    (bool) => {
        $crate::schema!(@value Bool)
    };
    (int) => {
        $crate::schema!(@value Int)
    };
    (float) => {
        $crate::schema!(@value Float)
    };
    (char) => {
        $crate::schema!(@value Char)
    };
    (string) => {
        $crate::schema!(@value Str)
    };
    (timestamp) => {
        $crate::schema!(@value Timestamp)
    };
    (bigint) => {
        $crate::schema!(@value BigInt)
    };

    (@value $variant:ident) => {
        ::core::result::Result::<$crate::Node, $crate::DefinitionError>::Ok(
            $crate::Node::Value($crate::ScalarType::$variant),
        )
    };

    ([]) => {
        ::core::result::Result::<$crate::Node, $crate::DefinitionError>::Ok(
            $crate::Node::Array($crate::ArraySchema::default()),
        )
    };

    // Repeated element
    ([ $elem:tt ; $n:expr ]) => {
        $crate::schema!($elem)
            .map(|node| $crate::Node::Array($crate::ArraySchema::repeat($n, node)))
    };

    ([ $($elem:tt),+ $(,)? ]) => {
        (|| -> ::core::result::Result<$crate::Node, $crate::DefinitionError> {
            ::core::result::Result::Ok($crate::Node::Array($crate::ArraySchema::from_nodes(
                vec![$($crate::schema!($elem)?),+],
            )))
        })()
    };

    ({}) => {
        ::core::result::Result::<$crate::Node, $crate::DefinitionError>::Ok(
            $crate::Node::Object($crate::ObjectSchema::default()),
        )
    };

    ({ $($key:literal : $value:tt),+ $(,)? }) => {
        (|| -> ::core::result::Result<$crate::Node, $crate::DefinitionError> {
            let object = $crate::ObjectSchema::new(vec![
                $(($key, $crate::schema!($value)?)),+
            ])?;
            ::core::result::Result::Ok($crate::Node::Object(object))
        })()
    };

    // Anything else names a type with a Rule
    ($t:ty) => {
        ::core::result::Result::<$crate::Node, $crate::DefinitionError>::Ok(
            <$t as $crate::Rule>::schema(),
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::{ArraySchema, DefinitionError, Node, ObjectSchema, ScalarType};

    #[test]
    fn test_schema_macro_values() {
        assert_eq!(schema!(bool).unwrap(), Node::Value(ScalarType::Bool));
        assert_eq!(schema!(string).unwrap(), Node::Value(ScalarType::Str));
        assert_eq!(schema!(bigint).unwrap(), Node::Value(ScalarType::BigInt));
        assert_eq!(schema!(u16).unwrap(), Node::Value(ScalarType::Int));
    }

    #[test]
    fn test_schema_macro_arrays() {
        assert_eq!(
            schema!([int; 3]).unwrap(),
            Node::Array(ArraySchema::repeat(3, Node::Value(ScalarType::Int)))
        );
        assert_eq!(
            schema!([int, char]).unwrap(),
            Node::Array(ArraySchema::from_nodes(vec![
                Node::Value(ScalarType::Int),
                Node::Value(ScalarType::Char),
            ]))
        );
        assert_eq!(schema!([]).unwrap(), Node::Array(ArraySchema::default()));
    }

    #[test]
    fn test_schema_macro_objects() {
        let expected = ObjectSchema::builder()
            .value("foo-int", ScalarType::Int)
            .value("foo-float", ScalarType::Float)
            .build()
            .unwrap();
        assert_eq!(
            schema!({ "foo-int": int, "foo-float": float }).unwrap(),
            Node::Object(expected)
        );
        assert_eq!(
            schema!({ "outer": { "x": int, "x": int } }).unwrap_err(),
            DefinitionError::DuplicateKey {
                key: "x".to_string()
            }
        );
    }
}
