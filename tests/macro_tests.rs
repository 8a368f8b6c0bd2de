use typed_yaml::{schema, ArraySchema, DefinitionError, Node, NodeKind, ObjectSchema, ScalarType};

#[test]
fn test_schema_macro_scalars() {
    assert_eq!(schema!(bool).unwrap(), Node::Value(ScalarType::Bool));
    assert_eq!(schema!(int).unwrap(), Node::Value(ScalarType::Int));
    assert_eq!(schema!(float).unwrap(), Node::Value(ScalarType::Float));
    assert_eq!(schema!(char).unwrap(), Node::Value(ScalarType::Char));
    assert_eq!(schema!(string).unwrap(), Node::Value(ScalarType::Str));
    assert_eq!(schema!(timestamp).unwrap(), Node::Value(ScalarType::Timestamp));
    assert_eq!(schema!(bigint).unwrap(), Node::Value(ScalarType::BigInt));
}

#[test]
fn test_schema_macro_rule_types() {
    assert_eq!(schema!(i8).unwrap(), Node::Value(ScalarType::Int));
    assert_eq!(schema!(String).unwrap(), Node::Value(ScalarType::Str));
    assert_eq!(
        schema!([f32; 3]).unwrap(),
        Node::Array(ArraySchema::repeat(3, Node::Value(ScalarType::Float)))
    );
}

#[test]
fn test_schema_macro_repeat_count_expression() {
    const N: usize = 4;
    let node = schema!([bool; N]).unwrap();
    assert_eq!(node.leaf_count(), 4);
}

#[test]
fn test_schema_macro_trailing_commas() {
    let a = schema!({ "x": int, "y": int, }).unwrap();
    let b = schema!({ "x": int, "y": int }).unwrap();
    assert_eq!(a, b);
    assert_eq!(schema!([int, float,]).unwrap(), schema!([int, float]).unwrap());
}

#[test]
fn test_schema_macro_matches_builder() {
    let from_macro = schema!({
        "bar-foo": { "foo-int": int, "foo-float": float },
        "int-arr": [int; 3],
    })
    .unwrap();

    let foo = ObjectSchema::builder()
        .value("foo-int", ScalarType::Int)
        .value("foo-float", ScalarType::Float)
        .build()
        .unwrap();
    let from_builder = Node::from(
        ObjectSchema::builder()
            .object("bar-foo", foo)
            .array("int-arr", ArraySchema::repeat(3, Node::Value(ScalarType::Int)))
            .build()
            .unwrap(),
    );

    assert_eq!(from_macro, from_builder);
    assert!(from_macro.lookup("bar-foo", NodeKind::Object).is_ok());
}

#[test]
fn test_schema_macro_duplicate_key_anywhere() {
    let err = schema!({
        "ok": int,
        "inner": [{ "k": int, "k": bool }],
    })
    .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::DuplicateKey {
            key: "k".to_string()
        }
    );
}

#[test]
fn test_schema_macro_outline() {
    let node = schema!({ "name": string, "pos": [float; 2] }).unwrap();
    assert_eq!(
        node.to_string(),
        "name: string\npos: array[2]\n  [0]: float\n  [1]: float\n"
    );
}
