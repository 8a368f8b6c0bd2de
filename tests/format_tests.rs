//! Layout checks for the YAML and JSON text formats.
//!
//! Each test pins the exact bytes produced for a shape, then reads them back.

use typed_yaml::{
    from_str, from_str_with_options, schema, to_json_string, to_json_string_with_options,
    to_string, Error, Instance, JsonOptions, Node, ParseOptions, Scalar, StructuralError,
};

fn ints(values: &[i64]) -> Vec<Scalar> {
    values.iter().copied().map(Scalar::Int).collect()
}

fn assert_layout(schema: &Node, values: Vec<Scalar>, expected: &str) {
    let inst = Instance::bind_owned(schema, values).unwrap();
    let text = to_string(&inst);
    assert_eq!(text, expected);
    assert_eq!(to_string(&inst), text, "emission must be deterministic");
    assert_eq!(from_str(schema, &text).unwrap(), inst);
}

#[test]
fn test_root_scalar() {
    assert_layout(&schema!(int).unwrap(), ints(&[42]), "42\n");
}

#[test]
fn test_array_of_arrays() {
    let schema = schema!([[int; 2]; 2]).unwrap();
    assert_layout(&schema, ints(&[1, 2, 3, 4]), "- - 1\n  - 2\n- - 3\n  - 4\n");
}

#[test]
fn test_three_levels_of_arrays() {
    let schema = schema!([[[int; 2]; 1]; 2]).unwrap();
    assert_layout(
        &schema,
        ints(&[1, 2, 3, 4]),
        "- - - 1\n    - 2\n- - - 3\n    - 4\n",
    );
}

#[test]
fn test_array_of_objects() {
    let schema = schema!([{ "x": int, "y": int }; 2]).unwrap();
    assert_layout(
        &schema,
        ints(&[1, 2, 3, 4]),
        "- x: 1\n  y: 2\n- x: 3\n  y: 4\n",
    );
}

#[test]
fn test_object_holding_arrays_of_objects() {
    let schema = schema!({
        "points": [{ "x": int, "tags": [int; 2] }; 2],
        "count": int,
    })
    .unwrap();
    assert_layout(
        &schema,
        ints(&[1, 10, 11, 2, 20, 21, 2]),
        "points:\n  - x: 1\n    tags:\n      - 10\n      - 11\n  - x: 2\n    tags:\n      - 20\n      - 21\ncount: 2\n",
    );
}

#[test]
fn test_array_element_starting_with_keyed_array() {
    let schema = schema!([{ "nums": [int; 2], "n": int }]).unwrap();
    assert_layout(
        &schema,
        ints(&[1, 2, 3]),
        "- nums:\n    - 1\n    - 2\n  n: 3\n",
    );
}

#[test]
fn test_empty_containers() {
    let schema = schema!({ "empty": {}, "none": [], "n": int }).unwrap();
    assert_layout(&schema, ints(&[1]), "empty:\nnone:\nn: 1\n");
}

#[test]
fn test_empty_element_keeps_enclosing_dash() {
    assert_layout(&schema!([[[], int]]).unwrap(), ints(&[1]), "- - 1\n");
    assert_layout(&schema!([[{}, [], int]]).unwrap(), ints(&[1]), "- - 1\n");
    assert_layout(&schema!({ "a": [[[], int]] }).unwrap(), ints(&[1]), "a:\n  - - 1\n");
    assert_layout(&schema!([[], [[], int], int]).unwrap(), ints(&[1, 2]), "- - 1\n- 2\n");
}

#[test]
fn test_string_escapes() {
    let schema = schema!({ "s": string }).unwrap();
    assert_layout(
        &schema,
        vec![Scalar::from("tab\there\nnewline \\ \"quoted\"")],
        "s: \"tab\\there\\nnewline \\\\ \\\"quoted\\\"\"\n",
    );
}

#[test]
fn test_string_that_looks_like_null() {
    let schema = schema!({ "s": string, "e": string }).unwrap();
    assert_layout(
        &schema,
        vec![Scalar::from("null"), Scalar::from("")],
        "s: \"null\"\ne: \"\"\n",
    );
}

#[test]
fn test_quoted_numbers_are_accepted() {
    let schema = schema!({ "n": int, "b": bool }).unwrap();
    let inst = from_str(&schema, "n: \"5\"\nb: \"true\"\n").unwrap();
    assert_eq!(inst.leaves(), vec![Some(Scalar::Int(5)), Some(Scalar::Bool(true))]);
}

#[test]
fn test_quoted_keys() {
    let schema = schema!({ "a: b": int, "#tag": int }).unwrap();
    assert_layout(&schema, ints(&[1, 2]), "\"a: b\": 1\n\"#tag\": 2\n");
}

#[test]
fn test_under_indented_element() {
    let schema = schema!({ "outer": { "inner": int } }).unwrap();
    let err = from_str(&schema, "outer:\ninner: 1\n").unwrap_err();
    match err {
        Error::Structural {
            line: 2,
            kind: StructuralError::Indent { expected, found },
        } => {
            assert_eq!(expected, "  ");
            assert_eq!(found, "in");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_dash_where_key_expected() {
    let schema = schema!({ "arr": [int; 1] }).unwrap();
    let err = from_str(&schema, "arr:\n  -  1\n").unwrap_err();
    assert_eq!(
        err,
        Error::Structural {
            line: 2,
            kind: StructuralError::Overindented
        }
    );
}

#[test]
fn test_strict_parse_rejects_trailing_lines() {
    let schema = schema!({ "n": int }).unwrap();
    assert!(from_str(&schema, "n: 1\n# only a comment\n\n").is_ok());
    assert!(from_str_with_options(&schema, "n: 1\n# only a comment\n\n", ParseOptions::strict()).is_ok());

    let err = from_str_with_options(&schema, "n: 1\nm: 2\n", ParseOptions::strict()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "line (2): unexpected trailing content \"m: 2\""
    );
}

#[test]
fn test_json_pretty_layout() {
    let schema = schema!({
        "name": string,
        "pos": [float; 2],
        "meta": { "ok": bool, "empty": [] },
    })
    .unwrap();
    let inst = Instance::bind_owned(
        &schema,
        vec![
            Scalar::from("a\"b"),
            Scalar::Float(1.0),
            Scalar::Float(-0.5),
            Scalar::Bool(true),
        ],
    )
    .unwrap();
    assert_eq!(
        to_json_string(&inst),
        "{\n  \"name\": \"a\\\"b\",\n  \"pos\": [\n    1.0,\n    -0.5\n  ],\n  \"meta\": {\n    \"ok\": true,\n    \"empty\": []\n  }\n}"
    );
    assert_eq!(
        to_json_string_with_options(&inst, JsonOptions::compact()),
        r#"{"name":"a\"b","pos":[1.0,-0.5],"meta":{"ok":true,"empty":[]}}"#
    );
}

#[test]
fn test_json_unbound_is_null() {
    let schema = schema!({ "a": int, "b": [char; 1] }).unwrap();
    let inst = Instance::new(&schema);
    assert_eq!(
        to_json_string_with_options(&inst, JsonOptions::compact()),
        r#"{"a":null,"b":[null]}"#
    );
}
