//! # typed_yaml
//!
//! Schema-driven serialization between typed Rust data and a YAML-like text format.
//!
//! ## What is it?
//!
//! A schema declares the shape of some data once: scalar values, fixed-arity arrays
//! whose slots may each have their own type, and objects with named slots in
//! declaration order. An instance binds live data to that shape, either owning its
//! values or forwarding to fields of an existing Rust value. The emitter and the
//! parser both walk the schema, so the text never needs to describe itself.
//!
//! ## Key Features
//!
//! - **Declared order**: output is determined by the schema alone and is byte-for-byte
//!   reproducible
//! - **Strict parsing**: every slot must appear, in order, at the expected
//!   indentation; errors carry the source line number
//! - **Forwarding bindings**: parse straight into the fields of your own types via
//!   [`Rule`], with the borrow checker guarding the targets
//! - **Early definition errors**: duplicate keys, index gaps and arity mismatches
//!   are rejected when the schema or instance is built
//! - **JSON output**: the same traversal feeds a JSON emitter
//!
//! ## Quick Start
//!
//! ```rust
//! use typed_yaml::{schema, Instance, Scalar};
//!
//! let foo = schema!({ "foo-int": int, "foo-float": float }).unwrap();
//! let inst = Instance::bind_owned(&foo, [Scalar::Int(5), Scalar::Float(0.5)]).unwrap();
//!
//! let text = typed_yaml::to_string(&inst);
//! assert_eq!(text, "foo-int: 5\nfoo-float: 0.5\n");
//!
//! let back = typed_yaml::from_str(&foo, &text).unwrap();
//! assert_eq!(back, inst);
//! ```
//!
//! ### Binding your own types
//!
//! ```rust
//! use typed_yaml::{decode_into, encode};
//!
//! let mut pos: (i32, f64, String) = (1, 2.5, "north".to_string());
//! let text = encode(&pos);
//! assert_eq!(text, "- 1\n- 2.5\n- \"north\"\n");
//!
//! decode_into(&mut pos, "- 7\n- 0.25\n- \"south\"\n").unwrap();
//! assert_eq!(pos, (7, 0.25, "south".to_string()));
//! ```
//!
//! ### Errors name the line
//!
//! ```rust
//! use typed_yaml::schema;
//!
//! let foo = schema!({ "foo-int": int, "foo-float": float }).unwrap();
//! let err = typed_yaml::from_str(&foo, "foo-int: 5\n    foo-float: 0.5\n").unwrap_err();
//! assert_eq!(err.to_string(), "line (2): invalid indent: overindented");
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: declaring shapes
//! - [`instance`]: binding data to a shape
//! - [`traverse`]: declared-order iteration shared by every format
//! - [`ser`] / [`de`]: the YAML emitter and parser
//! - [`json`]: the JSON emitter
//! - [`format`]: a description of the text format
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Forwarding instances borrow their targets; they cannot outlive them
//! - Parse errors abort the whole parse; no partial recovery is attempted

#[macro_use]
pub mod macros;

pub mod de;
pub mod error;
pub mod format;
mod indent;
pub mod instance;
pub mod json;
pub mod map;
pub mod options;
pub mod rule;
pub mod schema;
pub mod ser;
pub mod traverse;
pub mod value;

pub use de::Parser;
pub use error::{DefinitionError, Error, Result, ScalarError, StructuralError};
pub use instance::{Binding, Instance, Leaf};
pub use json::JsonEmitter;
pub use map::SlotMap;
pub use options::{JsonOptions, ParseOptions};
pub use rule::Rule;
pub use schema::{ArraySchema, Node, NodeKind, ObjectSchema, ObjectSchemaBuilder};
pub use ser::Emitter;
pub use traverse::{Locator, Slots, SlotsMut, Traverse, TraverseMut};
pub use value::{Primitive, Scalar, ScalarType};

use std::io;

/// Emits an instance as a root YAML document.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::{schema, Instance, Scalar};
///
/// let point = schema!({ "x": int, "y": int }).unwrap();
/// let inst = Instance::bind_owned(&point, [Scalar::Int(1), Scalar::Int(2)]).unwrap();
/// assert_eq!(typed_yaml::to_string(&inst), "x: 1\ny: 2\n");
/// ```
#[must_use]
pub fn to_string(instance: &Instance<'_>) -> String {
    let mut emitter = Emitter::new();
    emitter.emit(instance);
    emitter.into_inner()
}

/// Emits an instance as the field `key` of an enclosing object.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::Instance;
///
/// assert_eq!(typed_yaml::to_string_keyed(&Instance::owned(true), "on"), "on: true\n");
/// ```
#[must_use]
pub fn to_string_keyed(instance: &Instance<'_>, key: &str) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_keyed(instance, key);
    emitter.into_inner()
}

/// Emits an instance as a root YAML document into a writer.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, instance: &Instance<'_>) -> Result<()>
where
    W: io::Write,
{
    let text = to_string(instance);
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parses a root YAML document into a fresh owning instance of `schema`.
///
/// Slots set to `null` or left empty in the text stay unbound.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::{schema, Scalar};
///
/// let arr = schema!({ "nums": [int; 3] }).unwrap();
/// let inst = typed_yaml::from_str(&arr, "nums:\n  - 9\n  - 7\n  - 5\n").unwrap();
/// assert_eq!(inst.get("nums").unwrap().value_at(2usize).unwrap(), Some(Scalar::Int(5)));
/// ```
///
/// # Errors
///
/// Returns a structural, value or end-of-input error carrying the offending line.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(schema: &Node, s: &str) -> Result<Instance<'static>> {
    from_str_with_options(schema, s, ParseOptions::default())
}

/// Like [`from_str`], with explicit parser options.
///
/// # Errors
///
/// As [`from_str`]; with [`ParseOptions::strict`], content after the document is
/// also an error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(
    schema: &Node,
    s: &str,
    options: ParseOptions,
) -> Result<Instance<'static>> {
    let mut instance = Instance::new(schema);
    Parser::with_options(s.as_bytes(), options).parse_into(&mut instance)?;
    Ok(instance)
}

/// Parses a root YAML document from a reader into a fresh owning instance.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::schema;
/// use std::io::Cursor;
///
/// let foo = schema!({ "n": int }).unwrap();
/// let inst = typed_yaml::from_reader(&foo, Cursor::new(b"n: 3\n")).unwrap();
/// assert_eq!(typed_yaml::to_string(&inst), "n: 3\n");
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the text does not match `schema`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(schema: &Node, reader: R) -> Result<Instance<'static>>
where
    R: io::Read,
{
    let mut instance = Instance::new(schema);
    parse_reader_into(&mut instance, reader)?;
    Ok(instance)
}

/// Parses a root YAML document into an existing instance, writing through its
/// bindings.
///
/// # Errors
///
/// Returns a structural, value or end-of-input error carrying the offending line.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_into(instance: &mut Instance<'_>, s: &str) -> Result<()> {
    Parser::from_str(s).parse_into(instance)
}

/// Like [`parse_into`], reading from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails or the text does not match the instance.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader_into<R>(instance: &mut Instance<'_>, reader: R) -> Result<()>
where
    R: io::Read,
{
    Parser::new(io::BufReader::new(reader)).parse_into(instance)
}

/// Emits an instance as pretty-printed JSON.
#[must_use]
pub fn to_json_string(instance: &Instance<'_>) -> String {
    to_json_string_with_options(instance, JsonOptions::default())
}

/// Emits an instance as JSON with the given layout.
#[must_use]
pub fn to_json_string_with_options(instance: &Instance<'_>, options: JsonOptions) -> String {
    let mut emitter = JsonEmitter::new(options);
    emitter.emit(instance);
    emitter.into_inner()
}

/// Emits any [`Rule`] type as a root YAML document.
#[must_use]
pub fn encode<T: Rule>(value: &T) -> String {
    to_string(&value.to_instance())
}

/// Parses a root YAML document straight into the fields of `value`.
///
/// On error, fields read before the failing line keep their new values.
///
/// # Errors
///
/// Returns a structural, value or end-of-input error carrying the offending line.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_into<T: Rule>(value: &mut T, s: &str) -> Result<()> {
    parse_into(&mut value.bind(), s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo() -> Node {
        schema!({ "foo-int": int, "foo-float": float }).unwrap()
    }

    #[test]
    fn test_emit_and_parse_roundtrip() {
        let inst = Instance::bind_owned(&foo(), [Scalar::Int(5), Scalar::Float(0.5)]).unwrap();
        let text = to_string(&inst);
        assert_eq!(text, "foo-int: 5\nfoo-float: 0.5\n");
        assert_eq!(from_str(&foo(), &text).unwrap(), inst);
    }

    #[test]
    fn test_to_writer() {
        let inst = Instance::bind_owned(&foo(), [Scalar::Int(1), Scalar::Float(2.5)]).unwrap();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &inst).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "foo-int: 1\nfoo-float: 2.5\n");
    }

    #[test]
    fn test_parse_into_forwarding() {
        let mut n = 0i32;
        let mut f = 0.0f64;
        {
            let targets: Vec<&mut dyn Primitive> = vec![&mut n, &mut f];
            let mut inst = Instance::bind_forwarding(&foo(), targets).unwrap();
            parse_into(&mut inst, "foo-int: 12\nfoo-float: -3.5\n").unwrap();
        }
        assert_eq!((n, f), (12, -3.5));
    }

    #[test]
    fn test_from_reader_reports_lines() {
        let err = from_reader(&foo(), "foo-int: x\n".as_bytes()).unwrap_err();
        assert!(err.is_value());
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_encode_decode_array() {
        let mut values = [1u8, 2, 3];
        assert_eq!(encode(&values), "- 1\n- 2\n- 3\n");
        decode_into(&mut values, "- 4\n- 5\n- 6\n").unwrap();
        assert_eq!(values, [4, 5, 6]);

        let err = decode_into(&mut values, "- 4\n- 500\n- 6\n").unwrap_err();
        assert!(err.is_value());
        assert_eq!(err.line(), Some(2));
    }
}
