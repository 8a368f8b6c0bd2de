//! YAML emission.
//!
//! This module provides the [`Emitter`], which writes a bound [`Instance`] as
//! indented YAML-like text.
//!
//! ## Overview
//!
//! The layout follows the schema and nothing else:
//!
//! - **Values** are written as `key: token`, or as a bare token inside an array
//! - **Keyed arrays and objects** get a `key:` header line and indent their
//!   children by two spaces
//! - **Array elements** are introduced by `- `; nested elements and object fields
//!   of an element line up under the first character after the dash
//! - **Unbound leaves** are written as `null`
//!
//! Output depends only on declaration order and current leaf values, so emitting
//! the same instance twice gives identical bytes.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use typed_yaml::{schema, Instance, Scalar};
//!
//! let nums = schema!([int; 3]).unwrap();
//! let inst = Instance::bind_owned(&nums, [Scalar::Int(9), Scalar::Int(7), Scalar::Int(5)]).unwrap();
//!
//! assert_eq!(typed_yaml::to_string(&inst), "- 9\n- 7\n- 5\n");
//! assert_eq!(
//!     typed_yaml::to_string_keyed(&inst, "nums"),
//!     "nums:\n  - 9\n  - 7\n  - 5\n"
//! );
//! ```
//!
//! ## Direct Emitter Usage
//!
//! An emitter can append several documents to one buffer:
//!
//! ```rust
//! use typed_yaml::{Emitter, Instance};
//!
//! let mut emitter = Emitter::new();
//! emitter.emit_keyed(&Instance::owned(1), "a");
//! emitter.emit_keyed(&Instance::owned("x"), "b");
//! assert_eq!(emitter.into_inner(), "a: 1\nb: \"x\"\n");
//! ```

use crate::indent::{Indent, Token};
use crate::instance::Instance;
use crate::traverse::Traverse;
use crate::value::write_quoted;
use tracing::debug;

/// The YAML emitter.
///
/// Accumulates text in an internal buffer; see [`Emitter::into_inner`].
#[derive(Debug, Default)]
pub struct Emitter {
    output: String,
}

impl Emitter {
    /// Creates an emitter with an empty output buffer.
    #[must_use]
    pub fn new() -> Self {
        Emitter {
            output: String::with_capacity(256),
        }
    }

    /// Consumes the emitter, returning the text written so far.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes `instance` as a root document, with no key and no indentation.
    pub fn emit(&mut self, instance: &Instance<'_>) {
        debug!(kind = %instance.kind(), "emitting yaml document");
        self.node(instance, None, Indent::new());
    }

    /// Writes `instance` as the field `key` of an enclosing object.
    pub fn emit_keyed(&mut self, instance: &Instance<'_>, key: &str) {
        debug!(key, kind = %instance.kind(), "emitting keyed yaml document");
        self.node(instance, Some(key), Indent::new());
    }

    /// Writes one node and reports whether it produced any line. Only a line that was
    /// actually written may use up the dashes in `indent`.
    fn node(&mut self, node: &Instance<'_>, key: Option<&str>, mut indent: Indent) -> bool {
        if let Instance::Value(leaf) = node {
            indent.write_prefix(&mut self.output);
            if let Some(key) = key {
                write_key(&mut self.output, key);
                self.output.push_str(": ");
            }
            match leaf.get() {
                Some(value) => value.write_token(&mut self.output),
                None => self.output.push_str("null"),
            }
            self.output.push('\n');
            return true;
        }

        let mut written = false;
        if let Some(key) = key {
            indent.write_prefix(&mut self.output);
            write_key(&mut self.output, key);
            self.output.push_str(":\n");
            indent = indent.descend();
            written = true;
        }

        let array = node.is_array();
        node.for_each_slot(|locator, child| {
            let child_indent = if array {
                indent.with(Token::Dash)
            } else {
                indent.clone()
            };
            if self.node(child, locator.key(), child_indent) {
                indent.settle();
                written = true;
            }
        });
        written
    }
}

/// Writes a key, quoting it when it could not be read back verbatim.
fn write_key(out: &mut String, key: &str) {
    if key_needs_quotes(key) {
        write_quoted(out, key);
    } else {
        out.push_str(key);
    }
}

#[inline]
fn key_needs_quotes(key: &str) -> bool {
    key.is_empty()
        || key.contains([':', '#', '"', '\n', '\r', '\t'])
        || key.starts_with(' ')
        || key.ends_with(' ')
}
