//! JSON emission over the same traversal as the YAML emitter.
//!
//! JSON needs to know where a sibling sits among its peers, since only the last one
//! goes without a trailing comma. The exact-size [`Slots`](crate::Slots) iterator
//! supplies the count; nothing else differs from the YAML walk.
//!
//! ```rust
//! use typed_yaml::{schema, Instance, JsonOptions, Scalar};
//!
//! let foo = schema!({ "foo-int": int, "foo-arr": [int; 2] }).unwrap();
//! let inst = Instance::bind_owned(&foo, [Scalar::Int(5), Scalar::Int(1), Scalar::Int(2)]).unwrap();
//!
//! assert_eq!(
//!     typed_yaml::to_json_string(&inst),
//!     "{\n  \"foo-int\": 5,\n  \"foo-arr\": [\n    1,\n    2\n  ]\n}"
//! );
//! assert_eq!(
//!     typed_yaml::to_json_string_with_options(&inst, JsonOptions::compact()),
//!     r#"{"foo-int":5,"foo-arr":[1,2]}"#
//! );
//! ```

use crate::instance::Instance;
use crate::options::JsonOptions;
use crate::traverse::Traverse;
use crate::value::Scalar;
use chrono::SecondsFormat;
use tracing::debug;

/// The JSON emitter.
#[derive(Debug)]
pub struct JsonEmitter {
    output: String,
    options: JsonOptions,
}

impl JsonEmitter {
    #[must_use]
    pub fn new(options: JsonOptions) -> Self {
        JsonEmitter {
            output: String::with_capacity(256),
            options,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    pub fn emit(&mut self, instance: &Instance<'_>) {
        debug!(kind = %instance.kind(), pretty = self.options.pretty, "emitting json document");
        self.node(instance, 0);
    }

    fn node(&mut self, node: &Instance<'_>, depth: usize) {
        if let Instance::Value(leaf) = node {
            match leaf.get() {
                Some(value) => self.write_scalar(&value),
                None => self.output.push_str("null"),
            }
            return;
        }

        let (open, close) = if node.is_array() { ('[', ']') } else { ('{', '}') };
        let count = node.slot_count();
        self.output.push(open);
        if count == 0 {
            self.output.push(close);
            return;
        }

        for (position, (locator, child)) in node.slots().enumerate() {
            self.write_newline(depth + 1);
            if let Some(key) = locator.key() {
                write_json_string(&mut self.output, key);
                self.output.push(':');
                if self.options.pretty {
                    self.output.push(' ');
                }
            }
            self.node(child, depth + 1);
            if position + 1 < count {
                self.output.push(',');
            }
        }
        self.write_newline(depth);
        self.output.push(close);
    }

    fn write_newline(&mut self, depth: usize) {
        if self.options.pretty {
            self.output.push('\n');
            for _ in 0..depth * self.options.indent {
                self.output.push(' ');
            }
        }
    }

    fn write_scalar(&mut self, value: &Scalar) {
        match value {
            Scalar::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Scalar::Int(i) => self.output.push_str(&i.to_string()),
            // Debug keeps a fractional part on whole numbers
            Scalar::Float(f) if f.is_finite() => self.output.push_str(&format!("{:?}", f)),
            Scalar::Float(_) => self.output.push_str("null"),
            Scalar::Char(c) => write_json_string(&mut self.output, c.encode_utf8(&mut [0; 4])),
            Scalar::Str(s) => write_json_string(&mut self.output, s),
            Scalar::Timestamp(dt) => write_json_string(
                &mut self.output,
                &dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            Scalar::BigInt(n) => write_json_string(&mut self.output, &n.to_string()),
        }
    }
}

impl Default for JsonEmitter {
    fn default() -> Self {
        JsonEmitter::new(JsonOptions::default())
    }
}

#[inline]
fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArraySchema, Node, ObjectSchema};
    use crate::value::ScalarType;
    use num_bigint::BigInt;

    fn emit(instance: &Instance<'_>, options: JsonOptions) -> String {
        let mut emitter = JsonEmitter::new(options);
        emitter.emit(instance);
        emitter.into_inner()
    }

    #[test]
    fn test_scalars() {
        let compact = JsonOptions::compact;
        assert_eq!(emit(&Instance::owned(1.0), compact()), "1.0");
        assert_eq!(emit(&Instance::owned(f64::NAN), compact()), "null");
        assert_eq!(emit(&Instance::owned('"'), compact()), "\"\\\"\"");
        assert_eq!(emit(&Instance::owned("a\u{1}"), compact()), "\"a\\u0001\"");
        assert_eq!(
            emit(&Instance::owned(BigInt::from(12345u32) * BigInt::from(1_000_000_000_000u64)), compact()),
            "\"12345000000000000\""
        );
        assert_eq!(emit(&Instance::unbound(ScalarType::Int), compact()), "null");
    }

    #[test]
    fn test_empty_containers() {
        let empty_obj = Node::from(ObjectSchema::default());
        let empty_arr = Node::from(ArraySchema::default());
        assert_eq!(emit(&Instance::new(&empty_obj), JsonOptions::new()), "{}");
        assert_eq!(emit(&Instance::new(&empty_arr), JsonOptions::new()), "[]");
    }

    #[test]
    fn test_pretty_indent_width() {
        let schema = Node::from(ArraySchema::repeat(2, Node::Value(ScalarType::Bool)));
        let inst = Instance::bind_owned(&schema, [Scalar::Bool(true), Scalar::Bool(false)]).unwrap();
        assert_eq!(
            emit(&inst, JsonOptions::new().with_indent(4)),
            "[\n    true,\n    false\n]"
        );
    }
}
