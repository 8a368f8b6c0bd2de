//! YAML parsing.
//!
//! This module provides the [`Parser`], which reads YAML-like text into a bound
//! [`Instance`], guided entirely by the instance's schema.
//!
//! ## Overview
//!
//! The parser never guesses at structure. It walks the instance in declared order
//! and, for each slot, demands exactly one source line:
//!
//! - **Value slots** consume one `key: token` line (a bare token inside an array)
//! - **Keyed arrays and objects** consume one `key:` header line with no value
//! - **Array elements** expect one more `- ` marker in front of their first line
//!
//! Blank lines and `#` comments are skipped. A line that does not start with the
//! expected indentation, carries extra leading whitespace, names another key, or
//! holds a token that does not convert to the declared type stops the parse with an
//! error naming the line. The bare token `null` and an empty value leave a leaf as it
//! was.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use typed_yaml::{schema, Scalar};
//!
//! let foo = schema!({ "foo-int": int, "foo-float": float }).unwrap();
//! let inst = typed_yaml::from_str(&foo, "foo-int: 5\nfoo-float: 0.5\n").unwrap();
//! assert_eq!(inst.value_at("foo-float").unwrap(), Some(Scalar::Float(0.5)));
//! ```
//!
//! ## Direct Parser Usage
//!
//! A parser reads from any [`BufRead`] and may be driven piece by piece:
//!
//! ```rust
//! use typed_yaml::{Instance, Parser, ScalarType};
//!
//! let mut parser = Parser::from_str("# header\na: 1\nb: \"two\"\n");
//! let mut a = Instance::unbound(ScalarType::Int);
//! let mut b = Instance::unbound(ScalarType::Str);
//! parser.parse_keyed(&mut a, "a").unwrap();
//! parser.parse_keyed(&mut b, "b").unwrap();
//! assert_eq!(parser.line(), 3);
//! assert_eq!(b.value().unwrap().to_string(), "\"two\"");
//! ```

use crate::error::{Error, Result, StructuralError};
use crate::indent::{Indent, Token};
use crate::instance::Instance;
use crate::options::ParseOptions;
use crate::traverse::TraverseMut;
use crate::value::{unquote, Scalar};
use std::io::BufRead;
use tracing::{debug, trace};

/// The YAML parser.
///
/// Reads significant lines from `R` one at a time and keeps the current line number
/// for error reporting.
pub struct Parser<R> {
    reader: R,
    line: usize,
    buffer: String,
    options: ParseOptions,
}

impl<'a> Parser<&'a [u8]> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Parser::new(input.as_bytes())
    }
}

impl<R: BufRead> Parser<R> {
    /// Creates a parser over `reader` with default options.
    pub fn new(reader: R) -> Self {
        Parser::with_options(reader, ParseOptions::default())
    }

    /// Creates a parser over `reader`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_yaml::{schema, Instance, ParseOptions, Parser};
    ///
    /// let foo = schema!({ "n": int }).unwrap();
    /// let mut inst = Instance::new(&foo);
    /// let mut parser = Parser::with_options("n: 1\nextra: 2\n".as_bytes(), ParseOptions::strict());
    /// assert!(parser.parse_into(&mut inst).is_err());
    /// ```
    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Parser {
            reader,
            line: 0,
            buffer: String::with_capacity(128),
            options,
        }
    }

    /// The number of source lines read so far, which is the 1-based number of the
    /// last line returned.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the next line holding anything other than whitespace and comments,
    /// with any comment removed, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the reader fails.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let raw = self.buffer.trim_end_matches(['\n', '\r']);
            let content = strip_comment(raw);
            if content.trim_matches(is_blank).is_empty() {
                continue;
            }
            trace!(line = self.line, content, "read line");
            return Ok(Some(content.to_string()));
        }
    }

    /// Like [`Parser::next_line`], but end of input is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEof`] mentioning `expected` if the input is exhausted.
    pub fn expect_line(&mut self, expected: &str) -> Result<String> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(Error::unexpected_eof(self.line, expected)),
        }
    }

    /// Reads `instance` as a root document.
    ///
    /// # Errors
    ///
    /// Returns the first structural, value or end-of-input error encountered.
    pub fn parse_into(&mut self, instance: &mut Instance<'_>) -> Result<()> {
        debug!(line = self.line, kind = %instance.kind(), "parsing yaml document");
        self.node(instance, None, Indent::new())?;
        self.finish()
    }

    /// Reads `instance` as the field `key` of an enclosing object.
    ///
    /// # Errors
    ///
    /// As [`Parser::parse_into`].
    pub fn parse_keyed(&mut self, instance: &mut Instance<'_>, key: &str) -> Result<()> {
        debug!(line = self.line, key, kind = %instance.kind(), "parsing keyed yaml document");
        self.node(instance, Some(key), Indent::new())?;
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        if !self.options.reject_trailing {
            return Ok(());
        }
        match self.next_line()? {
            Some(content) => Err(Error::structural(
                self.line,
                StructuralError::TrailingContent {
                    content: content.trim_matches(is_blank).to_string(),
                },
            )),
            None => Ok(()),
        }
    }

    /// Reads one node and reports whether it consumed any line, mirroring the emitter.
    fn node(
        &mut self,
        node: &mut Instance<'_>,
        key: Option<&str>,
        mut indent: Indent,
    ) -> Result<bool> {
        if let Instance::Value(leaf) = &mut *node {
            let line = self.expect_line(&describe("value", key))?;
            let rest = self.strip_indent(&line, &indent)?;
            let (found, token) = split_entry(rest);
            let found = key_text(found);

            if key.map_or(!found.is_empty(), |key| key != found) {
                return Err(Error::structural(
                    self.line,
                    StructuralError::KeyMismatch {
                        expected: key.map(str::to_string),
                        found,
                    },
                ));
            }
            if token.is_empty() || token == "null" {
                return Ok(true);
            }

            let line_no = self.line;
            let value = Scalar::parse(leaf.scalar_type(), token)
                .map_err(|source| Error::value(line_no, source))?;
            leaf.set(value).map_err(|source| Error::value(line_no, source))?;
            return Ok(true);
        }

        let mut consumed = false;

        if let Some(key) = key {
            let line = self.expect_line(&describe("header", Some(key)))?;
            let rest = self.strip_indent(&line, &indent)?;
            let (found, token) = split_entry(rest);
            let found = key_text(found);

            if found != key {
                return Err(Error::structural(
                    self.line,
                    StructuralError::KeyMismatch {
                        expected: Some(key.to_string()),
                        found,
                    },
                ));
            }
            if !token.is_empty() {
                return Err(Error::structural(
                    self.line,
                    StructuralError::UnexpectedValue {
                        key: key.to_string(),
                        value: token.to_string(),
                    },
                ));
            }
            debug!(line = self.line, key, kind = %node.kind(), "entered container");
            indent = indent.descend();
            consumed = true;
        }

        let array = node.is_array();
        node.try_for_each_slot_mut(|locator, child| {
            let child_indent = if array {
                indent.with(Token::Dash)
            } else {
                indent.clone()
            };
            if self.node(child, locator.key(), child_indent)? {
                indent.settle();
                consumed = true;
            }
            Ok::<(), Error>(())
        })?;
        Ok(consumed)
    }

    /// Removes the expected prefix; what remains must start with content.
    fn strip_indent<'l>(&self, line: &'l str, indent: &Indent) -> Result<&'l str> {
        let prefix = indent.prefix();
        let rest = match line.strip_prefix(prefix.as_str()) {
            Some(rest) => rest,
            None => {
                let found: String = line.chars().take(prefix.chars().count()).collect();
                return Err(Error::structural(
                    self.line,
                    StructuralError::Indent {
                        expected: prefix,
                        found,
                    },
                ));
            }
        };
        if rest.is_empty() || rest.starts_with(is_blank) {
            return Err(Error::structural(self.line, StructuralError::Overindented));
        }
        Ok(rest)
    }
}

#[inline]
fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

fn describe(what: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("{} for \"{}\"", what, key),
        None => format!("array element {}", what),
    }
}

/// Cuts a line at the first `#` that is not inside a double-quoted token.
fn strip_comment(line: &str) -> &str {
    match find_unquoted(line, '#') {
        Some(at) => &line[..at],
        None => line,
    }
}

/// Splits a line at its first unquoted `:` into a trimmed key and a trimmed value.
/// A line without one is all value.
fn split_entry(line: &str) -> (&str, &str) {
    match find_unquoted(line, ':') {
        Some(at) => (
            line[..at].trim_matches(is_blank),
            line[at + 1..].trim_matches(is_blank),
        ),
        None => ("", line.trim_matches(is_blank)),
    }
}

/// The key a raw key token names, with one pair of quotes removed.
fn key_text(raw: &str) -> String {
    unquote(raw).unwrap_or_else(|_| raw.to_string())
}

fn find_unquoted(line: &str, target: char) -> Option<usize> {
    let mut quoted = false;
    let mut escaped = false;
    for (at, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            _ if ch == target && !quoted => return Some(at),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArraySchema, Node, ObjectSchema};
    use crate::value::ScalarType;

    fn foo() -> Node {
        Node::from(
            ObjectSchema::builder()
                .value("foo-int", ScalarType::Int)
                .value("foo-float", ScalarType::Float)
                .build()
                .unwrap(),
        )
    }

    fn parse(schema: &Node, input: &str) -> Result<Instance<'static>> {
        let mut instance = Instance::new(schema);
        Parser::from_str(input).parse_into(&mut instance)?;
        Ok(instance)
    }

    #[test]
    fn test_split_entry_respects_quotes() {
        assert_eq!(split_entry("key: value"), ("key", "value"));
        assert_eq!(split_entry("\"a:b\": \"c:d\""), ("\"a:b\"", "\"c:d\""));
        assert_eq!(split_entry("\"x: y\""), ("", "\"x: y\""));
        assert_eq!(split_entry("header:"), ("header", ""));
        assert_eq!(split_entry("9"), ("", "9"));
    }

    #[test]
    fn test_strip_comment_respects_quotes() {
        assert_eq!(strip_comment("a: 1 # note"), "a: 1 ");
        assert_eq!(strip_comment("a: \"#1\" # note"), "a: \"#1\" ");
        assert_eq!(strip_comment("a: \"\\\"#\""), "a: \"\\\"#\"");
        assert_eq!(strip_comment("# whole line"), "");
    }

    #[test]
    fn test_next_line_skips_blank_and_comments() {
        let mut parser = Parser::from_str("\n  \n# c\n  # c\na: 1\n");
        assert_eq!(parser.next_line().unwrap().as_deref(), Some("a: 1"));
        assert_eq!(parser.line(), 5);
        assert_eq!(parser.next_line().unwrap(), None);
    }

    #[test]
    fn test_parse_object() {
        let inst = parse(&foo(), "foo-int: 5\nfoo-float: 0.5\n").unwrap();
        assert_eq!(inst.leaves(), vec![Some(Scalar::Int(5)), Some(Scalar::Float(0.5))]);
    }

    #[test]
    fn test_null_and_empty_leave_leaf_alone() {
        let inst = parse(&foo(), "foo-int: null\nfoo-float:\n").unwrap();
        assert_eq!(inst.leaves(), vec![None, None]);
    }

    #[test]
    fn test_parse_value_error() {
        let err = parse(&foo(), "foo-int: 5\nfoo-float: notanumber\n").unwrap_err();
        assert!(err.is_value());
        assert_eq!(err.line(), Some(2));
        assert_eq!(
            err.to_string(),
            "line (2): failed to parse value: invalid float \"notanumber\""
        );
    }

    #[test]
    fn test_parse_overindented() {
        let err = parse(&foo(), "foo-int: 5\n  foo-float: 0.5\n").unwrap_err();
        assert_eq!(
            err,
            Error::Structural {
                line: 2,
                kind: StructuralError::Overindented
            }
        );
    }

    #[test]
    fn test_parse_key_mismatch() {
        let err = parse(&foo(), "wrong-key: 5\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line (1): invalid key: want \"foo-int\", have \"wrong-key\""
        );
    }

    #[test]
    fn test_parse_unexpected_eof() {
        let err = parse(&foo(), "foo-int: 5\n\n# trailing comment\n").unwrap_err();
        assert!(err.is_eof());
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_parse_header_rules() {
        let nums = ArraySchema::repeat(2, Node::Value(ScalarType::Int));
        let schema = Node::from(ObjectSchema::builder().array("nums", nums).build().unwrap());

        let inst = parse(&schema, "nums:\n  - 1\n  - 2\n").unwrap();
        assert_eq!(inst.leaves(), vec![Some(Scalar::Int(1)), Some(Scalar::Int(2))]);

        let err = parse(&schema, "nums: 3\n  - 1\n  - 2\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Structural {
                line: 1,
                kind: StructuralError::UnexpectedValue { .. }
            }
        ));

        let err = parse(&schema, "nums:\n- 1\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Structural {
                line: 2,
                kind: StructuralError::Indent { .. }
            }
        ));
    }

    #[test]
    fn test_unkeyed_element_rejects_key() {
        let schema = Node::from(ArraySchema::repeat(1, Node::Value(ScalarType::Int)));
        let err = parse(&schema, "- n: 1\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line (1): invalid key: want null, have \"n\""
        );
    }

    #[test]
    fn test_strict_rejects_trailing_content() {
        let mut inst = Instance::new(&foo());
        let mut parser = Parser::with_options(
            "foo-int: 1\nfoo-float: 2\nmore: 3\n".as_bytes(),
            ParseOptions::strict(),
        );
        let err = parser.parse_into(&mut inst).unwrap_err();
        assert!(matches!(
            err,
            Error::Structural {
                line: 3,
                kind: StructuralError::TrailingContent { .. }
            }
        ));
    }
}
