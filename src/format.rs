//! The YAML-like text format
//!
//! This module documents the text format read and written by this library. It is a
//! small, schema-driven subset of YAML: the schema decides what every line means, so
//! the text carries no type tags, no flow collections and no anchors.
//!
//! # Lines
//!
//! Every value and every keyed container occupies exactly one line. Blank lines are
//! ignored. A `#` outside double quotes starts a comment that runs to the end of the
//! line; a line holding only a comment is ignored.
//!
//! # Objects
//!
//! Fields appear in declaration order, one per line:
//!
//! ```text
//! foo-int: 5
//! foo-float: 0.5
//! ```
//!
//! A field holding an array or object is written as a header line with nothing after
//! the colon, followed by its children indented two more spaces:
//!
//! ```text
//! bar-foo:
//!   foo-int: 5
//!   foo-float: 0.5
//! ```
//!
//! Keys are written verbatim unless they are empty, have surrounding spaces, or
//! contain `:`, `#`, `"` or control whitespace; such keys are double-quoted.
//!
//! # Arrays
//!
//! Each element starts with `- `. Anything the element spans beyond its first line
//! is aligned under the first character after the dash:
//!
//! ```text
//! nums:
//!   - 9
//!   - 7
//!   - 5
//! points:
//!   - x: 1
//!     y: 2
//!   - x: 3
//!     y: 4
//! grid:
//!   - - 1
//!     - 2
//!   - - 3
//!     - 4
//! ```
//!
//! An array or object with no slots writes no lines of its own. Keyed, it is just the
//! header line.
//!
//! # Scalars
//!
//! | Type | Token | Example |
//! |------|-------|---------|
//! | `bool` | `true` or `false` | `on: true` |
//! | `int` | decimal, 64-bit signed | `count: -42` |
//! | `float` | shortest round-trip decimal, `inf`, `NaN` | `ratio: 0.5` |
//! | `char` | one character, double-quoted | `sep: ","` |
//! | `string` | double-quoted | `name: "Alice"` |
//! | `timestamp` | RFC 3339, double-quoted | `at: "2024-01-15T10:30:00Z"` |
//! | `bigint` | decimal, unbounded | `big: 123456789012345678901234567890` |
//!
//! Quoted tokens use the escapes `\"`, `\\`, `\n`, `\r` and `\t`. On reading, one
//! pair of surrounding quotes is stripped from any token before it is converted, so
//! `count: "5"` reads as the integer 5.
//!
//! The bare token `null`, or nothing at all after the colon, leaves the value as it
//! was. Unbound values are written as `null`.
//!
//! # Strictness
//!
//! Reading is strict about structure:
//!
//! - the line must begin with exactly the expected indentation and dash markers
//! - any extra leading whitespace after that is an `overindented` error
//! - the key must be the declared one, and array elements must carry no key
//! - a header line must have nothing after its colon
//! - slots must appear in declaration order
//!
//! Lines after the last declared slot are left unread unless
//! [`ParseOptions::strict`](crate::ParseOptions::strict) is used.
//!
//! # Errors
//!
//! Every parse error names the 1-based line it was found on:
//!
//! ```text
//! line (2): failed to parse value: invalid float "notanumber"
//! line (2): invalid indent: overindented
//! line (1): invalid key: want "foo-int", have "wrong-key"
//! line (3): unexpected eof, expected value for "foo-float"
//! ```
