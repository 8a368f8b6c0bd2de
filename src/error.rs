//! Error types for schema definition, binding and text conversion.
//!
//! Errors fall into two families:
//!
//! - **Definition errors** ([`DefinitionError`]) are raised while a schema or an
//!   instance is being built: repeated keys, gaps in array indices, arity mismatches
//!   and lookups with the wrong locator or type. They never depend on input text and
//!   always indicate a programming error.
//! - **Parse errors** ([`Error::Structural`], [`Error::Value`],
//!   [`Error::UnexpectedEof`]) are raised while reading text against a schema. They
//!   carry the 1-based line number at which the problem was detected.
//!
//! ## Examples
//!
//! ```rust
//! use typed_yaml::{from_str, schema};
//!
//! let foo = schema!({ "foo-int": int, "foo-float": float }).unwrap();
//! let err = from_str(&foo, "foo-int: 5\nfoo-float: notanumber\n").unwrap_err();
//!
//! assert!(err.is_value());
//! assert_eq!(err.line(), Some(2));
//! assert!(err.to_string().contains("notanumber"));
//! ```

use crate::value::ScalarType;
use thiserror::Error;

/// Raised while declaring a schema or binding an instance to one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The same key was declared twice within one object.
    #[error("duplicate key \"{key}\" in object")]
    DuplicateKey { key: String },

    /// The same index was declared twice within one array.
    #[error("duplicate index {index} in array")]
    DuplicateIndex { index: usize },

    /// An index does not fall in `0..size`, which leaves a gap elsewhere.
    #[error("index {index} out of range for array of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// The number of supplied values does not match the number of slots.
    #[error("arity mismatch: schema declares {expected} slots, {found} supplied")]
    Arity { expected: usize, found: usize },

    /// No slot with this locator and kind exists.
    #[error("no {kind} slot at {locator}")]
    NotFound { locator: String, kind: String },

    /// A supplied value or child does not have the declared type.
    #[error("type mismatch at {at}: schema declares {expected}, found {found}")]
    TypeMismatch {
        at: String,
        expected: String,
        found: String,
    },

    /// Slot operations were attempted on a value node.
    #[error("{kind} node has no slots")]
    NotAContainer { kind: String },

    /// A scalar operation was attempted on an array or object slot.
    #[error("slot {locator} is not a value")]
    NotALeaf { locator: String },
}

/// Raised by the scalar codec when a token or value does not fit the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    #[error("invalid {expected} \"{token}\"")]
    Invalid { expected: ScalarType, token: String },

    #[error("invalid size for char: \"{token}\"")]
    CharLength { token: String },

    #[error("{value} out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: ScalarType,
        found: ScalarType,
    },

    #[error("invalid escape sequence in \"{token}\"")]
    Escape { token: String },
}

/// Structural mismatches between the text and the schema being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("invalid indent: expected prefix \"{expected}\", have \"{found}\"")]
    Indent { expected: String, found: String },

    #[error("invalid indent: overindented")]
    Overindented,

    #[error("invalid key: want {}, have \"{found}\"", quoted_or_null(.expected))]
    KeyMismatch {
        expected: Option<String>,
        found: String,
    },

    #[error("unexpected value \"{value}\" on header line for \"{key}\"")]
    UnexpectedValue { key: String, value: String },

    #[error("unexpected trailing content \"{content}\"")]
    TrailingContent { content: String },
}

fn quoted_or_null(key: &Option<String>) -> String {
    match key {
        Some(key) => format!("\"{}\"", key),
        None => "null".to_string(),
    }
}

/// Every error the crate can produce.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("line ({line}): {kind}")]
    Structural { line: usize, kind: StructuralError },

    #[error("line ({line}): failed to parse value: {source}")]
    Value {
        line: usize,
        #[source]
        source: ScalarError,
    },

    #[error("line ({line}): unexpected eof, expected {expected}")]
    UnexpectedEof { line: usize, expected: String },

    /// A scalar conversion outside of parsing, e.g. from [`crate::Instance::set`].
    #[error(transparent)]
    Scalar(#[from] ScalarError),

    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    pub(crate) fn structural(line: usize, kind: StructuralError) -> Self {
        Error::Structural { line, kind }
    }

    pub(crate) fn value(line: usize, source: ScalarError) -> Self {
        Error::Value { line, source }
    }

    pub(crate) fn unexpected_eof(line: usize, expected: impl Into<String>) -> Self {
        Error::UnexpectedEof {
            line,
            expected: expected.into(),
        }
    }

    /// Creates an I/O error for stream reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// The 1-based source line of a parse error.
    ///
    /// ```rust
    /// use typed_yaml::Error;
    ///
    /// assert_eq!(Error::io("closed").line(), None);
    /// ```
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Structural { line, .. }
            | Error::Value { line, .. }
            | Error::UnexpectedEof { line, .. } => Some(*line),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_definition(&self) -> bool {
        matches!(self, Error::Definition(_))
    }

    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Error::Value { .. })
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
