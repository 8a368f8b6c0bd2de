//! Configuration options for JSON emission and YAML parsing.
//!
//! The YAML dialect itself is fixed: two-space indentation and `"- "` array markers.
//! What can be tuned is:
//!
//! - [`JsonOptions`]: layout of the JSON emitter (pretty or compact, indent width)
//! - [`ParseOptions`]: how strictly the parser treats input past the declared structure
//!
//! ## Examples
//!
//! ```rust
//! use typed_yaml::{schema, Instance, JsonOptions, Scalar};
//!
//! let point = schema!({ "x": int, "y": int }).unwrap();
//! let inst = Instance::bind_owned(&point, [Scalar::Int(1), Scalar::Int(2)]).unwrap();
//!
//! let json = typed_yaml::to_json_string_with_options(&inst, JsonOptions::compact());
//! assert_eq!(json, r#"{"x":1,"y":2}"#);
//! ```

/// Layout of the JSON emitter.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::JsonOptions;
///
/// // Default pretty layout with 2-space indentation
/// let options = JsonOptions::new();
/// assert!(options.pretty);
///
/// // Wider indentation
/// let options = JsonOptions::new().with_indent(4);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonOptions {
    pub indent: usize,
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            indent: 2,
            pretty: true,
        }
    }
}

impl JsonOptions {
    /// Creates default options (pretty, 2-space indent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for single-line output with no insignificant whitespace.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_yaml::JsonOptions;
    ///
    /// let options = JsonOptions::compact();
    /// assert!(!options.pretty);
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        JsonOptions {
            pretty: false,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Only affects pretty output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Parser behaviour.
///
/// By default the parser stops as soon as every declared slot has been read and
/// leaves the rest of the input alone, so a document can be followed by unrelated
/// content.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::{schema, ParseOptions};
///
/// let foo = schema!({ "n": int }).unwrap();
/// assert!(typed_yaml::from_str(&foo, "n: 1\nextra: 2\n").is_ok());
/// assert!(typed_yaml::from_str_with_options(&foo, "n: 1\nextra: 2\n", ParseOptions::strict()).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub reject_trailing: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject significant lines left after the declared structure.
    #[must_use]
    pub fn strict() -> Self {
        ParseOptions {
            reject_trailing: true,
        }
    }

    #[must_use]
    pub fn with_reject_trailing(mut self, reject: bool) -> Self {
        self.reject_trailing = reject;
        self
    }
}
