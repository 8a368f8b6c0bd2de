//! Scalar values and their textual token form.
//!
//! This module is the leaf of the crate: the emitters turn a [`Scalar`] into a token
//! with [`Scalar::to_token`], and the parser turns a token back into a [`Scalar`] of a
//! declared [`ScalarType`] with [`Scalar::parse`].
//!
//! ## Token forms
//!
//! | Type | Token | Example |
//! |------|-------|---------|
//! | `bool` | `true` / `false` | `true` |
//! | `int` | decimal, optional sign | `-42` |
//! | `float` | shortest round-trip decimal | `0.5` |
//! | `char` | quoted, one character | `"y"` |
//! | `string` | quoted | `"hello"` |
//! | `timestamp` | quoted RFC 3339 | `"2024-01-15T10:30:00Z"` |
//! | `bigint` | decimal | `123456789012345678901234567890` |
//!
//! Quoted tokens escape `"`, `\`, newline, carriage return and tab with a backslash.
//!
//! ## Storage
//!
//! Any Rust type that can live in a schema leaf implements [`Primitive`]. Loading
//! always succeeds; storing checks the scalar's type and, for narrow integer types,
//! its range.
//!
//! ```rust
//! use typed_yaml::{Primitive, Scalar, ScalarType};
//!
//! let mut small: u8 = 0;
//! assert!(small.store(Scalar::Int(200)).is_ok());
//! assert!(small.store(Scalar::Int(300)).is_err());
//! assert_eq!(small.scalar_type(), ScalarType::Int);
//! ```

use crate::error::ScalarError;
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;

/// The payload type of a value node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Bool,
    Int,
    Float,
    Char,
    #[serde(rename = "string")]
    Str,
    Timestamp,
    #[serde(rename = "bigint")]
    BigInt,
}

impl ScalarType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Char => "char",
            ScalarType::Str => "string",
            ScalarType::Timestamp => "timestamp",
            ScalarType::BigInt => "bigint",
        }
    }

    /// Whether tokens of this type are written between double quotes.
    #[inline]
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        matches!(
            self,
            ScalarType::Char | ScalarType::Str | ScalarType::Timestamp
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed scalar value.
///
/// # Examples
///
/// ```rust
/// use typed_yaml::{Scalar, ScalarType};
///
/// let value = Scalar::parse(ScalarType::Float, "0.5").unwrap();
/// assert_eq!(value, Scalar::Float(0.5));
/// assert_eq!(value.to_token(), "0.5");
///
/// let text = Scalar::from("say \"hi\"");
/// assert_eq!(text.to_token(), r#""say \"hi\"""#);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    Timestamp(DateTime<Utc>),
    BigInt(BigInt),
}

impl Scalar {
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Bool(_) => ScalarType::Bool,
            Scalar::Int(_) => ScalarType::Int,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::Char(_) => ScalarType::Char,
            Scalar::Str(_) => ScalarType::Str,
            Scalar::Timestamp(_) => ScalarType::Timestamp,
            Scalar::BigInt(_) => ScalarType::BigInt,
        }
    }

    /// Parses a token as a value of type `ty`.
    ///
    /// A token wrapped in one matching pair of double quotes is unquoted and
    /// unescaped first, whatever the declared type.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarError`] if the token is not a valid literal of `ty`.
    pub fn parse(ty: ScalarType, token: &str) -> Result<Scalar, ScalarError> {
        let text = unquote(token)?;
        let invalid = || ScalarError::Invalid {
            expected: ty,
            token: token.to_string(),
        };

        match ty {
            ScalarType::Bool => match text.as_str() {
                "true" => Ok(Scalar::Bool(true)),
                "false" => Ok(Scalar::Bool(false)),
                _ => Err(invalid()),
            },
            ScalarType::Int => text.parse::<i64>().map(Scalar::Int).map_err(|_| invalid()),
            ScalarType::Float => text
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| invalid()),
            ScalarType::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(Scalar::Char(ch)),
                    _ => Err(ScalarError::CharLength {
                        token: token.to_string(),
                    }),
                }
            }
            ScalarType::Str => Ok(Scalar::Str(text)),
            ScalarType::Timestamp => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Scalar::Timestamp(dt.with_timezone(&Utc)))
                .map_err(|_| invalid()),
            ScalarType::BigInt => text
                .parse::<BigInt>()
                .map(Scalar::BigInt)
                .map_err(|_| invalid()),
        }
    }

    /// Renders the token form of this value.
    #[must_use]
    pub fn to_token(&self) -> String {
        let mut out = String::new();
        self.write_token(&mut out);
        out
    }

    /// Appends the token form of this value to `out`.
    pub fn write_token(&self, out: &mut String) {
        match self {
            Scalar::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Scalar::Int(i) => out.push_str(&i.to_string()),
            Scalar::Float(f) => out.push_str(&f.to_string()),
            Scalar::Char(c) => write_quoted(out, c.encode_utf8(&mut [0; 4])),
            Scalar::Str(s) => write_quoted(out, s),
            Scalar::Timestamp(dt) => {
                write_quoted(out, &dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Scalar::BigInt(n) => out.push_str(&n.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Char(c) => serializer.serialize_char(*c),
            Scalar::Str(s) => serializer.serialize_str(s),
            Scalar::Timestamp(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Scalar::BigInt(n) => serializer.collect_str(n),
        }
    }
}

#[inline]
pub(crate) fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

/// Strips one matching pair of double quotes and resolves escapes inside them.
/// Unquoted tokens are returned verbatim.
pub(crate) fn unquote(token: &str) -> Result<String, ScalarError> {
    let inner = match token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) if token.len() >= 2 => inner,
        _ => return Ok(token.to_string()),
    };

    let escape_error = || ScalarError::Escape {
        token: token.to_string(),
    };
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            _ => return Err(escape_error()),
        }
    }
    Ok(result)
}

/// A Rust type whose values can be stored in a schema leaf.
///
/// The methods take `&self` so that `&mut dyn Primitive` can stand in for external
/// storage in a forwarding binding.
pub trait Primitive {
    /// The declared type of leaves holding this type.
    fn scalar_type(&self) -> ScalarType;

    /// Reads the current value.
    fn load(&self) -> Scalar;

    /// Overwrites the current value.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarError`] if `value` has a different type or does not fit.
    fn store(&mut self, value: Scalar) -> Result<(), ScalarError>;
}

fn mismatch(expected: ScalarType, value: &Scalar) -> ScalarError {
    ScalarError::TypeMismatch {
        expected,
        found: value.scalar_type(),
    }
}

macro_rules! impl_primitive_int {
    ($($t:ty),*) => {
        $(
            impl Primitive for $t {
                fn scalar_type(&self) -> ScalarType {
                    ScalarType::Int
                }

                fn load(&self) -> Scalar {
                    Scalar::Int(i64::from(*self))
                }

                fn store(&mut self, value: Scalar) -> Result<(), ScalarError> {
                    match value {
                        Scalar::Int(i) => {
                            *self = <$t>::try_from(i).map_err(|_| ScalarError::OutOfRange {
                                target: stringify!($t),
                                value: i.to_string(),
                            })?;
                            Ok(())
                        }
                        other => Err(mismatch(ScalarType::Int, &other)),
                    }
                }
            }

            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_primitive_int!(i8, i16, i32, i64, u8, u16, u32);

impl Primitive for f64 {
    fn scalar_type(&self) -> ScalarType {
        ScalarType::Float
    }

    fn load(&self) -> Scalar {
        Scalar::Float(*self)
    }

    fn store(&mut self, value: Scalar) -> Result<(), ScalarError> {
        match value {
            Scalar::Float(f) => {
                *self = f;
                Ok(())
            }
            other => Err(mismatch(ScalarType::Float, &other)),
        }
    }
}

impl Primitive for f32 {
    fn scalar_type(&self) -> ScalarType {
        ScalarType::Float
    }

    fn load(&self) -> Scalar {
        Scalar::Float(f64::from(*self))
    }

    fn store(&mut self, value: Scalar) -> Result<(), ScalarError> {
        match value {
            Scalar::Float(f) => {
                if f.is_finite() && (f < f64::from(f32::MIN) || f > f64::from(f32::MAX)) {
                    return Err(ScalarError::OutOfRange {
                        target: "f32",
                        value: f.to_string(),
                    });
                }
                *self = f as f32;
                Ok(())
            }
            other => Err(mismatch(ScalarType::Float, &other)),
        }
    }
}

macro_rules! impl_primitive {
    ($t:ty, $variant:ident) => {
        impl Primitive for $t {
            fn scalar_type(&self) -> ScalarType {
                ScalarType::$variant
            }

            fn load(&self) -> Scalar {
                Scalar::$variant(self.clone())
            }

            fn store(&mut self, value: Scalar) -> Result<(), ScalarError> {
                match value {
                    Scalar::$variant(v) => {
                        *self = v;
                        Ok(())
                    }
                    other => Err(mismatch(ScalarType::$variant, &other)),
                }
            }
        }

        impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                Scalar::$variant(value)
            }
        }
    };
}

impl_primitive!(bool, Bool);
impl_primitive!(char, Char);
impl_primitive!(String, Str);
impl_primitive!(DateTime<Utc>, Timestamp);
impl_primitive!(BigInt, BigInt);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(f64::from(value))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl Primitive for Scalar {
    fn scalar_type(&self) -> ScalarType {
        Scalar::scalar_type(self)
    }

    fn load(&self) -> Scalar {
        self.clone()
    }

    fn store(&mut self, value: Scalar) -> Result<(), ScalarError> {
        if value.scalar_type() != Scalar::scalar_type(self) {
            return Err(mismatch(Scalar::scalar_type(self), &value));
        }
        *self = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_primitives() {
        assert_eq!(
            Scalar::parse(ScalarType::Bool, "true"),
            Ok(Scalar::Bool(true))
        );
        assert_eq!(Scalar::parse(ScalarType::Int, "-42"), Ok(Scalar::Int(-42)));
        assert_eq!(
            Scalar::parse(ScalarType::Float, "2.5"),
            Ok(Scalar::Float(2.5))
        );
        assert_eq!(Scalar::parse(ScalarType::Char, "y"), Ok(Scalar::Char('y')));
        assert_eq!(
            Scalar::parse(ScalarType::Str, "plain words"),
            Ok(Scalar::Str("plain words".to_string()))
        );
    }

    #[test]
    fn test_parse_strips_quotes_for_any_type() {
        assert_eq!(Scalar::parse(ScalarType::Int, "\"7\""), Ok(Scalar::Int(7)));
        assert_eq!(
            Scalar::parse(ScalarType::Char, "\"x\""),
            Ok(Scalar::Char('x'))
        );
        assert_eq!(
            Scalar::parse(ScalarType::Str, "\"\""),
            Ok(Scalar::Str(String::new()))
        );
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(
            Scalar::parse(ScalarType::Float, "notanumber"),
            Err(ScalarError::Invalid {
                expected: ScalarType::Float,
                token: "notanumber".to_string(),
            })
        );
        assert!(matches!(
            Scalar::parse(ScalarType::Char, "ab"),
            Err(ScalarError::CharLength { .. })
        ));
        assert!(Scalar::parse(ScalarType::Bool, "yes").is_err());
        assert!(Scalar::parse(ScalarType::Int, "1.5").is_err());
        assert!(matches!(
            Scalar::parse(ScalarType::Str, r#""bad \q""#),
            Err(ScalarError::Escape { .. })
        ));
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Scalar::Int(5).to_token(), "5");
        assert_eq!(Scalar::Float(0.5).to_token(), "0.5");
        assert_eq!(Scalar::Bool(false).to_token(), "false");
        assert_eq!(Scalar::Char('y').to_token(), "\"y\"");
        assert_eq!(
            Scalar::Str("a\tb\n".to_string()).to_token(),
            "\"a\\tb\\n\""
        );
    }

    #[test]
    fn test_escaped_string_survives() {
        let original = Scalar::Str("quote \" slash \\ end".to_string());
        let token = original.to_token();
        assert_eq!(Scalar::parse(ScalarType::Str, &token), Ok(original));
    }

    #[test]
    fn test_timestamp_and_bigint() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let ts = Scalar::Timestamp(dt);
        assert_eq!(ts.to_token(), "\"2024-01-15T10:30:00Z\"");
        assert_eq!(Scalar::parse(ScalarType::Timestamp, &ts.to_token()), Ok(ts));

        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        let token = Scalar::BigInt(big.clone()).to_token();
        assert_eq!(
            Scalar::parse(ScalarType::BigInt, &token),
            Ok(Scalar::BigInt(big))
        );
    }

    #[test]
    fn test_primitive_store_checks_type_and_range() {
        let mut x: i32 = 0;
        assert!(x.store(Scalar::Int(12)).is_ok());
        assert_eq!(x, 12);
        assert!(matches!(
            x.store(Scalar::Float(1.0)),
            Err(ScalarError::TypeMismatch { .. })
        ));
        assert!(matches!(
            x.store(Scalar::Int(i64::MAX)),
            Err(ScalarError::OutOfRange { target: "i32", .. })
        ));

        let mut f: f32 = 0.0;
        assert!(f.store(Scalar::Float(1e300)).is_err());
        assert!(f.store(Scalar::Float(0.25)).is_ok());
        assert_eq!(f, 0.25);
    }
}
