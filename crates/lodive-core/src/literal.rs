//! Typed on-chain literals
//!
//! Every value the program sees or returns carries a type suffix
//! (`100u32`, `50u64`, `7field`). [`InputValue`] makes that suffix part of the
//! type so an untyped input cannot reach a transaction, and the `parse_*`
//! helpers strip suffixes from decoded mapping values before numeric use.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// Type suffix of an on-chain literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralType {
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    Field,
    Group,
    Scalar,
}

impl LiteralType {
    /// Suffixes ordered so that no entry is a suffix of a later one
    const ALL: [LiteralType; 13] = [
        LiteralType::U128,
        LiteralType::I128,
        LiteralType::U16,
        LiteralType::I16,
        LiteralType::U32,
        LiteralType::I32,
        LiteralType::U64,
        LiteralType::I64,
        LiteralType::U8,
        LiteralType::I8,
        LiteralType::Field,
        LiteralType::Group,
        LiteralType::Scalar,
    ];

    /// The suffix as written on chain
    pub fn suffix(&self) -> &'static str {
        match self {
            LiteralType::U8 => "u8",
            LiteralType::U16 => "u16",
            LiteralType::U32 => "u32",
            LiteralType::U64 => "u64",
            LiteralType::U128 => "u128",
            LiteralType::I8 => "i8",
            LiteralType::I16 => "i16",
            LiteralType::I32 => "i32",
            LiteralType::I64 => "i64",
            LiteralType::I128 => "i128",
            LiteralType::Field => "field",
            LiteralType::Group => "group",
            LiteralType::Scalar => "scalar",
        }
    }
}

impl Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Split a literal into its numeric body and type suffix.
///
/// A trailing `.public` / `.private` visibility marker is dropped first.
/// Returns `None` for the type when the body is not followed by a known
/// suffix (or the body would be empty).
pub fn split_literal(raw: &str) -> (&str, Option<LiteralType>) {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_suffix(".private")
        .or_else(|| trimmed.strip_suffix(".public"))
        .unwrap_or(trimmed);

    for ty in LiteralType::ALL {
        if let Some(body) = trimmed.strip_suffix(ty.suffix())
            && !body.is_empty()
            && body.chars().all(|c| c.is_ascii_digit() || c == '-')
        {
            return (body, Some(ty));
        }
    }
    (trimmed, None)
}

/// Strip the type suffix (if any) from a literal
pub fn strip_type_suffix(raw: &str) -> &str {
    split_literal(raw).0
}

fn expect_digits(raw: &str, expected: LiteralType) -> CoreResult<&str> {
    let (body, ty) = split_literal(raw);
    if let Some(actual) = ty
        && actual != expected
    {
        return Err(CoreError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidLiteral(raw.to_string()));
    }
    Ok(body)
}

fn parse_unsigned<T: FromStr>(raw: &str, expected: LiteralType) -> CoreResult<T> {
    let body = expect_digits(raw, expected)?;
    body.parse::<T>().map_err(|_| CoreError::OutOfRange {
        ty: expected.to_string(),
        value: body.to_string(),
    })
}

/// Parse a `u8` literal (`"42u8"` or bare `"42"`)
pub fn parse_u8(raw: &str) -> CoreResult<u8> {
    parse_unsigned(raw, LiteralType::U8)
}

/// Parse a `u32` literal (`"100u32"` or bare `"100"`)
pub fn parse_u32(raw: &str) -> CoreResult<u32> {
    parse_unsigned(raw, LiteralType::U32)
}

/// Parse a `u64` literal (`"50u64"` or bare `"50"`)
pub fn parse_u64(raw: &str) -> CoreResult<u64> {
    parse_unsigned(raw, LiteralType::U64)
}

/// Parse a boolean literal
pub fn parse_bool(raw: &str) -> CoreResult<bool> {
    match strip_type_suffix(raw) {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CoreError::InvalidLiteral(raw.to_string())),
    }
}

/// A typed transaction input
///
/// Renders with its on-chain suffix, so the string handed to the wallet is
/// always well-typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputValue {
    U8(u8),
    U32(u32),
    U64(u64),
    /// Field element, stored as its decimal digits without the suffix
    Field(String),
}

impl InputValue {
    /// Build a field input from `"7"` or `"7field"`
    pub fn field(raw: impl AsRef<str>) -> CoreResult<Self> {
        let body = expect_digits(raw.as_ref(), LiteralType::Field)?;
        Ok(InputValue::Field(body.to_string()))
    }

    /// The literal type this input carries
    pub fn literal_type(&self) -> LiteralType {
        match self {
            InputValue::U8(_) => LiteralType::U8,
            InputValue::U32(_) => LiteralType::U32,
            InputValue::U64(_) => LiteralType::U64,
            InputValue::Field(_) => LiteralType::Field,
        }
    }
}

impl Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::U8(v) => write!(f, "{}u8", v),
            InputValue::U32(v) => write!(f, "{}u32", v),
            InputValue::U64(v) => write!(f, "{}u64", v),
            InputValue::Field(v) => write!(f, "{}field", v),
        }
    }
}

impl FromStr for InputValue {
    type Err = CoreError;

    /// Parse a suffixed literal; bare numbers are rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_literal(s) {
            (_, Some(LiteralType::U8)) => parse_u8(s).map(InputValue::U8),
            (_, Some(LiteralType::U32)) => parse_u32(s).map(InputValue::U32),
            (_, Some(LiteralType::U64)) => parse_u64(s).map(InputValue::U64),
            (_, Some(LiteralType::Field)) => InputValue::field(s),
            (_, Some(other)) => Err(CoreError::TypeMismatch {
                expected: "u8, u32, u64 or field".to_string(),
                actual: other.to_string(),
            }),
            (_, None) => Err(CoreError::InvalidLiteral(s.to_string())),
        }
    }
}

impl From<u8> for InputValue {
    fn from(v: u8) -> Self {
        InputValue::U8(v)
    }
}

impl From<u32> for InputValue {
    fn from(v: u32) -> Self {
        InputValue::U32(v)
    }
}

impl From<u64> for InputValue {
    fn from(v: u64) -> Self {
        InputValue::U64(v)
    }
}

impl Serialize for InputValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InputValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_literal() {
        assert_eq!(split_literal("100u32"), ("100", Some(LiteralType::U32)));
        assert_eq!(split_literal("5u128"), ("5", Some(LiteralType::U128)));
        assert_eq!(split_literal("5u8"), ("5", Some(LiteralType::U8)));
        assert_eq!(split_literal("7field"), ("7", Some(LiteralType::Field)));
        assert_eq!(split_literal("42"), ("42", None));
        assert_eq!(split_literal("true"), ("true", None));
    }

    #[test]
    fn test_split_literal_drops_visibility() {
        assert_eq!(split_literal("12u64.private"), ("12", Some(LiteralType::U64)));
        assert_eq!(split_literal(" 3field.public "), ("3", Some(LiteralType::Field)));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_u64("123456789u64").unwrap(), 123_456_789);
        assert_eq!(parse_u32("100").unwrap(), 100);
        assert_eq!(parse_u8("42u8").unwrap(), 42);
    }

    #[test]
    fn test_parse_rejects_wrong_suffix() {
        let err = parse_u32("100u64").unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { .. }));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let err = parse_u8("300u8").unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { .. }));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(!parse_bool("false.public").unwrap());
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn test_input_value_display() {
        assert_eq!(InputValue::U8(5).to_string(), "5u8");
        assert_eq!(InputValue::U32(100).to_string(), "100u32");
        assert_eq!(InputValue::U64(50).to_string(), "50u64");
        assert_eq!(InputValue::field("7").unwrap().to_string(), "7field");
        assert_eq!(InputValue::field("7field").unwrap().to_string(), "7field");
    }

    #[test]
    fn test_input_value_parse() {
        assert_eq!("100u32".parse::<InputValue>().unwrap(), InputValue::U32(100));
        assert_eq!(
            "9field".parse::<InputValue>().unwrap(),
            InputValue::Field("9".to_string())
        );
        assert!("100".parse::<InputValue>().is_err());
        assert!("1i32".parse::<InputValue>().is_err());
        assert!("abcfield".parse::<InputValue>().is_err());
    }

    #[test]
    fn test_field_rejects_garbage() {
        assert!(InputValue::field("").is_err());
        assert!(InputValue::field("12ab").is_err());
        assert!(InputValue::field("12u32").is_err());
    }

    #[test]
    fn test_input_value_serde() {
        let v = InputValue::U64(42150);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"42150u64\"");
        let back: InputValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
