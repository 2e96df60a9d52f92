//! Semantic types and in-memory values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LiteralError;
use crate::float;

/// The fixed set of value types the subject's dispatcher understands.
///
/// The serialized form is the tag string passed on the subject's command
/// line; its exact spelling is part of the subject contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SemanticType {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "char")]
    Char,
    #[serde(rename = "unsigned char")]
    UnsignedChar,
    #[serde(rename = "std::int8_t")]
    Int8,
    #[serde(rename = "std::int16_t")]
    Int16,
    #[serde(rename = "std::int32_t")]
    Int32,
    #[serde(rename = "std::int64_t")]
    Int64,
    #[serde(rename = "std::uint8_t")]
    UInt8,
    #[serde(rename = "std::uint16_t")]
    UInt16,
    #[serde(rename = "std::uint32_t")]
    UInt32,
    #[serde(rename = "std::uint64_t")]
    UInt64,
    #[serde(rename = "float")]
    Float32,
    #[serde(rename = "double")]
    Float64,
    #[serde(rename = "long double")]
    Extended,
    #[serde(rename = "char[]")]
    CharArray,
    #[serde(rename = "std::string")]
    String,
}

/// Broad grouping used to pick a value domain shape and specifier grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Bool,
    Char,
    SignedInt,
    UnsignedInt,
    Float,
    Text,
}

impl SemanticType {
    pub const ALL: [Self; 16] = [
        Self::Bool,
        Self::Char,
        Self::UnsignedChar,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Extended,
        Self::CharArray,
        Self::String,
    ];

    /// Tag string passed to the subject.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::UnsignedChar => "unsigned char",
            Self::Int8 => "std::int8_t",
            Self::Int16 => "std::int16_t",
            Self::Int32 => "std::int32_t",
            Self::Int64 => "std::int64_t",
            Self::UInt8 => "std::uint8_t",
            Self::UInt16 => "std::uint16_t",
            Self::UInt32 => "std::uint32_t",
            Self::UInt64 => "std::uint64_t",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Extended => "long double",
            Self::CharArray => "char[]",
            Self::String => "std::string",
        }
    }

    /// Look up a type by its tag string.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.tag() == tag)
    }

    #[must_use]
    pub const fn category(self) -> TypeCategory {
        match self {
            Self::Bool => TypeCategory::Bool,
            Self::Char | Self::UnsignedChar => TypeCategory::Char,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => TypeCategory::SignedInt,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => TypeCategory::UnsignedInt,
            Self::Float32 | Self::Float64 | Self::Extended => TypeCategory::Float,
            Self::CharArray | Self::String => TypeCategory::Text,
        }
    }

    /// Types whose literal is a raw character (or character sequence), so a
    /// numeric value is sent as the byte at that code point.
    #[must_use]
    pub const fn is_character_encoded(self) -> bool {
        matches!(self, Self::Char | Self::UnsignedChar | Self::CharArray)
    }

    /// Inclusive integer range for integer types.
    #[must_use]
    pub const fn int_range(self) -> Option<(i128, i128)> {
        match self {
            Self::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::UInt8 => Some((0, u8::MAX as i128)),
            Self::UInt16 => Some((0, u16::MAX as i128)),
            Self::UInt32 => Some((0, u32::MAX as i128)),
            Self::UInt64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SemanticType {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| LiteralError::UnknownTag(s.to_string()))
    }
}

/// A representative value.
///
/// Extended-precision floats are carried as `f64`; single-precision values
/// are stored widened and are exactly representable in `f32`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Object type name used in reference-engine diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
        }
    }

    /// Integer view of integral values (booleans count as 0/1).
    #[must_use]
    pub const fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Bool(b) => Some(*b as i128),
            Self::Int(v) => Some(*v as i128),
            Self::UInt(v) => Some(*v as i128),
            _ => None,
        }
    }

    /// Plain string conversion (`!s`).
    #[must_use]
    pub fn to_str(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.repr(),
        }
    }

    /// Debugging representation (`!r`).
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Self::Bool(true) => String::from("True"),
            Self::Bool(false) => String::from("False"),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => float_repr(*v),
            Self::Str(s) => string_repr(s, false),
        }
    }

    /// Like [`Value::repr`] but with every non-ASCII character escaped (`!a`).
    #[must_use]
    pub fn ascii(&self) -> String {
        match self {
            Self::Str(s) => string_repr(s, true),
            other => other.repr(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

/// `repr()` of a float: shortest round-trip digits, `inf`/`-inf`/`nan`.
#[must_use]
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    let body = if value.is_infinite() {
        String::from("inf")
    } else {
        float::repr(value.abs())
    };
    if value.is_sign_negative() {
        format!("-{body}")
    } else {
        body
    }
}

/// Quoted, escaped representation of a string.
///
/// Single quotes delimit unless the text contains a single quote and no
/// double quote. Backslash and the delimiter are escaped, `\t \n \r` use
/// their short escapes, other control characters use `\xNN`, `\uNNNN` or
/// `\UNNNNNNNN`. With `ascii_only`, every non-ASCII character is escaped.
#[must_use]
pub fn string_repr(s: &str, ascii_only: bool) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            c if !ascii_only && is_printable(c) => out.push(c),
            c => push_escape(&mut out, c),
        }
    }
    out.push(quote);
    out
}

fn is_printable(c: char) -> bool {
    !c.is_ascii()
        && !c.is_control()
        && !c.is_whitespace()
        && !is_noncharacter(c)
        && NON_PRINTABLE_RANGES
            .binary_search_by(|&(lo, hi)| {
                if hi < c {
                    std::cmp::Ordering::Less
                } else if lo > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_err()
}

fn is_noncharacter(c: char) -> bool {
    let code = u32::from(c);
    (0xfdd0..=0xfdef).contains(&code) || code & 0xfffe == 0xfffe
}

/// Format (Cf) and private-use (Co) characters, sorted. Unicode 14.0.
const NON_PRINTABLE_RANGES: &[(char, char)] = &[
    ('\u{ad}', '\u{ad}'),
    ('\u{600}', '\u{605}'),
    ('\u{61c}', '\u{61c}'),
    ('\u{6dd}', '\u{6dd}'),
    ('\u{70f}', '\u{70f}'),
    ('\u{890}', '\u{891}'),
    ('\u{8e2}', '\u{8e2}'),
    ('\u{180e}', '\u{180e}'),
    ('\u{200b}', '\u{200f}'),
    ('\u{202a}', '\u{202e}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206f}'),
    ('\u{e000}', '\u{f8ff}'),
    ('\u{feff}', '\u{feff}'),
    ('\u{fff9}', '\u{fffb}'),
    ('\u{110bd}', '\u{110bd}'),
    ('\u{110cd}', '\u{110cd}'),
    ('\u{13430}', '\u{13438}'),
    ('\u{1bca0}', '\u{1bca3}'),
    ('\u{1d173}', '\u{1d17a}'),
    ('\u{e0001}', '\u{e0001}'),
    ('\u{e0020}', '\u{e007f}'),
    ('\u{f0000}', '\u{ffffd}'),
    ('\u{100000}', '\u{10fffd}'),
];

fn push_escape(out: &mut String, c: char) {
    let code = u32::from(c);
    if code <= 0xff {
        out.push_str(&format!("\\x{code:02x}"));
    } else if code <= 0xffff {
        out.push_str(&format!("\\u{code:04x}"));
    } else {
        out.push_str(&format!("\\U{code:08x}"));
    }
}
