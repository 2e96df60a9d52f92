//! Error types for the reference engine and the literal codec.
//!
//! `FormatError` messages follow the wording of the engine whose behavior
//! the reference reproduces, so a rejected case can be diagnosed against it.

use thiserror::Error;

/// A template or specifier the reference engine refuses to render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Single '{0}' encountered in format string")]
    UnbalancedBrace(char),

    #[error("expected '}}' before end of string")]
    UnterminatedField,

    #[error("unexpected '{{' in field name")]
    UnexpectedBraceInName,

    #[error("unmatched '{{' in format spec")]
    UnmatchedOpenBrace,

    #[error("Unknown conversion specifier {0}")]
    UnknownConversion(String),

    #[error("end of string while looking for conversion specifier")]
    MissingConversion,

    #[error("expected ':' after conversion specifier")]
    ExpectedColonAfterConversion,

    #[error("cannot switch from automatic field numbering to manual field specification")]
    AutoToManualNumbering,

    #[error("cannot switch from manual field specification to automatic field numbering")]
    ManualToAutoNumbering,

    #[error("Replacement index {0} out of range for positional args tuple")]
    IndexOutOfRange(usize),

    #[error("field name {0:?} is not a positional index")]
    NamedField(String),

    #[error("nested replacement fields are not supported: {0:?}")]
    NestedField(String),

    #[error("Invalid format specifier '{spec}' for object of type '{kind}'")]
    InvalidSpecifier { spec: String, kind: &'static str },

    #[error("Format specifier missing precision")]
    MissingPrecision,

    #[error("Too many decimal digits in format string")]
    WidthOverflow,

    #[error("Cannot specify both ',' and '_'.")]
    MixedGrouping,

    #[error("Cannot specify '{separator}' with '{kind}'.")]
    GroupingNotAllowed { separator: char, kind: char },

    #[error("Unknown format code '{code}' for object of type '{kind}'")]
    UnknownCode { code: char, kind: &'static str },

    #[error("Precision not allowed in integer format specifier")]
    PrecisionOnInteger,

    #[error("Sign not allowed with integer format specifier 'c'")]
    SignWithChar,

    #[error("Alternate form (#) not allowed with integer format specifier 'c'")]
    AlternateWithChar,

    #[error("%c arg not in range(0x110000)")]
    CharOutOfRange,

    #[error("Sign not allowed in string format specifier")]
    SignOnString,

    #[error("Space not allowed in string format specifier")]
    SpaceOnString,

    #[error("Alternate form (#) not allowed in string format specifier")]
    AlternateOnString,

    #[error("'=' alignment not allowed in string format specifier")]
    EqualsAlignOnString,
}

/// A literal that cannot be produced for, or read back as, a semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("unsupported semantic type {tag:?} for {value_kind} value")]
    UnsupportedType {
        tag: &'static str,
        value_kind: &'static str,
    },

    #[error("value {value} is not representable as a single character")]
    CharOutOfRange { value: String },

    #[error("value {value} is out of range for {tag}")]
    OutOfRange { tag: &'static str, value: String },

    #[error("unknown semantic type tag {0:?}")]
    UnknownTag(String),

    #[error("invalid {tag} literal {literal:?}: {reason}")]
    Invalid {
        tag: &'static str,
        literal: String,
        reason: String,
    },
}
