//! Literal codec: the argv form of a value for a given semantic type.
//!
//! Literals are raw bytes. Character types carry a single raw byte for
//! numeric character values, which need not be valid UTF-8.

use crate::error::LiteralError;
use crate::float;
use crate::value::{SemanticType, TypeCategory, Value};

/// Encode `value` as the literal a subject reads back for `ty`.
///
/// Fails when the value kind does not belong to the type, when an integer
/// is outside the type's range, or when a numeric character value has no
/// single-byte encoding.
pub fn encode_literal(ty: SemanticType, value: &Value) -> Result<Vec<u8>, LiteralError> {
    let unsupported = || LiteralError::UnsupportedType {
        tag: ty.tag(),
        value_kind: value.kind_name(),
    };

    if ty.is_character_encoded() {
        return match value {
            Value::Str(s) => Ok(s.as_bytes().to_vec()),
            Value::Int(v) => char_byte(i128::from(*v)).map(|b| vec![b]),
            Value::UInt(v) => char_byte(i128::from(*v)).map(|b| vec![b]),
            Value::Bool(_) | Value::Float(_) => Err(unsupported()),
        };
    }

    match (ty.category(), value) {
        (TypeCategory::Bool, Value::Bool(b)) => Ok(if *b { b"true".to_vec() } else { b"false".to_vec() }),
        (TypeCategory::SignedInt | TypeCategory::UnsignedInt, Value::Int(_) | Value::UInt(_)) => {
            let v = value.as_integer().ok_or_else(unsupported)?;
            check_range(ty, v)?;
            Ok(v.to_string().into_bytes())
        }
        (TypeCategory::Float, Value::Float(v)) => float_literal(ty, *v).map(String::into_bytes),
        (TypeCategory::Text, Value::Str(s)) => Ok(s.as_bytes().to_vec()),
        _ => Err(unsupported()),
    }
}

/// Parse a literal produced by [`encode_literal`] (or typed by hand).
pub fn parse_literal(ty: SemanticType, literal: &[u8]) -> Result<Value, LiteralError> {
    let invalid = |reason: &str| LiteralError::Invalid {
        tag: ty.tag(),
        literal: String::from_utf8_lossy(literal).into_owned(),
        reason: reason.to_string(),
    };

    match ty {
        SemanticType::Char | SemanticType::UnsignedChar => match literal {
            [byte] => Ok(Value::Str(char::from(*byte).to_string())),
            _ => Err(invalid("expected exactly one character")),
        },
        SemanticType::CharArray | SemanticType::String => std::str::from_utf8(literal)
            .map(|s| Value::Str(s.to_string()))
            .map_err(|_| invalid("not valid UTF-8")),
        _ => {
            let text = std::str::from_utf8(literal).map_err(|_| invalid("not valid UTF-8"))?;
            parse_text(ty, text).ok_or_else(|| invalid("malformed literal"))?
        }
    }
}

fn parse_text(ty: SemanticType, text: &str) -> Option<Result<Value, LiteralError>> {
    match ty.category() {
        TypeCategory::Bool => match text {
            "true" => Some(Ok(Value::Bool(true))),
            "false" => Some(Ok(Value::Bool(false))),
            _ => None,
        },
        TypeCategory::SignedInt => {
            let v: i128 = text.parse().ok()?;
            Some(check_range(ty, v).map(|()| Value::Int(v as i64)))
        }
        TypeCategory::UnsignedInt => {
            let v: i128 = text.parse().ok()?;
            Some(check_range(ty, v).map(|()| Value::UInt(v as u64)))
        }
        TypeCategory::Float => parse_float(ty, text).map(|v| Ok(Value::Float(v))),
        TypeCategory::Char | TypeCategory::Text => None,
    }
}

/// Two's-complement byte for a numeric character value.
fn char_byte(v: i128) -> Result<u8, LiteralError> {
    u8::try_from(v)
        .or_else(|_| i8::try_from(v).map(|b| b as u8))
        .map_err(|_| LiteralError::CharOutOfRange {
            value: v.to_string(),
        })
}

fn check_range(ty: SemanticType, v: i128) -> Result<(), LiteralError> {
    match ty.int_range() {
        Some((lo, hi)) if (lo..=hi).contains(&v) => Ok(()),
        _ => Err(LiteralError::OutOfRange {
            tag: ty.tag(),
            value: v.to_string(),
        }),
    }
}

fn float_literal(ty: SemanticType, v: f64) -> Result<String, LiteralError> {
    let sign = if v.is_sign_negative() { "-" } else { "" };
    if v.is_nan() {
        return Ok(format!("{sign}nan"));
    }
    if v.is_infinite() {
        return Ok(format!("{sign}inf"));
    }
    let digits = if ty == SemanticType::Float32 {
        let narrow = v as f32;
        if f64::from(narrow) != v {
            return Err(LiteralError::OutOfRange {
                tag: ty.tag(),
                value: float::repr(v.abs()),
            });
        }
        float::repr_f32(narrow.abs())
    } else {
        float::repr(v.abs())
    };
    Ok(format!("{sign}{digits}"))
}

fn parse_float(ty: SemanticType, text: &str) -> Option<f64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = match body {
        "nan" => f64::NAN,
        "inf" => f64::INFINITY,
        _ if body.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            if ty == SemanticType::Float32 {
                f64::from(body.parse::<f32>().ok()?)
            } else {
                body.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}
