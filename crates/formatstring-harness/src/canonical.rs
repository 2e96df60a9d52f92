//! Canonicalization of a test case: the expected rendering and the literal
//! handed to the subject.

use std::ffi::OsString;

use formatstring_reference::{FormatError, LiteralError, SemanticType, Value, encode_literal};

/// Expected output and subject literal for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCase {
    /// Normalized reference rendering, or the reference engine's rejection.
    pub expected: Result<String, FormatError>,
    pub literal: Vec<u8>,
}

/// Canonicalize `value` of type `ty` under `format`.
///
/// Literal encoding failures are fatal for the case; a reference rejection
/// is carried in [`CanonicalCase::expected`].
pub fn canonicalize(
    ty: SemanticType,
    value: &Value,
    format: &str,
) -> Result<CanonicalCase, LiteralError> {
    Ok(CanonicalCase {
        expected: expected_rendering(format, value),
        literal: encode_literal(ty, value)?,
    })
}

/// Reference rendering of `value` under `format`, with repr quotes on
/// string values converted to the subject's double quotes.
pub fn expected_rendering(format: &str, value: &Value) -> Result<String, FormatError> {
    let rendered = formatstring_reference::render_one(format, value)?;
    if matches!(value, Value::Str(_)) && has_repr_conversion(format) {
        Ok(normalize_quotes(&rendered))
    } else {
        Ok(rendered)
    }
}

/// Whether `format` contains a field matching `{\d*!r[^}]*}`.
#[must_use]
pub fn has_repr_conversion(format: &str) -> bool {
    let bytes = format.as_bytes();
    bytes.iter().enumerate().any(|(start, &b)| {
        if b != b'{' {
            return false;
        }
        let mut pos = start + 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if !bytes[pos..].starts_with(b"!r") {
            return false;
        }
        bytes[pos + 2..].contains(&b'}')
    })
}

/// Replace every single quote with a double quote.
#[must_use]
pub fn normalize_quotes(text: &str) -> String {
    text.replace('\'', "\"")
}

/// Literal bytes as a process argument.
#[cfg(unix)]
#[must_use]
pub fn literal_arg(literal: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(literal.to_vec())
}

/// Literal bytes as a process argument.
#[cfg(not(unix))]
#[must_use]
pub fn literal_arg(literal: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(literal).into_owned())
}
