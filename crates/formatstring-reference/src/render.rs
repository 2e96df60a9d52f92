//! Per-kind renderers for the format mini-language.
//!
//! Each renderer validates the spec against the value kind, produces the
//! sign, prefix, digits and trailing remainder of the value, and hands them
//! to [`fill_number`] (numbers) or [`pad_text`] (strings) for grouping and
//! padding.
//!
//! Output layout for numbers:
//! `| lpad | sign | prefix | spad | grouped digits | . | remainder | rpad |`

use crate::error::FormatError;
use crate::float::{self, Decimal, Layout};
use crate::spec::{Align, FormatSpec, Grouping, Sign};

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

/// Render an integer (or boolean, via `type_name == "bool"`).
pub fn format_integer(
    value: i128,
    spec: &FormatSpec,
    type_name: &'static str,
) -> Result<String, FormatError> {
    let kind = spec.kind.unwrap_or('d');
    spec.check_grouping(Some(kind))?;

    match kind {
        'b' | 'c' | 'd' | 'o' | 'x' | 'X' | 'n' => {}
        'e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%' => {
            return Ok(format_float_with(value as f64, spec, Some(kind)));
        }
        code => {
            return Err(FormatError::UnknownCode {
                code,
                kind: type_name,
            });
        }
    }

    if spec.precision.is_some() {
        return Err(FormatError::PrecisionOnInteger);
    }

    if kind == 'c' {
        if spec.sign.is_some() {
            return Err(FormatError::SignWithChar);
        }
        if spec.alternate {
            return Err(FormatError::AlternateWithChar);
        }
        let c = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(FormatError::CharOutOfRange)?;
        let remainder = c.to_string();
        return Ok(fill_number(
            &NumberParts {
                negative: false,
                prefix: "",
                digits: "",
                decimal: false,
                remainder: &remainder,
            },
            spec,
            3,
        ));
    }

    let (base, prefix, group) = match kind {
        'b' => (2, "0b", 4),
        'o' => (8, "0o", 4),
        'x' => (16, "0x", 4),
        'X' => (16, "0X", 4),
        _ => (10, "", 3),
    };
    let digits = render_digits(value.unsigned_abs(), base, kind == 'X');
    let group = if spec.grouping == Some(Grouping::Comma) {
        3
    } else {
        group
    };

    Ok(fill_number(
        &NumberParts {
            negative: value < 0,
            prefix: if spec.alternate { prefix } else { "" },
            digits: &digits,
            decimal: false,
            remainder: "",
        },
        spec,
        group,
    ))
}

fn render_digits(mut value: u128, base: u128, uppercase: bool) -> String {
    if value == 0 {
        return String::from("0");
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut out = Vec::with_capacity(128);
    while value > 0 {
        let digit = (value % base) as u8;
        out.push(if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        });
        value /= base;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Floats
// ---------------------------------------------------------------------------

/// Render a float.
pub fn format_float(value: f64, spec: &FormatSpec) -> Result<String, FormatError> {
    spec.check_grouping(spec.kind)?;
    match spec.kind {
        None | Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | 'n' | '%') => {
            Ok(format_float_with(value, spec, spec.kind))
        }
        Some(code) => Err(FormatError::UnknownCode {
            code,
            kind: "float",
        }),
    }
}

fn format_float_with(value: f64, spec: &FormatSpec, kind: Option<char>) -> String {
    let uppercase = matches!(kind, Some('E' | 'F' | 'G'));
    let percent = kind == Some('%');
    let value = if percent { value * 100.0 } else { value };

    // The sign of NaN is never shown.
    let negative = value.is_sign_negative() && !value.is_nan();
    let abs = value.abs();

    let mut body = if value.is_nan() {
        String::from("nan")
    } else if value.is_infinite() {
        String::from("inf")
    } else {
        float_body(abs, spec, kind)
    };
    if uppercase {
        body.make_ascii_uppercase();
    }
    if percent {
        body.push('%');
    }

    let digit_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (digits, rest) = body.split_at(digit_end);
    let (decimal, remainder) = match rest.strip_prefix('.') {
        Some(after) => (true, after),
        None => (false, rest),
    };

    fill_number(
        &NumberParts {
            negative,
            prefix: "",
            digits,
            decimal,
            remainder,
        },
        spec,
        3,
    )
}

fn float_body(abs: f64, spec: &FormatSpec, kind: Option<char>) -> String {
    let alternate = spec.alternate;
    match kind {
        None => match spec.precision {
            None => float::layout(&Decimal::shortest(abs), Layout::Repr, alternate, true),
            Some(p) => {
                let p = p.max(1);
                float::layout(
                    &Decimal::rounded(abs, p),
                    Layout::General { precision: p },
                    alternate,
                    true,
                )
            }
        },
        Some('e' | 'E') => {
            let p = spec.precision.unwrap_or(6);
            float::layout(
                &Decimal::rounded(abs, p + 1),
                Layout::Exponent { precision: p },
                alternate,
                false,
            )
        }
        Some('g' | 'G' | 'n') => {
            let p = spec.precision.unwrap_or(6).max(1);
            float::layout(
                &Decimal::rounded(abs, p),
                Layout::General { precision: p },
                alternate,
                false,
            )
        }
        // 'f', 'F', '%'
        _ => float::fixed(abs, spec.precision.unwrap_or(6), alternate),
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Render a string.
pub fn format_str(s: &str, spec: &FormatSpec) -> Result<String, FormatError> {
    spec.check_grouping(Some(spec.kind.unwrap_or('s')))?;
    if let Some(code) = spec.kind.filter(|&k| k != 's') {
        return Err(FormatError::UnknownCode { code, kind: "str" });
    }
    match spec.sign {
        Some(Sign::Space) => return Err(FormatError::SpaceOnString),
        Some(_) => return Err(FormatError::SignOnString),
        None => {}
    }
    if spec.alternate {
        return Err(FormatError::AlternateOnString);
    }
    let (fill, align) = spec.resolve_fill(Align::Left);
    if align == Align::AfterSign {
        return Err(FormatError::EqualsAlignOnString);
    }

    let text: String = match spec.precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    };
    Ok(pad_text(&text, spec.width, fill, align))
}

/// Pad `text` to `width` characters.
#[must_use]
pub fn pad_text(text: &str, width: Option<usize>, fill: char, align: Align) -> String {
    let len = text.chars().count();
    let total = width.map_or(len, |w| w.max(len));
    let lpad = match align {
        Align::Right => total - len,
        Align::Center => (total - len) / 2,
        Align::Left | Align::AfterSign => 0,
    };
    let rpad = total - len - lpad;

    let mut out = String::with_capacity(text.len() + lpad + rpad);
    push_fill(&mut out, fill, lpad);
    out.push_str(text);
    push_fill(&mut out, fill, rpad);
    out
}

// ---------------------------------------------------------------------------
// Shared number layout
// ---------------------------------------------------------------------------

struct NumberParts<'a> {
    negative: bool,
    prefix: &'a str,
    /// Leading run of digits (grouped).
    digits: &'a str,
    /// Whether a decimal point follows the digits.
    decimal: bool,
    /// Everything after the decimal point (or after the digits).
    remainder: &'a str,
}

fn fill_number(parts: &NumberParts<'_>, spec: &FormatSpec, group: usize) -> String {
    let (fill, align) = spec.resolve_fill(Align::Right);
    let width = spec.width.map_or(-1, |w| w as i64);

    let sign = if parts.negative {
        Some('-')
    } else {
        match spec.sign {
            Some(Sign::Always) => Some('+'),
            Some(Sign::Space) => Some(' '),
            Some(Sign::NegativeOnly) | None => None,
        }
    };

    let non_digit = sign.is_some() as i64
        + parts.prefix.chars().count() as i64
        + parts.decimal as i64
        + parts.remainder.chars().count() as i64;

    let grouped = match spec.grouping {
        Some(grouping) if !parts.digits.is_empty() => {
            let min_width = if fill == '0' && align == Align::AfterSign {
                width - non_digit
            } else {
                0
            };
            insert_grouping(parts.digits, min_width, grouping.separator(), group)
        }
        _ => parts.digits.to_string(),
    };

    let padding = (width - non_digit - grouped.chars().count() as i64).max(0) as usize;
    let (lpad, spad, rpad) = match align {
        Align::Left => (0, 0, padding),
        Align::Right => (padding, 0, 0),
        Align::Center => (padding / 2, 0, padding - padding / 2),
        Align::AfterSign => (0, padding, 0),
    };

    let mut out = String::new();
    push_fill(&mut out, fill, lpad);
    if let Some(s) = sign {
        out.push(s);
    }
    out.push_str(parts.prefix);
    push_fill(&mut out, fill, spad);
    out.push_str(&grouped);
    if parts.decimal {
        out.push('.');
    }
    out.push_str(parts.remainder);
    push_fill(&mut out, fill, rpad);
    out
}

/// Insert separators every `group` digits from the right.
///
/// When `min_width` is positive (zero fill with `=` alignment), the result
/// is widened with zero digits, themselves grouped, until it reaches
/// `min_width`; a group never starts with a separator.
fn insert_grouping(digits: &str, min_width: i64, separator: char, group: usize) -> String {
    let digits: Vec<char> = digits.chars().collect();
    let group = group as i64;
    let mut remaining = digits.len() as i64;
    let mut min_width = min_width;
    let mut rev: Vec<char> = Vec::with_capacity(digits.len() * 2);
    let mut first = true;

    loop {
        let len = group.min(remaining.max(min_width).max(1));
        let zeros = (len - remaining).max(0);
        let chars = remaining.min(len).max(0);

        if !first {
            rev.push(separator);
        }
        let end = remaining as usize;
        let start = (remaining - chars) as usize;
        rev.extend(digits[start..end].iter().rev());
        rev.extend(std::iter::repeat_n('0', zeros as usize));

        remaining -= chars;
        min_width -= len;
        if remaining <= 0 && min_width <= 0 {
            break;
        }
        min_width -= 1;
        first = false;
    }

    rev.into_iter().rev().collect()
}

fn push_fill(out: &mut String, fill: char, count: usize) {
    out.extend(std::iter::repeat_n(fill, count));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i128, spec: &str) -> Result<String, FormatError> {
        format_integer(value, &FormatSpec::parse(spec, "int")?, "int")
    }

    fn flt(value: f64, spec: &str) -> Result<String, FormatError> {
        format_float(value, &FormatSpec::parse(spec, "float")?)
    }

    fn text(value: &str, spec: &str) -> Result<String, FormatError> {
        format_str(value, &FormatSpec::parse(spec, "str")?)
    }

    #[test]
    fn integer_sign_and_zero_pad() {
        assert_eq!(int(-2147483647, "+06d").unwrap(), "-2147483647");
        assert_eq!(int(42, "+06d").unwrap(), "+00042");
        assert_eq!(int(-5, "016").unwrap(), "-000000000000005");
        assert_eq!(int(5, " ").unwrap(), " 5");
        assert_eq!(int(5, "-").unwrap(), "5");
    }

    #[test]
    fn integer_fill_and_alignment() {
        assert_eq!(int(-23, "_<016").unwrap(), "-23_____________");
        assert_eq!(int(-23, "_>016").unwrap(), "_____________-23");
        assert_eq!(int(-23, "_=016").unwrap(), "-_____________23");
        assert_eq!(int(-23, "_^016").unwrap(), "______-23_______");
        assert_eq!(int(7, "_<01").unwrap(), "7");
    }

    #[test]
    fn integer_bases_and_prefixes() {
        assert_eq!(int(255, "b").unwrap(), "11111111");
        assert_eq!(int(255, "#o").unwrap(), "0o377");
        assert_eq!(int(-255, "#x").unwrap(), "-0xff");
        assert_eq!(int(255, "#X").unwrap(), "0XFF");
        assert_eq!(int(255, "#016x").unwrap(), "0x000000000000ff");
        assert_eq!(int(i64::MIN as i128, "x").unwrap(), "-8000000000000000");
        assert_eq!(int(u64::MAX as i128, "#b").unwrap().len(), 66);
    }

    #[test]
    fn integer_grouping() {
        assert_eq!(int(1234567, ",").unwrap(), "1,234,567");
        assert_eq!(int(-1000, ",d").unwrap(), "-1,000");
        assert_eq!(int(65535, "_x").unwrap(), "ffff");
        assert_eq!(int(1048575, "_x").unwrap(), "f_ffff");
        assert_eq!(int(5, "016,").unwrap(), "0,000,000,000,005");
        assert_eq!(int(-5, "016,").unwrap(), "-000,000,000,005");
        assert_eq!(int(1234, "_>016,").unwrap(), "___________1,234");
    }

    #[test]
    fn integer_rejections() {
        assert_eq!(int(5, ".2"), Err(FormatError::PrecisionOnInteger));
        assert_eq!(
            int(5, "s"),
            Err(FormatError::UnknownCode {
                code: 's',
                kind: "int"
            })
        );
        assert_eq!(
            int(5, ",x"),
            Err(FormatError::GroupingNotAllowed {
                separator: ',',
                kind: 'x'
            })
        );
        assert_eq!(int(65, "+c"), Err(FormatError::SignWithChar));
        assert_eq!(int(-1, "c"), Err(FormatError::CharOutOfRange));
        assert_eq!(int(65, "_^5c").unwrap(), "__A__");
    }

    #[test]
    fn integer_as_float() {
        assert_eq!(int(5, "e").unwrap(), "5.000000e+00");
        assert_eq!(int(-1000, ",f").unwrap(), "-1,000.000000");
        assert_eq!(int(1, "%").unwrap(), "100.000000%");
        assert_eq!(int(i64::MAX as i128, "E").unwrap(), "9.223372E+18");
    }

    #[test]
    fn float_presentations() {
        assert_eq!(flt(1234.56789, "e").unwrap(), "1.234568e+03");
        assert_eq!(flt(1234.56789, "E").unwrap(), "1.234568E+03");
        assert_eq!(flt(-1234.56789, "f").unwrap(), "-1234.567890");
        assert_eq!(flt(1234.56789, ".0f").unwrap(), "1235");
        assert_eq!(flt(-0.0, "f").unwrap(), "-0.000000");
        assert_eq!(flt(-0.0, "+.1e").unwrap(), "-0.0e+00");
        assert_eq!(flt(0.0, "+.1e").unwrap(), "+0.0e+00");
        assert_eq!(flt(1.0, "%").unwrap(), "100.000000%");
        assert_eq!(flt(-1234.5, ".1%").unwrap(), "-123450.0%");
        assert_eq!(flt(1234.5, "").unwrap(), "1234.5");
        assert_eq!(flt(1234.5, ".2").unwrap(), "1.2e+03");
    }

    #[test]
    fn float_specials() {
        assert_eq!(flt(f64::INFINITY, ".2f").unwrap(), "inf");
        assert_eq!(flt(f64::NEG_INFINITY, "F").unwrap(), "-INF");
        assert_eq!(flt(f64::NAN, "+e").unwrap(), "+nan");
        assert_eq!(flt(-f64::NAN, "f").unwrap(), "nan");
        assert_eq!(flt(f64::INFINITY, "%").unwrap(), "inf%");
        assert_eq!(flt(f64::INFINITY, "016,f").unwrap(), "0000000000000inf");
        assert_eq!(flt(f64::NEG_INFINITY, "_^016E").unwrap(), "______-INF______");
    }

    #[test]
    fn float_grouping_and_padding() {
        assert_eq!(flt(4294967295.0, ",f").unwrap(), "4,294,967,295.000000");
        assert_eq!(flt(1.0, "016,.1f").unwrap(), "00,000,000,001.0");
        assert_eq!(flt(-65535.0, "_=016.1f").unwrap(), "-________65535.0");
        assert_eq!(flt(100.0, "+016.0e").unwrap(), "+00000000001e+02");
        assert_eq!(flt(f64::NAN, "5").unwrap(), "  nan");
    }

    #[test]
    fn strings() {
        assert_eq!(text("a", "").unwrap(), "a");
        assert_eq!(text("a", "_^016s").unwrap(), "_______a________");
        assert_eq!(text("abc", "_>01").unwrap(), "abc");
        assert_eq!(text("abc", "016").unwrap(), "abc0000000000000");
        assert_eq!(text("abc", ".1").unwrap(), "a");
        assert_eq!(text("a", "+"), Err(FormatError::SignOnString));
        assert_eq!(text("a", "-"), Err(FormatError::SignOnString));
        assert_eq!(text("a", " "), Err(FormatError::SpaceOnString));
        assert_eq!(
            text("a", " #").unwrap_err().to_string(),
            "Space not allowed in string format specifier"
        );
        assert_eq!(text("a", "#"), Err(FormatError::AlternateOnString));
        assert_eq!(text("a", "_="), Err(FormatError::EqualsAlignOnString));
        assert_eq!(
            text("a", "d"),
            Err(FormatError::UnknownCode {
                code: 'd',
                kind: "str"
            })
        );
        assert_eq!(
            text("a", ","),
            Err(FormatError::GroupingNotAllowed {
                separator: ',',
                kind: 's'
            })
        );
    }
}
