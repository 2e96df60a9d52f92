//! Float digit generation and layout.
//!
//! Digits come from Rust's exact float formatting (`{:e}` for shortest and
//! significant-digit rounding, `{:.N}` for fixed precision). Layout follows
//! the reference engine's rules for where the decimal point goes, when an
//! exponent is used, and how trailing zeros and a trailing `.` are handled.
//!
//! Every function here takes a finite, non-negative magnitude; sign and the
//! nan/inf spellings are handled by the caller.

/// Digits of a finite magnitude: `value = 0.d1d2d3... * 10^decpt`.
///
/// Trailing zeros are stripped; zero is represented as `"0"` with
/// `decpt == 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Decimal {
    pub digits: String,
    pub decpt: i32,
}

impl Decimal {
    /// Shortest digits that round-trip through `f64`.
    pub fn shortest(abs: f64) -> Self {
        Self::from_scientific(&format!("{abs:e}"))
    }

    /// Shortest digits that round-trip through `f32`.
    pub fn shortest_f32(abs: f32) -> Self {
        Self::from_scientific(&format!("{abs:e}"))
    }

    /// Correctly rounded to `significant` digits (at least one).
    pub fn rounded(abs: f64, significant: usize) -> Self {
        let fraction = significant.max(1) - 1;
        Self::from_scientific(&format!("{abs:.fraction$e}"))
    }

    /// Parse Rust's `{:e}` rendering, e.g. `1.2345e3`, `5e-324`, `0e0`.
    fn from_scientific(text: &str) -> Self {
        let (mantissa, exponent) = text.split_once('e').unwrap_or((text, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let mut digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        while digits.len() > 1 && digits.ends_with('0') {
            digits.pop();
        }
        if digits.is_empty() || digits == "0" {
            return Self {
                digits: String::from("0"),
                decpt: 1,
            };
        }
        Self {
            digits,
            decpt: exponent + 1,
        }
    }
}

/// Layout mode for [`layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// Scientific with `precision` digits after the point (`e`).
    Exponent { precision: usize },
    /// General format with `precision` significant digits (`g`).
    General { precision: usize },
    /// Shortest repr: fixed for `1e-4 <= x < 1e16`, exponent otherwise.
    Repr,
}

/// Place digits, decimal point and exponent.
///
/// `alternate` keeps a trailing `.` (and, for general layout, trailing
/// zeros); `add_dot_0` forces at least one fractional digit in fixed
/// notation and lowers the general-format exponent threshold by one.
pub(crate) fn layout(decimal: &Decimal, mode: Layout, alternate: bool, add_dot_0: bool) -> String {
    let digits = decimal.digits.as_bytes();
    let digits_len = digits.len() as i64;
    let mut decpt = i64::from(decimal.decpt);
    let mut vdigits_end = digits_len;
    let mut use_exp = false;

    match mode {
        Layout::Exponent { precision } => {
            use_exp = true;
            vdigits_end = precision as i64 + 1;
        }
        Layout::General { precision } => {
            let precision = precision as i64;
            let threshold = if add_dot_0 { precision - 1 } else { precision };
            if decpt <= -4 || decpt > threshold {
                use_exp = true;
            }
            if alternate {
                vdigits_end = precision;
            }
        }
        Layout::Repr => {
            if decpt <= -4 || decpt > 16 {
                use_exp = true;
            }
        }
    }

    let mut exponent = 0;
    if use_exp {
        exponent = decpt - 1;
        decpt = 1;
    }

    let vdigits_start = if decpt <= 0 { decpt - 1 } else { 0 };
    vdigits_end = if !use_exp && add_dot_0 {
        vdigits_end.max(decpt + 1)
    } else {
        vdigits_end.max(decpt)
    };

    let mut out = String::with_capacity((vdigits_end - vdigits_start + 8).max(8) as usize);
    if decpt <= 0 {
        push_zeros(&mut out, decpt - vdigits_start);
        out.push('.');
        push_zeros(&mut out, -decpt);
    } else {
        push_zeros(&mut out, -vdigits_start);
    }

    if 0 < decpt && decpt <= digits_len {
        let split = decpt as usize;
        out.push_str(&decimal.digits[..split]);
        out.push('.');
        out.push_str(&decimal.digits[split..]);
    } else {
        out.push_str(&decimal.digits);
    }

    if digits_len < decpt {
        push_zeros(&mut out, decpt - digits_len);
        out.push('.');
        push_zeros(&mut out, vdigits_end - decpt);
    } else {
        push_zeros(&mut out, vdigits_end - digits_len);
    }

    if out.ends_with('.') && !alternate {
        out.pop();
    }

    if use_exp {
        out.push('e');
        out.push_str(&exponent_suffix(exponent));
    }
    out
}

/// Fixed-point digits with exactly `precision` fractional digits (`f`).
pub(crate) fn fixed(abs: f64, precision: usize, alternate: bool) -> String {
    let mut out = format!("{abs:.precision$}");
    if alternate && precision == 0 {
        out.push('.');
    }
    out
}

/// Shortest repr of an `f64` magnitude (`str(x)` / `repr(x)`).
pub(crate) fn repr(abs: f64) -> String {
    layout(&Decimal::shortest(abs), Layout::Repr, false, true)
}

/// Shortest repr of an `f32` magnitude, laid out like [`repr`].
pub(crate) fn repr_f32(abs: f32) -> String {
    layout(&Decimal::shortest_f32(abs), Layout::Repr, false, true)
}

/// `%+.02d`: explicit sign, at least two digits.
fn exponent_suffix(exponent: i64) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{:02}", exponent.unsigned_abs())
}

fn push_zeros(out: &mut String, count: i64) {
    for _ in 0..count.max(0) {
        out.push('0');
    }
}
