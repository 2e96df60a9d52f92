//! Specifier grammar composer.
//!
//! A format specifier is built from independent axes (conversion, fill and
//! alignment, sign, alternate flag, width, grouping, precision, presentation
//! letter). The composer takes the cross product of the axes that apply to
//! a type category, joins each combination into a mini-spec, and wraps it
//! as `{<conversion>:<mini-spec>}`.
//!
//! Empty fragments are kept, so distinct axis combinations can produce the
//! same string (`'' + '0'` and `'0' + ''`). Such repeats are intentional and
//! never filtered.

use formatstring_reference::{SemanticType, TypeCategory};

use crate::config::{HarnessConfig, PresentationTypes};

pub const CONVERSIONS: &[&str] = &["", "!r", "!s"];
pub const ALIGNS: &[&str] = &["", "_<", "_>", "_=", "_^"];
pub const STR_ALIGNS: &[&str] = &["_<", "_>", "_^"];
pub const SIGNS: &[&str] = &["", "+", "-", " "];
pub const ALTERNATES: &[&str] = &["", "#"];
pub const WIDTHS: &[&str] = &["", "0", "01", "016"];
pub const GROUPINGS: &[&str] = &["", ","];
pub const PRECISIONS: &[&str] = &["", ".0", ".1", ".6", ".12"];

/// Forms tested for every type regardless of axes.
pub const BASIC_FORMATS: &[&str] = &["{}", "{!r}", "{!s}", "{0}", "foo {0} bar {0} baz"];

/// Pairwise concatenation, `xs` outermost.
#[must_use]
pub fn comb(xs: &[&str], ys: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(xs.len() * ys.len());
    for x in xs {
        for y in ys {
            out.push(format!("{x}{y}"));
        }
    }
    out
}

/// Right fold of [`comb`] over `axes`; the first axis varies slowest.
#[must_use]
pub fn combs(axes: &[&[&str]]) -> Vec<String> {
    axes.iter()
        .rev()
        .fold(vec![String::new()], |acc, axis| comb(axis, &acc))
}

/// Every conversion combined with every mini-spec of `axes`, wrapped in
/// braces.
#[must_use]
pub fn fields(axes: &[&[&str]]) -> Vec<String> {
    let specs: Vec<String> = combs(axes).into_iter().map(|spec| format!(":{spec}")).collect();
    comb(CONVERSIONS, &specs)
        .into_iter()
        .map(|inner| format!("{{{inner}}}"))
        .collect()
}

fn with_empty(letters: &[&'static str]) -> Vec<&'static str> {
    std::iter::once("").chain(letters.iter().copied()).collect()
}

fn basic() -> Vec<String> {
    BASIC_FORMATS.iter().map(|f| (*f).to_string()).collect()
}

/// Integer-like specifiers: alternate forms with non-decimal letters,
/// grouped decimal, and integer-as-float presentations.
fn integer_fields(types: &PresentationTypes) -> Vec<String> {
    let nondec = with_empty(types.nondec_types);
    let floats = with_empty(types.float_types);
    let mut out = fields(&[ALIGNS, SIGNS, ALTERNATES, WIDTHS, &nondec]);
    out.extend(fields(&[ALIGNS, SIGNS, ALTERNATES, WIDTHS, GROUPINGS, &["", "d"]]));
    out.extend(fields(&[ALIGNS, SIGNS, WIDTHS, GROUPINGS, &floats]));
    out
}

/// The ordered format strings tested for `ty`.
#[must_use]
pub fn formats_for(ty: SemanticType, config: &HarnessConfig) -> Vec<String> {
    let types = config.presentation.types();
    match ty.category() {
        TypeCategory::Bool => {
            let letters: Vec<&str> = std::iter::once("")
                .chain(types.char_types.iter().copied())
                .chain(types.int_types.iter().copied())
                .chain(types.float_types.iter().copied())
                .collect();
            let mut out = basic();
            out.extend(fields(&[ALIGNS, WIDTHS, &letters]));
            out
        }
        TypeCategory::Char | TypeCategory::SignedInt | TypeCategory::UnsignedInt => {
            let mut out = basic();
            out.extend(integer_fields(types));
            out
        }
        TypeCategory::Float => {
            let mut out = if config.float_basic_formats {
                basic()
            } else {
                Vec::new()
            };
            if config.float_precision_axis {
                out.extend(fields(&[
                    ALIGNS,
                    SIGNS,
                    WIDTHS,
                    GROUPINGS,
                    PRECISIONS,
                    types.float_types,
                ]));
            } else {
                out.extend(fields(&[ALIGNS, SIGNS, WIDTHS, GROUPINGS, types.float_types]));
            }
            out
        }
        TypeCategory::Text => {
            let letters = with_empty(types.str_types);
            let mut out = basic();
            out.extend(fields(&[STR_ALIGNS, WIDTHS, &letters]));
            out.extend(fields(&[&letters]));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Presentation;

    #[test]
    fn comb_orders_first_axis_outermost() {
        let ys = vec![String::from("1"), String::from("2")];
        assert_eq!(comb(&["a", "b"], &ys), ["a1", "a2", "b1", "b2"]);
        assert_eq!(combs(&[&["a", "b"], &["", "x"], &["1"]]), ["a1", "ax1", "b1", "bx1"]);
    }

    #[test]
    fn combs_of_no_axes_is_the_empty_spec() {
        assert_eq!(combs(&[]), [""]);
        assert_eq!(fields(&[]), ["{:}", "{!r:}", "{!s:}"]);
    }

    #[test]
    fn fields_wrap_conversion_and_spec() {
        let out = fields(&[&["_<"], &["", "016"]]);
        assert_eq!(
            out,
            ["{:_<}", "{:_<016}", "{!r:_<}", "{!r:_<016}", "{!s:_<}", "{!s:_<016}"]
        );
    }

    #[test]
    fn default_counts_match_axis_products() {
        let config = HarnessConfig::default();
        // 5 + 3*(5*4*2*4*4) + 3*(5*4*2*4*2*2) + 3*(5*4*4*2*6)
        assert_eq!(formats_for(SemanticType::Int32, &config).len(), 6725);
        assert_eq!(formats_for(SemanticType::UInt64, &config).len(), 6725);
        // 3*(5*4*4*2*5*5)
        assert_eq!(formats_for(SemanticType::Float64, &config).len(), 12000);
        // 5 + 3*(3*4*2) + 3*2
        assert_eq!(formats_for(SemanticType::String, &config).len(), 83);
        // 5 + 3*(5*4*10)
        assert_eq!(formats_for(SemanticType::Bool, &config).len(), 605);
    }

    #[test]
    fn float_switches_change_counts() {
        let config = HarnessConfig {
            float_precision_axis: false,
            float_basic_formats: true,
            ..HarnessConfig::default()
        };
        let formats = formats_for(SemanticType::Float32, &config);
        assert_eq!(formats.len(), 5 + 2400);
        assert_eq!(formats[0], "{}");
    }

    #[test]
    fn full_presentation_widens_letters() {
        let config = HarnessConfig {
            presentation: Presentation::Full,
            ..HarnessConfig::default()
        };
        // 5 + 3*(5*4*2*4*7) + 3*(5*4*2*4*2*2) + 3*(5*4*4*2*10)
        assert_eq!(formats_for(SemanticType::Int16, &config).len(), 5 + 3360 + 1920 + 4800);
        assert!(formats_for(SemanticType::String, &config).contains(&String::from("{!r:S}")));
    }

    #[test]
    fn duplicates_are_kept() {
        let formats = formats_for(SemanticType::Int32, &HarnessConfig::default());
        let repeats = formats.iter().filter(|f| f.as_str() == "{:}").count();
        assert!(repeats > 1);
    }

    #[test]
    fn generated_specs_follow_the_expected_shape() {
        let formats = formats_for(SemanticType::Int64, &HarnessConfig::default());
        assert_eq!(&formats[..5], BASIC_FORMATS);
        assert_eq!(formats[5], "{:}");
        assert!(formats.contains(&String::from("{!r:_^+#016x}")));
        assert!(formats.contains(&String::from("{!s:_= 016,%}")));
        assert!(formats.contains(&String::from("{:_>-#01,d}")));
    }
}
