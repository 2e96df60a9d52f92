//! Format mini-language parser.
//!
//! Grammar: `[[fill]align][sign][#][0][width][grouping][.precision][type]`
//! where `align` is one of `< > = ^`, `sign` one of `+ - space`, and
//! `grouping` one of `, _`.
//!
//! Parsing is independent of the value being formatted except for two
//! things resolved later by [`FormatSpec::resolve_fill`]: the default
//! alignment, and whether a bare `0` flag implies `=` alignment.

use crate::error::FormatError;

/// Field alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,      // '<'
    Right,     // '>'
    Center,    // '^'
    AfterSign, // '='
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            '=' => Some(Self::AfterSign),
            _ => None,
        }
    }
}

/// Sign policy for numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Always,       // '+'
    NegativeOnly, // '-'
    Space,        // ' '
}

/// Digit-group separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Comma,
    Underscore,
}

impl Grouping {
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Underscore => '_',
        }
    }
}

/// A parsed format mini-spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    /// Explicit fill character (only present together with an alignment).
    pub fill: Option<char>,
    pub align: Option<Align>,
    pub sign: Option<Sign>,
    pub alternate: bool,
    /// A `0` flag consumed before the width (only when no fill was given).
    pub zero_pad: bool,
    pub width: Option<usize>,
    pub grouping: Option<Grouping>,
    pub precision: Option<usize>,
    /// Presentation type letter.
    pub kind: Option<char>,
}

impl FormatSpec {
    /// Parse `text`; `type_name` only feeds error messages.
    pub fn parse(text: &str, type_name: &'static str) -> Result<Self, FormatError> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut pos = 0;
        let mut spec = Self::default();

        // --- fill / align ---
        if len >= 2 && Align::from_char(chars[1]).is_some() {
            spec.fill = Some(chars[0]);
            spec.align = Align::from_char(chars[1]);
            pos = 2;
        } else if len >= 1 && Align::from_char(chars[0]).is_some() {
            spec.align = Align::from_char(chars[0]);
            pos = 1;
        }

        // --- sign ---
        if pos < len {
            spec.sign = match chars[pos] {
                '+' => Some(Sign::Always),
                '-' => Some(Sign::NegativeOnly),
                ' ' => Some(Sign::Space),
                _ => None,
            };
            if spec.sign.is_some() {
                pos += 1;
            }
        }

        // --- alternate ---
        if pos < len && chars[pos] == '#' {
            spec.alternate = true;
            pos += 1;
        }

        // --- zero flag (only when no explicit fill) ---
        if spec.fill.is_none() && pos < len && chars[pos] == '0' {
            spec.zero_pad = true;
            pos += 1;
        }

        // --- width ---
        let (width, consumed) = parse_decimal(&chars[pos..])?;
        spec.width = width;
        pos += consumed;

        // --- grouping ---
        if pos < len {
            spec.grouping = match chars[pos] {
                ',' => Some(Grouping::Comma),
                '_' => Some(Grouping::Underscore),
                _ => None,
            };
            if spec.grouping.is_some() {
                let first = chars[pos];
                pos += 1;
                if pos < len && matches!(chars[pos], ',' | '_') {
                    if chars[pos] == first {
                        return Err(FormatError::GroupingNotAllowed {
                            separator: first,
                            kind: first,
                        });
                    }
                    return Err(FormatError::MixedGrouping);
                }
            }
        }

        // --- precision ---
        if pos < len && chars[pos] == '.' {
            pos += 1;
            let (precision, consumed) = parse_decimal(&chars[pos..])?;
            if precision.is_none() {
                return Err(FormatError::MissingPrecision);
            }
            spec.precision = precision;
            pos += consumed;
        }

        // --- presentation type ---
        match len - pos {
            0 => {}
            1 => spec.kind = Some(chars[pos]),
            _ => {
                return Err(FormatError::InvalidSpecifier {
                    spec: text.to_string(),
                    kind: type_name,
                });
            }
        }

        Ok(spec)
    }

    /// Resolve fill character and alignment for a value kind.
    ///
    /// A `0` flag sets the fill to `0`; for kinds that right-align by default
    /// it also selects sign-aware (`=`) alignment unless one was given.
    #[must_use]
    pub fn resolve_fill(&self, default_align: Align) -> (char, Align) {
        if self.zero_pad {
            let align = self.align.unwrap_or(if default_align == Align::Right {
                Align::AfterSign
            } else {
                default_align
            });
            ('0', align)
        } else {
            (self.fill.unwrap_or(' '), self.align.unwrap_or(default_align))
        }
    }

    /// Reject a grouping separator the effective presentation type cannot
    /// carry. `kind` is the type letter after defaulting (`None` = omitted).
    pub fn check_grouping(&self, kind: Option<char>) -> Result<(), FormatError> {
        let Some(grouping) = self.grouping else {
            return Ok(());
        };
        match kind {
            None | Some('d' | 'e' | 'f' | 'g' | 'E' | 'G' | '%' | 'F') => Ok(()),
            Some('b' | 'o' | 'x' | 'X') if grouping == Grouping::Underscore => Ok(()),
            Some(kind) => Err(FormatError::GroupingNotAllowed {
                separator: grouping.separator(),
                kind,
            }),
        }
    }
}

/// Parse a run of ASCII digits; returns `(value, consumed)`.
fn parse_decimal(chars: &[char]) -> Result<(Option<usize>, usize), FormatError> {
    let mut value: usize = 0;
    let mut consumed = 0;
    for c in chars {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as usize))
            .ok_or(FormatError::WidthOverflow)?;
        consumed += 1;
    }
    Ok(((consumed > 0).then_some(value), consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_spec() {
        assert_eq!(FormatSpec::parse("", "int").unwrap(), FormatSpec::default());
    }

    #[test]
    fn parse_fill_align_sign_width_type() {
        let spec = FormatSpec::parse("_>+#016,d", "int").unwrap();
        assert_eq!(spec.fill, Some('_'));
        assert_eq!(spec.align, Some(Align::Right));
        assert_eq!(spec.sign, Some(Sign::Always));
        assert!(spec.alternate);
        // With an explicit fill the leading zero belongs to the width.
        assert!(!spec.zero_pad);
        assert_eq!(spec.width, Some(16));
        assert_eq!(spec.grouping, Some(Grouping::Comma));
        assert_eq!(spec.kind, Some('d'));
    }

    #[test]
    fn parse_zero_flag_without_fill() {
        let spec = FormatSpec::parse("+06d", "int").unwrap();
        assert!(spec.zero_pad);
        assert_eq!(spec.width, Some(6));
        assert_eq!(spec.resolve_fill(Align::Right), ('0', Align::AfterSign));
        assert_eq!(spec.resolve_fill(Align::Left), ('0', Align::Left));

        let bare = FormatSpec::parse("0", "int").unwrap();
        assert!(bare.zero_pad);
        assert_eq!(bare.width, None);
    }

    #[test]
    fn parse_align_only_uses_default_fill() {
        let spec = FormatSpec::parse("^", "str").unwrap();
        assert_eq!(spec.fill, None);
        assert_eq!(spec.resolve_fill(Align::Left), (' ', Align::Center));
    }

    #[test]
    fn parse_precision_and_errors() {
        let spec = FormatSpec::parse(".12f", "float").unwrap();
        assert_eq!(spec.precision, Some(12));
        assert_eq!(spec.kind, Some('f'));

        assert_eq!(
            FormatSpec::parse(".f", "float"),
            Err(FormatError::MissingPrecision)
        );
        assert_eq!(FormatSpec::parse(",_d", "int"), Err(FormatError::MixedGrouping));
        assert_eq!(FormatSpec::parse("_,", "float"), Err(FormatError::MixedGrouping));
        let repeated = FormatSpec::parse("10,,", "int").unwrap_err();
        assert_eq!(repeated.to_string(), "Cannot specify ',' with ','.");
        assert_eq!(
            FormatSpec::parse("__", "str"),
            Err(FormatError::GroupingNotAllowed {
                separator: '_',
                kind: '_'
            })
        );
        assert!(matches!(
            FormatSpec::parse("dd", "int"),
            Err(FormatError::InvalidSpecifier { kind: "int", .. })
        ));
    }

    #[test]
    fn grouping_rules_per_type() {
        let comma = FormatSpec::parse(",", "int").unwrap();
        assert!(comma.check_grouping(Some('d')).is_ok());
        assert!(comma.check_grouping(None).is_ok());
        assert_eq!(
            comma.check_grouping(Some('x')),
            Err(FormatError::GroupingNotAllowed {
                separator: ',',
                kind: 'x'
            })
        );
        let under = FormatSpec::parse("_", "int").unwrap();
        assert!(under.check_grouping(Some('b')).is_ok());
        assert!(under.check_grouping(Some('s')).is_err());
    }
}
