//! Replacement-field template parser.
//!
//! A template is literal text interleaved with `{name!conv:spec}` fields.
//! `{{` and `}}` stand for literal braces. Parsing is lazy: the iterator
//! yields segments in order and stops at the first malformed piece, so an
//! error in a later field never hides an error in an earlier one.

use crate::error::FormatError;

/// One piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Field(Field<'a>),
}

/// A parsed `{...}` replacement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Text before `!` or `:`; empty means automatic numbering.
    pub name: &'a str,
    /// Character after `!`, unvalidated.
    pub conversion: Option<char>,
    /// Text after `:` up to the closing brace.
    pub spec: &'a str,
    /// The spec itself contains `{`.
    pub nested: bool,
}

/// Lazy iterator over the segments of a template.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Segments<'a> {
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            failed: false,
        }
    }

    fn next_segment(&mut self) -> Result<Segment<'a>, FormatError> {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        let mut brace = None;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            self.pos += 1;
            if b == b'{' || b == b'}' {
                brace = Some(b);
                break;
            }
        }

        let Some(brace) = brace else {
            return Ok(Segment::Literal(&self.text[start..]));
        };
        let at_end = self.pos >= bytes.len();
        let doubled = !at_end && bytes[self.pos] == brace;

        if brace == b'}' && !doubled {
            return Err(FormatError::UnbalancedBrace('}'));
        }
        if brace == b'{' && at_end {
            return Err(FormatError::UnbalancedBrace('{'));
        }
        if doubled {
            // Keep one brace of the pair as literal text.
            self.pos += 1;
            return Ok(Segment::Literal(&self.text[start..self.pos - 1]));
        }

        let literal = &self.text[start..self.pos - 1];
        if !literal.is_empty() {
            // Emit the literal first; the field is parsed on the next call.
            self.pos -= 1;
            return Ok(Segment::Literal(literal));
        }
        self.parse_field().map(Segment::Field)
    }

    /// Parse a field; `self.pos` is just past its opening brace.
    fn parse_field(&mut self) -> Result<Field<'a>, FormatError> {
        let bytes = self.text.as_bytes();
        let name_start = self.pos;
        let mut stop = None;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            self.pos += 1;
            match b {
                b'{' => return Err(FormatError::UnexpectedBraceInName),
                b'[' => {
                    while self.pos < bytes.len() && bytes[self.pos] != b']' {
                        self.pos += 1;
                    }
                }
                b'}' | b':' | b'!' => {
                    stop = Some(b);
                    break;
                }
                _ => {}
            }
        }

        let Some(stop) = stop else {
            return Err(FormatError::UnterminatedField);
        };
        let mut field = Field {
            name: &self.text[name_start..self.pos - 1],
            conversion: None,
            spec: "",
            nested: false,
        };
        if stop == b'}' {
            return Ok(field);
        }

        if stop == b'!' {
            let Some(conversion) = self.text[self.pos..].chars().next() else {
                return Err(FormatError::MissingConversion);
            };
            field.conversion = Some(conversion);
            self.pos += conversion.len_utf8();
            if self.pos < bytes.len() {
                let b = bytes[self.pos];
                self.pos += 1;
                if b == b'}' {
                    return Ok(field);
                }
                if b != b':' {
                    return Err(FormatError::ExpectedColonAfterConversion);
                }
            }
        }

        let spec_start = self.pos;
        let mut depth = 1usize;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            self.pos += 1;
            match b {
                b'{' => {
                    field.nested = true;
                    depth += 1;
                }
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        field.spec = &self.text[spec_start..self.pos - 1];
                        return Ok(field);
                    }
                }
                _ => {}
            }
        }
        Err(FormatError::UnmatchedOpenBrace)
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.text.len() {
            return None;
        }
        let item = self.next_segment();
        self.failed = item.is_err();
        Some(item)
    }
}

/// Resolves field names to positional indices, tracking whether the
/// template uses automatic (`{}`) or manual (`{0}`) numbering.
#[derive(Debug, Default)]
pub struct Numbering {
    next_auto: Option<usize>,
    manual: bool,
}

impl Numbering {
    pub fn resolve(&mut self, name: &str) -> Result<usize, FormatError> {
        if name.is_empty() {
            if self.manual {
                return Err(FormatError::ManualToAutoNumbering);
            }
            let index = self.next_auto.unwrap_or(0);
            self.next_auto = Some(index + 1);
            return Ok(index);
        }
        if !name.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::NamedField(name.to_string()));
        }
        if self.next_auto.is_some() {
            return Err(FormatError::AutoToManualNumbering);
        }
        self.manual = true;
        name.parse().map_err(|_| FormatError::WidthOverflow)
    }
}
