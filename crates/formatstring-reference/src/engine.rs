//! Template rendering entry points.

use crate::error::FormatError;
use crate::render as renderers;
use crate::spec::FormatSpec;
use crate::template::{Numbering, Segment, Segments};
use crate::value::Value;

/// Render `template` against positional `args`.
///
/// Fields are processed left to right; the first error wins.
pub fn render(template: &str, args: &[Value]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut numbering = Numbering::default();

    for segment in Segments::new(template) {
        let field = match segment? {
            Segment::Literal(text) => {
                out.push_str(text);
                continue;
            }
            Segment::Field(field) => field,
        };

        let index = numbering.resolve(field.name)?;
        let arg = args.get(index).ok_or(FormatError::IndexOutOfRange(index))?;
        let converted;
        let value = match field.conversion {
            None => arg,
            Some(conversion) => {
                converted = convert(arg, conversion)?;
                &converted
            }
        };
        if field.nested {
            return Err(FormatError::NestedField(field.spec.to_string()));
        }
        out.push_str(&format_value(value, field.spec)?);
    }
    Ok(out)
}

/// Render a single value for a template with one field referencing it.
pub fn render_one(template: &str, value: &Value) -> Result<String, FormatError> {
    render(template, std::slice::from_ref(value))
}

/// `format(value, spec)`.
pub fn format_value(value: &Value, spec: &str) -> Result<String, FormatError> {
    if spec.is_empty() {
        return Ok(value.to_str());
    }
    let parsed = FormatSpec::parse(spec, value.kind_name())?;
    match value {
        Value::Bool(b) => renderers::format_integer(i128::from(*b), &parsed, "bool"),
        Value::Int(v) => renderers::format_integer(i128::from(*v), &parsed, "int"),
        Value::UInt(v) => renderers::format_integer(i128::from(*v), &parsed, "int"),
        Value::Float(v) => renderers::format_float(*v, &parsed),
        Value::Str(s) => renderers::format_str(s, &parsed),
    }
}

fn convert(value: &Value, conversion: char) -> Result<Value, FormatError> {
    match conversion {
        'r' => Ok(Value::Str(value.repr())),
        's' => Ok(Value::Str(value.to_str())),
        'a' => Ok(Value::Str(value.ascii())),
        other => Err(FormatError::UnknownConversion(other.to_string())),
    }
}
