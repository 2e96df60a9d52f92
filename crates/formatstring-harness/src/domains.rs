//! Representative value domains per semantic type.
//!
//! Each domain covers the extremes of its type, zero (and negative zero for
//! floats), a spread of small and mid-range values and, for floats, both
//! signs of NaN and infinity.

use formatstring_reference::{SemanticType, Value};

const INT8: [i64; 10] = [-0x7f, -23, -5, -1, 0, 1, 5, 23, 65, 0x7f];
const UINT8: [u64; 6] = [0, 1, 5, 23, 65, 0xff];

const FLOAT_FINITE: [f64; 12] = [
    -65535.0, -1234.5, -1000.0, -100.0, -1.0, -0.0, 0.0, 1.0, 100.0, 1000.0, 1234.5, 65535.0,
];
const DOUBLE_FINITE: [f64; 12] = [
    -4294967295.0,
    -1234.56789,
    -1000.0,
    -100.0,
    -1.0,
    -0.0,
    0.0,
    1.0,
    100.0,
    1000.0,
    1234.56789,
    4294967295.0,
];

const STRINGS: [&str; 3] = ["", "a", " Foo\nBar\tBaz!\\ "];
const CHARS: [&str; 3] = ["a", "B", " "];

/// Symmetric values of a signed type; each width wraps the narrower one.
fn int_base(ty: SemanticType) -> Vec<i64> {
    let values = INT8.to_vec();
    if ty == SemanticType::Int8 {
        return values;
    }
    let values = [vec![-0x7fff, -1000, -100], values, vec![100, 1000, 0x7fff]].concat();
    if ty == SemanticType::Int16 {
        return values;
    }
    let values = [vec![-0x7fff_ffff], values, vec![0x7fff_ffff]].concat();
    if ty == SemanticType::Int32 {
        return values;
    }
    [
        vec![-0x7fff_ffff_ffff_ffff],
        values,
        vec![0x7fff_ffff_ffff_ffff],
    ]
    .concat()
}

fn uint_base(ty: SemanticType) -> Vec<u64> {
    let mut values = UINT8.to_vec();
    if ty == SemanticType::UInt8 {
        return values;
    }
    values.extend([100, 1000, 0xffff]);
    if ty != SemanticType::UInt16 {
        values.push(0xffff_ffff);
    }
    if ty == SemanticType::UInt64 {
        values.push(u64::MAX);
    }
    values
}

fn float_domain(finite: &[f64], max: f64, min_positive: f64) -> Vec<Value> {
    let mut values = vec![Value::Float(-max)];
    values.extend(finite.iter().copied().map(Value::Float));
    values.extend(
        [
            min_positive,
            max,
            f64::NAN,
            -f64::NAN,
            f64::NEG_INFINITY,
            f64::INFINITY,
        ]
        .map(Value::Float),
    );
    values
}

/// The ordered value domain for `ty`.
#[must_use]
pub fn values(ty: SemanticType) -> Vec<Value> {
    match ty {
        SemanticType::Bool => vec![Value::Bool(true), Value::Bool(false)],
        SemanticType::Char | SemanticType::UnsignedChar => {
            CHARS.iter().map(|s| Value::Str((*s).to_string())).collect()
        }
        SemanticType::Int8 | SemanticType::Int16 | SemanticType::Int32 | SemanticType::Int64 => {
            let min = ty.int_range().map_or(i64::MIN, |(lo, _)| lo as i64);
            std::iter::once(min)
                .chain(int_base(ty))
                .map(Value::Int)
                .collect()
        }
        SemanticType::UInt8 | SemanticType::UInt16 | SemanticType::UInt32 | SemanticType::UInt64 => {
            uint_base(ty).into_iter().map(Value::UInt).collect()
        }
        SemanticType::Float32 => float_domain(
            &FLOAT_FINITE,
            f64::from(f32::MAX),
            f64::from(f32::MIN_POSITIVE),
        ),
        SemanticType::Float64 | SemanticType::Extended => {
            float_domain(&DOUBLE_FINITE, f64::MAX, f64::MIN_POSITIVE)
        }
        SemanticType::CharArray | SemanticType::String => {
            STRINGS.iter().map(|s| Value::Str((*s).to_string())).collect()
        }
    }
}
