//! Integration test: reference engine renderings and literal codec through
//! the public API.
//!
//! Run: cargo test -p formatstring-reference --test reference_conformance_test

use formatstring_reference::{
    FormatError, SemanticType, Value, encode_literal, parse_literal, render, render_one,
};

fn s(text: &str) -> Value {
    Value::Str(text.to_string())
}

#[test]
fn known_renderings() {
    let cases: &[(&str, Value, &str)] = &[
        ("{:+06d}", Value::Int(-2147483647), "-2147483647"),
        ("{:.2f}", Value::Float(f64::INFINITY), "inf"),
        ("{!r}", s(" Foo\nBar\tBaz!\\ "), "' Foo\\nBar\\tBaz!\\\\ '"),
        ("{:_^+#016x}", Value::Int(-9223372036854775807), "-0x7fffffffffffffff"),
        ("{:_= 016,%}", Value::Int(65535), " 6,553,500.000000%"),
        ("{:_>-#01,d}", Value::Int(1234567), "1,234,567"),
        ("{:,.6f}", Value::Float(-1234.56789), "-1,234.567890"),
        ("{:016.12e}", Value::Float(1e-5), "1.000000000000e-05"),
        ("{:E}", Value::Float(-f64::NAN), "NAN"),
        ("{:_<016.1%}", Value::Float(-0.0), "-0.0%___________"),
        ("{}", Value::Float(4294967295.0), "4294967295.0"),
        ("{}", Value::Float(1e16), "1e+16"),
        ("{!r}", Value::Float(f64::MAX), "1.7976931348623157e+308"),
        ("{}", Value::Float(f64::MIN_POSITIVE), "2.2250738585072014e-308"),
        ("{:.1e}", Value::Float(65535.0), "6.6e+04"),
        (
            "{:f}",
            Value::Float(f64::from(f32::MAX)),
            "340282346638528859811704183484516925440.000000",
        ),
        ("{:F}", Value::Float(f64::INFINITY), "INF"),
        ("{:,}", Value::Int(-1234567), "-1,234,567"),
        ("{:_=+016,.12f}", Value::Float(-4294967295.0), "-4,294,967,295.000000000000"),
        ("{:016,e}", Value::Float(1234.5), "0,001.234500e+03"),
        ("{:b}", Value::Int(-5), "-101"),
        ("{:#o}", Value::UInt(8), "0o10"),
        ("{:_^9s}", s("a"), "____a____"),
        ("{!r:_>8}", s("a"), "_____'a'"),
        ("foo {0} bar {0} baz", Value::Float(-0.0), "foo -0.0 bar -0.0 baz"),
        ("{:#x}", Value::Bool(true), "0x1"),
        ("{}", Value::Bool(true), "True"),
        ("{:d}", Value::Bool(false), "0"),
    ];
    for (format, value, expected) in cases {
        assert_eq!(
            render_one(format, value).as_deref(),
            Ok(*expected),
            "{format} with {value:?}"
        );
    }
}

#[test]
fn conversion_changes_the_value_kind() {
    let err = render_one("{!s:_= 016,%}", &Value::Int(65535)).unwrap_err();
    assert_eq!(err, FormatError::UnknownCode { code: '%', kind: "str" });
    assert_eq!(err.to_string(), "Unknown format code '%' for object of type 'str'");
}

#[test]
fn renderings_are_deterministic() {
    let values = [
        Value::Int(-23),
        Value::UInt(65),
        Value::Float(-1234.56789),
        Value::Float(f64::NAN),
        s("a"),
    ];
    for value in &values {
        for format in ["{}", "{!r}", "{:_^16}", "{0}{0}"] {
            assert_eq!(render_one(format, value), render_one(format, value));
        }
    }
}

#[test]
fn template_errors_are_reported_in_order() {
    assert_eq!(render("{", &[]), Err(FormatError::UnbalancedBrace('{')));
    assert_eq!(render("}", &[]), Err(FormatError::UnbalancedBrace('}')));
    assert_eq!(render("{0}{}", &[s("a")]), Err(FormatError::ManualToAutoNumbering));
    assert_eq!(render("{}{0}", &[s("a")]), Err(FormatError::AutoToManualNumbering));
    assert_eq!(render("{1}", &[s("a")]), Err(FormatError::IndexOutOfRange(1)));
    assert_eq!(render("{{}}", &[]).as_deref(), Ok("{}"));
}

#[test]
fn literals_round_trip_for_every_numeric_kind() {
    let cases = [
        (SemanticType::Int16, Value::Int(-32768), "-32768"),
        (SemanticType::UInt64, Value::UInt(u64::MAX), "18446744073709551615"),
        (SemanticType::Float64, Value::Float(-0.0), "-0.0"),
        (SemanticType::Float32, Value::Float(1234.5), "1234.5"),
        (SemanticType::Extended, Value::Float(f64::NEG_INFINITY), "-inf"),
        (SemanticType::Bool, Value::Bool(false), "false"),
    ];
    for (ty, value, literal) in cases {
        let encoded = encode_literal(ty, &value).unwrap();
        assert_eq!(encoded, literal.as_bytes(), "{ty:?}");
        assert_eq!(parse_literal(ty, &encoded).unwrap(), value);
    }
}

#[test]
fn nan_literal_keeps_its_sign() {
    let encoded = encode_literal(SemanticType::Float64, &Value::Float(-f64::NAN)).unwrap();
    assert_eq!(encoded, b"-nan");
    match parse_literal(SemanticType::Float64, &encoded).unwrap() {
        Value::Float(v) => assert!(v.is_nan() && v.is_sign_negative()),
        other => panic!("expected float, got {other:?}"),
    }
}

#[test]
fn character_literal_is_a_raw_byte() {
    assert_eq!(encode_literal(SemanticType::CharArray, &Value::Int(-5)).unwrap(), [251]);
    assert_eq!(encode_literal(SemanticType::Char, &Value::UInt(65)).unwrap(), b"A");
    assert!(encode_literal(SemanticType::Char, &Value::Int(-129)).is_err());
    assert_eq!(
        parse_literal(SemanticType::UnsignedChar, &[251]).unwrap(),
        s("\u{fb}")
    );
}

#[test]
fn out_of_range_integers_are_rejected() {
    assert!(encode_literal(SemanticType::Int8, &Value::Int(128)).is_err());
    assert!(encode_literal(SemanticType::UInt16, &Value::Int(-1)).is_err());
    assert!(parse_literal(SemanticType::Int32, b"2147483648").is_err());
    assert!(encode_literal(SemanticType::Float32, &Value::Float(0.1)).is_err());
}
