//! Diff rendering for mismatched renderings.

use std::fmt::Write;

/// Render a diff between the expected and actual rendering.
///
/// Renderings are usually one line, so the diff reports the first differing
/// character before the per-line hunks.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    let Some(offset) = first_difference(expected, actual) else {
        return String::from("[identical]");
    };

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let _ = writeln!(out, "@@ char {offset} @@");

    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    for i in 0..expected_lines.len().max(actual_lines.len()) {
        let e = expected_lines.get(i);
        let a = actual_lines.get(i);
        if e == a {
            continue;
        }
        let _ = writeln!(out, "@@ line {} @@", i + 1);
        if let Some(e) = e {
            let _ = writeln!(out, "-{}", visible(e));
        }
        if let Some(a) = a {
            let _ = writeln!(out, "+{}", visible(a));
        }
    }
    out
}

/// Character index of the first difference, or `None` when equal.
#[must_use]
pub fn first_difference(expected: &str, actual: &str) -> Option<usize> {
    if expected == actual {
        return None;
    }
    let common = expected
        .chars()
        .zip(actual.chars())
        .take_while(|(e, a)| e == a)
        .count();
    Some(common)
}

/// Escape characters that would be invisible in a report.
fn visible(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}
