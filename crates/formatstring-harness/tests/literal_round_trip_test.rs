//! Integration test: every planned value survives the trip through its
//! literal encoding with the same rendering under every planned specifier.
//!
//! Run: cargo test -p formatstring-harness --test literal_round_trip_test

use formatstring_harness::canonical::expected_rendering;
use formatstring_harness::{HarnessConfig, Presentation, TestPlan};
use formatstring_reference::{SemanticType, encode_literal, parse_literal};

fn widest_config() -> HarnessConfig {
    HarnessConfig {
        include_bool: true,
        include_char: true,
        include_8bit: true,
        float_basic_formats: true,
        presentation: Presentation::Full,
        ..HarnessConfig::default()
    }
}

#[test]
fn decoded_literals_render_like_the_original_values() {
    let plan = TestPlan::build(&widest_config());
    assert_eq!(plan.groups.len(), SemanticType::ALL.len());

    let mut checked = 0usize;
    let mut divergent = Vec::new();
    for group in &plan.groups {
        for value in &group.values {
            let literal = encode_literal(group.ty, value)
                .unwrap_or_else(|e| panic!("{} {value:?}: {e}", group.ty));
            let decoded = parse_literal(group.ty, &literal)
                .unwrap_or_else(|e| panic!("{} {literal:?}: {e}", group.ty));
            for format in &group.formats {
                checked += 1;
                let original = expected_rendering(format, value);
                let round_tripped = expected_rendering(format, &decoded);
                if original != round_tripped && divergent.len() < 10 {
                    divergent.push(format!(
                        "{} {format} {value:?} -> {decoded:?}: {original:?} != {round_tripped:?}",
                        group.ty
                    ));
                }
            }
        }
    }

    assert_eq!(checked, plan.total_cases());
    assert!(divergent.is_empty(), "{}", divergent.join("\n"));
}
