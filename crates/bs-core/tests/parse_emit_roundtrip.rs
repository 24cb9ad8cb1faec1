//! Integration tests: parse → emit → re-parse round-trip.
//!
//! Verifies that no data is lost when converting style text → tree → text.

use bs_core::emitter::emit_style;
use bs_core::format::{FormatConfig, format_style};
use bs_core::kind::{Category, CategorySet};
use bs_core::lint::lint_style;
use bs_core::model::*;
use bs_core::parser::{ParseError, Parser, parse_style};
use bs_core::registry::{Registry, Section};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Parse, emit, re-parse, and compare the trees.
fn assert_roundtrip_preserves(input: &str) -> Style {
    let first = parse_style(input).expect("first parse failed");
    let emitted = emit_style(&first).expect("emit failed");
    let second = parse_style(&emitted)
        .unwrap_or_else(|err| panic!("re-parse failed: {err}\nEmitted:\n{emitted}"));
    assert_eq!(first, second, "tree changed after round-trip.\nEmitted:\n{emitted}");
    first
}

fn count_nodes(style: &Style) -> usize {
    1 + style
        .params()
        .iter()
        .filter_map(Param::as_style)
        .map(count_nodes)
        .sum::<usize>()
}

// ─── Fixture-based tests ─────────────────────────────────────────────────

#[test]
fn roundtrip_blast_clash_fixture() {
    let style = assert_roundtrip_preserves(include_str!("fixtures/blast_clash.txt"));
    assert_eq!(style.comment, "Blue blade with blast, clash and lockup");
    assert_eq!(count_nodes(&style), 18);
}

#[test]
fn roundtrip_swing_mix_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/swing_mix.txt"));
}

#[test]
fn roundtrip_sequence_fixture() {
    let style = assert_roundtrip_preserves(include_str!("fixtures/sequence.txt"));
    let sequence = style.param_style(0).and_then(|l| l.param_style(0)).unwrap();
    assert_eq!(sequence.params().len(), 6);
    assert_eq!(sequence.param_bits(4), Some(0x0F0F));
    assert_eq!(sequence.param_bits(5), Some(0xF0F0));

    let alpha = style.param_style(0).and_then(|l| l.param_style(2)).unwrap();
    assert_eq!(alpha.comment, "pulse near the hilt");
}

#[test]
fn roundtrip_time_bend_fixture() {
    let style = assert_roundtrip_preserves(include_str!("fixtures/time_bend.txt"));
    let wipe = style
        .param_style(0)
        .and_then(|l| l.param_style(2))
        .and_then(|t| t.param_style(0))
        .unwrap();
    assert_eq!(wipe.param_number(0), Some(500));
}

#[test]
fn fixtures_are_lint_clean_and_format_idempotently() {
    let config = FormatConfig::default();
    for input in [
        include_str!("fixtures/blast_clash.txt"),
        include_str!("fixtures/swing_mix.txt"),
        include_str!("fixtures/sequence.txt"),
        include_str!("fixtures/time_bend.txt"),
    ] {
        let style = parse_style(input).unwrap();
        assert_eq!(lint_style(&style), Vec::new());

        let first = format_style(input, &config).unwrap();
        let second = format_style(&first, &config).unwrap();
        assert_eq!(first, second);
    }
}

// ─── Exact output ────────────────────────────────────────────────────────

#[test]
fn emit_layout_is_canonical() {
    let style = parse_style(include_str!("fixtures/swing_mix.txt")).unwrap();
    assert_eq!(
        emit_style(&style).unwrap(),
        "/*\nswing-reactive mix\n*/\n\
         StylePtr<\n\
         \tMix<\n\
         \t\tScale<\n\
         \t\t\tSwingSpeed<400>,\n\
         \t\t\tInt<0>,\n\
         \t\t\tInt<32767>\n\
         \t\t>,\n\
         \t\tRed,\n\
         \t\tRgb<255, /* half */ 128, 0>\n\
         \t>\n\
         >()"
    );
}

#[test]
fn builtins_and_wrappers() {
    let style = assert_roundtrip_preserves("ChargingStylePtr<Pulsing<Red, Black, 800>>()");
    assert_eq!(style.category(), Category::Wrapper);
    assert_eq!(emit_style(&parse_style("&style_charging").unwrap()).unwrap(), "&style_charging");
}

// ─── Errors ──────────────────────────────────────────────────────────────

#[test]
fn found_style_distinguishes_non_styles() {
    for text in ["", "   ", "42", "NotAStyle<Red>", "/* open"] {
        let err = parse_style(text).unwrap_err();
        assert!(!err.found_style(), "{text:?} should not count as a style");
    }
    for text in ["StylePtr<>()", "StylePtr<Red, Blue>()", "StylePtr<TrFade<1>>()", "StylePtr<Nope>()"] {
        let err = parse_style(text).unwrap_err();
        assert!(err.found_style(), "{text:?} should count as a malformed style");
    }
}

#[test]
fn nested_error_points_at_parameter() {
    let err = parse_style("StylePtr<Layers<Red, BlastL<White, Blue>>>()").unwrap_err();
    let message = err.to_string();
    assert_eq!(message, "failure while parsing parameter 1 in style StylePtr");
    assert!(matches!(
        err.root_cause(),
        ParseError::Arity { name, expected: 1, given: 2, .. } if name == "BlastL"
    ));
}

// ─── Custom registries ───────────────────────────────────────────────────

#[test]
fn custom_registry_parses_its_own_kinds() {
    let mut registry = Registry::new();
    registry.register(Section::Color, || {
        Style::new(
            "Gradient",
            "Gradient",
            Category::Color,
            [Param::style("Color", CategorySet::COLOR, None).variadic()],
        )
    });
    registry.register(Section::FixedColor, || {
        Style::new("Red", "Red", Category::Color, []).fixed_form()
    });

    let parser = Parser::new(&registry);
    let style = parser.parse("Gradient<Red, Red, Red>").unwrap();
    assert_eq!(style.params().len(), 3);
    assert!(parser.parse("StylePtr<Red>()").is_err());
}

// ─── Serialization ───────────────────────────────────────────────────────

#[test]
fn tree_serializes_to_json() {
    let style = parse_style("TrFade<300>").unwrap();
    let json = serde_json::to_value(&style).unwrap();
    assert_eq!(json["os_name"], "TrFade");
    assert_eq!(json["params"][0]["name"], "Millis");
    assert_eq!(json["params"][0]["slot"]["Number"], 300);
}
