//! Integration tests: editor engine (bs-editor ↔ bs-core).
//!
//! Tests the EditorEngine's ability to round-trip between text and block
//! mutations, exercising the cross-crate boundary.

use bs_core::kind::Category;
use bs_core::model::*;
use bs_core::parser::parse_style;
use bs_editor::clipboard::{Clipboard, duplicate};
use bs_editor::commands::CommandStack;
use bs_editor::sync::{EditError, EditorEngine, StyleMutation, StylePath};
use pretty_assertions::assert_eq;

// ─── Text → Blocks ──────────────────────────────────────────────────────

#[test]
fn text_to_blocks_builds_tree() {
    let engine = EditorEngine::from_text(include_str!("fixtures/blade.txt")).unwrap();
    let root = engine.root();

    assert_eq!(root.os_name(), "StylePtr");
    assert_eq!(root.category(), Category::Wrapper);
    assert_eq!(root.comment, "Main blade");
    assert_eq!(
        engine.node(&StylePath::from([0, 0, 1])).map(Style::os_name),
        Some("DeepSkyBlue")
    );
    assert_eq!(
        engine
            .node(&StylePath::from([0, 3, 1]))
            .and_then(|s| s.param_number(0)),
        Some(500)
    );
}

#[test]
fn invalid_text_is_rejected() {
    let err = EditorEngine::from_text("StylePtr<Layers<Red>()").unwrap_err();
    assert!(matches!(err, EditError::Parse(_)));
}

// ─── Blocks → Text ──────────────────────────────────────────────────────

#[test]
fn blocks_to_text_roundtrip() {
    let mut engine = EditorEngine::from_text(include_str!("fixtures/blade.txt")).unwrap();
    engine
        .apply_mutation(StyleMutation::SetStyle {
            path: StylePath::from([0, 1]),
            index: 0,
            style: Box::new(parse_style("Rgb<255, 128, 0>").unwrap()),
        })
        .unwrap();

    let text = engine.current_text().unwrap().to_string();
    let reparsed = EditorEngine::from_text(&text).unwrap();
    assert_eq!(reparsed.root(), engine.root());
    assert_eq!(
        reparsed
            .node(&StylePath::from([0, 1, 0]))
            .and_then(|s| s.param_number(1)),
        Some(128)
    );
}

#[test]
fn new_engine_emits_on_demand() {
    let mut engine = EditorEngine::new(parse_style("TrFade<300>").unwrap());
    assert_eq!(engine.current_text(), Some("TrFade<300>"));
}

// ─── Clipboard ──────────────────────────────────────────────────────────

#[test]
fn copy_paste_between_slots_is_undoable() {
    let mut engine = EditorEngine::from_text(include_str!("fixtures/blade.txt")).unwrap();
    let mut stack = CommandStack::new(100);
    let mut clipboard = Clipboard::new();
    let original = engine.root().clone();

    clipboard.copy(&engine, &StylePath::from([0, 0])).unwrap();
    let paste = clipboard.paste(&StylePath::from([0, 2]), 0).unwrap();
    stack.execute(&mut engine, paste, "Paste").unwrap();

    assert_eq!(
        engine.node(&StylePath::from([0, 2, 0])).map(Style::os_name),
        Some("AudioFlicker")
    );

    stack.undo(&mut engine).unwrap();
    assert_eq!(engine.root(), &original);
}

#[test]
fn paste_checks_slot_category() {
    let mut engine = EditorEngine::from_text(include_str!("fixtures/blade.txt")).unwrap();
    let mut clipboard = Clipboard::new();
    clipboard.set_content("TrFade<100>");

    let paste = clipboard.paste(&StylePath::from([0, 1]), 0).unwrap();
    assert!(matches!(
        engine.apply_mutation(paste),
        Err(EditError::Param {
            source: ParamError::CategoryMismatch { .. },
            ..
        })
    ));
}

#[test]
fn duplicate_is_a_deep_copy() {
    let mut engine = EditorEngine::from_text(include_str!("fixtures/blade.txt")).unwrap();
    let inout = StylePath::from([0, 3]);

    let mutation = duplicate(&engine, &StylePath::from([0, 3, 0]), &inout, 1).unwrap();
    engine.apply_mutation(mutation).unwrap();
    engine
        .apply_mutation(StyleMutation::SetNumber {
            path: StylePath::from([0, 3, 1]),
            index: 0,
            value: 42,
        })
        .unwrap();

    let node = engine.node(&inout).unwrap();
    assert_eq!(node.param_style(0).and_then(|s| s.param_number(0)), Some(300));
    assert_eq!(node.param_style(1).map(Style::os_name), Some("TrWipe"));
    assert_eq!(node.param_style(1).and_then(|s| s.param_number(0)), Some(42));
}
