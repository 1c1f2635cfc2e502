//! Contract Invariant Tests
//!
//! End-to-end editing scenarios against the public API.

use std::time::Instant;

use stacker_core::{
    editor::column_layout,
    modules::{Module, ModuleKind},
    pipeline::ReplayScript,
    Document, DocumentHost, DragInput, DragKey, EditPipeline, EditRequest, EditorConfig, EditorInput,
    Point, StackerEditor, StudioError,
};

/// `[header, paragraph(A), image(B), footer]`
fn create_test_document() -> Document {
    Document::from_modules(vec![
        Module::with_content("H", ModuleKind::Header.default_content()),
        Module::with_content("A", ModuleKind::Paragraph.default_content()),
        Module::with_content("B", ModuleKind::ImageSquare.default_content()),
        Module::with_content("F", ModuleKind::Footer.default_content()),
    ])
}

fn ids(document: &Document) -> Vec<&str> {
    document.modules.iter().map(|m| m.id.as_str()).collect()
}

/// Run pointer/keyboard inputs through an editor owning `document`.
fn drive(document: Document, inputs: Vec<DragInput>) -> DocumentHost {
    let config = EditorConfig::default();
    let mut editor = StackerEditor::new(&config);
    let mut host = DocumentHost::new(document);
    for input in inputs {
        let layout = column_layout(&host.document, 600.0, 100.0);
        let snapshot = host.document.clone();
        editor.handle(&EditorInput::Drag(input), &snapshot, &layout, &mut host, Instant::now());
    }
    host
}

#[test]
fn invariant_drag_a_to_b() {
    let host = drive(
        create_test_document(),
        vec![
            DragInput::PointerDown { id: "A".into(), pos: Point::new(20.0, 150.0) },
            DragInput::PointerMove { pos: Point::new(20.0, 200.0) },
            DragInput::PointerMove { pos: Point::new(20.0, 250.0) },
            DragInput::PointerUp { pos: Point::new(20.0, 250.0) },
        ],
    );
    assert_eq!(ids(&host.document), vec!["H", "B", "A", "F"]);
}

#[test]
fn invariant_drag_onto_self_unchanged() {
    let before = create_test_document();
    let host = drive(
        before.clone(),
        vec![
            DragInput::PointerDown { id: "A".into(), pos: Point::new(20.0, 150.0) },
            DragInput::PointerMove { pos: Point::new(40.0, 160.0) },
            DragInput::PointerUp { pos: Point::new(40.0, 160.0) },
        ],
    );
    assert_eq!(host.document, before);
    assert_eq!(host.document.fingerprint().unwrap(), before.fingerprint().unwrap());
}

#[test]
fn invariant_cancel_mid_gesture_unchanged() {
    let before = create_test_document();
    let host = drive(
        before.clone(),
        vec![
            DragInput::PointerDown { id: "A".into(), pos: Point::new(20.0, 150.0) },
            DragInput::PointerMove { pos: Point::new(20.0, 250.0) },
            DragInput::Key { key: DragKey::Escape, focused: None },
            DragInput::PointerUp { pos: Point::new(20.0, 250.0) },
        ],
    );
    assert_eq!(host.document, before);
}

#[test]
fn invariant_locked_modules_cannot_be_dragged() {
    let before = create_test_document();
    let host = drive(
        before.clone(),
        vec![
            DragInput::PointerDown { id: "H".into(), pos: Point::new(20.0, 50.0) },
            DragInput::PointerMove { pos: Point::new(20.0, 250.0) },
            DragInput::PointerUp { pos: Point::new(20.0, 250.0) },
        ],
    );
    assert_eq!(host.document, before);
    assert_eq!(before.sortable_ids(), vec!["A", "B"]);
}

#[test]
fn invariant_keyboard_reorder() {
    let host = drive(
        create_test_document(),
        vec![
            DragInput::Key { key: DragKey::Activate, focused: Some("B".into()) },
            DragInput::Key { key: DragKey::Up, focused: None },
            DragInput::Key { key: DragKey::Up, focused: None },
            DragInput::Key { key: DragKey::Up, focused: None },
            DragInput::Key { key: DragKey::Activate, focused: None },
        ],
    );
    assert_eq!(ids(&host.document), vec!["H", "B", "A", "F"]);
}

#[test]
fn invariant_add_quote_before_footer() {
    let doc = Document::from_modules(vec![
        Module::with_content("H", ModuleKind::Header.default_content()),
        Module::with_content("A", ModuleKind::Paragraph.default_content()),
        Module::with_content("F", ModuleKind::Footer.default_content()),
    ]);
    let outcome = EditPipeline::default()
        .apply(&doc, &EditRequest::Add { kind: ModuleKind::Quote })
        .unwrap();

    let new_id = outcome.added_id.unwrap();
    assert!(doc.get(&new_id).is_none());
    assert_eq!(ids(&outcome.document), vec!["H", "A", new_id.as_str(), "F"]);
    assert_eq!(outcome.document.modules[2].kind(), Some(ModuleKind::Quote));
}

#[test]
fn invariant_delete_b() {
    let outcome = EditPipeline::default()
        .apply(&create_test_document(), &EditRequest::Delete { id: "B".into() })
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(ids(&outcome.document), vec!["H", "A", "F"]);
}

#[test]
fn invariant_locked_types_not_addable() {
    let result = EditPipeline::default().apply(&create_test_document(), &EditRequest::Add { kind: ModuleKind::Header });
    assert!(matches!(result, Err(StudioError::NotAddable(ModuleKind::Header))));
}

#[test]
fn invariant_pipeline_self_reorder_reports_unchanged() {
    let doc = create_test_document();
    let outcome = EditPipeline::default()
        .apply(
            &doc,
            &EditRequest::Reorder {
                active_id: "A".into(),
                over_id: "A".into(),
            },
        )
        .unwrap();
    assert!(!outcome.changed);
    assert_eq!(outcome.document, doc);
}

#[test]
fn invariant_pipeline_rejects_duplicate_ids() {
    let doc = Document::from_modules(vec![
        Module::with_content("A", ModuleKind::Paragraph.default_content()),
        Module::with_content("A", ModuleKind::Quote.default_content()),
    ]);
    let err = EditPipeline::default()
        .apply(&doc, &EditRequest::Delete { id: "A".into() })
        .unwrap_err();
    assert!(err.to_string().contains("Validation failed"));
}

#[test]
fn invariant_unknown_id_errors_for_explicit_edits() {
    let err = EditPipeline::default()
        .apply(&create_test_document(), &EditRequest::Delete { id: "nope".into() })
        .unwrap_err();
    assert!(err.to_string().contains("Module not found"));
}

#[test]
fn invariant_pipeline_rejects_locked_reorder() {
    let doc = Document::from_modules(vec![
        Module::with_content("H", ModuleKind::Header.default_content()),
        Module::with_content("A", ModuleKind::Paragraph.default_content()),
        Module::with_content("F", ModuleKind::Footer.default_content()),
    ]);
    let result = EditPipeline::default().apply(
        &doc,
        &EditRequest::Reorder {
            active_id: "H".into(),
            over_id: "F".into(),
        },
    );
    assert!(matches!(result, Err(StudioError::LockedModule(id)) if id == "H"));
    assert_eq!(ids(&doc), vec!["H", "A", "F"]);
}

#[test]
fn invariant_unknown_module_survives_edits() {
    let doc: Document = serde_json::from_value(serde_json::json!({
        "modules": [
            { "id": "H", "type": "header", "heading": "Launch" },
            { "id": "x", "type": "video", "src": "clip.mp4", "autoplay": true },
            { "id": "F", "type": "footer", "text": "Acme" }
        ]
    }))
    .unwrap();

    let outcome = EditPipeline::default()
        .apply(&doc, &EditRequest::Add { kind: ModuleKind::Quote })
        .unwrap();

    let written = serde_json::to_value(&outcome.document).unwrap();
    assert_eq!(
        written["modules"][1],
        serde_json::json!({ "id": "x", "type": "video", "src": "clip.mp4", "autoplay": true })
    );
    let reloaded: Document = serde_json::from_value(written).unwrap();
    assert_eq!(reloaded, outcome.document);
}

#[test]
fn invariant_replay_script_from_json() {
    let script: ReplayScript = serde_json::from_value(serde_json::json!({
        "inputs": [
            { "action": "select", "id": "B" },
            { "action": "drag", "kind": "pointer_down", "id": "A", "pos": { "x": 20, "y": 150 } },
            { "action": "drag", "kind": "pointer_move", "pos": { "x": 20, "y": 250 } },
            { "action": "drag", "kind": "pointer_up", "pos": { "x": 20, "y": 250 } },
            { "action": "delete", "id": "B" },
            { "action": "open_menu" },
            { "action": "add_module", "kind": "divider" }
        ]
    }))
    .unwrap();

    let outcome = EditPipeline::default()
        .replay(&create_test_document(), &script)
        .unwrap();

    assert_eq!(outcome.selected, None);
    let kinds: Vec<_> = outcome.document.modules.iter().map(|m| m.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            Some(ModuleKind::Header),
            Some(ModuleKind::Paragraph),
            Some(ModuleKind::Divider),
            Some(ModuleKind::Footer),
        ]
    );
    assert_eq!(outcome.document.modules[1].id, "A");
}

#[test]
fn invariant_document_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let doc = Document::new_stacker("Launch", "Acme");
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    assert_eq!(Document::load(&path).unwrap(), doc);
}
