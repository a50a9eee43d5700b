//! Command sequences through the full editor: copy/delete, text
//! editing, and invariant preservation

use pagecraft_editor::{
    Command, Document, DragSource, Editor, Node, Point, Section, TextKey,
};

fn editor_with_body_children(count: usize) -> Editor {
    let mut doc = Document::starter();
    for i in 0..count {
        let mut node = Node::new("div");
        node.metadata.capabilities.draggable = true;
        node.metadata.capabilities.droppable = true;
        node.metadata.capabilities.selectable = true;
        doc.body.nodes.push(node);
        doc.body.nodes[0].children.push(i + 1);
    }
    Editor::new(doc)
}

fn editor_with_textbox(rows: &[&str]) -> Editor {
    let mut doc = Document::starter();
    doc.body.nodes[0].metadata.capabilities.textbox = true;
    for (i, row) in rows.iter().enumerate() {
        let mut node = Node::new("text");
        node.set_text(*row);
        node.metadata.capabilities.editable = true;
        doc.body.nodes.push(node);
        doc.body.nodes[0].children.push(i + 1);
    }
    Editor::new(doc)
}

fn body_rows(editor: &Editor) -> Vec<String> {
    let body = &editor.document().body;
    body.root()
        .children
        .iter()
        .map(|&c| body.nodes[c].text().unwrap_or("").to_string())
        .collect()
}

#[test]
fn test_copy_then_delete_restores_section() {
    let mut editor = editor_with_body_children(2);
    let before = editor.document().body.clone();

    editor.dispatch(Command::CopyElement { id: "b-1".to_string() }).unwrap();
    assert_eq!(editor.document().body.len(), 4);
    assert_eq!(editor.document().body.root().children, vec![1, 3, 2]);

    editor.dispatch(Command::DeleteElement { id: "b-3".to_string() }).unwrap();
    assert_eq!(editor.document().body, before);
}

#[test]
fn test_delete_clears_stale_selection() {
    let mut editor = editor_with_body_children(2);

    editor.dispatch(Command::Select { id: "b-2".to_string() }).unwrap();
    editor.dispatch(Command::DeleteElement { id: "b-1".to_string() }).unwrap();

    // Indices shifted; ids held for that section were dropped.
    assert_eq!(editor.selected_id(), None);
    assert_eq!(editor.document().body.root().children, vec![1]);
}

#[test]
fn test_delete_keeps_selection_in_other_sections() {
    let mut editor = editor_with_body_children(1);

    editor.dispatch(Command::Select { id: "h-0".to_string() }).unwrap();
    editor.dispatch(Command::DeleteElement { id: "b-1".to_string() }).unwrap();

    assert_eq!(editor.selected_id(), Some("h-0"));
}

#[test]
fn test_stale_id_aborts_command_only() {
    let mut editor = editor_with_body_children(1);
    let before = editor.document().clone();

    assert!(editor.dispatch(Command::DeleteElement { id: "b-7".to_string() }).is_err());
    assert_eq!(editor.document(), &before);

    // The session keeps working afterwards.
    editor.dispatch(Command::Select { id: "b-1".to_string() }).unwrap();
    assert_eq!(editor.selected_id(), Some("b-1"));
}

#[test]
fn test_text_editing_round_trip() {
    let mut editor = editor_with_textbox(&["ab", "cd"]);

    editor
        .dispatch(Command::DoubleClick {
            container: "b-0".to_string(),
            element: "b-1".to_string(),
        })
        .unwrap();
    assert!(editor.snapshot().cursor.is_some());
    assert_eq!(editor.snapshot().editing_container.as_deref(), Some("b-0"));

    // Type at the caret: "ab" → "xab".
    editor
        .dispatch(Command::TextKeypress { key: TextKey::Char('x'), element: "b-0".to_string() })
        .unwrap();
    assert_eq!(body_rows(&editor), vec!["xab", "cd"]);

    editor.dispatch(Command::Blur { element: "b-0".to_string() }).unwrap();
    assert!(editor.snapshot().cursor.is_none());

    // Keypresses after blur are benign no-ops.
    editor
        .dispatch(Command::TextKeypress { key: TextKey::Char('y'), element: "b-0".to_string() })
        .unwrap();
    assert_eq!(body_rows(&editor), vec!["xab", "cd"]);
}

#[test]
fn test_backspace_merge_through_commands() {
    let mut editor = editor_with_textbox(&["ab", "cd"]);
    editor
        .dispatch(Command::DoubleClick {
            container: "b-0".to_string(),
            element: "b-1".to_string(),
        })
        .unwrap();

    // Walk the caret to the start of row 1.
    editor
        .dispatch(Command::TextKeypress {
            key: TextKey::ArrowDown,
            element: "b-0".to_string(),
        })
        .unwrap();
    editor
        .dispatch(Command::TextKeypress {
            key: TextKey::Backspace,
            element: "b-0".to_string(),
        })
        .unwrap();

    assert_eq!(body_rows(&editor), vec!["abcd"]);
    let cursor = editor.snapshot().cursor.unwrap();
    assert_eq!((cursor.row, cursor.col), (0, 2));
}

#[test]
fn test_selecting_ends_text_edit() {
    let mut editor = editor_with_textbox(&["ab"]);
    editor
        .dispatch(Command::DoubleClick {
            container: "b-0".to_string(),
            element: "b-1".to_string(),
        })
        .unwrap();
    assert!(editor.snapshot().cursor.is_some());

    editor.dispatch(Command::Select { id: "h-0".to_string() }).unwrap();
    assert!(editor.snapshot().cursor.is_none());
}

#[test]
fn test_structural_mutation_ends_text_edit() {
    let mut editor = editor_with_textbox(&["ab"]);
    editor
        .dispatch(Command::DoubleClick {
            container: "b-0".to_string(),
            element: "b-1".to_string(),
        })
        .unwrap();

    editor.dispatch(Command::CopyElement { id: "b-1".to_string() }).unwrap();
    assert!(editor.snapshot().cursor.is_none());
}

#[test]
fn test_double_click_without_textbox_is_noop() {
    let mut editor = editor_with_body_children(1);
    editor
        .dispatch(Command::DoubleClick {
            container: "b-1".to_string(),
            element: "b-1".to_string(),
        })
        .unwrap();
    assert!(editor.snapshot().cursor.is_none());
}

#[test]
fn test_double_click_with_stale_element_errors() {
    let mut editor = editor_with_textbox(&["ab"]);

    let result = editor.dispatch(Command::DoubleClick {
        container: "b-0".to_string(),
        element: "b-9".to_string(),
    });

    assert!(result.is_err());
    assert_eq!(editor.selected_id(), None);
    assert!(editor.snapshot().cursor.is_none());
}

#[test]
fn test_resize_writes_style_through_mutations() {
    let mut doc = Document::starter();
    let mut node = Node::new("div");
    node.metadata.capabilities.resizable = true;
    doc.body.nodes.push(node);
    doc.body.nodes[0].children.push(1);
    let mut editor = Editor::new(doc);

    editor
        .dispatch(Command::Resize { id: "b-1".to_string(), width: 300.0, height: 150.0 })
        .unwrap();

    let node = editor.document().body.get(1).unwrap();
    assert_eq!(node.style["width"].value, "300px");
    assert_eq!(node.style["height"].value, "150px");
}

#[test]
fn test_resize_without_capability_is_noop() {
    let mut editor = editor_with_body_children(1);
    editor
        .dispatch(Command::Resize { id: "b-1".to_string(), width: 300.0, height: 150.0 })
        .unwrap();
    assert!(editor.document().body.get(1).unwrap().style.get("width").is_none());
}

#[test]
fn test_hold_bindings_drive_tree_drags() {
    let mut editor = editor_with_body_children(2);
    editor.bind_hold("b-1").unwrap();

    editor.dispatch(Command::Hover { id: "b-1".to_string() }).unwrap();
    editor.dispatch(Command::PointerHeld).unwrap();
    assert!(editor.is_dragging());

    editor.dispatch(Command::CancelDrag).unwrap();
    assert!(!editor.is_dragging());
}

#[test]
fn test_hold_bindings_released_on_structure_change() {
    let mut editor = editor_with_body_children(2);
    editor.bind_hold("b-2").unwrap();

    editor.dispatch(Command::DeleteElement { id: "b-1".to_string() }).unwrap();

    // "b-2" points at a different node now; the binding is gone.
    editor.dispatch(Command::Hover { id: "b-1".to_string() }).unwrap();
    editor.dispatch(Command::PointerHeld).unwrap();
    assert!(!editor.is_dragging());
}

#[test]
fn test_invariants_hold_across_mixed_commands() {
    let mut editor = editor_with_body_children(3);

    editor.dispatch(Command::CopyElement { id: "b-2".to_string() }).unwrap();
    editor.dispatch(Command::DeleteElement { id: "b-1".to_string() }).unwrap();

    editor
        .dispatch(Command::StartDrag {
            source: DragSource::Widget { index: 0 },
        })
        .unwrap();
    editor.dispatch(Command::PointerMove { x: 30.0, y: 30.0 }).unwrap();
    editor
        .dispatch(Command::DragOver {
            target: "b-0".to_string(),
            pointer: Point::new(30.0, 30.0),
        })
        .unwrap();
    editor.dispatch(Command::Drop { target: "b-0".to_string() }).unwrap();

    assert!(editor.document().validate().is_ok());
    for section in Section::ALL {
        assert!(editor.document().section(section).validate().is_ok());
    }
}

#[test]
fn test_commands_serialize_for_scripting() {
    let commands = vec![
        Command::Select { id: "b-1".to_string() },
        Command::StartDrag { source: DragSource::Widget { index: 0 } },
        Command::TextKeypress { key: TextKey::Char('a'), element: "b-0".to_string() },
    ];

    let json = serde_json::to_string(&commands).unwrap();
    let back: Vec<Command> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, commands);
}
