//! # Editor state machine
//!
//! Top-level coordinator. Owns the document (three node stores plus the
//! widget palette) and the transient UI state: selection, hover, the
//! drag session, text editing, rendered geometry, and hold bindings.
//!
//! Every public operation is one dispatched [`Command`], processed to
//! completion before the next. Each command synchronously updates
//! exactly one of: selection, hover, the active store (through a
//! [`Mutation`]), or the text state. Pointer-move events only update
//! pointer and drag-threshold state; the sole mutating transition is
//! `Drop`.
//!
//! Structural errors abort the in-flight command and leave every store
//! untouched (mutations validate before writing). Missing gesture
//! preconditions are silent no-ops.

use crate::drag::{normalize_widget, DragController, DragPayload, DragOrigin, PreviewOverlay};
use crate::errors::EditorError;
use crate::hold::HoldRegistry;
use crate::layout::{LayoutIndex, Point, Rect};
use crate::mutations::{Mutation, MutationOutcome};
use crate::text::{CursorPosition, TextCursorEngine, TextKey};
use pagecraft_dom::{build_id, Capability, Document, Metadata, NodeStore, Section, Widget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a drag gesture picked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragSource {
    /// An element already in a section, by id.
    Element { id: String },

    /// A palette widget, by palette position.
    Widget { index: usize },
}

/// The command surface consumed by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Select { id: String },
    Hover { id: String },
    Unhover { id: String },

    StartDrag { source: DragSource },
    DragOver { target: String, pointer: Point },
    DragOut { target: String },
    Drop { target: String },
    CancelDrag,

    DeleteElement { id: String },
    CopyElement { id: String },

    DoubleClick { container: String, element: String },
    Blur { element: String },
    TextKeypress { key: TextKey, element: String },

    PointerMove { x: f32, y: f32 },
    PointerHeld,

    Resize { id: String, width: f32, height: f32 },
}

/// One node, resolved for the renderer: derived ids, suppressed entries
/// filtered out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub element: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub children: Vec<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub section: Section,
    pub nodes: Vec<NodeView>,
}

/// Renderer-facing structural/state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorSnapshot {
    pub sections: Vec<SectionView>,
    pub selected_id: Option<String>,
    pub hovered_id: Option<String>,

    /// Present while hovering a drop target mid-drag.
    pub preview: Option<PreviewOverlay>,

    /// Caret position while text editing, with its container id.
    pub cursor: Option<CursorPosition>,
    pub editing_container: Option<String>,
}

/// The page-builder editing engine.
#[derive(Debug, Default)]
pub struct Editor {
    document: Document,
    selected_id: Option<String>,
    hovered_id: Option<String>,
    drag: DragController,
    text: TextCursorEngine,
    layout: LayoutIndex,
    holds: HoldRegistry,
    pointer: Point,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Editor over the default starter document and palette.
    pub fn starter() -> Self {
        Self::new(Document::starter())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.document.widgets
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn hovered_id(&self) -> Option<&str> {
        self.hovered_id.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Rendered geometry push from the renderer, keyed by element id.
    pub fn set_layout(&mut self, id: impl Into<String>, rect: Rect) {
        self.layout.set(id, rect);
    }

    pub fn clear_layout(&mut self) {
        self.layout.clear();
    }

    /// Subscribe an element to hold-to-drag. Fails on a stale id.
    pub fn bind_hold(&mut self, id: &str) -> Result<(), EditorError> {
        self.document.resolve(id)?;
        self.holds.bind(id);
        Ok(())
    }

    pub fn release_hold(&mut self, id: &str) {
        self.holds.release(id);
    }

    /// Process one command to completion.
    pub fn dispatch(&mut self, command: Command) -> Result<(), EditorError> {
        tracing::debug!(?command, "dispatch");

        match command {
            Command::Select { id } => {
                self.document.resolve(&id)?;
                // Selecting a new element implicitly ends a text edit.
                if self.selected_id.as_deref() != Some(id.as_str()) {
                    self.text.stop();
                }
                self.selected_id = Some(id);
                Ok(())
            }

            Command::Hover { id } => {
                self.document.resolve(&id)?;
                self.hovered_id = Some(id);
                Ok(())
            }

            Command::Unhover { id } => {
                if self.hovered_id.as_deref() == Some(id.as_str()) {
                    self.hovered_id = None;
                }
                Ok(())
            }

            Command::StartDrag { source } => self.start_drag(source),

            Command::DragOver { target, pointer } => {
                self.pointer = pointer;
                let address = self.document.resolve(&target)?;
                let store = self.document.section(address.section);
                if !store.get(address.index)?.has(Capability::Droppable) {
                    return Ok(());
                }
                self.hovered_id = Some(target);
                self.drag.drag_over(address, pointer, store, &self.layout);
                Ok(())
            }

            Command::DragOut { target } => {
                if self.hovered_id.as_deref() == Some(target.as_str()) {
                    self.hovered_id = None;
                }
                self.drag.drag_out();
                Ok(())
            }

            Command::Drop { target } => self.drop(&target),

            Command::CancelDrag => {
                self.drag.cancel();
                Ok(())
            }

            Command::DeleteElement { id } => self.delete_element(&id),

            Command::CopyElement { id } => {
                let address = self.document.resolve(&id)?;
                self.apply_mutation(address.section, &Mutation::Copy { index: address.index })?;
                Ok(())
            }

            Command::DoubleClick { container, element } => {
                let address = self.document.resolve(&container)?;
                let store = self.document.section(address.section);
                if !store.get(address.index)?.has(Capability::Textbox) {
                    return Ok(());
                }
                self.document.resolve(&element)?;
                self.selected_id = Some(element);
                self.text.start(address);
                Ok(())
            }

            Command::Blur { element: _ } => {
                self.text.stop();
                Ok(())
            }

            Command::TextKeypress { key, element: _ } => {
                if let Some(container) = self.text.container() {
                    let store = self.document.section_mut(container.section);
                    self.text.keypress(store, key);
                }
                Ok(())
            }

            Command::PointerMove { x, y } => {
                self.pointer = Point::new(x, y);
                self.drag.pointer_moved(self.pointer);
                Ok(())
            }

            Command::PointerHeld => {
                if let Some(id) = self.hovered_id.clone() {
                    if self.holds.is_bound(&id) {
                        return self.start_drag(DragSource::Element { id });
                    }
                }
                Ok(())
            }

            Command::Resize { id, width, height } => self.resize(&id, width, height),
        }
    }

    /// Structural/state snapshot for the renderer.
    pub fn snapshot(&self) -> EditorSnapshot {
        let sections = Section::ALL
            .iter()
            .map(|&section| SectionView {
                section,
                nodes: section_views(self.document.section(section), section),
            })
            .collect();

        let preview = match &self.drag_target_section() {
            Some(section) => self.drag.preview(self.document.section(*section)),
            None => None,
        };

        EditorSnapshot {
            sections,
            selected_id: self.selected_id.clone(),
            hovered_id: self.hovered_id.clone(),
            preview,
            cursor: self.text.cursor(),
            editing_container: self.text.container().map(|c| c.id()),
        }
    }

    fn drag_target_section(&self) -> Option<Section> {
        match self.drag.state() {
            crate::drag::DragState::Hovering { target, .. } => Some(target.section),
            _ => None,
        }
    }

    /// Run one mutation against a section, then drop the transient state
    /// its index shifts could invalidate: text edits end, and the
    /// section's hold bindings are released.
    fn apply_mutation(
        &mut self,
        section: Section,
        mutation: &Mutation,
    ) -> Result<MutationOutcome, EditorError> {
        let outcome = mutation.apply(self.document.section_mut(section))?;
        self.text.stop();
        self.holds.release_section(section);
        Ok(outcome)
    }

    fn start_drag(&mut self, source: DragSource) -> Result<(), EditorError> {
        let payload = match source {
            DragSource::Element { id } => {
                let address = self.document.resolve(&id)?;
                let store = self.document.section(address.section);
                if !store.get(address.index)?.has(Capability::Draggable) {
                    tracing::debug!(%id, "element not draggable, ignoring drag start");
                    return Ok(());
                }
                DragPayload {
                    origin: DragOrigin::Tree(address),
                    subtree: store.extract_subtree(address.index).map_err(EditorError::Dom)?,
                }
            }
            DragSource::Widget { index } => {
                let widget = self
                    .document
                    .widgets
                    .get(index)
                    .ok_or(EditorError::UnknownWidget(index))?;
                DragPayload {
                    origin: DragOrigin::Palette,
                    subtree: normalize_widget(&widget.nodes),
                }
            }
        };

        self.drag.arm(payload, self.pointer);
        Ok(())
    }

    fn drop(&mut self, target: &str) -> Result<(), EditorError> {
        let address = self.document.resolve(target)?;
        let resolution = match self.drag.resolve_drop(address) {
            Some(resolution) => resolution,
            // Mouse-up without a matching hover: session cancelled.
            None => return Ok(()),
        };

        match resolution.payload.origin {
            DragOrigin::Palette => {
                self.apply_mutation(
                    address.section,
                    &Mutation::Insert {
                        parent: address.index,
                        position: resolution.position,
                        subtree: resolution.payload.subtree,
                    },
                )?;
            }

            DragOrigin::Tree(source) if source.section == address.section => {
                self.apply_mutation(
                    address.section,
                    &Mutation::Move {
                        index: source.index,
                        new_parent: address.index,
                        position: resolution.position,
                    },
                )?;
            }

            // Across sections: extract into the target, delete from the
            // source. Both legs validate before either store is written.
            DragOrigin::Tree(source) => {
                let insert = Mutation::Insert {
                    parent: address.index,
                    position: resolution.position,
                    subtree: resolution.payload.subtree,
                };
                let delete = Mutation::Delete { index: source.index };

                insert.validate(self.document.section(address.section))?;
                delete.validate(self.document.section(source.section))?;

                self.apply_mutation(address.section, &insert)?;
                self.apply_mutation(source.section, &delete)?;
            }
        }

        Ok(())
    }

    fn delete_element(&mut self, id: &str) -> Result<(), EditorError> {
        let address = self.document.resolve(id)?;
        if address.index == 0 {
            // Invariant: the section root stays. Benign at this layer.
            tracing::debug!(%id, "ignoring delete of section root");
            return Ok(());
        }

        self.apply_mutation(address.section, &Mutation::Delete { index: address.index })?;

        // Surviving ids in the section may now point at different
        // nodes; drop the ones we hold.
        let stale = |held: &Option<String>| {
            held.as_deref()
                .and_then(|h| pagecraft_dom::parse_id(h).ok())
                .map(|a| a.section == address.section)
                .unwrap_or(false)
        };
        if stale(&self.selected_id) {
            self.selected_id = None;
        }
        if stale(&self.hovered_id) {
            self.hovered_id = None;
        }

        Ok(())
    }

    fn resize(&mut self, id: &str, width: f32, height: f32) -> Result<(), EditorError> {
        let address = self.document.resolve(id)?;
        let store = self.document.section(address.section);
        if !store.get(address.index)?.has(Capability::Resizable) {
            tracing::debug!(%id, "element not resizable, ignoring resize");
            return Ok(());
        }

        for (property, value) in [("width", width), ("height", height)] {
            self.apply_mutation(
                address.section,
                &Mutation::SetStyle {
                    index: address.index,
                    property: property.to_string(),
                    value: format!("{value}px"),
                },
            )?;
        }
        Ok(())
    }
}

fn section_views(store: &NodeStore, section: Section) -> Vec<NodeView> {
    store
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| NodeView {
            id: build_id(section, index),
            element: node.element.clone(),
            attributes: node.output_attributes(),
            style: node.output_styles(),
            children: node
                .children
                .iter()
                .map(|&child| build_id(section, child))
                .collect(),
            metadata: node.metadata.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_unhover() {
        let mut editor = Editor::starter();

        editor.dispatch(Command::Select { id: "b-0".to_string() }).unwrap();
        assert_eq!(editor.selected_id(), Some("b-0"));

        editor.dispatch(Command::Hover { id: "h-0".to_string() }).unwrap();
        assert_eq!(editor.hovered_id(), Some("h-0"));

        editor.dispatch(Command::Unhover { id: "b-0".to_string() }).unwrap();
        assert_eq!(editor.hovered_id(), Some("h-0"));

        editor.dispatch(Command::Unhover { id: "h-0".to_string() }).unwrap();
        assert_eq!(editor.hovered_id(), None);
    }

    #[test]
    fn test_select_stale_id_errors_without_state_change() {
        let mut editor = Editor::starter();
        assert!(editor.dispatch(Command::Select { id: "b-9".to_string() }).is_err());
        assert_eq!(editor.selected_id(), None);
    }

    #[test]
    fn test_unknown_widget_drag_errors() {
        let mut editor = Editor::starter();
        let err = editor
            .dispatch(Command::StartDrag { source: DragSource::Widget { index: 99 } })
            .unwrap_err();
        assert_eq!(err, EditorError::UnknownWidget(99));
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_snapshot_resolves_ids() {
        let editor = Editor::starter();
        let snapshot = editor.snapshot();

        assert_eq!(snapshot.sections.len(), 3);
        assert_eq!(snapshot.sections[0].nodes[0].id, "h-0");
        assert_eq!(snapshot.sections[1].nodes[0].id, "b-0");
        assert!(snapshot.preview.is_none());
        assert!(snapshot.cursor.is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let editor = Editor::starter();
        let json = serde_json::to_value(editor.snapshot()).unwrap();
        assert_eq!(json["sections"][2]["section"], "footer");
    }

    #[test]
    fn test_root_delete_is_noop() {
        let mut editor = Editor::starter();
        editor.dispatch(Command::DeleteElement { id: "b-0".to_string() }).unwrap();
        assert_eq!(editor.document().body.len(), 1);
    }

    #[test]
    fn test_pointer_held_without_binding_is_noop() {
        let mut editor = Editor::starter();
        editor.dispatch(Command::Hover { id: "b-0".to_string() }).unwrap();
        editor.dispatch(Command::PointerHeld).unwrap();
        assert!(!editor.is_dragging());
    }
}
