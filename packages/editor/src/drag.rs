//! # Drag controller
//!
//! State machine for an in-progress drag gesture:
//!
//! ```text
//! Idle → Armed → Dragging → Hovering → {drop | cancel} → Idle
//! ```
//!
//! The controller never mutates a store itself. While hovering it only
//! publishes a predicted insertion index and a preview overlay built
//! against a *clone* of the committed store; the single mutating step
//! happens when the editor executes the resolution returned by
//! [`DragController::resolve_drop`]. A cancelled drag therefore cannot
//! leave a trace in any section.

use crate::layout::{LayoutIndex, Point};
use crate::mutations::Mutation;
use pagecraft_dom::{build_id, AttrValue, Node, NodeAddress, NodeKind, NodeStore, Section};
use serde::{Deserialize, Serialize};

/// Pointer travel (px) required to leave `Armed` for `Dragging`.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Where a drag payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragOrigin {
    /// Instantiating a palette widget; drop resolves to an insert.
    Palette,

    /// Rearranging an element already in the tree; drop resolves to a
    /// move (or an extract + insert across sections).
    Tree(NodeAddress),
}

/// Snapshot of the dragged subtree, taken when the gesture arms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub origin: DragOrigin,
    pub subtree: NodeStore,
}

/// Gesture state. One session at a time; arming while a session is
/// active is ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Armed {
        payload: DragPayload,
        pressed_at: Point,
    },
    Dragging {
        payload: DragPayload,
    },
    Hovering {
        payload: DragPayload,
        target: NodeAddress,
        predicted: usize,
    },
}

/// What a completed drop should do, for the editor to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct DropResolution {
    pub payload: DragPayload,
    pub target: NodeAddress,
    pub position: usize,
}

/// Transient, uncommitted insertion shown while hovering a drop target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewOverlay {
    pub section: Section,
    pub parent: usize,
    pub position: usize,

    /// Clone of the target section with the placeholder spliced in;
    /// rendered directly, the committed store stays untouched.
    pub nodes: NodeStore,
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// `Idle → Armed` on mouse-down over a draggable element. Ignored
    /// while another session is active.
    pub fn arm(&mut self, payload: DragPayload, pressed_at: Point) {
        if self.is_active() {
            tracing::debug!("drag already active, ignoring arm");
            return;
        }
        self.state = DragState::Armed { payload, pressed_at };
    }

    /// `Armed → Dragging` once the pointer moves past the threshold.
    pub fn pointer_moved(&mut self, to: Point) {
        if let DragState::Armed { payload, pressed_at } = &self.state {
            if pressed_at.distance_to(to) >= DRAG_THRESHOLD {
                self.state = DragState::Dragging {
                    payload: payload.clone(),
                };
            }
        }
    }

    /// `{Armed, Dragging, Hovering} → Hovering` over a droppable target.
    /// Reaching a droppable is itself proof of drag intent, so an armed
    /// session hovers without waiting for the movement threshold.
    ///
    /// Computes the predicted insertion index from the target's child
    /// midpoints and the pointer's vertical position. Returns the
    /// prediction, or `None` when no session is active.
    pub fn drag_over(
        &mut self,
        target: NodeAddress,
        pointer: Point,
        store: &NodeStore,
        layout: &LayoutIndex,
    ) -> Option<usize> {
        let payload = match &self.state {
            DragState::Armed { payload, .. }
            | DragState::Dragging { payload }
            | DragState::Hovering { payload, .. } => payload.clone(),
            DragState::Idle => return None,
        };

        let predicted =
            predict_insertion_index(store, target.index, target.section, layout, pointer.y);
        self.state = DragState::Hovering { payload, target, predicted };
        Some(predicted)
    }

    /// `Hovering → Dragging` when the pointer leaves the droppable
    /// without dropping; the preview disappears, nothing was mutated.
    pub fn drag_out(&mut self) {
        if let DragState::Hovering { payload, .. } = &self.state {
            self.state = DragState::Dragging {
                payload: payload.clone(),
            };
        }
    }

    /// Mouse-up. Over the hovered droppable this completes the session
    /// and hands the resolution to the editor; anywhere else it cancels.
    /// Either way the controller returns to `Idle`.
    pub fn resolve_drop(&mut self, target: NodeAddress) -> Option<DropResolution> {
        match std::mem::take(&mut self.state) {
            DragState::Hovering { payload, target: hovered, predicted } if hovered == target => {
                Some(DropResolution {
                    payload,
                    target,
                    position: predicted,
                })
            }
            _ => None,
        }
    }

    /// Explicit cancel (or a stray mouse-up outside every droppable).
    pub fn cancel(&mut self) {
        if self.is_active() {
            tracing::debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Build the preview overlay for the current hover against a clone
    /// of the committed store.
    pub fn preview(&self, committed: &NodeStore) -> Option<PreviewOverlay> {
        let (payload, target, predicted) = match &self.state {
            DragState::Hovering { payload, target, predicted } => (payload, target, predicted),
            _ => return None,
        };

        let mut nodes = committed.clone();
        let placeholder = placeholder_subtree(&payload.subtree);
        let insert = Mutation::Insert {
            parent: target.index,
            position: *predicted,
            subtree: placeholder,
        };
        if let Err(err) = insert.apply(&mut nodes) {
            tracing::debug!(?err, "preview insert skipped");
            return None;
        }

        Some(PreviewOverlay {
            section: target.section,
            parent: target.index,
            position: *predicted,
            nodes,
        })
    }
}

/// Predicted insertion index: position of the first child whose vertical
/// midpoint lies at or below the pointer, or the end of the list if none
/// does. Children with unknown geometry are skipped, so an unmeasured
/// container degrades to end-of-list insertion.
pub fn predict_insertion_index(
    store: &NodeStore,
    parent: usize,
    section: Section,
    layout: &LayoutIndex,
    pointer_y: f32,
) -> usize {
    let children = match store.get(parent) {
        Ok(node) => &node.children,
        Err(_) => return 0,
    };

    for (position, &child) in children.iter().enumerate() {
        let id = build_id(section, child);
        if let Some(rect) = layout.get(&id) {
            if pointer_y <= rect.mid_y() {
                return position;
            }
        }
    }

    children.len()
}

/// Normalize a palette subtree into an instantiable widget: preview
/// markers cleared, every node made draggable and droppable, the root
/// re-tagged as a widget. The instantiated copy is itself re-editable.
pub fn normalize_widget(subtree: &NodeStore) -> NodeStore {
    let mut normalized = subtree.clone();
    for node in &mut normalized.nodes {
        node.metadata.preview = false;
        node.metadata.capabilities.draggable = true;
        node.metadata.capabilities.droppable = true;
    }
    if let Some(root) = normalized.nodes.first_mut() {
        root.metadata.kind = Some(NodeKind::Widget);
    }
    normalized
}

/// Placeholder shown at the predicted insertion point: a dashed-border
/// container wrapping the dragged subtree.
fn placeholder_subtree(payload: &NodeStore) -> NodeStore {
    let mut placeholder = Node::new("div");
    for (property, value) in [
        ("width", "200px"),
        ("height", "100px"),
        ("position", "relative"),
        ("border", "2px dashed #4a90e2"),
        ("backgroundColor", "rgba(74, 144, 226, 0.1)"),
        ("boxShadow", "0 0 10px rgba(74, 144, 226, 0.2)"),
        ("margin", "4px"),
        ("padding", "8px"),
    ] {
        placeholder
            .style
            .insert(property.to_string(), AttrValue::new(value));
    }
    placeholder
        .attributes
        .insert("className".to_string(), AttrValue::new("preview-container"));
    placeholder.metadata.preview = true;
    placeholder.metadata.capabilities.draggable = true;
    placeholder.metadata.capabilities.droppable = true;

    let mut subtree = NodeStore::new(placeholder);
    let payload_root = subtree.append_subtree(payload);
    subtree.nodes[0].children.push(payload_root);
    subtree
}
