//! # Pagecraft Editor
//!
//! Document-tree editing engine for the Pagecraft page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ renderer (external): display + raw events   │
//! └─────────────────────────────────────────────┘
//!           ↓ commands            ↑ snapshot
//! ┌─────────────────────────────────────────────┐
//! │ editor: one Editor struct, one dispatch     │
//! │  - DragController: gesture state machine    │
//! │  - TextCursorEngine: row/col caret edits    │
//! │  - Mutation: validated arena operations     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ pagecraft-dom: sections, nodes, addressing  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single owner**: the three section stores belong to [`Editor`];
//!    everything else sees snapshots
//! 2. **Validate, then write**: a rejected mutation leaves every store
//!    untouched
//! 3. **Mutate only on drop**: hovering publishes predictions and a
//!    clone-based preview; a cancelled drag cannot leave a trace
//! 4. **Benign events are no-ops**: stray keypresses and mouse-ups are
//!    normal ordering, not errors
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_editor::{Command, Editor};
//!
//! let mut editor = Editor::starter();
//! editor.dispatch(Command::Select { id: "b-0".to_string() })?;
//!
//! let snapshot = editor.snapshot();
//! assert_eq!(snapshot.selected_id.as_deref(), Some("b-0"));
//! # Ok::<(), pagecraft_editor::EditorError>(())
//! ```

mod drag;
mod editor;
mod errors;
mod hold;
mod layout;
mod mutations;
mod text;

pub use drag::{
    normalize_widget, predict_insertion_index, DragController, DragOrigin, DragPayload,
    DragState, DropResolution, PreviewOverlay, DRAG_THRESHOLD,
};
pub use editor::{Command, DragSource, Editor, EditorSnapshot, NodeView, SectionView};
pub use errors::{EditorError, MutationError};
pub use hold::HoldRegistry;
pub use layout::{LayoutIndex, Point, Rect};
pub use mutations::{Mutation, MutationOutcome};
pub use text::{CursorPosition, TextCursorEngine, TextKey};

// Re-export the document model for convenience.
pub use pagecraft_dom::{Document, DomError, Node, NodeStore, Section, Widget};
