//! # Text cursor engine
//!
//! Row/column cursor over a run of sibling text nodes. The rows of a
//! textbox container are its ordered children; each row's text lives in
//! the node's `text` attribute (created empty on first touch).
//!
//! Columns are character offsets, not byte offsets, so multi-byte text
//! edits stay on char boundaries.
//!
//! Missing preconditions (no cursor, not editing) are silent no-ops, not
//! errors: stray keypresses while nothing is selected are normal event
//! ordering.

use pagecraft_dom::{Node, NodeAddress, NodeStore};
use serde::{Deserialize, Serialize};

/// Caret position: `row` indexes the container's children, `col` is a
/// character offset into that row's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub row: usize,
    pub col: usize,
}

/// A key delivered to the engine while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKey {
    Backspace,
    Delete,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

/// In-place text editing state for one container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextCursorEngine {
    editing: bool,
    container: Option<NodeAddress>,
    cursor: Option<CursorPosition>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split at a character offset (clamped to the end).
fn split_at_col(s: &str, col: usize) -> (String, String) {
    let byte = s
        .char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (s[..byte].to_string(), s[byte..].to_string())
}

fn row_text(store: &NodeStore, container: usize, row: usize) -> Option<String> {
    let child = *store.nodes.get(container)?.children.get(row)?;
    Some(store.nodes.get(child)?.text().unwrap_or("").to_string())
}

impl TextCursorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter edit mode on a container; caret starts at `{0, 0}`.
    pub fn start(&mut self, container: NodeAddress) {
        self.editing = true;
        self.container = Some(container);
        self.cursor = Some(CursorPosition { row: 0, col: 0 });
    }

    /// Leave edit mode (blur, selection change, structural mutation).
    pub fn stop(&mut self) {
        self.editing = false;
        self.container = None;
        self.cursor = None;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn container(&self) -> Option<NodeAddress> {
        self.container
    }

    pub fn cursor(&self) -> Option<CursorPosition> {
        self.cursor
    }

    /// Apply one keypress to the container's rows. A no-op unless the
    /// engine is editing and has a cursor.
    pub fn keypress(&mut self, store: &mut NodeStore, key: TextKey) {
        let (container, cursor) = match (self.container, self.cursor) {
            (Some(c), Some(p)) if self.editing => (c, p),
            _ => return,
        };

        let container = container.index;
        let Some(&row_node) = store
            .nodes
            .get(container)
            .and_then(|node| node.children.get(cursor.row))
        else {
            return;
        };

        // Rows always carry a text attribute once touched.
        if let Ok(node) = store.get_mut(row_node) {
            if node.text().is_none() {
                node.set_text("");
            }
        }
        let text = match row_text(store, container, cursor.row) {
            Some(text) => text,
            None => return,
        };
        let row_count = store.nodes[container].children.len();

        let mut next = cursor;
        match key {
            TextKey::Backspace => {
                if cursor.col > 0 {
                    let (before, after) = split_at_col(&text, cursor.col);
                    let (kept, _) = split_at_col(&before, cursor.col - 1);
                    store.nodes[row_node].set_text(kept + &after);
                    next.col = cursor.col - 1;
                } else if cursor.row > 0 {
                    // Merge into the previous row; the row node leaves the
                    // children list only (leaf removal, no cascade).
                    let prev_node = store.nodes[container].children[cursor.row - 1];
                    let prev_text = store.nodes[prev_node].text().unwrap_or("").to_string();
                    store.nodes[prev_node].set_text(prev_text.clone() + &text);
                    store.nodes[container].children.remove(cursor.row);
                    next = CursorPosition {
                        row: cursor.row - 1,
                        col: char_len(&prev_text),
                    };
                }
            }

            TextKey::Delete => {
                if cursor.col < char_len(&text) {
                    let (before, after) = split_at_col(&text, cursor.col);
                    let (_, kept) = split_at_col(&after, 1);
                    store.nodes[row_node].set_text(before + &kept);
                } else if cursor.row + 1 < row_count {
                    // Merge the next row into this one.
                    let next_node = store.nodes[container].children[cursor.row + 1];
                    let next_text = store.nodes[next_node].text().unwrap_or("").to_string();
                    store.nodes[row_node].set_text(text + &next_text);
                    store.nodes[container].children.remove(cursor.row + 1);
                }
            }

            TextKey::Enter => {
                let (head, tail) = split_at_col(&text, cursor.col);
                store.nodes[row_node].set_text(head);

                let mut new_row = Node::new("text");
                new_row.set_text(tail);
                new_row.metadata = store.nodes[row_node].metadata.clone();
                let new_index = store.nodes.len();
                store.nodes.push(new_row);
                store.nodes[container]
                    .children
                    .insert(cursor.row + 1, new_index);

                next = CursorPosition { row: cursor.row + 1, col: 0 };
            }

            TextKey::ArrowLeft => {
                if cursor.col > 0 {
                    next.col = cursor.col - 1;
                } else if cursor.row > 0 {
                    let prev = row_text(store, container, cursor.row - 1).unwrap_or_default();
                    next = CursorPosition {
                        row: cursor.row - 1,
                        col: char_len(&prev),
                    };
                }
            }

            TextKey::ArrowRight => {
                if cursor.col < char_len(&text) {
                    next.col = cursor.col + 1;
                } else if cursor.row + 1 < row_count {
                    next = CursorPosition { row: cursor.row + 1, col: 0 };
                }
            }

            TextKey::ArrowUp => {
                if cursor.row > 0 {
                    let prev = row_text(store, container, cursor.row - 1).unwrap_or_default();
                    next = CursorPosition {
                        row: cursor.row - 1,
                        col: cursor.col.min(char_len(&prev)),
                    };
                }
            }

            TextKey::ArrowDown => {
                if cursor.row + 1 < row_count {
                    let below = row_text(store, container, cursor.row + 1).unwrap_or_default();
                    next = CursorPosition {
                        row: cursor.row + 1,
                        col: cursor.col.min(char_len(&below)),
                    };
                }
            }

            TextKey::Char(ch) => {
                let (before, after) = split_at_col(&text, cursor.col);
                store.nodes[row_node].set_text(format!("{before}{ch}{after}"));
                next.col = cursor.col + 1;
            }
        }

        self.cursor = Some(next);
    }
}
