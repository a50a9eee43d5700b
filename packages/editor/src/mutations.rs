//! # Tree Mutations
//!
//! Semantic operations on a section's node arena.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one semantic operation
//! 2. **Validated**: every mutation validates before it writes, so a
//!    rejected mutation leaves the store untouched
//! 3. **Atomic**: reads and computation happen first, writes last; a
//!    mutation is never partially applied
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Appends the subtree's nodes with freshly assigned indices
//! - Splices the new root into the parent's children at the given
//!   position, clamped to `[0, len]`
//!
//! ### Delete
//! - Removes the node and all descendants
//! - Renumbers every surviving children reference (no dangling indices)
//! - The section root cannot be deleted
//!
//! ### Copy
//! - Deep clone, appended at the end of the arena
//! - Spliced into the same parent immediately after the original
//! - Shares no node identity with the source subtree
//!
//! ### Move
//! - Only two children lists change; no node is renumbered
//! - Fails if the destination is the node itself or one of its
//!   descendants
//!
//! Positional arguments clamp; node indices that do not exist error.

use crate::errors::MutationError;
use pagecraft_dom::{AttrValue, NodeStore};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Semantic mutations over one [`NodeStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a self-contained subtree under `parent` at `position`.
    Insert {
        parent: usize,
        position: usize,
        subtree: NodeStore,
    },

    /// Remove a node and its whole subtree.
    Delete {
        index: usize,
    },

    /// Duplicate a subtree next to the original.
    Copy {
        index: usize,
    },

    /// Re-parent a node without renumbering anything.
    Move {
        index: usize,
        new_parent: usize,
        position: usize,
    },

    /// Upsert one inline-style property.
    SetStyle {
        index: usize,
        property: String,
        value: String,
    },

    /// Upsert one attribute.
    SetAttribute {
        index: usize,
        name: String,
        value: String,
    },
}

/// What a mutation did, for logging and external hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Index of the subtree root this mutation created, if any.
    pub inserted_root: Option<usize>,

    /// Pre-mutation indices of the nodes this mutation removed.
    pub removed: Vec<usize>,
}

impl Mutation {
    /// Apply to the store with validation. Nothing is written unless
    /// validation passes.
    pub fn apply(&self, store: &mut NodeStore) -> Result<MutationOutcome, MutationError> {
        self.validate(store)?;
        tracing::debug!(mutation = ?self, "applying mutation");

        match self {
            Mutation::Insert { parent, position, subtree } => {
                Ok(Self::apply_insert(store, *parent, *position, subtree))
            }
            Mutation::Delete { index } => Ok(Self::apply_delete(store, *index)),
            Mutation::Copy { index } => Self::apply_copy(store, *index),
            Mutation::Move { index, new_parent, position } => {
                Ok(Self::apply_move(store, *index, *new_parent, *position))
            }
            Mutation::SetStyle { index, property, value } => {
                upsert(&mut store.nodes[*index].style, property, value);
                Ok(MutationOutcome::default())
            }
            Mutation::SetAttribute { index, name, value } => {
                upsert(&mut store.nodes[*index].attributes, name, value);
                Ok(MutationOutcome::default())
            }
        }
    }

    /// Validate without applying.
    pub fn validate(&self, store: &NodeStore) -> Result<(), MutationError> {
        match self {
            Mutation::Insert { parent, subtree, .. } => {
                store
                    .get(*parent)
                    .map_err(|_| MutationError::InvalidParent(*parent))?;
                if subtree.is_empty() || subtree.validate().is_err() {
                    return Err(MutationError::MalformedSubtree);
                }
                Ok(())
            }

            Mutation::Delete { index } => {
                store.get(*index)?;
                if *index == 0 {
                    return Err(MutationError::RootRemoval);
                }
                Ok(())
            }

            Mutation::Copy { index } => {
                store.get(*index)?;
                // The root has no parent to splice the clone into.
                if store.parent_of(*index).is_none() {
                    return Err(MutationError::InvalidParent(*index));
                }
                Ok(())
            }

            Mutation::Move { index, new_parent, .. } => {
                store.get(*index)?;
                store
                    .get(*new_parent)
                    .map_err(|_| MutationError::InvalidParent(*new_parent))?;
                if *index == 0 {
                    return Err(MutationError::RootRemoval);
                }
                if *new_parent == *index || store.is_descendant(*new_parent, *index) {
                    return Err(MutationError::CyclicMove {
                        node: *index,
                        new_parent: *new_parent,
                    });
                }
                Ok(())
            }

            Mutation::SetStyle { index, .. } | Mutation::SetAttribute { index, .. } => {
                store.get(*index)?;
                Ok(())
            }
        }
    }

    fn apply_insert(
        store: &mut NodeStore,
        parent: usize,
        position: usize,
        subtree: &NodeStore,
    ) -> MutationOutcome {
        let new_root = store.append_subtree(subtree);
        let children = &mut store.nodes[parent].children;
        let position = position.min(children.len());
        children.insert(position, new_root);

        MutationOutcome {
            inserted_root: Some(new_root),
            removed: vec![],
        }
    }

    fn apply_delete(store: &mut NodeStore, index: usize) -> MutationOutcome {
        let removed = store.descendants(index);
        let doomed: HashSet<usize> = removed.iter().copied().collect();

        if let Some(parent) = store.parent_of(index) {
            if !doomed.contains(&parent) {
                store.nodes[parent].children.retain(|&child| child != index);
            }
        }

        // Renumber the survivors so no children reference dangles.
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let mut next = 0;
        for old in 0..store.len() {
            if !doomed.contains(&old) {
                remap.insert(old, next);
                next += 1;
            }
        }

        let nodes = std::mem::take(&mut store.nodes);
        store.nodes = nodes
            .into_iter()
            .enumerate()
            .filter(|(old, _)| !doomed.contains(old))
            .map(|(_, mut node)| {
                node.children = node
                    .children
                    .iter()
                    .filter_map(|child| remap.get(child).copied())
                    .collect();
                node
            })
            .collect();

        MutationOutcome {
            inserted_root: None,
            removed,
        }
    }

    fn apply_copy(store: &mut NodeStore, index: usize) -> Result<MutationOutcome, MutationError> {
        let subtree = store.extract_subtree(index)?;
        let parent = store
            .parent_of(index)
            .ok_or(MutationError::InvalidParent(index))?;

        let new_root = store.append_subtree(&subtree);
        let children = &mut store.nodes[parent].children;
        let after_original = children
            .iter()
            .position(|&child| child == index)
            .map(|p| p + 1)
            .unwrap_or(children.len());
        children.insert(after_original, new_root);

        Ok(MutationOutcome {
            inserted_root: Some(new_root),
            removed: vec![],
        })
    }

    fn apply_move(
        store: &mut NodeStore,
        index: usize,
        new_parent: usize,
        position: usize,
    ) -> MutationOutcome {
        if let Some(old_parent) = store.parent_of(index) {
            store.nodes[old_parent].children.retain(|&child| child != index);
        }

        let children = &mut store.nodes[new_parent].children;
        let position = position.min(children.len());
        children.insert(position, index);

        MutationOutcome::default()
    }
}

fn upsert(
    map: &mut std::collections::BTreeMap<String, AttrValue>,
    key: &str,
    value: &str,
) {
    match map.get_mut(key) {
        // Keep the suppress flag on overwrite.
        Some(entry) => entry.value = value.to_string(),
        None => {
            map.insert(key.to_string(), AttrValue::new(value));
        }
    }
}
