//! # NodeStore
//!
//! Flat arena of nodes for one section. Child relationships are index
//! lists into the same array, so the serialized form is exactly the
//! in-memory form and there are no cyclic reference graphs to manage.
//!
//! All mutation code operates on (store, index) pairs rather than
//! traversing object graphs. The store itself only offers structural
//! primitives; semantic operations (insert/delete/copy/move) live in the
//! editor crate.

use crate::error::DomError;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Structural invariant violation found by [`NodeStore::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Store has no nodes (index 0 must be the root)")]
    EmptyStore,

    #[error("Node {parent} references missing child {child}")]
    DanglingChild { parent: usize, child: usize },

    #[error("Node {node} lists itself as a child")]
    SelfReference { node: usize },

    #[error("Node {node} is its own descendant")]
    Cycle { node: usize },

    #[error("Node {child} appears in more than one children list")]
    AliasedChild { child: usize },
}

/// Per-section flat node array. Index 0 is the implicit root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStore {
    pub nodes: Vec<Node>,
}

impl NodeStore {
    /// Create a store holding only the given root node.
    pub fn new(root: Node) -> Self {
        Self { nodes: vec![root] }
    }

    /// Create a store from an existing arena. The first node is the root.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Node, DomError> {
        self.nodes.get(index).ok_or(DomError::IndexOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Node, DomError> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(DomError::IndexOutOfRange { index, len })
    }

    /// The section root (index 0).
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Materialize a node's children as node references, in order.
    pub fn children_of(&self, index: usize) -> Result<Vec<&Node>, DomError> {
        let node = self.get(index)?;
        node.children.iter().map(|&child| self.get(child)).collect()
    }

    /// Index of the parent whose children list contains `index`, if any.
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.children.contains(&index))
    }

    /// Preorder walk of the subtree rooted at `index`, including `index`
    /// itself. Tolerates corrupt stores (skips repeats and bad indices)
    /// so it can be used while diagnosing them.
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![index];

        while let Some(current) = stack.pop() {
            if current >= self.nodes.len() || !seen.insert(current) {
                continue;
            }
            out.push(current);
            // Push in reverse so children pop in order.
            for &child in self.nodes[current].children.iter().rev() {
                stack.push(child);
            }
        }

        out
    }

    /// Whether `node` lies strictly inside the subtree rooted at
    /// `ancestor` (`is_descendant(n, n)` is false).
    pub fn is_descendant(&self, node: usize, ancestor: usize) -> bool {
        node != ancestor && self.descendants(ancestor).contains(&node)
    }

    /// Deep-copy the subtree rooted at `index` into a self-contained
    /// store: nodes renumbered to 0.., subtree root at 0.
    ///
    /// Used for drag payload snapshots and for copy.
    pub fn extract_subtree(&self, index: usize) -> Result<NodeStore, DomError> {
        self.get(index)?;

        let order = self.descendants(index);
        let remap: std::collections::HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let nodes = order
            .iter()
            .map(|&old| {
                let mut node = self.nodes[old].clone();
                node.children = node
                    .children
                    .iter()
                    .filter_map(|child| remap.get(child).copied())
                    .collect();
                node
            })
            .collect();

        Ok(NodeStore::from_nodes(nodes))
    }

    /// Append a self-contained subtree to this arena, renumbering its
    /// indices past the current length. Returns the new index of the
    /// subtree's root. The caller is responsible for splicing that index
    /// into a parent's children list.
    pub fn append_subtree(&mut self, subtree: &NodeStore) -> usize {
        let offset = self.nodes.len();
        for node in &subtree.nodes {
            let mut node = node.clone();
            node.children = node.children.iter().map(|child| child + offset).collect();
            self.nodes.push(node);
        }
        offset
    }

    /// Check structural invariants: every child index valid, no
    /// self-references, no cycles, no node aliased into two parents.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.nodes.is_empty() {
            return Err(ValidationError::EmptyStore);
        }

        let mut referenced: HashSet<usize> = HashSet::new();
        for (parent, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if child == parent {
                    return Err(ValidationError::SelfReference { node: parent });
                }
                if child >= self.nodes.len() {
                    return Err(ValidationError::DanglingChild { parent, child });
                }
                if !referenced.insert(child) {
                    return Err(ValidationError::AliasedChild { child });
                }
            }
        }

        for index in 0..self.nodes.len() {
            for &child in &self.nodes[index].children {
                if child == index || self.is_descendant(index, child) {
                    return Err(ValidationError::Cycle { node: index });
                }
            }
        }

        Ok(())
    }
}
