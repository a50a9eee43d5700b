//! Error types for the editor

use pagecraft_dom::DomError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("Node {0} cannot act as a parent here")]
    InvalidParent(usize),

    #[error("Moving node {node} under {new_parent} would make it its own ancestor")]
    CyclicMove { node: usize, new_parent: usize },

    #[error("The section root cannot be removed")]
    RootRemoval,

    #[error("Inserted subtree is empty or structurally invalid")]
    MalformedSubtree,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("Mutation rejected: {0}")]
    Mutation(#[from] MutationError),

    #[error("Unknown widget: {0}")]
    UnknownWidget(usize),
}
