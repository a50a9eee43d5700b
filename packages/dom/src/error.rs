//! Error types for the document model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// An id string does not parse to a known section and index.
    /// Surfaced to the caller, never silently defaulted.
    #[error("Malformed id: {0:?}")]
    MalformedId(String),

    /// A node index does not exist in the target section. Usually a
    /// stale id held across a mutation.
    #[error("Node index {index} out of range (section has {len} nodes)")]
    IndexOutOfRange { index: usize, len: usize },
}
