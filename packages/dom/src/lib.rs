//! # Pagecraft DOM
//!
//! Document model for the Pagecraft page builder.
//!
//! A page is three independent sections (header / body / footer), each a
//! flat arena of [`Node`]s where child relationships are index lists into
//! the same arena rather than object pointers. Index 0 is the implicit
//! root of every section.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ dom: Document = 3 × NodeStore + palette     │
//! │  - Node: element + attrs + style + children │
//! │  - NodeStore: flat arena, integer handles   │
//! │  - Addressing: "b-3" ↔ (Body, 3)            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations, drag, text cursor        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Arena is source of truth**: ids are derived views of (section,
//!    index) and are recomputed after every mutation, never cached across
//!    one.
//! 2. **Serialization is trivial**: the arena form (`{"nodes": [...]}`)
//!    is exactly the persisted form.
//! 3. **Capabilities over hierarchy**: per-node behavior flags
//!    (draggable, droppable, ...) instead of a type hierarchy.

mod address;
mod document;
mod error;
mod node;
mod store;

pub use address::{build_id, parse_id, section_from_id, NodeAddress, Section};
pub use document::{Document, Widget};
pub use error::DomError;
pub use node::{AttrValue, Capabilities, Capability, Metadata, Node, NodeKind};
pub use store::{NodeStore, ValidationError};
