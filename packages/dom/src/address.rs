//! # Addressing
//!
//! Bidirectional mapping between a rendered element id (`"b-3"`) and a
//! tree position (`(Section::Body, 3)`).
//!
//! Ids are *not* persistent identity. They are a derived view of
//! (section, index): index 3 before a deletion may refer to a different
//! node afterward, so ids must be recomputed after every mutation and
//! never cached across one.

use crate::error::DomError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three independently addressed node arrays of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Header,
    Body,
    Footer,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Header, Section::Body, Section::Footer];

    /// Single-letter id prefix (`h`, `b`, `f`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Section::Header => "h",
            Section::Body => "b",
            Section::Footer => "f",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Section> {
        match prefix {
            "h" => Some(Section::Header),
            "b" => Some(Section::Body),
            "f" => Some(Section::Footer),
            _ => None,
        }
    }

    /// Id of the section's implicit root (`h-0`, `b-0`, `f-0`).
    pub fn root_id(&self) -> String {
        build_id(*self, 0)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => write!(f, "header"),
            Section::Body => write!(f, "body"),
            Section::Footer => write!(f, "footer"),
        }
    }
}

/// A parsed element id: section plus node index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    pub section: Section,
    pub index: usize,
}

impl NodeAddress {
    pub fn new(section: Section, index: usize) -> Self {
        Self { section, index }
    }

    pub fn id(&self) -> String {
        build_id(self.section, self.index)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section.prefix(), self.index)
    }
}

impl FromStr for NodeAddress {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_id(s)
    }
}

/// Build the rendered id for a node position.
pub fn build_id(section: Section, index: usize) -> String {
    format!("{}-{}", section.prefix(), index)
}

/// Parse a rendered id back to a tree position.
///
/// Fails with [`DomError::MalformedId`] if the prefix is not a known
/// section or the suffix is not a non-negative integer.
pub fn parse_id(id: &str) -> Result<NodeAddress, DomError> {
    let (prefix, suffix) = id
        .split_once('-')
        .ok_or_else(|| DomError::MalformedId(id.to_string()))?;

    let section =
        Section::from_prefix(prefix).ok_or_else(|| DomError::MalformedId(id.to_string()))?;

    // Reject "b--1", "b-+1", "b-1.5" and friends: digits only.
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomError::MalformedId(id.to_string()));
    }

    let index = suffix
        .parse::<usize>()
        .map_err(|_| DomError::MalformedId(id.to_string()))?;

    Ok(NodeAddress { section, index })
}

/// Section an id belongs to, derived from [`parse_id`].
pub fn section_from_id(id: &str) -> Result<Section, DomError> {
    Ok(parse_id(id)?.section)
}
