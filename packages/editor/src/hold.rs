//! # Hold registry
//!
//! Elements that respond to press-and-hold by starting a drag register
//! here. Registration is a scoped subscription tied to node lifetime:
//! bindings are released deterministically when an element is deleted
//! and when the owning section's structure changes (which shifts the
//! indices its ids are derived from), never implicitly on re-render.

use pagecraft_dom::{parse_id, Section};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct HoldRegistry {
    bound: BTreeSet<String>,
}

impl HoldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe an element id to hold-to-drag.
    pub fn bind(&mut self, id: impl Into<String>) {
        self.bound.insert(id.into());
    }

    /// Release one binding. Returns whether it existed.
    pub fn release(&mut self, id: &str) -> bool {
        self.bound.remove(id)
    }

    pub fn is_bound(&self, id: &str) -> bool {
        self.bound.contains(id)
    }

    /// Release every binding owned by a section. Called after any
    /// structural mutation there, since surviving ids may now refer to
    /// different nodes.
    pub fn release_section(&mut self, section: Section) {
        self.bound
            .retain(|id| parse_id(id).map(|a| a.section != section).unwrap_or(false));
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_release() {
        let mut holds = HoldRegistry::new();
        holds.bind("b-1");
        assert!(holds.is_bound("b-1"));

        assert!(holds.release("b-1"));
        assert!(!holds.is_bound("b-1"));
        assert!(!holds.release("b-1"));
    }

    #[test]
    fn test_release_section_drops_only_that_section() {
        let mut holds = HoldRegistry::new();
        holds.bind("b-1");
        holds.bind("b-2");
        holds.bind("h-1");

        holds.release_section(Section::Body);

        assert!(!holds.is_bound("b-1"));
        assert!(!holds.is_bound("b-2"));
        assert!(holds.is_bound("h-1"));
        assert_eq!(holds.len(), 1);
    }

    #[test]
    fn test_release_section_drops_unparseable_ids() {
        let mut holds = HoldRegistry::new();
        holds.bind("junk");
        holds.release_section(Section::Footer);
        assert!(holds.is_empty());
    }
}
