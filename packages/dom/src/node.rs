//! # Node model
//!
//! One renderable unit: element tag, attributes, inline style, ordered
//! child indices into the owning section's arena, and behavior metadata.
//!
//! Behavior is driven by an explicit capability set rather than a type
//! hierarchy: each node carries a small record of booleans (draggable,
//! droppable, selectable, editable, textbox, resizable) that the editor
//! checks before dispatching behavior, so each capability is testable in
//! isolation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn is_false(b: &bool) -> bool {
    !*b
}

/// An attribute or inline-style entry.
///
/// Entries flagged `suppress` exist for the editor's own bookkeeping and
/// are omitted from the renderer-facing output views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrValue {
    pub value: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub suppress: bool,
}

impl AttrValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            suppress: false,
        }
    }

    pub fn suppressed(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            suppress: true,
        }
    }
}

/// One behavior capability a node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Draggable,
    Droppable,
    Selectable,
    Editable,
    Textbox,
    Resizable,
}

/// Per-node capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    #[serde(skip_serializing_if = "is_false")]
    pub draggable: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub droppable: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub selectable: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub editable: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub textbox: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub resizable: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Draggable => self.draggable,
            Capability::Droppable => self.droppable,
            Capability::Selectable => self.selectable,
            Capability::Editable => self.editable,
            Capability::Textbox => self.textbox,
            Capability::Resizable => self.resizable,
        }
    }

    pub fn set(&mut self, capability: Capability, value: bool) {
        match capability {
            Capability::Draggable => self.draggable = value,
            Capability::Droppable => self.droppable = value,
            Capability::Selectable => self.selectable = value,
            Capability::Editable => self.editable = value,
            Capability::Textbox => self.textbox = value,
            Capability::Resizable => self.resizable = value,
        }
    }
}

/// Node kind tag. Widget roots are tagged so the palette and the drop
/// logic can tell an instantiated widget from a plain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "WIDGET")]
    Widget,
}

/// Node metadata: kind tag, capability flags, preview marker, and the
/// palette display fields (name/icon) for widget roots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,

    #[serde(flatten)]
    pub capabilities: Capabilities,

    /// Marks the transient drag placeholder; cleared when a palette
    /// payload is instantiated into the tree.
    #[serde(skip_serializing_if = "is_false")]
    pub preview: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A single tree element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Element kind: div, image, video, audio, text, ...
    pub element: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttrValue>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, AttrValue>,

    /// Ordered child indices into the *same* section's node array.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Node {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            children: Vec::new(),
            metadata: Metadata::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.metadata.capabilities = capabilities;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), AttrValue::new(value));
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), AttrValue::new(value));
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.metadata.capabilities.has(capability)
    }

    /// Text content, stored in the `text` attribute.
    pub fn text(&self) -> Option<&str> {
        self.attributes.get("text").map(|a| a.value.as_str())
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        match self.attributes.get_mut("text") {
            Some(entry) => entry.value = text.into(),
            None => {
                self.attributes.insert("text".to_string(), AttrValue::new(text));
            }
        }
    }

    /// Renderer-facing attributes: entries flagged `suppress` filtered out.
    pub fn output_attributes(&self) -> BTreeMap<String, String> {
        self.attributes
            .iter()
            .filter(|(_, entry)| !entry.suppress)
            .map(|(name, entry)| (name.clone(), entry.value.clone()))
            .collect()
    }

    /// Renderer-facing styles: entries flagged `suppress` filtered out.
    pub fn output_styles(&self) -> BTreeMap<String, String> {
        self.style
            .iter()
            .filter(|(_, entry)| !entry.suppress)
            .map(|(property, entry)| (property.clone(), entry.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_lookup() {
        let mut caps = Capabilities::none();
        assert!(!caps.has(Capability::Draggable));

        caps.set(Capability::Draggable, true);
        caps.set(Capability::Textbox, true);
        assert!(caps.has(Capability::Draggable));
        assert!(caps.has(Capability::Textbox));
        assert!(!caps.has(Capability::Droppable));
    }

    #[test]
    fn test_output_views_filter_suppressed() {
        let mut node = Node::new("div").with_attribute("className", "box");
        node.attributes
            .insert("internal".to_string(), AttrValue::suppressed("x"));
        node.style
            .insert("width".to_string(), AttrValue::new("200px"));
        node.style
            .insert("outline".to_string(), AttrValue::suppressed("1px"));

        let attrs = node.output_attributes();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["className"], "box");

        let styles = node.output_styles();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles["width"], "200px");
    }

    #[test]
    fn test_text_helpers() {
        let mut node = Node::new("text");
        assert_eq!(node.text(), None);

        node.set_text("hello");
        assert_eq!(node.text(), Some("hello"));

        node.set_text("world");
        assert_eq!(node.text(), Some("world"));
    }

    #[test]
    fn test_metadata_serialization_shape() {
        let node = Node::new("div").with_capabilities(Capabilities {
            draggable: true,
            droppable: true,
            ..Capabilities::none()
        });

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["metadata"]["draggable"], true);
        assert_eq!(json["metadata"]["droppable"], true);
        // Unset flags and empty maps are omitted entirely.
        assert!(json["metadata"].get("selectable").is_none());
        assert!(json.get("attributes").is_none());

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_widget_kind_serializes_as_type_tag() {
        let mut node = Node::new("div");
        node.metadata.kind = Some(NodeKind::Widget);

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["metadata"]["type"], "WIDGET");
    }
}
