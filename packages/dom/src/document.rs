//! # Document
//!
//! The triple of header/body/footer sections plus the widget palette:
//! named reusable subtrees, each a self-contained node array with its
//! own root.
//!
//! The serde form of this type is the persisted form consumed from and
//! produced for the persistence service.

use crate::address::{parse_id, NodeAddress, Section};
use crate::error::DomError;
use crate::node::{Capabilities, Node, NodeKind};
use crate::store::{NodeStore, ValidationError};
use serde::{Deserialize, Serialize};

/// A palette entry: a named, reusable subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub name: String,
    pub icon: String,
    pub nodes: NodeStore,
}

/// A whole page: three sections plus the widget palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub header: NodeStore,
    pub body: NodeStore,
    pub footer: NodeStore,

    #[serde(default)]
    pub widgets: Vec<Widget>,
}

fn section_root() -> Node {
    Node::new("div").with_capabilities(Capabilities {
        droppable: true,
        selectable: true,
        ..Capabilities::none()
    })
}

impl Document {
    /// Empty document: three sections holding only their roots, no
    /// palette.
    pub fn new() -> Self {
        Self {
            header: NodeStore::new(section_root()),
            body: NodeStore::new(section_root()),
            footer: NodeStore::new(section_root()),
            widgets: Vec::new(),
        }
    }

    /// The default document the app ships with: empty sections plus the
    /// container / text block / image widgets.
    pub fn starter() -> Self {
        let mut doc = Self::new();
        doc.widgets = vec![
            Widget {
                name: "Container".to_string(),
                icon: "container".to_string(),
                nodes: container_widget(),
            },
            Widget {
                name: "Text Block".to_string(),
                icon: "text".to_string(),
                nodes: text_block_widget(),
            },
            Widget {
                name: "Image".to_string(),
                icon: "image".to_string(),
                nodes: image_widget(),
            },
        ];
        doc
    }

    pub fn section(&self, section: Section) -> &NodeStore {
        match section {
            Section::Header => &self.header,
            Section::Body => &self.body,
            Section::Footer => &self.footer,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut NodeStore {
        match section {
            Section::Header => &mut self.header,
            Section::Body => &mut self.body,
            Section::Footer => &mut self.footer,
        }
    }

    /// Parse an id and bounds-check it against the owning section.
    pub fn resolve(&self, id: &str) -> Result<NodeAddress, DomError> {
        let address = parse_id(id)?;
        self.section(address.section).get(address.index)?;
        Ok(address)
    }

    /// Validate structural invariants across all sections and widgets.
    pub fn validate(&self) -> Result<(), (String, ValidationError)> {
        for section in Section::ALL {
            self.section(section)
                .validate()
                .map_err(|e| (section.to_string(), e))?;
        }
        for widget in &self.widgets {
            widget
                .nodes
                .validate()
                .map_err(|e| (format!("widget {:?}", widget.name), e))?;
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn widget_caps() -> Capabilities {
    Capabilities {
        draggable: true,
        droppable: true,
        selectable: true,
        resizable: true,
        ..Capabilities::none()
    }
}

fn container_widget() -> NodeStore {
    let mut root = Node::new("div")
        .with_capabilities(widget_caps())
        .with_style("width", "200px")
        .with_style("height", "100px");
    root.metadata.kind = Some(NodeKind::Widget);
    NodeStore::new(root)
}

fn text_block_widget() -> NodeStore {
    let mut root = Node::new("div").with_capabilities(Capabilities {
        textbox: true,
        ..widget_caps()
    });
    root.metadata.kind = Some(NodeKind::Widget);
    root.children = vec![1];

    let mut line = Node::new("text").with_attribute("text", "Text");
    line.metadata.capabilities.editable = true;
    line.metadata.capabilities.selectable = true;

    NodeStore::from_nodes(vec![root, line])
}

fn image_widget() -> NodeStore {
    let mut root = Node::new("image")
        .with_capabilities(widget_caps())
        .with_attribute("src", "")
        .with_attribute("alt", "");
    root.metadata.kind = Some(NodeKind::Widget);
    NodeStore::new(root)
}
