use crate::commands::load_document;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_dom::{build_id, NodeStore, Section};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Document file (defaults to the configured one)
    #[arg(short, long)]
    pub document: Option<String>,

    /// Show suppressed attributes and styles too
    #[arg(long)]
    pub all: bool,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = match &args.document {
        Some(doc) => std::path::PathBuf::from(cwd).join(doc),
        None => config.document_path(cwd),
    };

    let document = load_document(&path)?;

    println!("{} {}", "🔍 Inspecting".bright_blue().bold(), path.display());
    println!();

    for section in Section::ALL {
        println!("{}", format!("── {} ──", section).bright_white().bold());
        print_subtree(document.section(section), section, 0, 1, args.all);
        println!();
    }

    if !document.widgets.is_empty() {
        println!("{}", "── widgets ──".bright_white().bold());
        for widget in &document.widgets {
            println!(
                "  {} {} ({} nodes)",
                "▣".cyan(),
                widget.name,
                widget.nodes.len()
            );
        }
    }

    Ok(())
}

fn print_subtree(store: &NodeStore, section: Section, index: usize, depth: usize, all: bool) {
    let node = match store.get(index) {
        Ok(node) => node,
        Err(_) => return,
    };

    let id = build_id(section, index);
    let indent = "  ".repeat(depth);

    let mut flags = Vec::new();
    for (set, label) in [
        (node.metadata.capabilities.draggable, "drag"),
        (node.metadata.capabilities.droppable, "drop"),
        (node.metadata.capabilities.selectable, "select"),
        (node.metadata.capabilities.textbox, "textbox"),
        (node.metadata.capabilities.editable, "edit"),
        (node.metadata.capabilities.resizable, "resize"),
    ] {
        if set {
            flags.push(label);
        }
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(",")).dimmed().to_string()
    };

    let attrs = if all {
        node.attributes
            .iter()
            .map(|(k, v)| format!("{k}={:?}", v.value))
            .collect::<Vec<_>>()
    } else {
        node.output_attributes()
            .iter()
            .map(|(k, v)| format!("{k}={v:?}"))
            .collect::<Vec<_>>()
    };
    let attrs = if attrs.is_empty() {
        String::new()
    } else {
        format!(" {}", attrs.join(" "))
    };

    println!(
        "{indent}{} {}{}{}",
        id.green(),
        node.element.bright_white(),
        attrs,
        flags
    );

    for &child in &node.children {
        print_subtree(store, section, child, depth + 1, all);
    }
}
