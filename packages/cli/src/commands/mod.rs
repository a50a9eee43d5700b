mod apply;
mod doctor;
mod init;
mod inspect;

pub use apply::{apply, ApplyArgs};
pub use doctor::{doctor, DoctorArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};

use anyhow::Context;
use pagecraft_dom::Document;
use std::path::Path;

/// Load a serialized document from disk
pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read document: {}", path.display()))?;
    let document: Document = serde_json::from_str(&content)
        .with_context(|| format!("Document is not valid JSON: {}", path.display()))?;
    Ok(document)
}

/// Save a document back to disk, pretty-printed
pub fn save_document(path: &Path, document: &Document) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json)
        .with_context(|| format!("Cannot write document: {}", path.display()))?;
    Ok(())
}
