use crate::commands::{load_document, save_document};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{Command, Editor};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON file holding an array of editor commands
    #[arg(short, long)]
    pub script: String,

    /// Document file (defaults to the configured one)
    #[arg(short, long)]
    pub document: Option<String>,

    /// Write the result here instead of back to the document
    #[arg(short, long)]
    pub output: Option<String>,

    /// Run the script but do not write anything
    #[arg(long)]
    pub dry_run: bool,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = match &args.document {
        Some(doc) => PathBuf::from(cwd).join(doc),
        None => config.document_path(cwd),
    };

    let script_path = PathBuf::from(cwd).join(&args.script);
    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read script: {}", script_path.display()))?;
    let commands: Vec<Command> = serde_json::from_str(&script)
        .with_context(|| format!("Script is not a command array: {}", script_path.display()))?;

    println!(
        "{} {} commands against {}",
        "▶ Applying".bright_blue().bold(),
        commands.len(),
        path.display()
    );

    let mut editor = Editor::new(load_document(&path)?);
    for (i, command) in commands.into_iter().enumerate() {
        editor
            .dispatch(command.clone())
            .with_context(|| format!("Command {i} failed: {command:?}"))?;
    }

    let document = editor.into_document();
    document
        .validate()
        .map_err(|(place, err)| anyhow::anyhow!("Result is invalid at {place}: {err}"))?;

    if args.dry_run {
        println!("{} dry run, nothing written", "✓".green());
        return Ok(());
    }

    let out = match &args.output {
        Some(output) => PathBuf::from(cwd).join(output),
        None => path,
    };
    save_document(&out, &document)?;

    println!("{} Saved {}", "✓".green(), out.display());
    Ok(())
}
