use crate::commands::load_document;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_dom::Section;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DoctorArgs {
    /// Document file (defaults to the configured one)
    #[arg(short, long)]
    pub document: Option<String>,
}

pub fn doctor(args: DoctorArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = match &args.document {
        Some(doc) => PathBuf::from(cwd).join(doc),
        None => config.document_path(cwd),
    };

    let document = load_document(&path)?;
    println!("{} {}", "🩺 Checking".bright_blue().bold(), path.display());
    println!();

    let mut problems = 0;

    for section in Section::ALL {
        match document.section(section).validate() {
            Ok(()) => println!("  {} {}", "✓".green(), section),
            Err(err) => {
                problems += 1;
                println!("  {} {}: {}", "✗".red(), section, err);
            }
        }
    }

    for widget in &document.widgets {
        match widget.nodes.validate() {
            Ok(()) => println!("  {} widget {:?}", "✓".green(), widget.name),
            Err(err) => {
                problems += 1;
                println!("  {} widget {:?}: {}", "✗".red(), widget.name, err);
            }
        }
    }

    println!();
    if problems == 0 {
        println!("{}", "✅ Structure is sound".green().bold());
        Ok(())
    } else {
        Err(anyhow::anyhow!("{problems} structural problem(s) found"))
    }
}
