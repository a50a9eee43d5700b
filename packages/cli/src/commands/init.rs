use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_dom::Document;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Document file to create
    #[arg(short, long, default_value = "site.json")]
    pub document: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagecraft project...".bright_blue().bold()
    );

    // Starter document: empty sections plus the default widget palette
    let document_path = PathBuf::from(cwd).join(&args.document);
    if !document_path.exists() || args.force {
        let starter = Document::starter();
        fs::write(&document_path, serde_json::to_string_pretty(&starter)?)?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    let config = Config {
        document: args.document.clone(),
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft inspect");
    println!("  2. Script edits and run: pagecraft apply --script edits.json");
    println!("  3. Check structure with: pagecraft doctor");

    Ok(())
}
