//! Initialize a new Plasmo project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::Config;

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Plasmo project...", "→".blue());

    // Create .plasmo directory
    let plasmo_dir = base_path.join(".plasmo");
    std::fs::create_dir_all(&plasmo_dir)
        .with_context(|| format!("Failed to create {}", plasmo_dir.display()))?;
    println!("  {} Created {}", "✓".green(), plasmo_dir.display());

    // Create default config
    let config_path = base_path.join("plasmo.toml");
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    // Keep session snapshots out of version control
    let gitignore_path = plasmo_dir.join(".gitignore");
    if !gitignore_path.exists() {
        std::fs::write(&gitignore_path, "current.json\n")
            .with_context(|| format!("Failed to write {}", gitignore_path.display()))?;
        println!("  {} Created {}", "✓".green(), gitignore_path.display());
    }

    println!();
    println!("{} Plasmo project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} plasmo run --scenario hotspot", "1.".blue());
    println!("  {} plasmo resume --ticks 600", "2.".blue());
    println!("  {} plasmo stats", "3.".blue());

    Ok(())
}
