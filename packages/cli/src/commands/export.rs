use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::open_session;
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let session = open_session(&config, cwd).await?;

    let value = session.store().export_value()?;
    let json = serde_json::to_string_pretty(&value)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "  {} Exported {} nav item(s) to {}",
                "✓".green(),
                session.store().document().nav_item_count(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
