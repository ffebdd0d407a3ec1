use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use navboard_editor::PreviewMode;

use super::{open_session, print_summary, read_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Configuration JSON to import
    pub input: PathBuf,

    /// Replace the stored configuration instead of merging into it
    #[arg(long)]
    pub replace: bool,
}

pub async fn import(args: ImportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let raw = read_json(&args.input)?;

    let mut session = open_session(&config, cwd).await?;
    let mode = if args.replace {
        PreviewMode::Override
    } else {
        PreviewMode::Append
    };

    let summary = session.import_value(&raw, mode)?;
    let record = session.save().await?;

    println!(
        "{} {} ({})",
        "✅ Imported".green().bold(),
        args.input.display(),
        if args.replace { "replace" } else { "merge" }
    );
    print_summary(&summary);
    println!("  Saved at {}", record.updated_at.to_rfc3339().dimmed());

    Ok(())
}
