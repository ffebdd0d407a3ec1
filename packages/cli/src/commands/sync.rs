use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{open_session, print_sync_report};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Re-apply page configs from the local mirror before syncing
    #[arg(long)]
    pub from_mirror: bool,
}

pub async fn sync(args: SyncArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd).await?;

    if args.from_mirror {
        let restored = session.restore_from_mirror();
        println!("  {} Restored {} page config(s) from mirror", "✓".green(), restored);
    }

    println!(
        "{} {}",
        "🔄 Syncing sources in".bright_blue().bold(),
        config.source_dir
    );
    let report = session.sync_sources().await?;
    print_sync_report(&report, &config);

    Ok(())
}
