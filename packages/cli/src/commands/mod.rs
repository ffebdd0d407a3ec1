pub mod export;
pub mod extract;
pub mod import;
pub mod init;
pub mod preview;
pub mod serve;
pub mod sync;

pub use export::{export, ExportArgs};
pub use extract::{extract, ExtractArgs};
pub use import::{import, ImportArgs};
pub use init::{init, InitArgs};
pub use preview::{preview, PreviewArgs};
pub use serve::{serve, ServeArgs};
pub use sync::{sync, SyncArgs};

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use navboard_editor::ChangeSummary;
use navboard_workspace::{
    ConfigDirSync, ConfigSession, FileGateway, FileSync, LocalMirror, SourceTargets, SyncReport,
};
use serde_json::Value;

use crate::config::Config;

/// Session for the configured user with its record loaded
pub(crate) async fn open_session(config: &Config, cwd: &str) -> Result<ConfigSession> {
    let gateway = Arc::new(FileGateway::new(config.store_path(cwd)));
    let sources = SourceTargets {
        adapter: Arc::new(ConfigDirSync::new(config.source_path(cwd))),
        sidebar_file: config.sidebar_file.clone(),
        page_file: config.page_file.clone(),
    };

    let mut session = ConfigSession::new(gateway)
        .with_mirror(LocalMirror::new(config.mirror_path(cwd)))
        .with_sources(sources)
        .sync_on_confirm(config.sync_on_confirm);
    session.sign_in(config.user_id.clone());

    if !session.load().await? {
        println!(
            "  {} No stored configuration for {}, starting empty",
            "ℹ".blue(),
            config.user_id.bright_white()
        );
    }
    Ok(session)
}

pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub(crate) fn print_summary(summary: &ChangeSummary) {
    println!(
        "  Navigation: {} added, {} modified",
        summary.added_nav_items.to_string().green(),
        summary.modified_nav_items.to_string().yellow()
    );
    println!(
        "  Pages:      {} added, {} modified",
        summary.added_page_configs.to_string().green(),
        summary.modified_page_configs.to_string().yellow()
    );
}

pub(crate) fn print_sync_report(report: &SyncReport, config: &Config) {
    print_file_sync(&config.sidebar_file, &report.sidebar);
    for id in &report.unmatched {
        println!("    {} no block for '{}'", "⚠️".yellow(), id);
    }
    print_file_sync(&config.page_file, &report.pages);
}

fn print_file_sync(name: &str, outcome: &FileSync) {
    match outcome {
        FileSync::Written => println!("  {} Updated {}", "✓".green(), name),
        FileSync::Unchanged => println!("  {} {} already up to date", "✓".green(), name),
        FileSync::Missing => println!("  {} {} not found", "⚠️".yellow(), name),
        FileSync::Failed(err) => println!("  {} {}: {}", "✗".red(), name, err),
    }
}
