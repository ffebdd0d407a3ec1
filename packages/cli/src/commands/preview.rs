use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use navboard_assistant::extract_patch;
use navboard_editor::PreviewMode;
use navboard_model::NavGroup;
use navboard_workspace::{ConfirmReport, PersistOutcome};

use super::{open_session, print_summary, print_sync_report, read_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Patch JSON, or assistant reply text with --reply
    pub input: PathBuf,

    /// Preview mode (initial, override, append)
    #[arg(short, long, default_value = "override")]
    pub mode: PreviewMode,

    /// Treat the input as an assistant reply and extract its patch
    #[arg(long)]
    pub reply: bool,

    /// Commit the previewed candidate and save it
    #[arg(long)]
    pub confirm: bool,
}

pub async fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let raw = if args.reply {
        let text = std::fs::read_to_string(&args.input)?;
        extract_patch(&text).ok_or_else(|| anyhow!("No configuration patch found in reply"))?
    } else {
        read_json(&args.input)?
    };

    let mut session = open_session(&config, cwd).await?;
    let summary = session.propose_patch(&raw)?;
    session.set_preview_mode(args.mode)?;

    println!(
        "{} {} mode",
        "🔍 Previewing".bright_blue().bold(),
        args.mode.as_str().cyan()
    );
    print_summary(&summary);
    println!();
    print_tree(&session.effective_tree());

    if !args.confirm {
        println!();
        println!("Nothing committed. Re-run with --confirm to apply.");
        return Ok(());
    }

    let report = session.confirm().await?;
    println!();
    print_confirm_report(&report, &config);
    Ok(())
}

fn print_tree(groups: &[NavGroup]) {
    for group in groups {
        println!("  {}", group.label.bold());
        for main in &group.items {
            println!("    {} {}", main.title, format!("({})", main.id).dimmed());
            for sub in &main.items {
                let template = sub
                    .template
                    .as_deref()
                    .map(|t| format!(" [{}]", t))
                    .unwrap_or_default();
                println!(
                    "      {} {}{}",
                    sub.title,
                    format!("({})", sub.id).dimmed(),
                    template.cyan()
                );
            }
        }
    }
}

fn print_confirm_report(report: &ConfirmReport, config: &Config) {
    println!(
        "{} {} preview",
        "✅ Confirmed".green().bold(),
        report.mode.as_str()
    );
    match &report.persisted {
        PersistOutcome::Saved { updated_at } => {
            println!("  {} Saved at {}", "✓".green(), updated_at.to_rfc3339())
        }
        PersistOutcome::Failed(err) => {
            println!("  {} Save failed, changes kept locally: {}", "✗".red(), err)
        }
        PersistOutcome::Skipped => println!("  {} Not signed in, nothing saved", "⚠️".yellow()),
    }
    if let Some(sync) = &report.sync {
        print_sync_report(sync, config);
    }
}
