use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use navboard_assistant::extract_patch;
use navboard_model::normalize_patch;

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Assistant reply text, `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Also validate the patch as a navigation document
    #[arg(long)]
    pub check: bool,
}

pub fn extract(args: ExtractArgs, _cwd: &str) -> Result<()> {
    let text = if args.input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(&args.input)?
    };

    let Some(patch) = extract_patch(&text) else {
        eprintln!("{} No configuration patch found", "⚠️".yellow());
        return Ok(());
    };

    println!("{}", serde_json::to_string_pretty(&patch)?);

    if args.check {
        match normalize_patch(&patch) {
            Ok(normalized) => eprintln!(
                "{} Valid patch: {} main item(s), {} page config(s)",
                "✓".green(),
                normalized.main_items().count(),
                normalized.page_configs().len()
            ),
            Err(err) => eprintln!("{} Not a navigation document: {}", "✗".red(), err),
        }
    }

    Ok(())
}
