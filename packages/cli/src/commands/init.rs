use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// User whose configuration this workspace edits
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Directory holding the sidebar and page sources
    #[arg(short, long, default_value = "src/config")]
    pub source_dir: String,

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

    println!("{}", "📝 Initializing Navboard workspace...".bright_blue().bold());

    let config = Config {
        user_id: args.user,
        source_dir: args.source_dir,
        ..Config::default()
    };

    let store_dir = config.store_path(cwd);
    if !store_dir.exists() {
        fs::create_dir_all(&store_dir)?;
        println!("  {} Created {}/", "✓".green(), config.store_dir);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: navboard import <config.json>");
    println!("  2. Run: navboard preview <patch.json> --mode append");
    println!("  3. Run: navboard serve");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();

        let args = InitArgs {
            user: "alice".to_string(),
            source_dir: "app/config".to_string(),
            force: false,
        };
        init(args, cwd).unwrap();

        let config = Config::load(cwd).unwrap();
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.source_dir, "app/config");
        assert!(dir.path().join(".navboard/records").is_dir());

        // Without --force the existing file is kept
        let args = InitArgs {
            user: "bob".to_string(),
            source_dir: "src/config".to_string(),
            force: false,
        };
        init(args, cwd).unwrap();
        assert_eq!(Config::load(cwd).unwrap().user_id, "alice");
    }
}
