use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use navboard_workspace::{server, ConfigDirSync};

use crate::config::Config;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on, overriding the config file
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn serve(args: ServeArgs, cwd: &str) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let source_dir = config.source_path(cwd);
    std::fs::create_dir_all(&source_dir)?;

    println!("{}", "🚀 Starting dev file-patch endpoint...".bright_blue().bold());
    println!("   Directory: {}", source_dir.display());
    println!(
        "   Endpoint:  {}",
        format!("http://{}{}", config.address(), server::WRITE_CONFIG_ROUTE).cyan()
    );

    server::serve(&config.address(), Arc::new(ConfigDirSync::new(source_dir))).await?;
    Ok(())
}
