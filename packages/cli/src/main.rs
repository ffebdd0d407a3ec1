mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    export, extract, import, init, preview, serve, sync, ExportArgs, ExtractArgs, ImportArgs,
    InitArgs, PreviewArgs, ServeArgs, SyncArgs,
};

/// Navboard CLI - configuration-driven admin dashboards
#[derive(Parser, Debug)]
#[command(name = "navboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create navboard.config.json in the current directory
    Init(InitArgs),

    /// Print or write the stored configuration
    Export(ExportArgs),

    /// Import a configuration file, merging by default
    Import(ImportArgs),

    /// Preview a patch against the stored configuration
    Preview(PreviewArgs),

    /// Pull the configuration patch out of an assistant reply
    Extract(ExtractArgs),

    /// Write the stored configuration back into the source files
    Sync(SyncArgs),

    /// Serve the dev file-patch endpoint
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Export(args) => export(args, &cwd).await,
        Command::Import(args) => import(args, &cwd).await,
        Command::Preview(args) => preview(args, &cwd).await,
        Command::Extract(args) => extract(args, &cwd),
        Command::Sync(args) => sync(args, &cwd).await,
        Command::Serve(args) => serve(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
