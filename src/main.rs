mod commands;
mod config;
mod context;
mod executor;
mod hcl;
mod import;
mod output;
#[cfg(test)]
mod test_helpers;
mod traits;

use clap::{Parser, Subcommand};
use commands::{ImportCommand, RenderCommand, ScanCommand};
use context::Context;

#[derive(Parser)]
#[command(name = "tfimport")]
#[command(about = "Import existing remote resources into Terraform/OpenTofu configuration", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import remote resources of one kind and rewrite the plan file from state
    Import(ImportCommand),

    /// Convert a state file to HCL
    Render(RenderCommand),

    /// List declarations already present in the plan file
    Scan(ScanCommand),
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context::new();

    let result = match cli.command {
        Commands::Import(cmd) => cmd.execute(&ctx),
        Commands::Render(cmd) => cmd.execute(&ctx),
        Commands::Scan(cmd) => cmd.execute(&ctx),
    };

    if let Err(err) = result {
        ctx.output.error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
