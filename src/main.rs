use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod build;
mod commands;
mod config;
mod diagrams;
mod util;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Log debug output
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// The command to execute
    #[command(subcommand)]
    command: PatternbookCommand,
}

#[derive(Parser)]
struct PagesArgs {
    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Write host pages only, leaving the content to `patternbook render`
    #[arg(long, default_value = "false")]
    no_prerender: bool,
}

#[derive(Parser)]
struct RenderArgs {
    /// Host pages to prerender
    #[arg(required = true)]
    host_pages: Vec<PathBuf>,

    /// Directory the prerendered pages are written to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct DiagramsArgs {
    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Reuse one rendering context across jobs
    #[arg(long, default_value = "false")]
    shared_context: bool,
}

#[derive(Parser)]
struct TidyArgs {
    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// List the files that would change without writing them
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[derive(Parser)]
struct InitArgs {
    /// The directory to write the configuration file to
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(short, long, default_value = "false")]
    force: bool,
}

#[derive(Subcommand)]
enum PatternbookCommand {
    /// Generate a page for every design pattern folder
    Pages(PagesArgs),

    /// Prerender existing host pages
    Render(RenderArgs),

    /// Render UML class diagrams to SVG (or PNG) artifacts
    Diagrams(DiagramsArgs),

    /// Clean up diagram source files in place
    Tidy(TidyArgs),

    /// Write a default patternbook.yaml
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        PatternbookCommand::Pages(args) => {
            commands::pages::run(&args).await?;
        }
        PatternbookCommand::Render(args) => {
            commands::render::run(&args).await?;
        }
        PatternbookCommand::Diagrams(args) => {
            commands::diagrams::run(&args).await?;
        }
        PatternbookCommand::Tidy(args) => {
            commands::tidy::run(&args).await?;
        }
        PatternbookCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
    }

    Ok(())
}
