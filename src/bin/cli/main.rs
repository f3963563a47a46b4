mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use app::{App, OptionOverrides};

#[derive(Parser)]
#[command(
    name = "endnote-exporter",
    about = "Convert an EndNote library into XML for Zotero import",
    version
)]
struct Cli {
    /// Config file (default: <config dir>/endnote-exporter/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Export a library to Zotero XML
    Export {
        /// EndNote library file (.enl)
        library: PathBuf,
        /// Output file (default: <library>_zotero_export.xml next to the library)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render added/modified dates in UTC instead of local time
        #[arg(long)]
        utc: bool,
        /// Also export references in the EndNote trash
        #[arg(long)]
        include_trashed: bool,
        /// Spaces per indentation level (0 for compact output)
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Show what an export would contain without writing anything
    Preview {
        /// EndNote library file (.enl)
        library: PathBuf,
        /// Count references in the EndNote trash as well
        #[arg(long)]
        include_trashed: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();

    match cli.command {
        Command::Export {
            library,
            output,
            utc,
            include_trashed,
            indent,
        } => {
            let overrides = OptionOverrides {
                utc,
                include_trashed,
                indent,
            };
            let app = App::new(cli.config.as_deref(), &overrides)?;
            commands::export::run(&app, &library, output.as_deref(), &cli.format, use_color)?;
        }
        Command::Preview {
            library,
            include_trashed,
        } => {
            let overrides = OptionOverrides {
                include_trashed,
                ..Default::default()
            };
            let app = App::new(cli.config.as_deref(), &overrides)?;
            commands::preview::run(&app, &library, &cli.format, use_color)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    std::io::stdout().is_terminal()
}
