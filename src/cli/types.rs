use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI parser structure
#[derive(Parser)]
#[command(name = "mdtoc")]
#[command(about = "Render markdown with a table of contents in place of [[toc]] markers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Custom configuration file (defaults to ./.mdtoc.{yml,yaml,toml,json})
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<Vec<PathBuf>>,

    /// Show the full backtrace when an error occurs
    #[arg(short, long, default_value_t = false, global = true)]
    pub trace: bool,

    /// Enable verbose debugging
    #[arg(short = 'g', long, default_value_t = false, global = true)]
    pub debug: bool,
}

/// Subcommands for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Render a markdown file to HTML
    #[command(alias = "r")]
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Write the HTML here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Heading levels to include, comma separated
        #[arg(short, long, value_name = "LEVELS", value_delimiter = ',')]
        levels: Option<Vec<usize>>,

        /// Use an ordered list for the outline
        #[arg(long, default_value_t = false)]
        ordered: bool,
    },

    /// Print only the outline of a markdown file
    #[command(alias = "o")]
    Outline {
        /// Markdown file to read
        file: PathBuf,

        /// Heading levels to include, comma separated
        #[arg(short, long, value_name = "LEVELS", value_delimiter = ',')]
        levels: Option<Vec<usize>>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutlineFormat::Html)]
        format: OutlineFormat,
    },
}

/// Output formats of the outline command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutlineFormat {
    Html,
    Json,
    Markdown,
}
