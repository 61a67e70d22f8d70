use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "deepnote", version, about = "Validate and compile Deepnote documents")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// YAML file overriding document limits.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check a document's structure, cross references and block inputs.
    Validate {
        /// Path to a .deepnote file.
        file: PathBuf,
    },

    /// Compile code blocks to Python and display blocks to Markdown.
    Compile {
        file: PathBuf,

        /// Only this notebook (by id).
        #[arg(long)]
        notebook: Option<String>,

        /// Variable set by the button that started this run. Repeatable.
        #[arg(long = "variable", value_name = "NAME")]
        variables: Vec<String>,
    },

    /// Render display blocks as Markdown. Other blocks are skipped.
    Markdown {
        file: PathBuf,

        #[arg(long)]
        notebook: Option<String>,

        /// Emit text cells as plain text without markdown markers.
        #[arg(long)]
        plain: bool,
    },

    /// List supported block kinds.
    Kinds,
}
