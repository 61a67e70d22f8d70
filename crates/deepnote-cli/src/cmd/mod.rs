use anyhow::Result;

use crate::args::{Cli, Command};
use crate::io::input;

mod compile;
mod kinds;
mod markdown;
mod validate;

pub fn dispatch(cli: Cli) -> Result<()> {
    let cfg = input::load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Validate { file } => validate::run(&cfg, &file),
        Command::Compile { file, notebook, variables } => compile::run(&cfg, &file, notebook.as_deref(), variables),
        Command::Markdown { file, notebook, plain } => markdown::run(&cfg, &file, notebook.as_deref(), plain),
        Command::Kinds => kinds::run(),
    }
}
