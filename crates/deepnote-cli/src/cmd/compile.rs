use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use deepnote_blocks::notebook::{compile_notebook, CompiledBlock};
use deepnote_blocks::ExecutionContext;
use deepnote_core::config::CoreConfig;

use crate::io::input;
use crate::output::{self, Status};

#[derive(Debug, Serialize)]
pub struct CompileOut {
    pub notebooks: Vec<NotebookOut>,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct NotebookOut {
    pub id: String,
    pub name: String,
    pub blocks: Vec<CompiledBlock>,
}

pub fn run(cfg: &CoreConfig, path: &Path, notebook: Option<&str>, variables: Vec<String>) -> Result<()> {
    let file = input::read_document(path, cfg)?;
    let ctx = ExecutionContext::with_variables(variables);

    let notebooks: Vec<NotebookOut> = input::select_notebooks(&file, notebook)?
        .into_iter()
        .map(|nb| NotebookOut {
            id: nb.id.to_string(),
            name: nb.name.clone(),
            blocks: compile_notebook(nb, &ctx),
        })
        .collect();

    let failed = notebooks
        .iter()
        .flat_map(|nb| &nb.blocks)
        .filter(|b| !b.is_ok())
        .count();
    let out = CompileOut { notebooks, failed };

    if output::is_json() {
        output::print(&out)?;
    } else {
        render(&out)?;
    }

    if failed > 0 {
        bail!("{failed} block(s) failed to compile");
    }
    Ok(())
}

fn render(out: &CompileOut) -> Result<()> {
    let mut stdout = output::stdout();
    for nb in &out.notebooks {
        for b in &nb.blocks {
            output::header(&mut stdout, &format!("{}/{} ({})", nb.id, b.block_id, b.kind))?;
            match &b.output {
                Ok(text) => writeln!(stdout, "{text}")?,
                Err(e) => output::status_line(&mut stdout, Status::Error, &e.to_string())?,
            }
        }
    }
    Ok(())
}
