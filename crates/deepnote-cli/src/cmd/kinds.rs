use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use deepnote_blocks::registry::{catalog, KindSpec};

use crate::output;

#[derive(Debug, Serialize)]
pub struct KindsOut {
    pub kinds: Vec<KindSpec>,
}

pub fn run() -> Result<()> {
    let kinds = catalog();
    if output::is_json() {
        return output::print(&KindsOut { kinds });
    }

    let mut stdout = output::stdout();
    for k in &kinds {
        writeln!(stdout, "{:<20} {:<9} {}", k.kind, k.family, k.description)?;
    }
    Ok(())
}
