use std::io::{self, Read as _};

use anyhow::Context as _;
use vcjudge_core::action;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_: &Args, _: &GlobalArgs) -> SubcmdResult {
    let mut graph = String::new();
    io::stdin()
        .read_to_string(&mut graph)
        .context("Failed to read graph from stdin")?;

    print!("{}", action::solve_vertex_cover(&graph)?);
    Ok(())
}
