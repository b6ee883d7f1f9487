use std::path::PathBuf;

use vcjudge_core::action;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Graph the candidate was computed for.
    pub input_file: PathBuf,

    /// Candidate cover, one vertex id per line.
    pub candidate_file: PathBuf,

    /// Reference output whose first line is the optimal cover size.
    pub reference_file: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let verdict =
        action::check_vertex_cover(&args.input_file, &args.candidate_file, &args.reference_file)?;

    println!("{}", verdict.report());
    if !verdict.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}
