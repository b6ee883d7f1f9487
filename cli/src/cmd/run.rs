use std::path::PathBuf;

use vcjudge_core::{action, config::JudgeConfig};

use crate::util;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Command line of the program under test, split on whitespace.
    #[arg()]
    pub executable: String,

    /// Wall-clock limit per testcase, in seconds.
    #[arg(long, visible_alias = "time_limit")]
    pub time_limit: Option<u64>,

    /// Timeouts a group may accumulate before its remaining testcases are skipped.
    #[arg(long, visible_alias = "max_time_limit_exceeded")]
    pub max_timeouts: Option<usize>,

    #[arg(long)]
    pub in_dir: Option<PathBuf>,

    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    #[arg(long)]
    pub checker: Option<PathBuf>,
}

impl Args {
    fn apply_to(&self, cfg: &mut JudgeConfig) {
        let Args {
            executable: _,
            time_limit,
            max_timeouts,
            in_dir,
            out_dir,
            checker,
        } = self;

        if let Some(t) = time_limit {
            cfg.harness.time_limit = *t;
        }
        if let Some(n) = max_timeouts {
            cfg.harness.max_timeouts = *n;
        }
        if let Some(d) = in_dir {
            cfg.layout.input_dir = d.clone();
        }
        if let Some(d) = out_dir {
            cfg.layout.output_dir = d.clone();
        }
        if let Some(p) = checker {
            cfg.checker.path = p.clone();
        }
    }
}

pub async fn exec(args: &Args, _global_args: &GlobalArgs) -> SubcmdResult {
    let mut cfg = JudgeConfig::from_file_finding_in_ancestors_or_default(util::current_dir())?;
    args.apply_to(&mut cfg);

    // A wrong answer or an abandoned group is a result, not a failure.
    let _ = action::do_judge(&args.executable, &cfg).await?;
    Ok(())
}
