pub mod check;
pub mod init;
pub mod run;
pub mod solve;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    /// Judge an executable against every testcase.
    #[command(alias("r"))]
    Run(run::Args),

    /// Check a vertex cover: <input> <candidate> <reference>.
    Check(check::Args),

    /// Print a minimum vertex cover of the graph read from stdin.
    Solve(solve::Args),

    /// Write an example vcjudge.toml.
    Init(init::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Run(args) => run::exec(args, self).await,
            Check(args) => check::exec(args, self),
            Solve(args) => solve::exec(args, self),
            Init(args) => init::exec(args, self),
        }
    }
}
