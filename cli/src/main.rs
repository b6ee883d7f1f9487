use std::io::Write as _;

use clap::Parser;
use colored::Colorize as _;
use vcjudge_cli::cmd::GlobalArgs;
use vcjudge_core::style::ColorTheme as _;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "[{}] {}",
                level.to_string().color(level.color()),
                record.args()
            )
        })
        .init();

    let app = GlobalArgs::parse();
    app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
}
