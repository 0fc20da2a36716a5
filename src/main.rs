//! Replay harness - runs a corpus of recordings through a replay validator
//!
//! Usage: `replay-harness <TESTS_DIR> <REFERENCE> <TOOL>`

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use replay_harness::commands::Cli;
use replay_harness::common::logging;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(0);
        }
        Err(e) => {
            println!("{}", Cli::command().render_usage());
            eprint!("{}", e.render());
            std::process::exit(1);
        }
    };

    logging::init_cli(cli.verbose);

    match replay_harness::cli::run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
