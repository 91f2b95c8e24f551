mod commands;

use std::process::ExitCode;

use clap::*;
use commands::Generate;

#[derive(Parser)]
#[command(
    name = "procgen",
    bin_name = "procgen",
    version,
    about = "Generate MySQL stored procedures and JavaScript API functions"
)]
enum Command {
    Generate(Generate),
}

#[tokio::main]
async fn main() -> ExitCode {
    let command = Command::parse();
    let result = match command {
        Command::Generate(args) => args.run().await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
