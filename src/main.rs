use anyhow::Result;

use fight_elo::cli::Command;
use fight_elo::{handle_import, handle_process, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(port),
        Command::Import { path, reset } => handle_import(&path, reset),
        Command::Process { out } => handle_process(out),
    }
}
