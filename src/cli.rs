use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fight Elo rating engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the rating API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Append bouts from a scraped fight CSV to the ledger database
    Import {
        /// Path to the CSV file
        path: PathBuf,
        /// Drop the existing ledger before importing
        #[arg(long)]
        reset: bool,
    },
    /// Replay the ledger and write leaderboard and fight exports
    Process {
        /// Export directory (defaults to EXPORT_DIR or ./exports)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_with_reset() {
        let cli = Cli::try_parse_from(["fight_elo", "import", "fights.csv", "--reset"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Import {
                path: PathBuf::from("fights.csv"),
                reset: true,
            }
        );
    }

    #[test]
    fn serve_defaults_to_port_3000() {
        let cli = Cli::try_parse_from(["fight_elo", "serve"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }
}
