use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "huffpress", version)]
#[command(about = "Compress and decompress files with Huffman coding.", long_about = None)]
pub struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Append one JSON line per completed operation to this file
    #[arg(long, env = "HUFFPRESS_JOURNAL", global = true)]
    pub journal: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a file
    Encode {
        input: PathBuf,
        output: PathBuf,
        /// Also write the header and codes as '0'/'1' text
        #[arg(long)]
        text: Option<PathBuf>,
    },
    /// Decompress a file produced by `encode`
    Decode { input: PathBuf, output: PathBuf },
    /// Print the code assigned to each byte of a file
    Codes { input: PathBuf },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Encode { .. } => "encode",
            Commands::Decode { .. } => "decode",
            Commands::Codes { .. } => "codes",
        }
    }
}

/// Settings resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: Level,
    pub journal: Option<PathBuf>,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        let log_level = match (cli.quiet, cli.verbose) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        };
        Settings {
            log_level,
            journal: cli.journal.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(args: &[&str]) -> Settings {
        Settings::from_cli(&Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(settings(&["huffpress", "codes", "a"]).log_level, Level::INFO);
        assert_eq!(settings(&["huffpress", "-v", "codes", "a"]).log_level, Level::DEBUG);
        assert_eq!(settings(&["huffpress", "codes", "a", "-vv"]).log_level, Level::TRACE);
        assert_eq!(settings(&["huffpress", "-q", "codes", "a"]).log_level, Level::ERROR);
    }

    #[test]
    fn encode_takes_optional_text_path() {
        let cli = Cli::try_parse_from(["huffpress", "encode", "in.txt", "out.huff", "--text", "out.txt"])
            .unwrap();
        match cli.command {
            Commands::Encode { input, output, text } => {
                assert_eq!(input, PathBuf::from("in.txt"));
                assert_eq!(output, PathBuf::from("out.huff"));
                assert_eq!(text, Some(PathBuf::from("out.txt")));
            }
            _ => panic!("expected encode"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["huffpress", "-q", "-v", "codes", "a"]).is_err());
    }
}
