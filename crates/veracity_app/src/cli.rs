use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use veracity_core::AnalysisKind;
use veracity_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "veracity")]
#[command(about = "Deep-fake, claim and news credibility checks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// RON settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Analysis backend URL; the built-in simulator is used when absent
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Seed for simulated results and the progress animation
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Where to write logs (terminal, file, both)
    #[arg(long, global = true, default_value = "terminal")]
    pub log: LogDestination,

    /// Log file used by the file destination
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check an image or video for signs of manipulation
    Media {
        /// Image or video file
        file: PathBuf,
    },
    /// Cross-reference a statement and/or a link against known sources
    Claim {
        /// Statement to verify
        #[arg(long)]
        text: Option<String>,

        /// Link to the content making the claim
        #[arg(long)]
        url: Option<String>,
    },
    /// Rate a news article's authenticity, bias and factuality
    News {
        /// Article URL
        url: String,
    },
}

impl Command {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Command::Media { .. } => AnalysisKind::MediaCheck,
            Command::Claim { .. } => AnalysisKind::ClaimCheck,
            Command::News { .. } => AnalysisKind::NewsCheck,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_claim_with_both_inputs() {
        let cli = Cli::parse_from([
            "veracity",
            "--seed",
            "7",
            "claim",
            "--text",
            "The sky is blue",
            "--url",
            "https://example.com",
        ]);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.command.kind(), AnalysisKind::ClaimCheck);
        assert_eq!(
            cli.command,
            Command::Claim {
                text: Some("The sky is blue".to_string()),
                url: Some("https://example.com".to_string()),
            }
        );
    }

    #[test]
    fn log_destination_and_verbosity() {
        let cli = Cli::parse_from(["veracity", "news", "https://example.com", "--log", "both", "-vv"]);
        assert_eq!(cli.log, LogDestination::Both);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn log_file_is_optional() {
        let cli = Cli::parse_from(["veracity", "--log", "file", "--log-file", "run.log", "news", "u"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));

        let cli = Cli::parse_from(["veracity", "news", "u"]);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn rejects_unknown_log_destination() {
        let parsed = Cli::try_parse_from(["veracity", "--log", "syslog", "media", "a.png"]);
        assert!(parsed.is_err());
    }
}
