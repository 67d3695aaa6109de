//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// dp - daily planner
#[derive(Parser)]
#[command(
    name = "dp",
    about = "Daily planner with overlap detection and AI priority suggestions",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/dayplanner/logs/dayplanner.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to an interactive session)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive planning session
    Plan {
        /// Seed the session from a YAML file
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Seed the session with a sample day
        #[arg(long, conflicts_with = "file")]
        demo: bool,
    },

    /// Show a seed file's agenda with overlap flags, and its backlog
    Check {
        /// Seed file (YAML)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Ask the advisor to prioritize a seed file's pending agenda
    Suggest {
        /// Seed file (YAML)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Provider (google, openai, anthropic); overrides config
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Print the minutes a free-text effort parses to
    Effort {
        /// Effort text, e.g. "1.5 hours"
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        text: Vec<String>,
    },
}

/// Path of the log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dayplanner")
        .join("logs")
        .join("dayplanner.log")
}

/// Output format for `check`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["dp"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_plan_demo() {
        let cli = Cli::parse_from(["dp", "plan", "--demo"]);
        assert!(matches!(cli.command, Some(Command::Plan { file: None, demo: true })));
    }

    #[test]
    fn test_cli_plan_file_conflicts_with_demo() {
        assert!(Cli::try_parse_from(["dp", "plan", "--demo", "--file", "day.yml"]).is_err());
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["dp", "check", "--file", "day.yml", "--format", "json"]);
        match cli.command {
            Some(Command::Check { file, format }) => {
                assert_eq!(file, PathBuf::from("day.yml"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_check_requires_file() {
        assert!(Cli::try_parse_from(["dp", "check"]).is_err());
    }

    #[test]
    fn test_cli_parse_suggest_with_provider() {
        let cli = Cli::parse_from(["dp", "suggest", "-f", "day.yml", "--provider", "openai"]);
        assert!(matches!(
            cli.command,
            Some(Command::Suggest { provider: Some(ref p), .. }) if p == "openai"
        ));
    }

    #[test]
    fn test_cli_parse_effort_joins_words() {
        let cli = Cli::parse_from(["dp", "effort", "1.5", "hours"]);
        match cli.command {
            Some(Command::Effort { text }) => assert_eq!(text.join(" "), "1.5 hours"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["dp", "--log-level", "debug", "-c", "cfg.yml", "effort", "5"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("cfg.yml")));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_log_path() {
        assert!(get_log_path().ends_with("dayplanner/logs/dayplanner.log"));
    }
}
