//! CLI argument parsing for buildtimer

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::TimerConfig;

/// Output format for `stat` and `dump`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and charts (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "buildtimer")]
#[command(version)]
#[command(about = "Track the time spent waiting for builds to finish", long_about = None)]
pub struct Cli {
    /// Build log file to append to or read from
    #[arg(short = 'o', long = "output", value_name = "FILE", env = "BUILDTIMER_DB")]
    pub log_path: PathBuf,

    /// Output format for stat and dump
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Keep the records before a corrupt one instead of failing the read
    #[arg(long = "salvage", global = true)]
    pub salvage: bool,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record the start of a build, with an optional note
    Start {
        /// Free-form note stored with the start event
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        note: Vec<String>,
    },
    /// Record the end of a build with its exit code ("0" means success)
    Stop {
        #[arg(value_name = "EXIT_CODE", allow_hyphen_values = true, value_parser = parse_exit_code)]
        exit_code: String,
    },
    /// Print build time statistics and charts
    Stat,
    /// Print every recorded event
    Dump,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start { .. } => "start",
            Command::Stop { .. } => "stop",
            Command::Stat => "stat",
            Command::Dump => "dump",
        }
    }
}

impl Cli {
    /// Build the configuration shared by every operation
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig::new(&self.log_path)
            .with_output_format(self.format)
            .with_salvage(self.salvage)
    }
}

/// Strip surrounding spaces and tabs, as stored in the log
pub fn trim_text(raw: &str) -> &str {
    raw.trim_matches(|c: char| c == ' ' || c == '\t')
}

fn parse_exit_code(raw: &str) -> Result<String, String> {
    let code = trim_text(raw);
    if code.is_empty() {
        return Err("exit code must not be empty".to_string());
    }
    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_start_with_note() {
        let cli = parse(&["buildtimer", "-o", "t.db", "start", "after", "merging", "xyz"]);
        assert_eq!(cli.log_path, PathBuf::from("t.db"));
        assert_eq!(
            cli.command,
            Command::Start {
                note: vec!["after".into(), "merging".into(), "xyz".into()]
            }
        );
    }

    #[test]
    fn test_parse_start_without_note() {
        let cli = parse(&["buildtimer", "-o", "t.db", "start"]);
        assert_eq!(cli.command, Command::Start { note: vec![] });
    }

    #[test]
    fn test_parse_stop_trims_code() {
        let cli = parse(&["buildtimer", "--output", "t.db", "stop", " 32\t"]);
        assert_eq!(
            cli.command,
            Command::Stop {
                exit_code: "32".into()
            }
        );
    }

    #[test]
    fn test_parse_stop_negative_code() {
        let cli = parse(&["buildtimer", "-o", "t.db", "stop", "-1"]);
        assert_eq!(
            cli.command,
            Command::Stop {
                exit_code: "-1".into()
            }
        );
    }

    #[test]
    fn test_stop_requires_code() {
        assert!(Cli::try_parse_from(["buildtimer", "-o", "t.db", "stop"]).is_err());
        assert!(Cli::try_parse_from(["buildtimer", "-o", "t.db", "stop", "  "]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["buildtimer", "-o", "t.db", "stat", "--format", "json", "--salvage"]);
        assert_eq!(cli.command, Command::Stat);
        let config = cli.to_config();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.salvage);
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["buildtimer", "-o", "t.db", "restart"]).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Stat.name(), "stat");
        assert_eq!(Command::Start { note: vec![] }.name(), "start");
    }

    #[test]
    fn test_trim_text() {
        assert_eq!(trim_text("\t note  "), "note");
        assert_eq!(trim_text("   "), "");
        assert_eq!(trim_text("a b"), "a b");
    }
}
