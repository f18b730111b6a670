// dqt/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dqt")]
#[command(about = "Data quality rules, check scheduling and quality reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory (holds dqt.yaml)
    #[arg(long, default_value = ".", global = true)]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ✅ Runs every active rule over a JSON dataset and records the report
    Check {
        /// JSON file holding an array of records
        #[arg(long, short)]
        data: PathBuf,

        /// Dataset label stored with the report (default: file stem)
        #[arg(long)]
        dataset: Option<String>,
    },

    /// 📏 Manages quality rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// ⏰ Manages scheduled check-runs
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// 📜 Lists past quality reports
    History {
        /// Show only the most recent reports
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// Lists rules with status and usage
    List,

    /// Switches a rule between active and paused
    Toggle { id: String },

    /// Evaluates a rule against a sample value
    Test {
        id: String,

        /// Sample value, parsed as JSON when possible (ex: 42, "text", [1, null])
        #[arg(long)]
        value: String,
    },
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Computes the next run of a recurrence without storing anything
    Next {
        /// daily | weekly | monthly
        #[arg(long)]
        frequency: String,

        /// Time of day, HH:MM
        #[arg(long)]
        time: String,

        /// Weekday for weekly, ordinal day (1st, 15th) for monthly
        #[arg(long, default_value = "")]
        day: String,

        /// Reference instant, YYYY-MM-DDTHH:MM (default: now)
        #[arg(long)]
        from: Option<String>,
    },

    /// Lists scheduled tasks
    List,

    /// Runs a task now and moves its next run forward
    Run { id: String },

    /// Switches a task between active and paused
    Toggle { id: String },

    /// Lists active tasks due within the window
    Upcoming {
        #[arg(long, default_value = "24")]
        hours: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_check() -> Result<()> {
        let args = Cli::parse_from(["dqt", "check", "--data", "data/customers.json"]);
        assert_eq!(args.project_dir.to_string_lossy(), ".");
        match args.command {
            Commands::Check { data, dataset } => {
                assert_eq!(data.to_string_lossy(), "data/customers.json");
                assert_eq!(dataset, None);
                Ok(())
            }
            _ => bail!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_global_project_dir() -> Result<()> {
        let args = Cli::parse_from(["dqt", "rules", "list", "--project-dir", "/tmp/shop"]);
        assert_eq!(args.project_dir.to_string_lossy(), "/tmp/shop");
        match args.command {
            Commands::Rules {
                action: RulesAction::List,
            } => Ok(()),
            _ => bail!("Expected Rules List command"),
        }
    }

    #[test]
    fn test_cli_parse_rule_test_value() -> Result<()> {
        let args = Cli::parse_from(["dqt", "rules", "test", "r1", "--value", "42"]);
        match args.command {
            Commands::Rules {
                action: RulesAction::Test { id, value },
            } => {
                assert_eq!(id, "r1");
                assert_eq!(value, "42");
                Ok(())
            }
            _ => bail!("Expected Rules Test command"),
        }
    }

    #[test]
    fn test_cli_parse_schedule_next() -> Result<()> {
        let args = Cli::parse_from([
            "dqt",
            "schedule",
            "next",
            "--frequency",
            "weekly",
            "--time",
            "09:00",
            "--day",
            "monday",
        ]);
        match args.command {
            Commands::Schedule {
                action:
                    ScheduleAction::Next {
                        frequency,
                        time,
                        day,
                        from,
                    },
            } => {
                assert_eq!(frequency, "weekly");
                assert_eq!(time, "09:00");
                assert_eq!(day, "monday");
                assert_eq!(from, None);
                Ok(())
            }
            _ => bail!("Expected Schedule Next command"),
        }
    }

    #[test]
    fn test_cli_parse_upcoming_default_window() -> Result<()> {
        let args = Cli::parse_from(["dqt", "schedule", "upcoming"]);
        match args.command {
            Commands::Schedule {
                action: ScheduleAction::Upcoming { hours },
            } => {
                assert_eq!(hours, 24);
                Ok(())
            }
            _ => bail!("Expected Schedule Upcoming command"),
        }
    }
}
