//! CLI command definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stoic")]
#[command(about = "Stoic diary: daily reflection with an AI mentor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new diary
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Talk with the mentor (interactive unless --message is given)
    Chat {
        /// Day to write in (e.g., today, yesterday, last monday, 2025-01-17)
        #[arg(value_name = "DAY")]
        day: Vec<String>,

        /// Send a single message and exit
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Begin the morning preparation (Premeditatio Malorum)
    Morning {
        #[arg(value_name = "DAY")]
        day: Vec<String>,
    },

    /// Begin the evening review
    Evening {
        #[arg(value_name = "DAY")]
        day: Vec<String>,
    },

    /// Show a day's transcript
    Show {
        #[arg(value_name = "DAY")]
        day: Vec<String>,
    },

    /// List days with entries
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only days whose own messages carry this #tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Maximum number of days to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Month calendar of written days
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        month: Option<String>,
    },

    /// Export one day as Markdown
    Export {
        #[arg(value_name = "DAY")]
        day: Vec<String>,

        /// Directory to write into (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the Markdown instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Omit the YAML frontmatter
        #[arg(long)]
        no_frontmatter: bool,
    },

    /// Export several days as a zip archive or one merged file
    ExportBatch {
        /// Days to export
        #[arg(value_name = "DATE")]
        dates: Vec<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["dates", "all"])]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["dates", "all"])]
        to: Option<String>,

        /// Export every day
        #[arg(long, conflicts_with = "dates")]
        all: bool,

        /// Output format (zip, merged)
        #[arg(short, long, default_value = "zip")]
        format: String,

        /// Directory to write into (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Omit the YAML frontmatter
        #[arg(long)]
        no_frontmatter: bool,
    },

    /// View or modify settings (edit-prompt and reset-prompt are actions)
    Config {
        /// Setting to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all settings
        #[arg(short, long)]
        list: bool,
    },

    /// Delete a day's entry
    Delete {
        #[arg(value_name = "DAY", required = true)]
        day: Vec<String>,
    },
}

/// Join multi-word day arguments ("last monday") back together
pub fn day_arg(parts: &[String]) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_multi_word_day() {
        let cli = Cli::parse_from(["stoic", "show", "last", "monday"]);
        match cli.command {
            Some(Commands::Show { day }) => {
                assert_eq!(day_arg(&day).as_deref(), Some("last monday"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_chat_one_shot() {
        let cli = Cli::parse_from(["stoic", "-v", "chat", "-m", "Hello"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Commands::Chat { day, message }) => {
                assert!(day_arg(&day).is_none());
                assert_eq!(message.as_deref(), Some("Hello"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_export_batch_conflicts() {
        assert!(Cli::try_parse_from(["stoic", "export-batch", "2025-01-01", "--all"]).is_err());
        assert!(Cli::try_parse_from(["stoic", "export-batch", "--all", "-f", "merged"]).is_ok());
    }
}
