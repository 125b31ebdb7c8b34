//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for triage-bot
#[derive(Parser, Debug)]
#[command(name = "triage-bot")]
#[command(author, version, about = "Chat-driven bug triage meetings backed by Redmine")]
#[command(long_about = r#"
triage-bot runs bug triage meetings in a chat channel. Triagers join with
!here, a chair walks the untriaged issue report with !next, and proposals are
voted through with !propose and !accept. Meeting minutes are recorded as JSONL.

Each line typed at the prompt is a chat message from the current nick, or
from another nick when written as `nick: message`:

  !start weekly
  bob: !here
  !next
  bob: !propose triage high medium
  !accept

Configuration files are loaded from (in priority order):
1. TRIAGE_* environment variables
2. --config <path>     Explicit config file
3. ./triage.toml       Project-level config
4. ~/.config/triage-bot/config.toml   Global config
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Network name used to key sessions and minutes
    #[arg(long, default_value = "local")]
    pub network: String,

    /// Channel to join at startup
    #[arg(long, default_value = "#pulp-meeting")]
    pub channel: String,

    /// Nick to speak as (defaults to $USER)
    #[arg(long)]
    pub nick: Option<String>,

    /// Directory for JSONL minutes (overrides [minutes] dir)
    #[arg(long, value_name = "DIR")]
    pub minutes_dir: Option<PathBuf>,
}

impl Cli {
    /// Nick from `--nick`, then `$USER`, then a fixed fallback.
    pub fn resolved_nick(&self) -> String {
        self.nick
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "triager".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["triage-bot"]);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.network, "local");
        assert_eq!(cli.channel, "#pulp-meeting");
        assert!(cli.config.is_none());
        assert!(cli.minutes_dir.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "triage-bot",
            "-vv",
            "--no-config",
            "--channel",
            "#other",
            "--nick",
            "alice",
            "--minutes-dir",
            "/tmp/minutes",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
        assert_eq!(cli.channel, "#other");
        assert_eq!(cli.resolved_nick(), "alice");
        assert_eq!(cli.minutes_dir, Some(PathBuf::from("/tmp/minutes")));
    }
}
