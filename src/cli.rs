//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `triage`.
#[derive(Debug, Parser)]
#[command(
    name = "triage",
    version,
    about = "Triage GitHub issues with a language model"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze an issue, reusing a cached analysis when there is one.
    Analyze {
        /// Repository URL, e.g. `https://github.com/owner/repo`.
        repo_url: String,
        /// Issue number.
        issue: u64,
        /// Ignore any cached analysis and analyze again.
        #[arg(long)]
        refresh: bool,
        /// Print the analysis record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Fetch an issue and print it as JSON, without analyzing it.
    Fetch {
        /// Repository URL, e.g. `https://github.com/owner/repo`.
        repo_url: String,
        /// Issue number.
        issue: u64,
    },
    /// Manage the analysis cache.
    Cache {
        /// Cache operation.
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Cache subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Delete every cached analysis.
    Clear,
}

#[cfg(test)]
mod tests {
    use super::{CacheAction, Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_analyze_with_flags() {
        let cli = Cli::parse_from([
            "triage",
            "analyze",
            "https://github.com/acme/widgets",
            "42",
            "--refresh",
            "--json",
        ]);
        match cli.command {
            Command::Analyze {
                repo_url,
                issue,
                refresh,
                json,
            } => {
                assert_eq!(repo_url, "https://github.com/acme/widgets");
                assert_eq!(issue, 42);
                assert!(refresh);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_cache_clear() {
        let cli = Cli::parse_from(["triage", "cache", "clear"]);
        let Command::Cache { action } = cli.command else {
            panic!("unexpected command: {:?}", cli.command);
        };
        assert!(matches!(action, CacheAction::Clear));
    }

    #[test]
    fn rejects_non_numeric_issue() {
        let args = ["triage", "fetch", "https://github.com/a/b", "abc"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
