//! Fetch a GitHub issue, triage it with a language model, and cache the result.
//!
//! The pipeline has three stages, each behind its own module:
//! [`fetcher::IssueFetcher`], [`analyzer::IssueAnalyzer`] and
//! [`cache::AnalysisCache`]. [`pipeline::Triage`] runs them in order.
//! External systems are reached only through the traits in [`ports`].

pub mod adapters;
pub mod analyzer;
pub mod cache;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod ports;
pub mod record;

use clap::Parser;

pub use error::TriageError;
pub use record::{Analysis, AnalysisFailure, AnalysisRecord, Issue, IssueType};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, configuration, or the command fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            err.print().map_err(|e| e.to_string())?;
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    let config = config::Config::from_env()?;
    commands::dispatch(&cli.command, &config)
}
