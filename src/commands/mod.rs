//! Command dispatch and handlers.

pub mod analyze;
pub mod cache;
pub mod fetch;

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::adapters::live::store::DirectoryStore;
use crate::cassette::session::RecordingSession;
use crate::cli::{CacheAction, Command};
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// `TRIAGE_RECORD=<dir>` records the `http` and `llm` traffic of the run into
/// per-port cassettes in `<dir>`. `TRIAGE_REPLAY=<file>` serves both ports
/// from a cassette instead of the network; the on-disk cache is still used.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the handler fails.
pub fn dispatch(command: &Command, config: &Config) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    if let Ok(path) = env::var("TRIAGE_REPLAY") {
        debug!(cassette = %path, "replaying");
        let mut ctx = ServiceContext::replaying(&PathBuf::from(path))?;
        ctx.store = Box::new(DirectoryStore::new(&config.cache_dir));
        return runtime.block_on(dispatch_with_context(command, &ctx, config));
    }

    if let Ok(dir) = env::var("TRIAGE_RECORD") {
        let session = RecordingSession::new(dir)?;
        let ctx = ServiceContext::recording(config, &session);
        let result = runtime.block_on(dispatch_with_context(command, &ctx, config));
        // Release the adapters' recorder handles before writing cassettes.
        drop(ctx);
        let output_dir = session.finish()?;
        eprintln!("Recording saved to: {}", output_dir.display());
        return result;
    }

    let ctx = ServiceContext::live(config);
    runtime.block_on(dispatch_with_context(command, &ctx, config))
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the handler fails.
pub async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    match command {
        Command::Analyze {
            repo_url,
            issue,
            refresh,
            json,
        } => {
            analyze::run(ctx, config, repo_url, *issue, *refresh, *json).await
        }
        Command::Fetch { repo_url, issue } => fetch::run(ctx, config, repo_url, *issue).await,
        Command::Cache {
            action: CacheAction::Clear,
        } => {
            cache::clear(ctx, config);
            Ok(())
        }
    }
}
