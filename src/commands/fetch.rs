//! `triage fetch` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::pipeline::Triage;

/// Execute the `fetch` command: print the issue as pretty JSON.
///
/// # Errors
///
/// Returns the fetch error text.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    repo_url: &str,
    issue: u64,
) -> Result<(), String> {
    let triage = Triage::new(ctx, config);
    let issue = triage
        .fetch(repo_url, issue)
        .await
        .map_err(|e| e.to_string())?;
    let rendered = serde_json::to_string_pretty(&issue)
        .map_err(|e| format!("Failed to serialize issue: {e}"))?;
    println!("{rendered}");
    Ok(())
}
