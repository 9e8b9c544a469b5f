//! `triage analyze` command.

use std::fmt::Write as _;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::pipeline::Triage;
use crate::record::{Analysis, AnalysisRecord};

/// Execute the `analyze` command.
///
/// # Errors
///
/// Returns the record's error text when the pipeline yields a failure record.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    repo_url: &str,
    issue: u64,
    refresh: bool,
    json: bool,
) -> Result<(), String> {
    let triage = Triage::new(ctx, config);
    let record = triage.run(repo_url, issue, refresh).await;

    if json {
        let rendered = serde_json::to_string_pretty(&record)
            .map_err(|e| format!("Failed to serialize analysis: {e}"))?;
        println!("{rendered}");
    }

    match record {
        AnalysisRecord::Success(analysis) => {
            if !json {
                print!("{}", render_report(&analysis));
            }
            Ok(())
        }
        AnalysisRecord::Failure(failure) => Err(match failure.details {
            Some(details) => format!("{}: {details}", failure.error),
            None => failure.error,
        }),
    }
}

/// Human-readable rendering of an analysis.
#[must_use]
pub fn render_report(analysis: &Analysis) -> String {
    let mut out = String::new();
    let labels = if analysis.suggested_labels.is_empty() {
        "(none)".to_string()
    } else {
        analysis.suggested_labels.join(", ")
    };
    let _ = writeln!(out, "Summary:  {}", analysis.summary);
    let _ = writeln!(out, "Type:     {}", analysis.issue_type);
    let _ = writeln!(out, "Priority: {}", analysis.priority_score);
    let _ = writeln!(out, "Labels:   {labels}");
    let _ = writeln!(out, "Impact:   {}", analysis.potential_impact);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::IssueType;

    #[test]
    fn report_lists_every_field() {
        let report = render_report(&Analysis {
            summary: "Crash on startup".into(),
            issue_type: IssueType::FeatureRequest,
            priority_score: "2 - Nice to have".into(),
            suggested_labels: vec!["enhancement".into(), "ui".into()],
            potential_impact: "Smoother onboarding".into(),
        });
        assert!(report.contains("Summary:  Crash on startup"));
        assert!(report.contains("Type:     feature_request"));
        assert!(report.contains("Labels:   enhancement, ui"));
        assert_eq!(report.lines().count(), 5);
    }

    #[test]
    fn report_marks_missing_labels() {
        let report = render_report(&Analysis {
            summary: "s".into(),
            issue_type: IssueType::Other,
            priority_score: "1 - trivial".into(),
            suggested_labels: Vec::new(),
            potential_impact: "i".into(),
        });
        assert!(report.contains("Labels:   (none)"));
    }
}
