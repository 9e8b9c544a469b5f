//! Records exchanged between the pipeline stages and persisted by the cache.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// A normalized issue: the success shape of a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Issue {
    /// Issue title; empty when the tracker has none.
    pub title: String,
    /// Issue description; empty when the tracker has none.
    pub body: String,
    /// Comment bodies joined by newlines, in tracker order.
    pub comments: String,
}

/// Triage classification of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Something is broken.
    Bug,
    /// A request for new behavior.
    FeatureRequest,
    /// Docs are missing or wrong.
    Documentation,
    /// A usage question.
    Question,
    /// Anything else.
    Other,
}

impl IssueType {
    /// All classifications, in prompt order.
    pub const ALL: [Self; 5] = [
        Self::Bug,
        Self::FeatureRequest,
        Self::Documentation,
        Self::Question,
        Self::Other,
    ];

    /// Wire name of the classification.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::FeatureRequest => "feature_request",
            Self::Documentation => "documentation",
            Self::Question => "question",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A well-formed triage analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Analysis {
    /// One-sentence statement of the problem or request.
    pub summary: String,
    /// Classification.
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// A 1-5 score followed by a short justification, kept as text.
    pub priority_score: String,
    /// Suggested labels, most relevant first.
    pub suggested_labels: Vec<String>,
    /// User or business impact.
    pub potential_impact: String,
}

/// The error-only shape of an analysis record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisFailure {
    /// What went wrong, and in which stage.
    pub error: String,
    /// Optional elaboration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&TriageError> for AnalysisFailure {
    fn from(err: &TriageError) -> Self {
        Self {
            error: err.to_string(),
            details: err.details(),
        }
    }
}

/// The outcome of triaging one issue, as surfaced to callers and cached.
///
/// Serializes to the flat JSON object of whichever variant it holds. A JSON
/// object mixing success and failure fields deserializes as neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisRecord {
    /// All five analysis fields.
    Success(Analysis),
    /// `error` and optional `details`.
    Failure(AnalysisFailure),
}

impl AnalysisRecord {
    /// Returns `true` for a well-formed analysis.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The analysis, if this record holds one.
    #[must_use]
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::Success(analysis) => Some(analysis),
            Self::Failure(_) => None,
        }
    }
}

impl From<Result<Analysis, TriageError>> for AnalysisRecord {
    fn from(result: Result<Analysis, TriageError>) -> Self {
        match result {
            Ok(analysis) => Self::Success(analysis),
            Err(err) => Self::from(&err),
        }
    }
}

impl From<&TriageError> for AnalysisRecord {
    fn from(err: &TriageError) -> Self {
        Self::Failure(AnalysisFailure::from(err))
    }
}
