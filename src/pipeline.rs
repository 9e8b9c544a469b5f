//! The fetch → analyze → cache control flow.

use tracing::{info, instrument};

use crate::analyzer::IssueAnalyzer;
use crate::cache::AnalysisCache;
use crate::config::{CachePolicy, Config};
use crate::context::ServiceContext;
use crate::error::TriageError;
use crate::fetcher::IssueFetcher;
use crate::record::{AnalysisRecord, Issue};

/// Wires the three stages over one [`ServiceContext`].
pub struct Triage<'a> {
    fetcher: IssueFetcher<'a>,
    analyzer: IssueAnalyzer<'a>,
    cache: AnalysisCache<'a>,
    policy: CachePolicy,
}

impl<'a> Triage<'a> {
    /// Builds the stages from `ctx` and `config`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &Config) -> Self {
        Self {
            fetcher: IssueFetcher::new(
                ctx.http.as_ref(),
                config.github_api.clone(),
                config.github_token.clone(),
            ),
            analyzer: IssueAnalyzer::new(
                ctx.llm.as_ref(),
                config.model.clone(),
                config.max_tokens,
            ),
            cache: AnalysisCache::new(ctx.store.as_ref()),
            policy: config.cache_policy,
        }
    }

    /// The cache used by [`run`](Self::run).
    #[must_use]
    pub fn cache(&self) -> &AnalysisCache<'a> {
        &self.cache
    }

    /// Fetches an issue without analyzing it.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure.
    pub async fn fetch(
        &self,
        repository_url: &str,
        issue_number: u64,
    ) -> Result<Issue, TriageError> {
        self.fetcher.fetch(repository_url, issue_number).await
    }

    /// Returns the cached analysis, or fetches, analyzes, and caches a new one.
    ///
    /// With `refresh` the cache is not consulted, but the result is still stored.
    /// Fetch failures come back as failure records and are never cached;
    /// analyzer failures are cached only under [`CachePolicy::All`].
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        repository_url: &str,
        issue_number: u64,
        refresh: bool,
    ) -> AnalysisRecord {
        if !refresh {
            if let Some(record) = self.cache.get(repository_url, issue_number) {
                info!("served from cache");
                return record;
            }
        }

        let issue = match self.fetcher.fetch(repository_url, issue_number).await {
            Ok(issue) => issue,
            Err(e) => {
                info!(error = %e, "fetch failed");
                return AnalysisRecord::from(&e);
            }
        };
        info!(title = %issue.title, "fetched issue");

        let record = AnalysisRecord::from(self.analyzer.analyze(&issue).await);
        if record.is_success() || self.policy == CachePolicy::All {
            self.cache.put(repository_url, issue_number, &record);
        }
        info!(success = record.is_success(), "analysis complete");
        record
    }
}
