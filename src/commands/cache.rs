//! `triage cache` commands.

use crate::cache::AnalysisCache;
use crate::config::Config;
use crate::context::ServiceContext;

/// Execute `cache clear`.
pub fn clear(ctx: &ServiceContext, config: &Config) {
    AnalysisCache::new(ctx.store.as_ref()).clear();
    println!("Cleared analysis cache in {}", config.cache_dir.display());
}
