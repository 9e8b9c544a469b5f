//! Process-wide configuration read from the environment.
//!
//! The binary loads an optional `.env` file with `dotenvy` before calling
//! [`Config::from_env`]. Tests build configs through [`Config::from_lookup`].

use std::path::PathBuf;
use std::str::FromStr;

/// Default GitHub REST API base.
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Which model service the analyzer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// Google Gemini `generateContent`.
    #[default]
    Gemini,
    /// Anthropic messages API.
    Anthropic,
}

impl Provider {
    /// Model used when `TRIAGE_MODEL` is unset.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(format!(
                "Unknown TRIAGE_PROVIDER {other:?} (expected gemini or anthropic)"
            )),
        }
    }
}

/// Whether failure records are written to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Only well-formed analyses are cached.
    #[default]
    SuccessOnly,
    /// Analyzer failure records are cached too.
    All,
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bearer token for the tracker; unauthenticated access when absent.
    pub github_token: Option<String>,
    /// Tracker API base URL, without trailing slash.
    pub github_api: String,
    /// Model service.
    pub provider: Provider,
    /// Credential for the model service. Not validated up front.
    pub llm_api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Output token limit. `None` leaves it to the provider.
    pub max_tokens: Option<u32>,
    /// Directory holding one file per cached analysis.
    pub cache_dir: PathBuf,
    /// Failure caching policy.
    pub cache_policy: CachePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api: DEFAULT_GITHUB_API.to_string(),
            provider: Provider::default(),
            llm_api_key: None,
            model: Provider::default().default_model().to_string(),
            max_tokens: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_policy: CachePolicy::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error string if a variable holds an unusable value.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error string if `TRIAGE_PROVIDER` or `TRIAGE_MAX_TOKENS` is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = get("TRIAGE_PROVIDER")
            .map(|v| v.parse::<Provider>())
            .transpose()?
            .unwrap_or_default();
        let llm_api_key = match provider {
            Provider::Gemini => get("GEMINI_API_KEY"),
            Provider::Anthropic => get("ANTHROPIC_API_KEY"),
        };
        let max_tokens = get("TRIAGE_MAX_TOKENS")
            .map(|v| {
                v.trim()
                    .parse::<u32>()
                    .map_err(|e| format!("Invalid TRIAGE_MAX_TOKENS {v:?}: {e}"))
            })
            .transpose()?;
        let cache_policy = if get("TRIAGE_CACHE_FAILURES").is_some_and(|v| is_truthy(&v)) {
            CachePolicy::All
        } else {
            CachePolicy::SuccessOnly
        };

        Ok(Self {
            github_token: get("GITHUB_TOKEN"),
            github_api: get("TRIAGE_GITHUB_API").map_or_else(
                || DEFAULT_GITHUB_API.to_string(),
                |v| v.trim_end_matches('/').to_string(),
            ),
            provider,
            llm_api_key,
            model: get("TRIAGE_MODEL")
                .unwrap_or_else(|| provider.default_model().to_string()),
            max_tokens,
            cache_dir: get("TRIAGE_CACHE_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR), PathBuf::from),
            cache_policy,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    matches!(value.as_str(), "1" | "true" | "yes" | "on")
}
