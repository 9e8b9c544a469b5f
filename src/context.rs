//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::anthropic::AnthropicClient;
use crate::adapters::live::gemini::GeminiClient;
use crate::adapters::live::http::LiveHttpClient;
use crate::adapters::live::store::DirectoryStore;
use crate::adapters::memory::MemoryStore;
use crate::adapters::recording::{RecordingHttpClient, RecordingLlmClient};
use crate::adapters::replaying::{ReplayingHttpClient, ReplayingLlmClient};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::{Config, Provider};
use crate::ports::http::HttpClient;
use crate::ports::llm::LlmClient;
use crate::ports::store::KeyValueStore;

/// Bundles one trait object per external boundary.
///
/// Constructors wire up live, recording, or replaying adapters. Fields are
/// public so tests can swap a single port.
pub struct ServiceContext {
    /// Tracker HTTP client.
    pub http: Box<dyn HttpClient>,
    /// Language-model client.
    pub llm: Box<dyn LlmClient>,
    /// Backing store of the analysis cache.
    pub store: Box<dyn KeyValueStore>,
}

fn live_llm(config: &Config) -> Box<dyn LlmClient> {
    match config.provider {
        Provider::Gemini => Box::new(GeminiClient::new(config.llm_api_key.clone())),
        Provider::Anthropic => Box::new(AnthropicClient::new(config.llm_api_key.clone())),
    }
}

impl ServiceContext {
    /// Real network adapters and the on-disk cache in `config.cache_dir`.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            http: Box::new(LiveHttpClient::new()),
            llm: live_llm(config),
            store: Box::new(DirectoryStore::new(&config.cache_dir)),
        }
    }

    /// Live adapters whose `http` and `llm` traffic is captured by `session`.
    #[must_use]
    pub fn recording(config: &Config, session: &RecordingSession) -> Self {
        Self {
            http: Box::new(RecordingHttpClient::new(
                Box::new(LiveHttpClient::new()),
                Arc::clone(&session.http),
            )),
            llm: Box::new(RecordingLlmClient::new(
                live_llm(config),
                Arc::clone(&session.llm),
            )),
            store: Box::new(DirectoryStore::new(&config.cache_dir)),
        }
    }

    /// Serves `http` and `llm` from one monolithic cassette; the cache is in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        // Separate replayers keep each port's cursor independent.
        let replayer = || Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        Ok(Self {
            http: Box::new(ReplayingHttpClient::new(replayer())),
            llm: Box::new(ReplayingLlmClient::new(replayer())),
            store: Box::new(MemoryStore::default()),
        })
    }

    /// Serves each port from its own cassette; unconfigured ports panic when called.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        let http = match replayers.http {
            Some(r) => ReplayingHttpClient::new(Arc::new(Mutex::new(r))),
            None => ReplayingHttpClient::unconfigured(),
        };
        let llm = match replayers.llm {
            Some(r) => ReplayingLlmClient::new(Arc::new(Mutex::new(r))),
            None => ReplayingLlmClient::unconfigured(),
        };
        Ok(Self {
            http: Box::new(http),
            llm: Box::new(llm),
            store: Box::new(MemoryStore::default()),
        })
    }
}
