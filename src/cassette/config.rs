//! Per-port cassette selection for replay.

use std::path::PathBuf;

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Cassette file per port. A port without one panics if it is called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the tracker HTTP port.
    pub http: Option<PathBuf>,
    /// Cassette for the LLM port.
    pub llm: Option<PathBuf>,
}

/// Loaded replayers, one per configured port.
pub struct PortReplayers {
    /// Replayer for the tracker HTTP port.
    pub http: Option<CassetteReplayer>,
    /// Replayer for the LLM port.
    pub llm: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// A config with no cassettes: every port panics when called.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Uses the per-port files a recording session writes into `dir`.
    #[must_use]
    pub fn from_session_dir(dir: &std::path::Path) -> Self {
        Self {
            http: Some(dir.join("http.cassette.yaml")),
            llm: Some(dir.join("llm.cassette.yaml")),
        }
    }

    /// Loads every configured cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &PathBuf| Cassette::load(path).map(|c| CassetteReplayer::new(&c));
        Ok(PortReplayers {
            http: self.http.as_ref().map(load).transpose()?,
            llm: self.llm.as_ref().map(load).transpose()?,
        })
    }
}
