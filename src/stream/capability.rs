//! HLS capability detection.
//!
//! Decides once whether the host plays HLS natively, needs the software
//! engine, or cannot play it at all. The answer and the engine constructor
//! are memoized behind [`tokio::sync::OnceCell`], so concurrent first
//! callers share a single probe.

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::engine::EngineFactory;
use super::media::CanPlayType;
use crate::config::{EngineConfig, HostSettings};
use crate::error::{PlaybackError, Result};

/// MIME type probed for native HLS playback.
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";

/// How HLS can be played on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityState {
    /// Detection has not run yet.
    Uninitialized,
    /// The media element plays HLS itself.
    Native,
    /// The software engine is required and usable.
    Library,
    /// Neither is available.
    Unsupported,
}

impl CapabilityState {
    pub fn is_supported(self) -> bool {
        matches!(self, CapabilityState::Native | CapabilityState::Library)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityState::Uninitialized => "uninitialized",
            CapabilityState::Native => "native",
            CapabilityState::Library => "library",
            CapabilityState::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for CapabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment probes supplied by the host.
#[async_trait]
pub trait HostProbe: Send + Sync {
    /// Ask the media stack whether it can play `mime_type`.
    async fn can_play_type(&self, mime_type: &str) -> CanPlayType;

    /// Whether the software engine's prerequisites are met.
    async fn engine_supported(&self) -> bool;

    /// Fetch the engine module and return its constructor.
    async fn load_engine(&self) -> Result<Arc<dyn EngineFactory>>;
}

/// Memoized capability state for one process (or one test).
pub struct CapabilityDetector {
    probe: Arc<dyn HostProbe>,
    state: OnceCell<CapabilityState>,
    engine: OnceCell<Arc<dyn EngineFactory>>,
    defaults: EngineConfig,
}

impl CapabilityDetector {
    pub fn new(probe: Arc<dyn HostProbe>) -> Self {
        Self {
            probe,
            state: OnceCell::new(),
            engine: OnceCell::new(),
            defaults: EngineConfig::default(),
        }
    }

    /// Replace the engine defaults returned by [`Self::default_config`].
    #[must_use]
    pub fn with_defaults(mut self, defaults: EngineConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Detect (once) and return the capability.
    pub async fn detect(&self) -> CapabilityState {
        *self
            .state
            .get_or_init(|| async {
                let state = if self.probe.can_play_type(HLS_MIME_TYPE).await.is_playable() {
                    CapabilityState::Native
                } else if self.probe.engine_supported().await {
                    CapabilityState::Library
                } else {
                    CapabilityState::Unsupported
                };
                info!("HLS support: {state}");
                state
            })
            .await
    }

    /// Current value without probing.
    pub fn state(&self) -> CapabilityState {
        self.state
            .get()
            .copied()
            .unwrap_or(CapabilityState::Uninitialized)
    }

    /// Obtain the engine constructor, fetching the module on first use.
    ///
    /// A failed fetch is not cached.
    pub async fn load_engine(&self) -> Result<Arc<dyn EngineFactory>> {
        self.engine
            .get_or_try_init(|| async {
                debug!("loading HLS engine module");
                self.probe.load_engine().await.map_err(|e| match e {
                    PlaybackError::Load(_) => e,
                    other => PlaybackError::Load(other.to_string()),
                })
            })
            .await
            .cloned()
    }

    pub fn default_config(&self) -> EngineConfig {
        self.defaults.clone()
    }
}

static GLOBAL: OnceLock<Arc<CapabilityDetector>> = OnceLock::new();

/// Install the process-wide detector. The first installation wins and is
/// returned to every later caller.
pub fn install_global(detector: CapabilityDetector) -> Arc<CapabilityDetector> {
    GLOBAL.get_or_init(|| Arc::new(detector)).clone()
}

/// The process-wide detector, if one was installed.
pub fn global() -> Option<Arc<CapabilityDetector>> {
    GLOBAL.get().cloned()
}

/// Probe that answers from static host settings.
pub struct StaticProbe {
    host: HostSettings,
    engine: Option<Arc<dyn EngineFactory>>,
}

impl StaticProbe {
    pub fn new(host: HostSettings) -> Self {
        Self { host, engine: None }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn EngineFactory>) -> Self {
        self.engine = Some(engine);
        self
    }
}

#[async_trait]
impl HostProbe for StaticProbe {
    async fn can_play_type(&self, mime_type: &str) -> CanPlayType {
        if self.host.native_hls && mime_type.eq_ignore_ascii_case(HLS_MIME_TYPE) {
            CanPlayType::Probably
        } else {
            CanPlayType::Empty
        }
    }

    async fn engine_supported(&self) -> bool {
        self.host.media_source
    }

    async fn load_engine(&self) -> Result<Arc<dyn EngineFactory>> {
        self.engine
            .clone()
            .ok_or_else(|| PlaybackError::Load("no engine registered with this host".into()))
    }
}
