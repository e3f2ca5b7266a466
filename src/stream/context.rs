//! Shared player environment handed to plugins and sessions.

use std::collections::HashMap;
use std::sync::Arc;

use super::capability::CapabilityDetector;
use crate::config::{CorsConfig, EngineConfig, EngineOverrides, PluginSettings, Settings};
use crate::events::PlayerEventBus;

/// What every plugin and session of one player shares.
#[derive(Clone)]
pub struct PlayerContext {
    pub detector: Arc<CapabilityDetector>,
    pub bus: PlayerEventBus,
    /// Caller overrides merged over the detector's engine defaults.
    pub engine: EngineOverrides,
    pub cors: CorsConfig,
    pub plugins: HashMap<String, PluginSettings>,
}

impl PlayerContext {
    pub fn new(detector: Arc<CapabilityDetector>) -> Self {
        Self {
            detector,
            bus: PlayerEventBus::default(),
            engine: EngineOverrides::default(),
            cors: CorsConfig::default(),
            plugins: HashMap::new(),
        }
    }

    /// Context configured from a settings file.
    pub fn from_settings(detector: Arc<CapabilityDetector>, settings: &Settings) -> Self {
        Self {
            engine: settings.engine.clone(),
            cors: settings.cors.clone(),
            plugins: settings.plugins.clone(),
            ..Self::new(detector)
        }
    }

    #[must_use]
    pub fn with_bus(mut self, bus: PlayerEventBus) -> Self {
        self.bus = bus;
        self
    }

    #[must_use]
    pub fn with_engine_overrides(mut self, engine: EngineOverrides) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    pub fn plugin_enabled(&self, stream_type: &str) -> bool {
        self.plugins
            .get(stream_type)
            .copied()
            .unwrap_or_default()
            .enabled
    }

    /// Engine configuration a new session starts with.
    pub fn effective_config(&self) -> EngineConfig {
        self.detector.default_config().merged(&self.engine)
    }
}
