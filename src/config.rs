//! Configuration loaded from `~/.config/hlsplay/config.toml`.
//!
//! Every section is optional; a missing file yields [`Settings::default`].
//!
//! ```toml
//! [engine]
//! initial_quality_level = 1
//! enable_cache = true
//! max_buffer_length = 30
//!
//! [cors]
//! with_credentials = true
//! [cors.request_headers]
//! Authorization = "Bearer token"
//!
//! [plugins.hlsLive]
//! enabled = false
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Options handed to the software engine.
///
/// Unknown keys are kept in [`EngineConfig::passthrough`] and forwarded to
/// the engine untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Level index requested before adaptive selection takes over.
    pub initial_quality_level: i32,
    /// When `false`, segment loading starts only once the manifest is parsed.
    pub auto_start_load: bool,
    /// Append a random `cache` query parameter to the manifest URL.
    pub enable_cache: bool,
    /// Engine-tuning options this crate does not interpret.
    #[serde(flatten)]
    pub passthrough: serde_json::Map<String, serde_json::Value>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_quality_level: 1,
            auto_start_load: true,
            enable_cache: false,
            passthrough: serde_json::Map::new(),
        }
    }
}

impl EngineConfig {
    /// Overlay `overrides` on top of `self`.
    ///
    /// Unset override fields keep the value from `self`; passthrough keys
    /// are merged with `overrides` winning on conflicts.
    #[must_use]
    pub fn merged(&self, overrides: &EngineOverrides) -> EngineConfig {
        let mut passthrough = self.passthrough.clone();
        for (k, v) in &overrides.passthrough {
            passthrough.insert(k.clone(), v.clone());
        }
        EngineConfig {
            initial_quality_level: overrides
                .initial_quality_level
                .unwrap_or(self.initial_quality_level),
            auto_start_load: overrides.auto_start_load.unwrap_or(self.auto_start_load),
            enable_cache: overrides.enable_cache.unwrap_or(self.enable_cache),
            passthrough,
        }
    }
}

/// Caller-side engine settings, layered over the detector's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_quality_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start_load: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_cache: Option<bool>,
    #[serde(flatten)]
    pub passthrough: serde_json::Map<String, serde_json::Value>,
}

/// Cross-origin settings applied to every manifest and segment request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub with_credentials: bool,
    pub request_headers: HashMap<String, String>,
}

impl CorsConfig {
    /// Whether requests need to be intercepted at all.
    pub fn needs_interception(&self) -> bool {
        self.with_credentials || !self.request_headers.is_empty()
    }
}

/// Host capabilities for hosts that know them up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// The media element plays HLS manifests directly.
    pub native_hls: bool,
    /// The runtime offers what the software engine needs (Media Source).
    pub media_source: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            native_hls: false,
            media_source: true,
        }
    }
}

/// Per-plugin switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    pub enabled: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overrides for the engine defaults; unset keys keep the defaults.
    pub engine: EngineOverrides,
    pub cors: CorsConfig,
    pub host: HostSettings,
    /// Keyed by stream type (`hls`, `hlsLive`).
    pub plugins: HashMap<String, PluginSettings>,
}

impl Settings {
    /// Settings for the plugin serving `stream_type`.
    pub fn plugin(&self, stream_type: &str) -> PluginSettings {
        self.plugins.get(stream_type).copied().unwrap_or_default()
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid hlsplay configuration")
    }
}

/// Load settings from the default location.
///
/// Returns defaults if the file doesn't exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(&config_path())
}

/// Load settings from an explicit path, falling back to defaults when the
/// file is absent.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
}

/// Return the path to the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hlsplay")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        let engine = EngineConfig::default().merged(&settings.engine);
        assert_eq!(engine.initial_quality_level, 1);
        assert!(engine.auto_start_load);
        assert!(!engine.enable_cache);
        assert!(settings.plugin("hls").enabled);
    }

    #[test]
    fn passthrough_keys_are_kept() {
        let settings = Settings::from_toml(
            r#"
[engine]
enable_cache = true
max_buffer_length = 30
lowLatencyMode = true
"#,
        )
        .unwrap();
        assert_eq!(settings.engine.enable_cache, Some(true));
        assert_eq!(settings.engine.initial_quality_level, None);
        assert_eq!(
            settings.engine.passthrough.get("max_buffer_length"),
            Some(&serde_json::json!(30))
        );
        assert_eq!(
            settings.engine.passthrough.get("lowLatencyMode"),
            Some(&serde_json::json!(true))
        );
    }

    #[test]
    fn parse_cors_and_plugins() {
        let settings = Settings::from_toml(
            r#"
[cors]
with_credentials = true
[cors.request_headers]
Authorization = "Bearer abc"

[plugins.hlsLive]
enabled = false
"#,
        )
        .unwrap();
        assert!(settings.cors.needs_interception());
        assert_eq!(
            settings.cors.request_headers.get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert!(!settings.plugin("hlsLive").enabled);
        assert!(settings.plugin("hls").enabled);
    }

    #[test]
    fn headers_alone_need_interception() {
        let cors = CorsConfig {
            with_credentials: false,
            request_headers: HashMap::from([("X-Token".to_string(), "1".to_string())]),
        };
        assert!(cors.needs_interception());
        assert!(!CorsConfig::default().needs_interception());
    }

    #[test]
    fn merged_prefers_overrides() {
        let mut base = EngineConfig::default();
        base.passthrough.insert("a".into(), serde_json::json!(1));
        base.passthrough.insert("b".into(), serde_json::json!(1));

        let mut overrides = EngineOverrides {
            initial_quality_level: Some(3),
            auto_start_load: Some(false),
            enable_cache: Some(true),
            ..EngineOverrides::default()
        };
        overrides.passthrough.insert("b".into(), serde_json::json!(2));

        let merged = base.merged(&overrides);
        assert_eq!(merged.initial_quality_level, 3);
        assert!(!merged.auto_start_load);
        assert!(merged.enable_cache);
        assert_eq!(merged.passthrough.get("a"), Some(&serde_json::json!(1)));
        assert_eq!(merged.passthrough.get("b"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn unset_overrides_keep_base_values() {
        let base = EngineConfig {
            initial_quality_level: 3,
            auto_start_load: false,
            enable_cache: true,
            ..EngineConfig::default()
        };
        let merged = base.merged(&EngineOverrides::default());
        assert_eq!(merged, base);

        let merged = base.merged(&EngineOverrides {
            enable_cache: Some(false),
            ..EngineOverrides::default()
        });
        assert_eq!(merged.initial_quality_level, 3);
        assert!(!merged.auto_start_load);
        assert!(!merged.enable_cache);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings =
            load_settings_from(Path::new("/nonexistent/hlsplay/config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
