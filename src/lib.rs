//! `hlsplay` - HLS playback backend selection for video players
//!
//! # Features
//!
//! - **Capability detection**: native HLS, software engine, or unsupported,
//!   probed once and shared by every caller
//! - **Format plugins**: on-demand (`hls`) and live (`hlsLive`) sources
//! - **Engine lifecycle**: manifest load, adaptive quality, audio tracks,
//!   and recovery from fatal network and media faults
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hlsplay::config::HostSettings;
//! use hlsplay::stream::{
//!     CapabilityDetector, HlsVideoFormat, PlayerContext, StaticProbe, StreamDescriptor,
//!     VideoContainer, VideoFormatPlugin,
//! };
//!
//! async fn play(container: &dyn VideoContainer) -> hlsplay::Result<()> {
//!     let probe = StaticProbe::new(HostSettings { native_hls: true, media_source: false });
//!     let detector = Arc::new(CapabilityDetector::new(Arc::new(probe)));
//!     let plugin = HlsVideoFormat::new(PlayerContext::new(detector));
//!
//!     let descriptor = StreamDescriptor::single("hls", "https://example.com/master.m3u8");
//!     if plugin.is_compatible(&descriptor).await {
//!         let mut session = plugin.get_video_instance(container, true).await?;
//!         session.load_stream_data(&descriptor).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod stream;

pub use config::{CorsConfig, EngineConfig, EngineOverrides, Settings};
pub use error::{PlaybackError, Result};
pub use events::{PlayerEvent, PlayerEventBus};
pub use stream::{
    CapabilityDetector, CapabilityState, HlsLiveVideoFormat, HlsVideoFormat, StreamSession,
};

/// Version of hlsplay
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
