//! Software engine seam.
//!
//! The segmented-streaming engine is a black box: it takes a manifest URL
//! and a media element, emits lifecycle, quality and error events, and
//! exposes level and recovery controls. Hosts implement [`StreamEngine`]
//! over their engine and hand an [`EngineFactory`] to the capability
//! detector.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::media::MediaElement;
use super::quality::AudioTrack;
use super::request::RequestHook;
use crate::config::EngineConfig;
use crate::error::Result;

/// `current_level` value that puts the engine in adaptive mode.
pub const AUTO_LEVEL: i32 = -1;

/// Engine error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Manifest, playlist or segment fetch failed.
    Network,
    /// Decoding or buffering failed.
    Media,
    /// DRM key system failure.
    KeySystem,
    /// Transmuxing a segment failed.
    Mux,
    /// Anything the engine does not categorize.
    Other,
}

/// Engine error details relevant to recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetails {
    /// The master manifest could not be fetched.
    ManifestLoadError,
    /// Fetching the master manifest timed out.
    ManifestLoadTimeout,
    /// The manifest was fetched but is not valid HLS.
    ManifestParsingError,
    /// A variant playlist could not be fetched.
    LevelLoadError,
    /// A media segment could not be fetched.
    FragLoadError,
    /// Playback stalled on an empty buffer.
    BufferStalledError,
    /// Engine-specific detail code.
    Other(String),
}

/// Payload of an engine error event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub fatal: bool,
    pub kind: ErrorType,
    pub details: ErrorDetails,
}

impl EngineError {
    pub fn fatal(kind: ErrorType, details: ErrorDetails) -> Self {
        Self {
            fatal: true,
            kind,
            details,
        }
    }

    pub fn non_fatal(kind: ErrorType, details: ErrorDetails) -> Self {
        Self {
            fatal: false,
            kind,
            details,
        }
    }
}

/// Events consumed from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    LevelSwitched { level: i32 },
    Error(EngineError),
    ManifestParsed { levels: usize },
}

/// One rendition as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLevel {
    pub width: u32,
    pub height: u32,
    pub bitrate: u64,
}

/// Everything the engine receives at construction.
#[derive(Debug, Clone, Default)]
pub struct EngineSetup {
    pub config: EngineConfig,
    /// Applied to every manifest/segment request when present.
    pub request_hook: Option<Arc<RequestHook>>,
}

/// A live engine instance bound to at most one media element.
///
/// Methods take `&self`; implementations keep their own interior state.
pub trait StreamEngine: Send + Sync {
    /// Subscribe to engine events. Only events emitted after this call are
    /// delivered.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;

    fn load_source(&self, url: &str) -> Result<()>;

    fn attach_media(&self, media: Arc<dyn MediaElement>) -> Result<()>;

    /// Start (or restart) segment loading.
    fn start_load(&self);

    fn recover_media_error(&self);

    fn destroy(&self);

    fn current_level(&self) -> i32;

    /// Pin a level by index, or [`AUTO_LEVEL`] for adaptive selection.
    fn set_current_level(&self, level: i32);

    fn levels(&self) -> Vec<EngineLevel>;

    fn audio_tracks(&self) -> Vec<AudioTrack>;

    fn set_audio_track(&self, id: &str) -> Result<()>;
}

/// The engine's constructor, obtained lazily by the capability detector.
pub trait EngineFactory: Send + Sync {
    fn create(&self, setup: EngineSetup) -> Result<Arc<dyn StreamEngine>>;
}

/// Event channel for [`StreamEngine`] implementations.
#[derive(Clone, Debug)]
pub struct EngineEventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl EngineEventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Emit to every subscriber. Sync, safe from inside engine callbacks.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }
}

impl Default for EngineEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
