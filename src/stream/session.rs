//! Stream sessions.
//!
//! A [`StreamSession`] is bound to one media element for the lifetime of
//! one loaded source. Its backend is picked once, at construction, from the
//! detected capability:
//!
//! - **Native**: the manifest URL is assigned to the media element.
//! - **Library**: the software engine is built and driven by
//!   [`driver`](super::driver).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument, Span};
use uuid::Uuid;

use super::capability::CapabilityState;
use super::context::PlayerContext;
use super::descriptor::{rewrite_live_as_vod, StreamDescriptor, HLS, HLS_LIVE};
use super::driver::{self, DriverInput};
use super::engine::StreamEngine;
use super::media::{wait_can_play, MediaElement, NativeControls};
use super::quality::{quality_levels, AudioTrack, QualityLevel};
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;

/// Which kind of stream the session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// On-demand, read from the `hls` key.
    Vod,
    /// Live, read from the `hlsLive` key.
    Live,
}

impl StreamKind {
    /// Descriptor key the software path reads its source from.
    pub fn source_key(self) -> &'static str {
        match self {
            StreamKind::Vod => HLS,
            StreamKind::Live => HLS_LIVE,
        }
    }
}

#[derive(Default)]
struct LibraryState {
    engine: Option<Arc<dyn StreamEngine>>,
    destroyed: Arc<AtomicBool>,
    watcher: Option<JoinHandle<()>>,
}

impl LibraryState {
    fn teardown(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        if let Some(engine) = self.engine.take() {
            if !self.destroyed.swap(true, Ordering::SeqCst) {
                engine.destroy();
            }
        }
    }
}

enum Backend {
    Native,
    Library(LibraryState),
}

/// Playback state for one media element and one source.
pub struct StreamSession {
    id: String,
    kind: StreamKind,
    capability: CapabilityState,
    context: PlayerContext,
    media: Arc<dyn MediaElement>,
    backend: Backend,
    current_quality: Option<QualityLevel>,
    current_audio_track: Option<AudioTrack>,
    saved_controls: Option<NativeControls>,
    ready: bool,
    span: Span,
}

impl StreamSession {
    /// Create a session, detecting the host capability if needed.
    ///
    /// Fails with [`PlaybackError::Unsupported`] when HLS cannot be played.
    pub async fn new(
        context: PlayerContext,
        media: Arc<dyn MediaElement>,
        kind: StreamKind,
    ) -> Result<Self> {
        let capability = context.detector.detect().await;
        let backend = match capability {
            CapabilityState::Native => Backend::Native,
            CapabilityState::Library => Backend::Library(LibraryState::default()),
            CapabilityState::Unsupported | CapabilityState::Uninitialized => {
                return Err(PlaybackError::Unsupported)
            }
        };

        let id = Uuid::new_v4().to_string();
        let span = info_span!("session", id = %id, kind = ?kind, capability = %capability);

        Ok(Self {
            id,
            kind,
            capability,
            context,
            media,
            backend,
            current_quality: None,
            current_audio_track: None,
            saved_controls: None,
            ready: false,
            span,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn capability(&self) -> CapabilityState {
        self.capability
    }

    /// Whether a live software engine is attached.
    pub fn has_engine(&self) -> bool {
        self.engine().is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn media(&self) -> &Arc<dyn MediaElement> {
        &self.media
    }

    /// Load `descriptor` and resolve once the media element can play.
    ///
    /// A previously loaded source is torn down first.
    pub async fn load_stream_data(&mut self, descriptor: &StreamDescriptor) -> Result<()> {
        self.reset();
        if matches!(self.backend, Backend::Native) {
            self.load_native(descriptor).await?;
        } else {
            self.load_library(descriptor).await?;
        }
        self.ready = true;
        Ok(())
    }

    async fn load_native(&mut self, descriptor: &StreamDescriptor) -> Result<()> {
        // Native players treat live HLS as on-demand.
        let descriptor = match self.kind {
            StreamKind::Live => rewrite_live_as_vod(descriptor),
            StreamKind::Vod => descriptor.clone(),
        };
        let src = descriptor.first_source(HLS)?.src.clone();

        let span = self.span.clone();
        let mut events = self.media.subscribe();
        async {
            info!("native HLS: loading {src}");
            self.media.set_src(&src);
            wait_can_play(&mut events).await
        }
        .instrument(span)
        .await?;

        self.current_quality = Some(QualityLevel::auto());
        self.current_audio_track = Some(AudioTrack::implicit());
        Ok(())
    }

    async fn load_library(&mut self, descriptor: &StreamDescriptor) -> Result<()> {
        let span = self.span.clone();
        let Backend::Library(state) = &mut self.backend else {
            return Err(PlaybackError::Unsupported);
        };

        let input = DriverInput {
            detector: &self.context.detector,
            config: self.context.effective_config(),
            cors: &self.context.cors,
            descriptor,
            source_key: self.kind.source_key(),
            media: self.media.clone(),
            bus: self.context.bus.clone(),
        };

        let mut binding = driver::bind(input).instrument(span.clone()).await?;
        state.engine = Some(binding.engine.clone());
        state.destroyed = binding.destroyed.clone();

        binding.run_until_ready().instrument(span.clone()).await?;

        let engine = binding.engine.clone();
        state.watcher = Some(binding.spawn_watcher(self.id.clone(), span.clone()));

        self.current_quality = Some(QualityLevel::auto());
        let tracks = engine.audio_tracks();
        self.current_audio_track = tracks.into_iter().find(|t| t.selected);
        self.saved_controls = Some(self.media.native_controls());
        self.media.set_native_controls(NativeControls::DISABLED);

        span.in_scope(|| {
            debug!(
                "HLS ready, audio track: {:?}",
                self.current_audio_track.as_ref().map(|t| t.id.as_str())
            );
        });
        Ok(())
    }

    fn engine(&self) -> Option<&Arc<dyn StreamEngine>> {
        match &self.backend {
            Backend::Library(state) if !state.destroyed.load(Ordering::SeqCst) => {
                state.engine.as_ref()
            }
            _ => None,
        }
    }

    /// Quality levels on offer: the auto sentinel, then the engine's
    /// renditions. Empty before the session is ready.
    pub fn qualities(&self) -> Vec<QualityLevel> {
        if !self.ready {
            return Vec::new();
        }
        match self.engine() {
            Some(engine) => quality_levels(&engine.levels()),
            None => vec![QualityLevel::auto()],
        }
    }

    pub fn current_quality(&self) -> Option<&QualityLevel> {
        self.current_quality.as_ref()
    }

    /// Pin a quality level, or return to adaptive selection with the auto
    /// sentinel.
    pub fn set_quality(&mut self, quality: &QualityLevel) -> Result<()> {
        if !self.qualities().iter().any(|q| q == quality) {
            return Err(PlaybackError::InvalidSelection(format!(
                "quality level '{}'",
                quality.label
            )));
        }
        if let Some(engine) = self.engine() {
            engine.set_current_level(quality.index);
        }
        self.current_quality = Some(quality.clone());
        self.context.bus.publish(PlayerEvent::QualityChanged);
        Ok(())
    }

    pub fn audio_tracks(&self) -> Vec<AudioTrack> {
        if !self.ready {
            return Vec::new();
        }
        match self.engine() {
            Some(engine) => engine.audio_tracks(),
            None => vec![AudioTrack::implicit()],
        }
    }

    pub fn current_audio_track(&self) -> Option<&AudioTrack> {
        self.current_audio_track.as_ref()
    }

    /// Switch to `track`. Returns the new current track.
    pub fn set_current_audio_track(&mut self, track: &AudioTrack) -> Result<&AudioTrack> {
        let known = self.audio_tracks().into_iter().find(|t| t.id == track.id);
        let Some(mut selected) = known else {
            return Err(PlaybackError::InvalidSelection(format!(
                "audio track '{}'",
                track.id
            )));
        };
        if let Some(engine) = self.engine() {
            engine.set_audio_track(&selected.id)?;
        }
        selected.selected = true;
        self.context.bus.publish(PlayerEvent::AudioTrackChanged {
            id: selected.id.clone(),
        });
        Ok(self.current_audio_track.insert(selected))
    }

    /// Tear down the engine and restore the media element.
    pub fn unload(&mut self) {
        self.reset();
        self.span.in_scope(|| debug!("session unloaded"));
    }

    fn reset(&mut self) {
        if let Backend::Library(state) = &mut self.backend {
            state.teardown();
        }
        if let Some(controls) = self.saved_controls.take() {
            self.media.set_native_controls(controls);
        }
        self.current_quality = None;
        self.current_audio_track = None;
        self.ready = false;
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.reset();
    }
}
