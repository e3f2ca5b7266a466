//! Engine lifecycle driver.
//!
//! Builds the software engine for a session, binds its events, loads the
//! manifest and waits until the media element can play. Engine events go
//! through [`EngineReactor::dispatch`]; fatal errors are classified by
//! [`classify_fatal`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument, Span};

use super::capability::CapabilityDetector;
use super::descriptor::{request_url, StreamDescriptor};
use super::engine::{
    EngineError, EngineEvent, EngineSetup, ErrorDetails, ErrorType, StreamEngine, AUTO_LEVEL,
};
use super::media::{wait_can_play, MediaElement, MediaEvent};
use super::request::RequestHook;
use crate::config::{CorsConfig, EngineConfig};
use crate::error::{PlaybackError, Result};
use crate::events::{PlayerEvent, PlayerEventBus};

/// Action taken for a fatal engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Give up without touching the engine.
    Abort,
    /// Restart segment loading.
    RestartLoad,
    /// Ask the engine to recover its media pipeline.
    RecoverMedia,
    /// Destroy the engine and give up.
    DestroyAndAbort,
}

impl Recovery {
    pub fn is_recoverable(self) -> bool {
        matches!(self, Recovery::RestartLoad | Recovery::RecoverMedia)
    }
}

/// Map a fatal engine error to its recovery action.
pub fn classify_fatal(error: &EngineError) -> Recovery {
    match (error.kind, &error.details) {
        (ErrorType::Network, ErrorDetails::ManifestLoadError) => Recovery::Abort,
        (ErrorType::Network, _) => Recovery::RestartLoad,
        (ErrorType::Media, _) => Recovery::RecoverMedia,
        _ => Recovery::DestroyAndAbort,
    }
}

/// Reacts to the events of one engine.
pub(crate) struct EngineReactor {
    engine: Arc<dyn StreamEngine>,
    bus: PlayerEventBus,
    auto_start_load: bool,
    auto_quality_set: bool,
    destroyed: Arc<AtomicBool>,
}

impl EngineReactor {
    fn new(
        engine: Arc<dyn StreamEngine>,
        bus: PlayerEventBus,
        auto_start_load: bool,
        destroyed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            engine,
            bus,
            auto_start_load,
            auto_quality_set: false,
            destroyed,
        }
    }

    /// Handle one event. Returns the error that ends the load, if any.
    pub(crate) fn dispatch(&mut self, event: EngineEvent) -> Option<PlaybackError> {
        match event {
            EngineEvent::LevelSwitched { level } => {
                self.on_level_switched(level);
                None
            }
            EngineEvent::Error(err) => self.on_error(&err),
            EngineEvent::ManifestParsed { levels } => {
                self.on_manifest_parsed(levels);
                None
            }
        }
    }

    fn on_level_switched(&mut self, level: i32) {
        debug!("HLS: quality level switched to {level}");
        // The initial level request is honoured once, then adaptive
        // selection resumes.
        if !self.auto_quality_set {
            self.engine.set_current_level(AUTO_LEVEL);
            self.auto_quality_set = true;
        }
        self.bus.publish(PlayerEvent::QualityChanged);
    }

    fn on_manifest_parsed(&self, levels: usize) {
        debug!("HLS: manifest parsed, {levels} levels");
        if !self.auto_start_load {
            self.engine.start_load();
        }
    }

    fn on_error(&self, err: &EngineError) -> Option<PlaybackError> {
        if !err.fatal {
            debug!("HLS: non-fatal {:?} error: {:?}", err.kind, err.details);
            return None;
        }

        match classify_fatal(err) {
            Recovery::Abort => {
                error!("HLS: manifest could not be loaded");
                Some(PlaybackError::Unrecoverable(
                    "the video is not available".to_string(),
                ))
            }
            Recovery::RestartLoad => {
                warn!("HLS: fatal network error ({:?}), trying to recover", err.details);
                self.engine.start_load();
                None
            }
            Recovery::RecoverMedia => {
                warn!("HLS: fatal media error ({:?}), trying to recover", err.details);
                self.engine.recover_media_error();
                None
            }
            Recovery::DestroyAndAbort => {
                error!("HLS: fatal {:?} error ({:?}), can not recover", err.kind, err.details);
                self.engine.destroy();
                self.destroyed.store(true, Ordering::SeqCst);
                Some(PlaybackError::Unrecoverable(format!(
                    "fatal {:?} error, can not recover",
                    err.kind
                )))
            }
        }
    }
}

/// Everything needed to start the software path for one session.
pub(crate) struct DriverInput<'a> {
    pub detector: &'a CapabilityDetector,
    pub config: EngineConfig,
    pub cors: &'a CorsConfig,
    pub descriptor: &'a StreamDescriptor,
    pub source_key: &'a str,
    pub media: Arc<dyn MediaElement>,
    pub bus: PlayerEventBus,
}

/// An engine constructed and subscribed to, not yet loaded.
pub(crate) struct EngineBinding {
    pub engine: Arc<dyn StreamEngine>,
    pub destroyed: Arc<AtomicBool>,
    url: String,
    media: Arc<dyn MediaElement>,
    engine_events: broadcast::Receiver<EngineEvent>,
    media_events: broadcast::Receiver<MediaEvent>,
    reactor: EngineReactor,
}

/// Construct the engine and register for its events.
///
/// Fails with [`PlaybackError::SourceUnavailable`] before the engine module
/// is touched when the descriptor has no source under `source_key`.
pub(crate) async fn bind(input: DriverInput<'_>) -> Result<EngineBinding> {
    let source = input.descriptor.first_source(input.source_key)?;
    let factory = input.detector.load_engine().await?;

    let request_hook = RequestHook::from_cors(input.cors).map(Arc::new);
    if request_hook.is_some() {
        debug!("HLS: installing request hook");
    }

    let url = request_url(&source.src, input.config.enable_cache);
    let auto_start_load = input.config.auto_start_load;
    let engine = factory.create(EngineSetup {
        config: input.config,
        request_hook,
    })?;

    // Subscribe before loading: events emitted from inside load_source or
    // attach_media are buffered in the channels.
    let engine_events = engine.subscribe();
    let media_events = input.media.subscribe();

    let destroyed = Arc::new(AtomicBool::new(false));
    let reactor = EngineReactor::new(
        engine.clone(),
        input.bus,
        auto_start_load,
        destroyed.clone(),
    );

    Ok(EngineBinding {
        engine,
        destroyed,
        url,
        media: input.media,
        engine_events,
        media_events,
        reactor,
    })
}

impl EngineBinding {
    /// Load the manifest and wait until the element can play.
    ///
    /// Recoverable faults are handled while waiting; unrecoverable ones end
    /// the wait with an error.
    pub(crate) async fn run_until_ready(&mut self) -> Result<()> {
        info!("HLS: loading {}", self.url);
        self.engine.load_source(&self.url)?;
        self.engine.attach_media(self.media.clone())?;

        loop {
            tokio::select! {
                biased;
                event = self.engine_events.recv() => match event {
                    Ok(event) => {
                        if let Some(err) = self.reactor.dispatch(event) {
                            return Err(err);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("HLS: dropped {n} engine events");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(PlaybackError::Engine(
                            "engine event stream closed".to_string(),
                        ));
                    }
                },
                ready = wait_can_play(&mut self.media_events) => {
                    ready?;
                    info!("HLS: media can play");
                    return Ok(());
                }
            }
        }
    }

    /// Keep reacting to engine events after the session is ready.
    ///
    /// Unrecoverable faults are reported on the player bus tagged with
    /// `session`.
    pub(crate) fn spawn_watcher(self, session: String, span: Span) -> JoinHandle<()> {
        let EngineBinding {
            mut engine_events,
            mut reactor,
            destroyed,
            ..
        } = self;

        tokio::spawn(
            async move {
                loop {
                    match engine_events.recv().await {
                        Ok(event) => {
                            if let Some(err) = reactor.dispatch(event) {
                                reactor.bus.publish(PlayerEvent::StreamError {
                                    session: session.clone(),
                                    message: err.to_string(),
                                });
                                if destroyed.load(Ordering::SeqCst) {
                                    break;
                                }
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("HLS: dropped {n} engine events");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                debug!("HLS: engine watcher finished");
            }
            .instrument(span),
        )
    }
}
