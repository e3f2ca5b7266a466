//! Mock host collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use hlsplay::config::EngineOverrides;
use hlsplay::stream::engine::{EngineEventBus, EngineLevel, EngineSetup};
use hlsplay::stream::media::{CanPlayType, MediaEvent, NativeControls};
use hlsplay::stream::{
    AudioTrack, CapabilityDetector, EngineEvent, EngineFactory, HostProbe, MediaElement,
    PlayerContext, StreamEngine, VideoContainer,
};
use hlsplay::{PlaybackError, PlayerEvent, PlayerEventBus};

// ─── Media element ───────────────────────────────────────────────────────────

pub struct MockMedia {
    tx: broadcast::Sender<MediaEvent>,
    src: Mutex<Option<String>>,
    muted: AtomicBool,
    controls: Mutex<NativeControls>,
    /// Fire `canplay` as soon as a source is assigned (native path).
    can_play_on_src: bool,
}

impl MockMedia {
    pub fn new(can_play_on_src: bool) -> Arc<Self> {
        let (tx, _) = broadcast::channel(16);
        Arc::new(Self {
            tx,
            src: Mutex::new(None),
            muted: AtomicBool::new(false),
            controls: Mutex::new(NativeControls {
                controls: true,
                track_selection: true,
            }),
            can_play_on_src,
        })
    }

    pub fn fire_can_play(&self) {
        let _ = self.tx.send(MediaEvent::CanPlay);
    }

    pub fn src(&self) -> Option<String> {
        self.src.lock().unwrap().clone()
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn controls(&self) -> NativeControls {
        *self.controls.lock().unwrap()
    }
}

impl MediaElement for MockMedia {
    fn set_src(&self, url: &str) {
        *self.src.lock().unwrap() = Some(url.to_string());
        if self.can_play_on_src {
            self.fire_can_play();
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.tx.subscribe()
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn native_controls(&self) -> NativeControls {
        self.controls()
    }

    fn set_native_controls(&self, controls: NativeControls) {
        *self.controls.lock().unwrap() = controls;
    }
}

pub struct MockContainer {
    pub media: Arc<MockMedia>,
}

impl VideoContainer for MockContainer {
    fn create_media_element(&self) -> Arc<dyn MediaElement> {
        self.media.clone()
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// What a mock engine does when driven.
#[derive(Clone, Default)]
pub struct EngineScript {
    /// Emitted synchronously from inside `load_source`.
    pub on_load: Vec<EngineEvent>,
    /// Make the media element fire `canplay` from inside `attach_media`.
    pub ready_on_attach: bool,
    pub levels: Vec<EngineLevel>,
    pub tracks: Vec<AudioTrack>,
}

impl EngineScript {
    pub fn ready() -> Self {
        Self {
            ready_on_attach: true,
            levels: vec![
                EngineLevel {
                    width: 640,
                    height: 360,
                    bitrate: 800_000,
                },
                EngineLevel {
                    width: 1280,
                    height: 720,
                    bitrate: 2_500_000,
                },
            ],
            tracks: vec![
                AudioTrack::new("en", "English", false),
                AudioTrack::new("fr", "Français", true),
            ],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn emitting(mut self, events: Vec<EngineEvent>) -> Self {
        self.on_load = events;
        self
    }

    #[must_use]
    pub fn not_ready(mut self) -> Self {
        self.ready_on_attach = false;
        self
    }
}

pub struct MockEngine {
    bus: EngineEventBus,
    script: EngineScript,
    media: Arc<MockMedia>,
    pub setup: EngineSetup,
    calls: Mutex<Vec<String>>,
    current_level: AtomicI32,
    tracks: Mutex<Vec<AudioTrack>>,
}

impl MockEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn emit(&self, event: EngineEvent) {
        self.bus.emit(event);
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl StreamEngine for MockEngine {
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.record("subscribe");
        self.bus.subscribe()
    }

    fn load_source(&self, url: &str) -> hlsplay::Result<()> {
        self.record(format!("load_source:{url}"));
        for event in &self.script.on_load {
            self.bus.emit(event.clone());
        }
        Ok(())
    }

    fn attach_media(&self, _media: Arc<dyn MediaElement>) -> hlsplay::Result<()> {
        self.record("attach_media");
        if self.script.ready_on_attach {
            self.media.fire_can_play();
        }
        Ok(())
    }

    fn start_load(&self) {
        self.record("start_load");
    }

    fn recover_media_error(&self) {
        self.record("recover_media_error");
    }

    fn destroy(&self) {
        self.record("destroy");
    }

    fn current_level(&self) -> i32 {
        self.current_level.load(Ordering::SeqCst)
    }

    fn set_current_level(&self, level: i32) {
        self.record(format!("set_current_level:{level}"));
        self.current_level.store(level, Ordering::SeqCst);
    }

    fn levels(&self) -> Vec<EngineLevel> {
        self.script.levels.clone()
    }

    fn audio_tracks(&self) -> Vec<AudioTrack> {
        self.tracks.lock().unwrap().clone()
    }

    fn set_audio_track(&self, id: &str) -> hlsplay::Result<()> {
        self.record(format!("set_audio_track:{id}"));
        for track in self.tracks.lock().unwrap().iter_mut() {
            track.selected = track.id == id;
        }
        Ok(())
    }
}

pub struct MockFactory {
    script: EngineScript,
    media: Arc<MockMedia>,
    created: Mutex<Vec<Arc<MockEngine>>>,
}

impl MockFactory {
    pub fn new(script: EngineScript, media: Arc<MockMedia>) -> Arc<Self> {
        Arc::new(Self {
            script,
            media,
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn created(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn engine(&self) -> Arc<MockEngine> {
        self.created
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no engine was created")
    }
}

impl EngineFactory for MockFactory {
    fn create(&self, setup: EngineSetup) -> hlsplay::Result<Arc<dyn StreamEngine>> {
        let engine = Arc::new(MockEngine {
            bus: EngineEventBus::new(32),
            script: self.script.clone(),
            media: self.media.clone(),
            current_level: AtomicI32::new(setup.config.initial_quality_level),
            setup,
            calls: Mutex::new(Vec::new()),
            tracks: Mutex::new(self.script.tracks.clone()),
        });
        self.created.lock().unwrap().push(engine.clone());
        Ok(engine)
    }
}

// ─── Host probe ──────────────────────────────────────────────────────────────

pub struct CountingProbe {
    pub native: bool,
    pub engine_supported: bool,
    pub delay: Option<Duration>,
    pub factory: Option<Arc<MockFactory>>,
    pub fail_loads: AtomicUsize,
    pub probes: AtomicUsize,
    pub loads: AtomicUsize,
}

impl CountingProbe {
    pub fn new(native: bool, engine_supported: bool) -> Self {
        Self {
            native,
            engine_supported,
            delay: None,
            factory: None,
            fail_loads: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostProbe for CountingProbe {
    async fn can_play_type(&self, _mime_type: &str) -> CanPlayType {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.native {
            CanPlayType::Maybe
        } else {
            CanPlayType::Empty
        }
    }

    async fn engine_supported(&self) -> bool {
        self.engine_supported
    }

    async fn load_engine(&self) -> hlsplay::Result<Arc<dyn EngineFactory>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_loads.load(Ordering::SeqCst) > 0 {
            self.fail_loads.fetch_sub(1, Ordering::SeqCst);
            return Err(PlaybackError::Load("module fetch failed".into()));
        }
        match &self.factory {
            Some(factory) => Ok(factory.clone() as Arc<dyn EngineFactory>),
            None => Err(PlaybackError::Load("no engine".into())),
        }
    }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

pub struct Harness {
    pub media: Arc<MockMedia>,
    pub factory: Arc<MockFactory>,
    pub probe: Arc<CountingProbe>,
    pub detector: Arc<CapabilityDetector>,
    pub bus: PlayerEventBus,
    pub events: broadcast::Receiver<PlayerEvent>,
    pub container: MockContainer,
}

impl Harness {
    /// Host without native HLS, with the software engine available.
    pub fn library(script: EngineScript) -> Self {
        Self::build(false, true, script)
    }

    /// Host that plays HLS natively.
    pub fn native() -> Self {
        Self::build(true, true, EngineScript::ready())
    }

    /// Host that can play HLS neither way.
    pub fn unsupported() -> Self {
        Self::build(false, false, EngineScript::ready())
    }

    fn build(native: bool, engine_supported: bool, script: EngineScript) -> Self {
        let media = MockMedia::new(native);
        let factory = MockFactory::new(script, media.clone());
        let mut probe = CountingProbe::new(native, engine_supported);
        probe.factory = Some(factory.clone());
        let probe = Arc::new(probe);
        let detector = Arc::new(CapabilityDetector::new(probe.clone()));
        let bus = PlayerEventBus::new(32);
        let events = bus.subscribe();
        Self {
            container: MockContainer {
                media: media.clone(),
            },
            media,
            factory,
            probe,
            detector,
            bus,
            events,
        }
    }

    pub fn context(&self) -> PlayerContext {
        PlayerContext::new(self.detector.clone()).with_bus(self.bus.clone())
    }

    pub fn context_with(&self, engine: EngineOverrides) -> PlayerContext {
        self.context().with_engine_overrides(engine)
    }

    /// Drain player events received so far.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }

    /// Wait for the next player event.
    pub async fn next_event(&mut self) -> PlayerEvent {
        tokio::time::timeout(Duration::from_secs(2), self.events.recv())
            .await
            .expect("timed out waiting for player event")
            .expect("player bus closed")
    }
}
