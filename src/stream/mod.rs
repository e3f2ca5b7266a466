//! HLS playback backend selection and engine orchestration.
//!
//! Decides per source whether the host plays HLS natively or needs the
//! software engine, and drives that engine through load, quality and
//! audio-track changes, and fault recovery.

pub mod capability;
pub mod context;
pub mod descriptor;
pub mod driver;
pub mod engine;
pub mod formats;
pub mod media;
pub mod plugin;
pub mod quality;
pub mod request;
pub mod session;

pub use capability::{CapabilityDetector, CapabilityState, HostProbe, StaticProbe};
pub use context::PlayerContext;
pub use descriptor::{StreamDescriptor, StreamSource};
pub use driver::{classify_fatal, Recovery};
pub use engine::{EngineEvent, EngineFactory, StreamEngine};
pub use formats::{HlsLiveVideoFormat, HlsVideoFormat};
pub use media::{MediaElement, VideoContainer};
pub use plugin::{VideoFormatPlugin, VideoFormats};
pub use quality::{AudioTrack, QualityLevel};
pub use session::{StreamKind, StreamSession};
