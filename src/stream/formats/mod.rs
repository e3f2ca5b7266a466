//! HLS format plugins.
//!
//! Both plugins share the compatibility rule and session construction
//! below; they differ only in the descriptor key and the session kind.

pub mod live;
pub mod vod;

pub use live::HlsLiveVideoFormat;
pub use vod::HlsVideoFormat;

use tracing::debug;

use super::context::PlayerContext;
use super::descriptor::StreamDescriptor;
use super::media::VideoContainer;
use super::session::{StreamKind, StreamSession};
use crate::error::Result;

/// Enabled, has a source under `stream_type`, and the host can play HLS.
async fn is_compatible(
    context: &PlayerContext,
    descriptor: &StreamDescriptor,
    stream_type: &str,
) -> bool {
    if !context.plugin_enabled(stream_type) {
        debug!("plugin for '{stream_type}' is disabled");
        return false;
    }
    if !descriptor.has_sources(stream_type) {
        return false;
    }
    context.detector.detect().await.is_supported()
}

async fn video_instance(
    context: &PlayerContext,
    container: &dyn VideoContainer,
    is_main_audio: bool,
    kind: StreamKind,
) -> Result<StreamSession> {
    let media = container.create_media_element();
    media.set_muted(!is_main_audio);
    StreamSession::new(context.clone(), media, kind).await
}
