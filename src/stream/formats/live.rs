//! Live HLS plugin.
//!
//! On hosts with native HLS the live session rewrites the descriptor so the
//! live entries sit under the on-demand key and plays them like any other
//! native stream; see [`rewrite_live_as_vod`](crate::stream::descriptor::rewrite_live_as_vod).

use async_trait::async_trait;

use crate::error::Result;
use crate::stream::context::PlayerContext;
use crate::stream::descriptor::{StreamDescriptor, HLS_LIVE};
use crate::stream::media::VideoContainer;
use crate::stream::plugin::VideoFormatPlugin;
use crate::stream::session::{StreamKind, StreamSession};

pub struct HlsLiveVideoFormat {
    context: PlayerContext,
}

impl HlsLiveVideoFormat {
    pub fn new(context: PlayerContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl VideoFormatPlugin for HlsLiveVideoFormat {
    fn name(&self) -> &'static str {
        "hls-live"
    }

    fn stream_type(&self) -> &'static str {
        HLS_LIVE
    }

    async fn is_compatible(&self, descriptor: &StreamDescriptor) -> bool {
        super::is_compatible(&self.context, descriptor, HLS_LIVE).await
    }

    async fn get_video_instance(
        &self,
        container: &dyn VideoContainer,
        is_main_audio: bool,
    ) -> Result<StreamSession> {
        super::video_instance(&self.context, container, is_main_audio, StreamKind::Live).await
    }
}
