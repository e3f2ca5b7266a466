//! On-demand HLS plugin.

use async_trait::async_trait;

use crate::error::Result;
use crate::stream::context::PlayerContext;
use crate::stream::descriptor::{StreamDescriptor, HLS};
use crate::stream::media::VideoContainer;
use crate::stream::plugin::VideoFormatPlugin;
use crate::stream::session::{StreamKind, StreamSession};

pub struct HlsVideoFormat {
    context: PlayerContext,
}

impl HlsVideoFormat {
    pub fn new(context: PlayerContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl VideoFormatPlugin for HlsVideoFormat {
    fn name(&self) -> &'static str {
        "hls"
    }

    fn stream_type(&self) -> &'static str {
        HLS
    }

    async fn is_compatible(&self, descriptor: &StreamDescriptor) -> bool {
        super::is_compatible(&self.context, descriptor, HLS).await
    }

    async fn get_video_instance(
        &self,
        container: &dyn VideoContainer,
        is_main_audio: bool,
    ) -> Result<StreamSession> {
        super::video_instance(&self.context, container, is_main_audio, StreamKind::Vod).await
    }
}
