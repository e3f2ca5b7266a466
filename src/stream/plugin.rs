//! Video format plugin trait.
//!
//! A [`VideoFormatPlugin`] decides whether it can play a descriptor and
//! creates the session that does. The player tries plugins in order and
//! uses the first compatible one.

use async_trait::async_trait;
use tracing::debug;

use super::descriptor::StreamDescriptor;
use super::media::VideoContainer;
use super::session::StreamSession;
use crate::error::Result;

#[async_trait]
pub trait VideoFormatPlugin: Send + Sync {
    /// Plugin identifier (e.g. `"hls"`, `"hls-live"`).
    fn name(&self) -> &'static str;

    /// Descriptor key this plugin reads sources from.
    fn stream_type(&self) -> &'static str;

    /// Returns `false`, never an error, when the descriptor cannot be
    /// played by this plugin.
    async fn is_compatible(&self, descriptor: &StreamDescriptor) -> bool;

    /// Create a session playing into a new element from `container`.
    ///
    /// Elements that are not the main audio source are muted.
    async fn get_video_instance(
        &self,
        container: &dyn VideoContainer,
        is_main_audio: bool,
    ) -> Result<StreamSession>;
}

/// Ordered set of format plugins.
#[derive(Default)]
pub struct VideoFormats {
    plugins: Vec<Box<dyn VideoFormatPlugin>>,
}

impl VideoFormats {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, plugin: Box<dyn VideoFormatPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugins(&self) -> &[Box<dyn VideoFormatPlugin>] {
        &self.plugins
    }

    /// First plugin compatible with `descriptor`.
    pub async fn find_compatible(
        &self,
        descriptor: &StreamDescriptor,
    ) -> Option<&dyn VideoFormatPlugin> {
        for plugin in &self.plugins {
            if plugin.is_compatible(descriptor).await {
                debug!("format plugin '{}' selected", plugin.name());
                return Some(plugin.as_ref());
            }
        }
        None
    }
}
