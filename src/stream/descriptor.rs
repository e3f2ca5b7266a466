//! Stream descriptors and request URL construction.
//!
//! A [`StreamDescriptor`] maps a stream-type key (`hls`, `hlsLive`) to an
//! ordered list of candidate sources, the same shape the player receives in
//! its stream data:
//!
//! ```json
//! {"sources": {"hlsLive": [{"src": "https://cdn.example.com/live.m3u8"}]}}
//! ```

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PlaybackError, Result};

/// Stream-type key for on-demand HLS.
pub const HLS: &str = "hls";
/// Stream-type key for live HLS.
pub const HLS_LIVE: &str = "hlsLive";

/// Upper bound (exclusive) of the cache-busting value.
const CACHE_BUSTER_RANGE: u64 = 100_000_000_000;

/// One candidate media source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSource {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

impl StreamSource {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mimetype: None,
        }
    }
}

/// Sources for one stream, keyed by stream type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    #[serde(default)]
    pub sources: HashMap<String, Vec<StreamSource>>,
}

impl StreamDescriptor {
    /// Descriptor with a single source under `stream_type`.
    pub fn single(stream_type: &str, src: impl Into<String>) -> Self {
        let mut sources = HashMap::new();
        sources.insert(stream_type.to_string(), vec![StreamSource::new(src)]);
        Self { sources }
    }

    /// Returns `true` if at least one source exists under `stream_type`.
    pub fn has_sources(&self, stream_type: &str) -> bool {
        self.sources
            .get(stream_type)
            .is_some_and(|list| !list.is_empty())
    }

    /// First source listed under `stream_type`.
    pub fn first_source(&self, stream_type: &str) -> Result<&StreamSource> {
        self.sources
            .get(stream_type)
            .and_then(|list| list.first())
            .ok_or_else(|| PlaybackError::SourceUnavailable(stream_type.to_string()))
    }
}

/// Expose the live entries under the on-demand key.
///
/// Native players do not distinguish live from on-demand HLS, so a live
/// descriptor rewritten this way can go down the on-demand path unchanged.
#[must_use]
pub fn rewrite_live_as_vod(descriptor: &StreamDescriptor) -> StreamDescriptor {
    let mut rewritten = descriptor.clone();
    if let Some(live) = descriptor.sources.get(HLS_LIVE) {
        rewritten.sources.insert(HLS.to_string(), live.clone());
    }
    rewritten
}

/// Build the URL handed to the engine, appending a random `cache`
/// parameter when `enable_cache` is set.
pub fn request_url(src: &str, enable_cache: bool) -> String {
    if !enable_cache {
        return src.to_string();
    }
    let buster = rand::thread_rng().gen_range(0..CACHE_BUSTER_RANGE);
    with_cache_buster(src, buster)
}

fn with_cache_buster(src: &str, buster: u64) -> String {
    let sep = if src.contains('?') { '&' } else { '?' };
    format!("{src}{sep}cache={buster}")
}
