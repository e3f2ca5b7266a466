//! Media element seam.
//!
//! The host owns the actual element (a browser `<video>`, a native player
//! surface). This crate only needs to set its source, hear when it can
//! play, and toggle the bits of native UI that would fight the engine.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{PlaybackError, Result};

/// Answer to a MIME-type playability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanPlayType {
    #[default]
    Empty,
    Maybe,
    Probably,
}

impl CanPlayType {
    pub fn is_playable(self) -> bool {
        !matches!(self, CanPlayType::Empty)
    }
}

/// Events emitted by a media element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Enough data is buffered to render a frame.
    CanPlay,
    /// The element's own error channel fired.
    Error { message: String },
}

/// Native element features that conflict with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeControls {
    /// Built-in playback controls.
    pub controls: bool,
    /// Built-in audio/text track selection.
    pub track_selection: bool,
}

impl NativeControls {
    pub const DISABLED: NativeControls = NativeControls {
        controls: false,
        track_selection: false,
    };
}

/// A media element a session plays into.
pub trait MediaElement: Send + Sync {
    /// Assign the playback source directly (native path).
    fn set_src(&self, url: &str);

    /// Subscribe to future element events.
    fn subscribe(&self) -> broadcast::Receiver<MediaEvent>;

    fn set_muted(&self, muted: bool);

    fn native_controls(&self) -> NativeControls;

    fn set_native_controls(&self, controls: NativeControls);
}

/// Player container that hands out media elements.
pub trait VideoContainer: Send + Sync {
    fn create_media_element(&self) -> Arc<dyn MediaElement>;
}

/// Wait for `canplay` on an already-subscribed receiver.
pub(crate) async fn wait_can_play(rx: &mut broadcast::Receiver<MediaEvent>) -> Result<()> {
    loop {
        match rx.recv().await {
            Ok(MediaEvent::CanPlay) => return Ok(()),
            Ok(MediaEvent::Error { message }) => {
                debug!("media element error while waiting for canplay: {message}");
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                debug!("media event receiver lagged by {n}");
            }
            Err(broadcast::error::RecvError::Closed) => return Err(PlaybackError::MediaClosed),
        }
    }
}
