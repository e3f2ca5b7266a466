//! Request interception for manifest and segment fetches.
//!
//! The engine calls [`RequestHook::apply`] on every outgoing request before
//! sending it, the way a browser engine exposes an XHR setup callback.

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use tracing::warn;

use crate::config::CorsConfig;

/// A request the engine is about to send.
#[derive(Debug, Clone, Default)]
pub struct OutgoingRequest {
    pub url: String,
    pub with_credentials: bool,
    pub headers: HeaderMap,
}

impl OutgoingRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Applies the session's CORS settings to each request.
#[derive(Debug, Clone)]
pub struct RequestHook {
    with_credentials: bool,
    headers: HeaderMap,
}

impl RequestHook {
    /// Build a hook from CORS settings, or `None` when nothing needs to be
    /// applied.
    ///
    /// Header names or values that are not valid HTTP are skipped.
    pub fn from_cors(cors: &CorsConfig) -> Option<Self> {
        if !cors.needs_interception() {
            return None;
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &cors.request_headers {
            let parsed = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            );
            match parsed {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("skipping invalid request header '{name}'"),
            }
        }

        Some(Self {
            with_credentials: cors.with_credentials,
            headers,
        })
    }

    pub fn apply(&self, request: &mut OutgoingRequest) {
        request.with_credentials = self.with_credentials;
        for (name, value) in &self.headers {
            request.headers.insert(name.clone(), value.clone());
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
