use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use hlsplay::stream::{CapabilityDetector, StaticProbe};

use super::load_settings;

pub async fn cmd_detect(config: Option<&Path>, native: bool, no_mse: bool) -> Result<()> {
    let mut settings = load_settings(config)?;
    if native {
        settings.host.native_hls = true;
    }
    if no_mse {
        settings.host.media_source = false;
    }

    let detector = CapabilityDetector::new(Arc::new(StaticProbe::new(settings.host)));
    let state = detector.detect().await;
    println!("HLS support: {state}");
    Ok(())
}
