use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use hlsplay::stream::descriptor::request_url;
use hlsplay::stream::{
    CapabilityDetector, HlsLiveVideoFormat, HlsVideoFormat, PlayerContext, StaticProbe,
    StreamDescriptor, VideoFormats,
};

use super::load_settings;

pub async fn cmd_check(descriptor_path: &Path, config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config)?;

    let content = std::fs::read_to_string(descriptor_path)
        .with_context(|| format!("failed to read {}", descriptor_path.display()))?;
    let descriptor: StreamDescriptor = serde_json::from_str(&content)
        .with_context(|| format!("invalid stream descriptor in {}", descriptor_path.display()))?;

    let detector = Arc::new(CapabilityDetector::new(Arc::new(StaticProbe::new(
        settings.host,
    ))));
    let context = PlayerContext::from_settings(detector.clone(), &settings);
    let formats = VideoFormats::new()
        .with(Box::new(HlsVideoFormat::new(context.clone())))
        .with(Box::new(HlsLiveVideoFormat::new(context.clone())));

    println!("HLS support: {}", detector.detect().await);

    for plugin in formats.plugins() {
        let compatible = plugin.is_compatible(&descriptor).await;
        println!(
            "{:<10} {:<8} {}",
            plugin.name(),
            plugin.stream_type(),
            if compatible { "compatible" } else { "-" }
        );
        if compatible {
            let source = descriptor.first_source(plugin.stream_type())?;
            let url = request_url(&source.src, context.effective_config().enable_cache);
            println!("           request: {url}");
        }
    }

    match formats.find_compatible(&descriptor).await {
        Some(plugin) => println!("selected: {}", plugin.name()),
        None => anyhow::bail!("no compatible HLS plugin for this descriptor"),
    }
    Ok(())
}
