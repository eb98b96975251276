//! WMS URL building and image download.

use anyhow::{anyhow, Context};
use geodash_core::client::HttpClient;
use geodash_core::config::DashConfig;
use geodash_core::dates::parse_instant;
use geodash_core::geometry::Bounds;
use geodash_core::ogc::{ExportFormat, OgcParams};
use geodash_core::wms::{substitute_format, GetMap};
use log::info;
use std::path::Path;

/// Build the GetMap URL for one imagery request.
///
/// `time` is used for both ends of the range, so the request matches what
/// the dashboard issues for a single-day query.
pub fn build_wms_url(
    config: &DashConfig,
    endpoint: &str,
    layer: &str,
    time: &str,
    cloud: f64,
    bbox: &str,
    format: &str,
) -> anyhow::Result<String> {
    let bounds = Bounds::parse_bbox(bbox)
        .ok_or_else(|| anyhow!("invalid bbox '{}', expected swLat,swLng,neLat,neLng", bbox))?;
    let instant = parse_instant(time).with_context(|| format!("invalid time '{}'", time))?;

    let params = OgcParams {
        start: Some(instant),
        end: Some(instant),
        cloud_percentage: Some(cloud),
        layer: Some(layer.to_string()),
    };
    let query = params.complete().map_err(|err| anyhow!(err.message()))?;

    Ok(GetMap::new(&query, bounds)
        .size(config.image_width, config.image_height)
        .format(format)
        .url(endpoint))
}

/// Fetch `url` re-rendered as `format` and write the bytes to `out`.
pub async fn run_download(url: &str, format: &str, out: &Path) -> anyhow::Result<()> {
    let format = ExportFormat::from_mime(format)
        .ok_or_else(|| anyhow!("unsupported format '{}', expected image/png or image/tiff", format))?;
    let url = substitute_format(url, format.mime());
    info!("Downloading {}", url);

    // The statistics base URL is irrelevant for image fetches
    let client = HttpClient::new(String::new());
    let bytes = client.fetch_image(&url).await?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;

    info!("Wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}
