//! Command implementations for the GeoDash CLI.
//!
//! Provides subcommands for building WMS GetMap and legend URLs, downloading
//! rendered imagery and running region statistics against the same core the
//! dashboard uses.

use chrono::NaiveDate;
use clap::Subcommand;
use geodash_core::config::DashConfig;
use geodash_core::stats::Reducer;
use std::path::PathBuf;

pub mod imagery;
pub mod stats;

#[derive(Subcommand)]
pub enum Command {
    /// Print the WMS GetMap URL for an imagery request
    WmsUrl {
        /// WMS layer name (e.g. NDVI-L2A)
        #[arg(short, long)]
        layer: String,

        /// Acquisition time, RFC 3339 or YYYY-MM-DD
        #[arg(short, long)]
        time: String,

        /// Maximum cloud coverage, 0-100
        #[arg(short, long)]
        cloud: f64,

        /// Region as swLat,swLng,neLat,neLng
        #[arg(short, long)]
        bbox: String,

        /// Image MIME type
        #[arg(short, long, default_value = "image/png")]
        format: String,

        /// Override the configured WMS endpoint
        #[arg(long)]
        wms_endpoint: Option<String>,
    },

    /// Print the legend URL for a GetMap URL
    LegendUrl {
        #[arg(short, long)]
        url: String,
    },

    /// Re-request a GetMap URL in another format and save the image
    Download {
        #[arg(short, long)]
        url: String,

        /// Image MIME type (image/png or image/tiff)
        #[arg(short, long, default_value = "image/png")]
        format: String,

        /// Output path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Fetch reducer time series for a region and print the merged table
    Stats {
        /// Region as swLat,swLng,neLat,neLng
        #[arg(short, long)]
        bbox: String,

        /// First day, YYYY-MM-DD
        #[arg(short, long)]
        start: NaiveDate,

        /// Last day, YYYY-MM-DD
        #[arg(short, long)]
        end: NaiveDate,

        /// Layer to include (repeatable)
        #[arg(short, long = "layer", required = true)]
        layers: Vec<String>,

        /// Reducer to run: mean, min, max or std (repeatable)
        #[arg(short, long = "reducer", required = true)]
        reducers: Vec<Reducer>,

        /// Write CSV here instead of stdout
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Override the configured statistics service
        #[arg(long)]
        stats_url: Option<String>,
    },
}

pub async fn run(command: Command, config: DashConfig) -> anyhow::Result<()> {
    match command {
        Command::WmsUrl {
            layer,
            time,
            cloud,
            bbox,
            format,
            wms_endpoint,
        } => {
            let endpoint = wms_endpoint.unwrap_or_else(|| config.wms_endpoint.clone());
            let url = imagery::build_wms_url(&config, &endpoint, &layer, &time, cloud, &bbox, &format)?;
            println!("{}", url);
            Ok(())
        }
        Command::LegendUrl { url } => {
            println!("{}", geodash_core::wms::legend_url(&url));
            Ok(())
        }
        Command::Download { url, format, out } => {
            imagery::run_download(&url, &format, &out).await
        }
        Command::Stats {
            bbox,
            start,
            end,
            layers,
            reducers,
            csv,
            stats_url,
        } => {
            let base_url = stats_url.unwrap_or_else(|| config.stats_base_url.clone());
            stats::run_stats(&base_url, &bbox, start, end, &layers, &reducers, csv.as_deref()).await
        }
    }
}
