//! Imagery request form: publishes OGC parameters and exports the result.

use crate::backend::ImageFetcher;
use crate::channels::StateChannels;
use crate::error::PanelError;
use chrono::{DateTime, Utc};
use geodash_core::dates::parse_instant;
use geodash_core::error::{MissingField, ValidationError};
use geodash_core::ogc::{Delivery, ExportFormat, OgcParams};
use geodash_core::wms::{legend_url, substitute_format};
use log::{info, warn};

/// What the user has typed into the imagery form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageryForm {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub cloud_percentage: Option<f64>,
    pub layer: Option<String>,
}

impl ImageryForm {
    /// Fresh form with the configured cloud ceiling pre-filled.
    pub fn new(default_cloud_percentage: f64) -> Self {
        Self {
            cloud_percentage: Some(default_cloud_percentage),
            ..Self::default()
        }
    }

    /// Build a form from raw input strings. Blank or unparsable inputs are
    /// left empty so validation reports them.
    pub fn from_inputs(start: &str, end: &str, cloud: &str, layer: &str) -> Self {
        let non_empty = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            start: parse_instant(start.trim()).ok(),
            end: parse_instant(end.trim()).ok(),
            cloud_percentage: cloud.trim().parse::<f64>().ok(),
            layer: non_empty(layer),
        }
    }

    fn params(&self) -> OgcParams {
        OgcParams {
            start: self.start,
            end: self.end,
            cloud_percentage: self.cloud_percentage,
            layer: self.layer.clone(),
        }
    }
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Hand `url` to an external viewer
    Open { url: String },
    /// Save `bytes` locally as `file_name`
    Download {
        file_name: &'static str,
        mime: &'static str,
        bytes: Vec<u8>,
    },
    /// Unsupported format; nothing happened
    Ignored,
}

pub struct ImageryPanel<F> {
    channels: StateChannels,
    fetcher: F,
}

impl<F: ImageFetcher> ImageryPanel<F> {
    pub fn new(channels: StateChannels, fetcher: F) -> Self {
        Self { channels, fetcher }
    }

    /// Validate the form and publish it to the parameters channel.
    ///
    /// Nothing is published when a field is missing; the error lists every
    /// missing field in form order.
    pub fn submit(&self, form: &ImageryForm) -> Result<(), PanelError> {
        let params = form.params();
        let mut missing = params.missing_fields();
        if !self.channels.has_region() {
            missing.push(MissingField::PolygonDrawing);
        }
        if !missing.is_empty() {
            let err = ValidationError::new(missing);
            warn!("Imagery form incomplete: {}", err);
            return Err(err.into());
        }

        info!("Submitting imagery parameters for layer {:?}", params.layer);
        self.channels.ogc_params.set(params);
        Ok(())
    }

    pub fn wms_url(&self) -> Option<String> {
        self.channels.wms_url.get()
    }

    /// Legend for the layer currently on the map.
    pub fn legend_url(&self) -> Result<String, PanelError> {
        let url = self.channels.wms_url.get().ok_or(PanelError::NoWmsUrl)?;
        Ok(legend_url(&url))
    }

    /// Re-request the current overlay in `format` (a MIME type).
    pub async fn export(&self, format: &str) -> Result<ExportOutcome, PanelError> {
        let url = self.channels.wms_url.get().ok_or(PanelError::NoWmsUrl)?;

        let Some(format) = ExportFormat::from_mime(format) else {
            warn!("Unsupported export format '{}'", format);
            return Ok(ExportOutcome::Ignored);
        };

        let url = substitute_format(&url, format.mime());
        info!("Exporting {} from {}", format.mime(), url);

        match format.delivery() {
            Delivery::OpenExternal => Ok(ExportOutcome::Open { url }),
            Delivery::Download => {
                let bytes = self.fetcher.fetch_image(&url).await.map_err(|err| {
                    warn!("Image download failed: {}", err);
                    PanelError::from(err)
                })?;
                info!("Downloaded {} bytes", bytes.len());
                Ok(ExportOutcome::Download {
                    file_name: format.file_name(),
                    mime: format.mime(),
                    bytes,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_surface::MapSurface;
    use crate::testing::{FakeFetcher, RecordingRenderer};
    use geodash_core::config::DashConfig;
    use geodash_core::error::FetchError;
    use geodash_core::geometry::{Bounds, LatLng};

    fn channels() -> StateChannels {
        StateChannels::with_defaults(&DashConfig::default())
    }

    fn filled_form() -> ImageryForm {
        ImageryForm::from_inputs("2024-06-01", "2024-06-30", "25", "NDVI-L2A")
    }

    fn with_region(channels: &StateChannels) {
        channels.bounds.set(Some(Bounds::from_corners(
            LatLng::new(36.0, 9.5),
            LatLng::new(37.0, 10.5),
        )));
    }

    #[test]
    fn form_from_inputs() {
        let form = filled_form();
        assert_eq!(form.cloud_percentage, Some(25.0));
        assert_eq!(form.layer.as_deref(), Some("NDVI-L2A"));
        assert!(form.start.is_some() && form.end.is_some());

        let blank = ImageryForm::from_inputs("", "June", " ", "");
        assert_eq!(blank.start, None);
        assert_eq!(blank.end, None);
        assert_eq!(blank.cloud_percentage, None);
        assert_eq!(blank.layer, None);
        assert_eq!(ImageryForm::new(25.0).cloud_percentage, Some(25.0));
    }

    #[test]
    fn each_missing_field_is_reported_alone() {
        let channels = channels();
        with_region(&channels);
        let panel = ImageryPanel::new(channels.clone(), FakeFetcher::default());

        let cases: [(fn(&mut ImageryForm), MissingField); 4] = [
            (|f: &mut ImageryForm| f.start = None, MissingField::DateRange),
            (|f: &mut ImageryForm| f.end = None, MissingField::DateRange),
            (|f: &mut ImageryForm| f.cloud_percentage = Some(140.0), MissingField::CloudPercentage),
            (|f: &mut ImageryForm| f.layer = None, MissingField::DataLayer),
        ];
        for (clear, expected) in cases {
            let mut form = filled_form();
            clear(&mut form);
            match panel.submit(&form) {
                Err(PanelError::Validation(err)) => assert_eq!(err.missing(), &[expected]),
                other => panic!("expected validation error, got {:?}", other),
            }
            assert!(channels.ogc_params.get().is_empty());
            assert_eq!(channels.wms_url.get(), None);
        }
    }

    #[test]
    fn missing_region_is_reported() {
        let channels = channels();
        let panel = ImageryPanel::new(channels.clone(), FakeFetcher::default());
        let err = panel.submit(&filled_form()).unwrap_err();
        match err {
            PanelError::Validation(err) => assert_eq!(err.labels(), vec!["polygon drawing"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_form_lists_all_fields_in_order() {
        let panel = ImageryPanel::new(channels(), FakeFetcher::default());
        let err = panel.submit(&ImageryForm::default()).unwrap_err();
        match err {
            PanelError::Validation(err) => assert_eq!(
                err.labels(),
                vec![
                    "date range",
                    "cloud percentage (0–100)",
                    "data layer",
                    "polygon drawing"
                ]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn submit_drives_map_surface_to_publish_url() {
        let config = DashConfig::default();
        let channels = StateChannels::with_defaults(&config);
        let surface = MapSurface::new(RecordingRenderer::default(), channels.clone(), &config);
        surface.attach();
        with_region(&channels);

        let panel = ImageryPanel::new(channels.clone(), FakeFetcher::default());
        panel.submit(&filled_form()).unwrap();

        let url = panel.wms_url().unwrap();
        assert!(url.contains("BBOX=36,9.5,37,10.5"));
        assert!(url.contains("TIME=2024-06-01T00:00:00Z"));
        assert!(panel.legend_url().unwrap().contains("REQUEST=GetLegendGraphic"));
    }

    #[tokio::test]
    async fn export_without_url_fails() {
        let panel = ImageryPanel::new(channels(), FakeFetcher::default());
        assert_eq!(panel.export("image/png").await, Err(PanelError::NoWmsUrl));
        assert_eq!(panel.legend_url(), Err(PanelError::NoWmsUrl));
    }

    #[tokio::test]
    async fn tiff_opens_externally_and_png_downloads() {
        let channels = channels();
        channels.wms_url.set(Some(
            "https://wms.test/ogc?SERVICE=WMS&REQUEST=GetMap&FORMAT=image/png&MAXCC=25".to_string(),
        ));
        let fetcher = FakeFetcher::with_bytes(vec![0x89, b'P', b'N', b'G']);
        let panel = ImageryPanel::new(channels, fetcher.clone());

        match panel.export("image/tiff").await.unwrap() {
            ExportOutcome::Open { url } => assert!(url.contains("FORMAT=image/tiff")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(fetcher.fetched().is_empty());

        match panel.export("image/png").await.unwrap() {
            ExportOutcome::Download {
                file_name,
                mime,
                bytes,
            } => {
                assert_eq!(file_name, "wms-image.png");
                assert_eq!(mime, "image/png");
                assert_eq!(bytes.len(), 4);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(fetcher.fetched().len(), 1);

        assert_eq!(panel.export("image/jp2").await, Ok(ExportOutcome::Ignored));
    }

    #[tokio::test]
    async fn failed_download_is_reported() {
        let channels = channels();
        channels.wms_url.set(Some("https://wms.test/ogc?FORMAT=image/png".to_string()));
        let fetcher = FakeFetcher::failing(FetchError::Status {
            status: 500,
            url: "https://wms.test/ogc?FORMAT=image/png".to_string(),
        });
        let panel = ImageryPanel::new(channels, fetcher);
        let err = panel.export("image/png").await.unwrap_err();
        assert!(matches!(err, PanelError::Transport(FetchError::Status { status: 500, .. })));
    }
}
