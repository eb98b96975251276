//! Imagery query parameters and export formats.

use crate::error::{MissingField, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layers offered by the imagery form.
pub const IMAGERY_LAYERS: [&str; 4] = ["GEOLOGY", "LAI_SAVI", "MOISTURE_INDEX", "NDVI-L2A"];

/// Parameters published on the OGC channel.
///
/// The default value (every field `None`) is the channel's initial state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OgcParams {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub cloud_percentage: Option<f64>,
    pub layer: Option<String>,
}

/// A fully specified imagery request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageryQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub cloud_percentage: f64,
    pub layer: String,
}

impl OgcParams {
    pub fn is_empty(&self) -> bool {
        *self == OgcParams::default()
    }

    /// Fields that keep these parameters from forming a request.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.start.is_none() || self.end.is_none() {
            missing.push(MissingField::DateRange);
        }
        if !self.cloud_percentage.is_some_and(is_valid_cloud_percentage) {
            missing.push(MissingField::CloudPercentage);
        }
        if self.layer.as_deref().map_or(true, |layer| layer.trim().is_empty()) {
            missing.push(MissingField::DataLayer);
        }
        missing
    }

    /// All four fields present and in range, or the list of what is not.
    pub fn complete(&self) -> Result<ImageryQuery, ValidationError> {
        match (&self.start, &self.end, self.cloud_percentage, &self.layer) {
            (Some(start), Some(end), Some(cloud), Some(layer))
                if is_valid_cloud_percentage(cloud) && !layer.trim().is_empty() =>
            {
                Ok(ImageryQuery {
                    start: *start,
                    end: *end,
                    cloud_percentage: cloud,
                    layer: layer.clone(),
                })
            }
            _ => Err(ValidationError::new(self.missing_fields())),
        }
    }
}

pub fn is_valid_cloud_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Output formats offered by the export action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/tiff")]
    Tiff,
}

/// How the exported image reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Fetch the bytes and save them locally
    Download,
    /// Hand the URL to an external viewer
    OpenExternal,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Png, ExportFormat::Tiff];

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Tiff => "image/tiff",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.mime() == mime)
    }

    pub fn delivery(self) -> Delivery {
        match self {
            ExportFormat::Png => Delivery::Download,
            ExportFormat::Tiff => Delivery::OpenExternal,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Png => "wms-image.png",
            ExportFormat::Tiff => "wms-image.tiff",
        }
    }
}
