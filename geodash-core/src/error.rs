//! Error types shared by the dashboard crates.

use thiserror::Error;

/// A required form field that was absent or out of range.
///
/// Labels match what the panels show to the user, in the order the
/// panels check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingField {
    DateRange,
    CloudPercentage,
    DataLayer,
    PolygonDrawing,
    Polygon,
    LayerSelection,
    StatisticsSelection,
}

impl MissingField {
    pub fn label(self) -> &'static str {
        match self {
            MissingField::DateRange => "date range",
            MissingField::CloudPercentage => "cloud percentage (0–100)",
            MissingField::DataLayer => "data layer",
            MissingField::PolygonDrawing => "polygon drawing",
            MissingField::Polygon => "polygon",
            MissingField::LayerSelection => "layer selection",
            MissingField::StatisticsSelection => "statistics selection",
        }
    }
}

fn join_labels(missing: &[MissingField]) -> String {
    missing
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Client-side validation failure. The request was not attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing or invalid fields: {}", join_labels(.missing))]
pub struct ValidationError {
    missing: Vec<MissingField>,
}

impl ValidationError {
    pub fn new(missing: Vec<MissingField>) -> Self {
        Self { missing }
    }

    pub fn missing(&self) -> &[MissingField] {
        &self.missing
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.missing.iter().map(|field| field.label()).collect()
    }

    /// Bulleted message suitable for an inline warning box.
    pub fn message(&self) -> String {
        let bullets = self
            .missing
            .iter()
            .map(|field| format!("• {}", field.label()))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Please complete the following before submitting:\n\n{bullets}")
    }
}

/// Failure talking to the statistics endpoint or the WMS service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP error {status} from {url}")]
    Status { status: u16, url: String },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),
}
