//! Statistics endpoint requests and the combined chart they produce.
//!
//! One request is issued per reducer (`GET <base>/<reducer>`); each answers
//! with `{ layer: { date: value } }`. `ChartBuilder` folds those answers into
//! a single chart whose label axis is the sorted union of every date seen.

use crate::dates::format_date;
use crate::geometry::Bounds;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Layers offered by the statistics form.
pub const STATISTICS_LAYERS: [&str; 2] = ["NDVI", "NDWI"];

/// Aggregation applied over the region for each date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Mean,
    Min,
    Max,
    Std,
}

impl Reducer {
    pub const ALL: [Reducer; 4] = [Reducer::Mean, Reducer::Min, Reducer::Max, Reducer::Std];

    /// Path segment on the statistics endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Reducer::Mean => "mean",
            Reducer::Min => "min",
            Reducer::Max => "max",
            Reducer::Std => "std",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Reducer::Mean => "Mean",
            Reducer::Min => "Min",
            Reducer::Max => "Max",
            Reducer::Std => "Standard Deviation",
        }
    }

    /// Line color used for every series of this reducer.
    pub fn color(self) -> &'static str {
        match self {
            Reducer::Mean => "#2196F3",
            Reducer::Min => "#4CAF50",
            Reducer::Max => "#F44336",
            Reducer::Std => "#FF9800",
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reducer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reducer::ALL
            .into_iter()
            .find(|reducer| reducer.as_str() == s)
            .ok_or_else(|| format!("unknown reducer '{s}' (expected mean, min, max or std)"))
    }
}

/// Everything one statistics request carries apart from the reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRequest {
    pub bounds: Bounds,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub layers: Vec<String>,
}

impl StatsRequest {
    /// `<base>/<reducer>`
    pub fn endpoint(base_url: &str, reducer: Reducer) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), reducer.as_str())
    }

    /// Query pairs in send order; `layers` repeats once per layer.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("geom", self.bounds.to_geojson_polygon().to_string()),
            ("start_date", format_date(&self.start)),
            ("end_date", format_date(&self.end)),
        ];
        pairs.extend(self.layers.iter().map(|layer| ("layers", layer.clone())));
        pairs
    }
}

/// Body of one statistics response. `null` values decode as `None`.
pub type ReducerResponse = BTreeMap<String, BTreeMap<String, Option<f64>>>;

/// One line of the combined chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// `"<layer> (<reducer>)"`
    pub label: String,
    pub layer: String,
    pub reducer: Reducer,
    pub color: &'static str,
    /// One value per chart label, zero where the response had no value.
    pub values: Vec<f64>,
}

/// Combined chart dataset for all reducers of one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn series(&self, layer: &str, reducer: Reducer) -> Option<&ChartSeries> {
        self.datasets
            .iter()
            .find(|series| series.layer == layer && series.reducer == reducer)
    }
}

#[derive(Debug, Default)]
pub struct ChartBuilder {
    labels: BTreeSet<String>,
    series: Vec<(String, Reducer, BTreeMap<String, f64>)>,
}

impl ChartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&mut self, reducer: Reducer, response: ReducerResponse) {
        for (layer, data) in response {
            let values: BTreeMap<String, f64> = data
                .into_iter()
                .map(|(date, value)| (date, value.unwrap_or(0.0)))
                .collect();
            self.labels.extend(values.keys().cloned());
            self.series.push((layer, reducer, values));
        }
    }

    pub fn finish(self) -> ChartData {
        let labels: Vec<String> = self.labels.into_iter().collect();
        let datasets = self
            .series
            .into_iter()
            .map(|(layer, reducer, values)| ChartSeries {
                label: format!("{layer} ({reducer})"),
                color: reducer.color(),
                values: labels
                    .iter()
                    .map(|date| values.get(date).copied().unwrap_or(0.0))
                    .collect(),
                layer,
                reducer,
            })
            .collect();
        ChartData { labels, datasets }
    }
}
