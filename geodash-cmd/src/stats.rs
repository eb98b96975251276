//! Region statistics from the command line.

use anyhow::anyhow;
use chrono::NaiveDate;
use geodash_core::client::HttpClient;
use geodash_core::geometry::Bounds;
use geodash_core::stats::{ChartData, Reducer};
use geodash_state::statistics_panel::{StatisticsPanel, StatsForm};
use geodash_state::Channel;
use log::info;
use std::io::Write;
use std::path::Path;

/// Run one statistics submission and write the merged table as CSV.
///
/// Reducers are requested one after another, exactly as the dashboard does;
/// the first failure aborts the run.
pub async fn run_stats(
    base_url: &str,
    bbox: &str,
    start: NaiveDate,
    end: NaiveDate,
    layers: &[String],
    reducers: &[Reducer],
    csv_path: Option<&Path>,
) -> anyhow::Result<()> {
    let bounds = Bounds::parse_bbox(bbox)
        .ok_or_else(|| anyhow!("invalid bbox '{}', expected swLat,swLng,neLat,neLng", bbox))?;

    let form = build_form(start, end, layers, reducers);
    let panel = StatisticsPanel::new(HttpClient::new(base_url), Channel::new(Some(bounds)));
    panel.attach();

    info!(
        "Requesting {} reducer(s) for {} layer(s) from {}",
        reducers.len(),
        layers.len(),
        base_url
    );
    let chart = panel.submit(&form).await?;

    match csv_path {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_chart(&chart, file)?;
            info!("Wrote {} rows to {}", chart.labels.len(), path.display());
        }
        None => write_chart(&chart, std::io::stdout().lock())?,
    }
    Ok(())
}

fn build_form(start: NaiveDate, end: NaiveDate, layers: &[String], reducers: &[Reducer]) -> StatsForm {
    let mut form = StatsForm::new();
    form.start = Some(start);
    form.end = Some(end);
    for layer in layers {
        form.set_layer(layer, true);
    }
    for reducer in reducers {
        form.set_reducer(*reducer, true);
    }
    form
}

/// One row per date, one column per series.
pub fn write_chart<W: Write>(chart: &ChartData, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date".to_string()];
    header.extend(chart.datasets.iter().map(|series| series.label.clone()));
    wtr.write_record(&header)?;

    for (row, date) in chart.labels.iter().enumerate() {
        let mut record = vec![date.clone()];
        record.extend(
            chart
                .datasets
                .iter()
                .map(|series| series.values.get(row).map_or(String::new(), |v| v.to_string())),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodash_core::stats::{ChartBuilder, ReducerResponse};

    #[test]
    fn table_has_one_column_per_series() {
        let body: ReducerResponse = serde_json::from_str(
            r#"{ "NDVI": { "2024-01-01": 0.25, "2024-01-02": null } }"#,
        )
        .unwrap();
        let mut builder = ChartBuilder::new();
        builder.push_response(Reducer::Mean, body.clone());
        builder.push_response(Reducer::Max, body);
        let chart = builder.finish();

        let mut out = Vec::new();
        write_chart(&chart, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,NDVI (mean),NDVI (max)");
        assert_eq!(lines[1], "2024-01-01,0.25,0.25");
        assert_eq!(lines[2], "2024-01-02,0,0");
    }

    #[test]
    fn form_carries_every_selection() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let form = build_form(
            start,
            end,
            &["NDVI".to_string(), "NDWI".to_string()],
            &[Reducer::Std, Reducer::Mean],
        );
        assert_eq!(form.start, Some(start));
        assert_eq!(form.layers(), ["NDVI".to_string(), "NDWI".to_string()]);
        assert!(form.has_reducer(Reducer::Std));
        assert!(form.has_reducer(Reducer::Mean));
    }

    #[test]
    fn empty_chart_writes_header_only() {
        let mut out = Vec::new();
        write_chart(&ChartData::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "date\n");
    }
}
