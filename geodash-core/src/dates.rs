//! Date formatting for the WMS `TIME` parameter and statistics date ranges.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a NaiveDate as "YYYY-MM-DD"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a date string in "YYYY-MM-DD" format
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
}

/// UTC instant truncated to whole seconds with a trailing `Z`,
/// e.g. `2024-05-01T00:00:00Z`.
pub fn format_wms_time(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Midnight UTC of the given calendar day.
pub fn start_of_day_utc(date: &NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Parse either an RFC 3339 instant or a bare "YYYY-MM-DD" day (taken as
/// midnight UTC).
pub fn parse_instant(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }
    Ok(start_of_day_utc(&parse_date(s)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_and_parse() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let formatted = format_date(&date);
        assert_eq!(formatted, "2023-06-15");
        let parsed = parse_date(&formatted).unwrap();
        assert_eq!(parsed, date);
    }

    #[test]
    fn test_wms_time_drops_subseconds() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
            + chrono::Duration::milliseconds(789);
        assert_eq!(format_wms_time(&instant), "2024-03-09T14:05:07Z");
    }

    #[test]
    fn test_parse_instant_forms() {
        let day = parse_instant("2024-01-31").unwrap();
        assert_eq!(format_wms_time(&day), "2024-01-31T00:00:00Z");

        let shifted = parse_instant("2024-01-31T01:30:00+02:00").unwrap();
        assert_eq!(format_wms_time(&shifted), "2024-01-30T23:30:00Z");

        assert!(parse_instant("31/01/2024").is_err());
    }
}
