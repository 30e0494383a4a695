//! Shareable representation of a range: `start=<ISO>&end=<ISO>`.
//!
//! The same two ISO-8601 strings are used as the query of the history
//! endpoint, so opening a shared link re-issues exactly the same request.
use api_types::history::{HistoryQuery, HistoryQueryParams};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::{DateRange, EngineError, ResultEngine};

/// ISO-8601 in UTC with millisecond precision, e.g. `2026-04-03T00:00:00.000Z`.
#[must_use]
pub fn iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[must_use]
pub fn history_query(range: &DateRange) -> HistoryQuery {
    HistoryQuery {
        start: iso(range.from()),
        end: iso(range.to()),
    }
}

/// Encodes `range` as a form-urlencoded query string (without leading `?`).
pub fn encode(range: &DateRange) -> ResultEngine<String> {
    serde_urlencoded::to_string(history_query(range))
        .map_err(|err| EngineError::InvalidLink(err.to_string()))
}

/// Parses a link back into a range.
///
/// Accepts a bare query (`start=..&end=..`), one with a leading `?`, or a full
/// path such as `/history?start=..&end=..`. Returns `Ok(None)` when either
/// bound is missing, which is the "no selection" state.
pub fn parse(link: &str) -> ResultEngine<Option<DateRange>> {
    let query = link
        .split_once('?')
        .map_or(link, |(_, query)| query)
        .trim();

    let params: HistoryQueryParams = serde_urlencoded::from_str(query)
        .map_err(|err| EngineError::InvalidLink(err.to_string()))?;

    let (Some(start), Some(end)) = (params.start, params.end) else {
        return Ok(None);
    };

    let from = parse_instant(&start)?;
    let to = parse_instant(&end)?;
    DateRange::new(from, to).map(Some)
}

fn parse_instant(value: &str) -> ResultEngine<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| EngineError::InvalidLink(format!("{value}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_range() -> DateRange {
        let from = Utc.with_ymd_and_hms(2026, 4, 3, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 4, 10, 23, 30, 0).unwrap();
        DateRange::new(from, to).unwrap()
    }

    #[test]
    fn iso_uses_millis_and_z_suffix() {
        let instant = Utc.with_ymd_and_hms(2026, 4, 3, 8, 5, 0).unwrap();
        assert_eq!(iso(instant), "2026-04-03T08:05:00.000Z");
    }

    #[test]
    fn encoded_link_restores_same_range() {
        let range = sample_range();
        let link = encode(&range).unwrap();
        assert!(link.starts_with("start=2026-04-03T00%3A00%3A00.000Z&end="));
        assert_eq!(parse(&link).unwrap(), Some(range));
        assert_eq!(parse(&format!("/history?{link}")).unwrap(), Some(range));
    }

    #[test]
    fn parse_accepts_unescaped_iso() {
        let parsed = parse("?start=2026-04-03T00:00:00.000Z&end=2026-04-10T23:30:00.000Z")
            .unwrap();
        assert_eq!(parsed, Some(sample_range()));
    }

    #[test]
    fn missing_bound_is_no_selection() {
        assert_eq!(parse("start=2026-04-03T00:00:00.000Z").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn garbage_bound_is_rejected() {
        let err = parse("start=yesterday&end=2026-04-10T23:30:00.000Z").unwrap_err();
        assert!(matches!(err, EngineError::InvalidLink(_)));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = parse("start=2026-04-10T00:00:00Z&end=2026-04-03T00:00:00Z").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange(_)));
    }
}
