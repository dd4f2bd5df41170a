use crate::models::{Record, RecordFields};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 timestamp into wall-clock time of `tz`.
///
/// Offset-carrying timestamps are converted into `tz`; naive ones are taken as
/// already local. A bare date is local midnight.
pub fn parse_local<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(tz).naive_local());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses the date part of a `YYYY-MM-DD` string, ignoring a trailing time.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// The date a record is ordered and filtered by.
///
/// A non-blank domain date wins over `createdat`; if that domain date does
/// not parse, the record has no effective date at all.
pub fn effective_date<F, Tz>(record: &Record<F>, tz: &Tz) -> Option<NaiveDateTime>
where
    F: RecordFields,
    Tz: TimeZone,
{
    match record.fields.record_date() {
        Some(raw) if !raw.trim().is_empty() => parse_local(raw, tz),
        _ => parse_local(&record.createdat, tz),
    }
}

/// Monday 00:00 of the week containing `today` and the Monday after it.
///
/// The range is half-open, so everything up to the end of Sunday is inside.
pub fn week_bounds(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let start = monday.and_time(NaiveTime::MIN);
    (start, start + Duration::days(7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalFields, SessionFields};
    use chrono::{FixedOffset, Utc};

    fn session(date: Option<&str>, created: &str) -> Record<SessionFields> {
        Record {
            record_id: "s".into(),
            createdat: created.into(),
            updatedat: None,
            fields: SessionFields {
                date: date.map(str::to_string),
                ..SessionFields::default()
            },
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_the_supported_shapes() {
        assert_eq!(parse_local("2024-06-10", &Utc), Some(at(2024, 6, 10, 0, 0)));
        assert_eq!(parse_local("2024-06-10T07:30", &Utc), Some(at(2024, 6, 10, 7, 30)));
        assert_eq!(
            parse_local("2024-06-10T07:30:00.250", &Utc).map(|dt| dt.date()),
            NaiveDate::from_ymd_opt(2024, 6, 10)
        );
        assert_eq!(parse_local("2024-06-10 07:30:00", &Utc), Some(at(2024, 6, 10, 7, 30)));
    }

    #[test]
    fn offset_timestamps_are_moved_into_the_zone() {
        let berlin_summer = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            parse_local("2024-06-10T23:30:00Z", &berlin_summer),
            Some(at(2024, 6, 11, 1, 30))
        );
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_local("", &Utc), None);
        assert_eq!(parse_local("yesterday", &Utc), None);
        assert_eq!(parse_local("2024-06-10T25:00", &Utc), None);
        assert_eq!(parse_local("2024-13-40", &Utc), None);
    }

    #[test]
    fn effective_date_prefers_domain_date() {
        let record = session(Some("2024-06-01"), "2024-06-05T10:00:00");
        assert_eq!(effective_date(&record, &Utc), Some(at(2024, 6, 1, 0, 0)));
    }

    #[test]
    fn effective_date_falls_back_to_created() {
        let missing = session(None, "2024-06-05T10:00:00");
        assert_eq!(effective_date(&missing, &Utc), Some(at(2024, 6, 5, 10, 0)));

        let blank = session(Some("  "), "2024-06-05T10:00:00");
        assert_eq!(effective_date(&blank, &Utc), Some(at(2024, 6, 5, 10, 0)));
    }

    #[test]
    fn malformed_domain_date_means_no_effective_date() {
        let record = session(Some("someday"), "2024-06-05T10:00:00");
        assert_eq!(effective_date(&record, &Utc), None);
    }

    #[test]
    fn goals_use_created_timestamp() {
        let goal = Record {
            record_id: "g".into(),
            createdat: "2024-01-02T03:04:05".into(),
            updatedat: None,
            fields: GoalFields {
                target_date: Some("2024-12-31".into()),
                ..GoalFields::default()
            },
        };
        assert_eq!(effective_date(&goal, &Utc), Some(at(2024, 1, 2, 3, 4) + Duration::seconds(5)));
    }

    #[test]
    fn week_runs_monday_to_monday() {
        // 2024-06-12 is a Wednesday
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
        assert_eq!(start, at(2024, 6, 10, 0, 0));
        assert_eq!(end, at(2024, 6, 17, 0, 0));

        let (start, _) = week_bounds(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
        assert_eq!(start, at(2024, 6, 10, 0, 0));
        let (start, _) = week_bounds(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(start, at(2024, 6, 10, 0, 0));
    }

    #[test]
    fn calendar_date_ignores_time() {
        assert_eq!(
            parse_calendar_date("2024-12-31T10:00"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(parse_calendar_date("31.12.2024"), None);
    }
}
