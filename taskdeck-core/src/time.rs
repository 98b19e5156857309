//! Timestamp parsing and whole-day arithmetic for due dates.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

const SECS_PER_DAY: i64 = 86_400;

/// A successfully parsed ISO-8601-ish stamp.
///
/// Offset-carrying and floating values are kept apart so each is
/// compared against the matching notion of "now": an aware stamp
/// against the UTC instant, a floating one against naive local time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsoStamp {
    Aware(DateTime<FixedOffset>),
    Floating(NaiveDateTime),
}

impl IsoStamp {
    /// Calendar date in local terms; floating stamps are taken as-is.
    pub fn local_date(self) -> NaiveDate {
        match self {
            IsoStamp::Aware(dt) => dt.with_timezone(&Local).date_naive(),
            IsoStamp::Floating(ndt) => ndt.date(),
        }
    }
}

/// Parse a timestamp, accepting RFC 3339 (including `Z`), naive
/// datetimes with `T` or space separators, and bare dates (taken as
/// midnight). Returns `None` for anything else — callers treat that
/// as "no usable date", never as an error.
pub fn parse_stamp(raw: &str) -> Option<IsoStamp> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(IsoStamp::Aware(dt));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(IsoStamp::Floating(ndt));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(IsoStamp::Floating(d.and_time(chrono::NaiveTime::MIN)));
    }

    None
}

/// Whole days from `now` until the stamp, floored toward negative
/// infinity: any instant in the past is day -1 or earlier.
pub fn days_until(stamp: IsoStamp, now: DateTime<Utc>) -> i64 {
    let secs = match stamp {
        IsoStamp::Aware(dt) => dt.signed_duration_since(now).num_seconds(),
        IsoStamp::Floating(ndt) => {
            let local_now = now.with_timezone(&Local).naive_local();
            ndt.signed_duration_since(local_now).num_seconds()
        }
    };
    secs.div_euclid(SECS_PER_DAY)
}

/// Strictly-past check. Unparsable or absent text is never overdue.
pub fn is_overdue(raw: Option<&str>, now: DateTime<Utc>) -> bool {
    raw.and_then(parse_stamp)
        .map(|stamp| days_until(stamp, now) < 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_rfc3339_with_offset_and_z() {
        assert!(matches!(
            parse_stamp("2026-03-10T12:00:00+05:00"),
            Some(IsoStamp::Aware(_))
        ));
        assert!(matches!(
            parse_stamp("2026-03-10T12:00:00Z"),
            Some(IsoStamp::Aware(_))
        ));
    }

    #[test]
    fn parses_naive_and_bare_date() {
        assert!(matches!(
            parse_stamp("2026-03-10T09:30:00"),
            Some(IsoStamp::Floating(_))
        ));
        assert!(matches!(
            parse_stamp("2026-03-10 09:30"),
            Some(IsoStamp::Floating(_))
        ));
        assert!(matches!(parse_stamp("2026-03-10"), Some(IsoStamp::Floating(_))));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_stamp("next thursday"), None);
        assert_eq!(parse_stamp(""), None);
    }

    #[test]
    fn one_second_in_the_past_is_already_day_minus_one() {
        let now = noon_utc();
        let due = IsoStamp::Aware((now - Duration::seconds(1)).fixed_offset());
        assert_eq!(days_until(due, now), -1);
    }

    #[test]
    fn same_instant_is_day_zero() {
        let now = noon_utc();
        let due = IsoStamp::Aware(now.fixed_offset());
        assert_eq!(days_until(due, now), 0);
        assert!(!is_overdue(Some(&now.to_rfc3339()), now));
    }

    #[test]
    fn overdue_is_strictly_past() {
        let now = noon_utc();
        let yesterday = (now - Duration::days(1)).to_rfc3339();
        assert!(is_overdue(Some(&yesterday), now));
        assert!(!is_overdue(Some("not a date"), now));
        assert!(!is_overdue(None, now));
    }

    #[test]
    fn whole_day_buckets() {
        let now = noon_utc();
        let in_36h = IsoStamp::Aware((now + Duration::hours(36)).fixed_offset());
        assert_eq!(days_until(in_36h, now), 1);
        let in_10d = IsoStamp::Aware((now + Duration::days(10)).fixed_offset());
        assert_eq!(days_until(in_10d, now), 10);
    }
}
