use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

use super::models::calendar_date;

const LAST_SECOND_OF_DAY: i64 = 24 * 60 * 60 - 1;

/// Named shorthand for a reporting window ending on the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeKey {
    Today,
    Week,
    #[default]
    Month,
}

impl RangeKey {
    /// Unknown or missing keywords resolve to [`RangeKey::Month`].
    #[must_use]
    pub fn parse(key: Option<&str>) -> Self {
        match key.map(str::trim) {
            Some("today") => Self::Today,
            Some("week") => Self::Week,
            _ => Self::Month,
        }
    }
}

/// An inclusive datetime interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Resolves query parameters into a concrete interval.
    ///
    /// An explicit `start`/`end` pair wins when both parse as `YYYY-MM-DD`;
    /// anything else falls back to the symbolic `range` keyword.
    #[must_use]
    pub fn resolve(
        range: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Self {
        if let (Some(start), Some(end)) = (start, end) {
            if let Some(explicit) = Self::explicit(start, end) {
                return explicit;
            }
        }
        Self::symbolic(RangeKey::parse(range), today)
    }

    #[must_use]
    pub fn symbolic(key: RangeKey, today: NaiveDate) -> Self {
        match key {
            RangeKey::Today => Self {
                start: start_of_day(today),
                end: end_of_day(today),
            },
            RangeKey::Week => Self {
                start: start_of_day(today - Duration::days(6)),
                end: end_of_day(today),
            },
            RangeKey::Month => Self::month_of(today),
        }
    }

    /// The calendar month containing `day`.
    #[must_use]
    pub fn month_of(day: NaiveDate) -> Self {
        let first = day.with_day(1).unwrap_or(day);
        let next_first = first
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start: start_of_day(first),
            end: start_of_day(next_first) - Duration::seconds(1),
        }
    }

    /// Builds `[start 00:00:00, end 23:59:59]`, or `None` if either date is malformed.
    #[must_use]
    pub fn explicit(start: &str, end: &str) -> Option<Self> {
        let start = calendar_date::parse(start.trim())?;
        let end = calendar_date::parse(end.trim())?;
        Some(Self {
            start: start_of_day(start),
            end: end_of_day(end),
        })
    }

    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }
}

/// The current calendar date in the server's local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::seconds(LAST_SECOND_OF_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn test_range_key_defaults_to_month() {
        assert_eq!(RangeKey::parse(None), RangeKey::Month);
        assert_eq!(RangeKey::parse(Some("year")), RangeKey::Month);
        assert_eq!(RangeKey::parse(Some("")), RangeKey::Month);
        assert_eq!(RangeKey::parse(Some("today")), RangeKey::Today);
        assert_eq!(RangeKey::parse(Some("week")), RangeKey::Week);
    }

    #[test]
    fn test_today() {
        let range = DateRange::symbolic(RangeKey::Today, date(2024, 3, 15));
        assert_eq!(range.start, at(2024, 3, 15, 0, 0, 0));
        assert_eq!(range.end, at(2024, 3, 15, 23, 59, 59));
    }

    #[test]
    fn test_week_spans_seven_days() {
        for today in [date(2024, 3, 15), date(2024, 3, 3), date(2025, 1, 2)] {
            let range = DateRange::symbolic(RangeKey::Week, today);
            assert_eq!(range.last_day(), today);
            assert_eq!((range.last_day() - range.first_day()).num_days(), 6);
            assert_eq!(range.start.time(), NaiveTime::MIN);
            assert_eq!(range.end.time(), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        }
    }

    #[test]
    fn test_week_crosses_year_boundary() {
        let range = DateRange::symbolic(RangeKey::Week, date(2025, 1, 2));
        assert_eq!(range.start, at(2024, 12, 27, 0, 0, 0));
    }

    #[test]
    fn test_month() {
        let range = DateRange::symbolic(RangeKey::Month, date(2024, 3, 15));
        assert_eq!(range.start, at(2024, 3, 1, 0, 0, 0));
        assert_eq!(range.end, at(2024, 3, 31, 23, 59, 59));
    }

    #[test]
    fn test_month_leap_february() {
        let range = DateRange::month_of(date(2024, 2, 10));
        assert_eq!(range.end, at(2024, 2, 29, 23, 59, 59));

        let range = DateRange::month_of(date(2023, 2, 10));
        assert_eq!(range.end, at(2023, 2, 28, 23, 59, 59));
    }

    #[test]
    fn test_month_december() {
        let range = DateRange::month_of(date(2024, 12, 31));
        assert_eq!(range.start, at(2024, 12, 1, 0, 0, 0));
        assert_eq!(range.end, at(2024, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_explicit_range_includes_end_day() {
        let range = DateRange::resolve(
            Some("today"),
            Some("2024-03-01"),
            Some("2024-03-31"),
            date(2020, 1, 1),
        );
        assert_eq!(range.start, at(2024, 3, 1, 0, 0, 0));
        assert_eq!(range.end, at(2024, 3, 31, 23, 59, 59));
    }

    #[test]
    fn test_malformed_explicit_range_falls_back() {
        let today = date(2024, 3, 15);

        let range = DateRange::resolve(Some("week"), Some("2024-03-01"), Some("31/03/2024"), today);
        assert_eq!(range, DateRange::symbolic(RangeKey::Week, today));

        let range = DateRange::resolve(None, Some("2024-03-01"), None, today);
        assert_eq!(range, DateRange::month_of(today));
    }

    #[test]
    fn test_non_canonical_dates_fall_back() {
        let today = date(2024, 3, 15);

        for (start, end) in [
            ("+10000-01-01", "2024-03-31"),
            ("2024-03-01", "+2024-03-31"),
            ("2024-3-1", "2024-03-31"),
            ("2024-03-01", "2024-03-5"),
            ("0000-01-01", "2024-03-31"),
            ("２０２４-03-01", "2024-03-31"),
        ] {
            assert_eq!(DateRange::explicit(start, end), None, "{start}..{end}");
            let range = DateRange::resolve(None, Some(start), Some(end), today);
            assert_eq!(range, DateRange::month_of(today));
        }
    }
}
