//! Calendar helpers for diary URLs and month boundaries.
//!
//! Everything that depends on "today" takes a [`Clock`] so callers (and tests)
//! decide what the current date is.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

/// Source of the current local calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time in the server's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// `/diary/write/<YYYY-MM-DD>` for the given date
pub fn write_url_for(date: NaiveDate) -> String {
    format!("/diary/write/{}", day_key(date))
}

/// `/diary/write/<YYYY-MM-DD>` for today
pub fn write_url_today(clock: &dyn Clock) -> String {
    write_url_for(clock.today())
}

/// `/diary/<YYYYMM>` for the month containing `date`
pub fn month_url_for(date: NaiveDate) -> String {
    format!("/diary/{}", month_key(date))
}

/// Day starts from the 1st of the current month through today inclusive
pub fn existing_dates_this_month(clock: &dyn Clock) -> Vec<NaiveDateTime> {
    let today = clock.today();
    today
        .with_day(1)
        .map(|first| {
            first
                .iter_days()
                .take_while(|day| *day <= today)
                .map(day_start)
                .collect()
        })
        .unwrap_or_default()
}

pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Milliseconds of the day start, counted on the naive local timeline
pub fn day_start_millis(date: NaiveDate) -> i64 {
    day_start(date).and_utc().timestamp_millis()
}

/// `YYYYMM`
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y%m").to_string()
}

/// `YYYY-MM-DD`
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYYMMDD`, the sortable form used in storage keys
pub fn compact_day_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Parse `YYYYMM` into the first day of that month
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = raw[..4].parse().ok()?;
    let month = raw[4..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Parse `YYYY-MM-DD` or `YYYYMMDD`
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MS_PER_DAY;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_write_url_is_zero_padded() {
        assert_eq!(write_url_for(date(2024, 3, 7)), "/diary/write/2024-03-07");
        assert_eq!(write_url_for(date(2024, 12, 31)), "/diary/write/2024-12-31");
    }

    #[test]
    fn test_write_url_is_deterministic() {
        let clock = FixedClock(date(2023, 1, 9));
        assert_eq!(write_url_today(&clock), write_url_today(&clock));
        assert_eq!(write_url_today(&clock), "/diary/write/2023-01-09");
    }

    #[test]
    fn test_existing_dates_this_month() {
        let clock = FixedClock(date(2024, 2, 17));
        let dates = existing_dates_this_month(&clock);

        assert_eq!(dates.len(), 17);
        assert_eq!(dates[0], day_start(date(2024, 2, 1)));
        assert_eq!(*dates.last().unwrap(), day_start(date(2024, 2, 17)));
        for pair in dates.windows(2) {
            let gap = pair[1].and_utc().timestamp_millis() - pair[0].and_utc().timestamp_millis();
            assert_eq!(gap, MS_PER_DAY);
        }
    }

    #[test]
    fn test_existing_dates_on_first_of_month() {
        let clock = FixedClock(date(2024, 1, 1));
        assert_eq!(existing_dates_this_month(&clock), vec![day_start(date(2024, 1, 1))]);
    }

    #[test]
    fn test_existing_dates_on_leap_day() {
        let clock = FixedClock(date(2024, 2, 29));
        assert_eq!(existing_dates_this_month(&clock).len(), 29);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("202401"), Some(date(2024, 1, 1)));
        assert_eq!(parse_month("202413"), None);
        assert_eq!(parse_month("2024-1"), None);
        assert_eq!(parse_month("20241"), None);
    }

    #[test]
    fn test_parse_day_accepts_both_forms() {
        assert_eq!(parse_day("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_day("20240105"), Some(date(2024, 1, 5)));
        assert_eq!(parse_day("2024-02-30"), None);
    }

    #[test]
    fn test_keys() {
        let d = date(2024, 1, 5);
        assert_eq!(month_key(d), "202401");
        assert_eq!(compact_day_key(d), "20240105");
        assert_eq!(month_url_for(d), "/diary/202401");
        assert_eq!(day_start_millis(date(1970, 1, 2)), MS_PER_DAY);
    }
}
