use chrono::{DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveTime, Utc};
use std::fmt;
use tracing::info;

use crate::error::{AttendanceError, AttendanceResult};

/// Offset every month is anchored to (Asia/Tokyo, no daylight saving).
pub const TOKYO: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("+09:00 is a valid offset"),
};

/// The calendar month a run works on, always normalized to its first day at
/// midnight in [`TOKYO`] time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMonth {
    first: NaiveDate,
    last: NaiveDate,
    start: DateTime<FixedOffset>,
    lower_bound: DateTime<FixedOffset>,
}

impl TargetMonth {
    pub fn from_ymd(year: i32, month: u32) -> AttendanceResult<Self> {
        let invalid = || AttendanceError::InvalidMonth(format!("{year:04}{month:02}"));

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        let start = first
            .and_time(NaiveTime::MIN)
            .checked_sub_offset(TOKYO)
            .map(|utc| DateTime::from_naive_utc_and_offset(utc, TOKYO))
            .ok_or_else(invalid)?;
        let lower_bound = start
            .checked_sub_months(Months::new(1))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .ok_or_else(invalid)?;

        Ok(Self {
            first,
            last,
            start,
            lower_bound,
        })
    }

    pub fn containing(date: NaiveDate) -> AttendanceResult<Self> {
        Self::from_ymd(date.year(), date.month())
    }

    /// The month that contains "now" in Tokyo.
    pub fn current() -> AttendanceResult<Self> {
        let now = Utc::now().with_timezone(&TOKYO);
        info!("Using current month of {}", now.format("%Y-%m-%d"));
        Self::containing(now.date_naive())
    }

    /// Parses the compact `YYYYMM` form.
    pub fn from_compact(value: &str) -> AttendanceResult<Self> {
        let invalid = || AttendanceError::InvalidMonth(value.to_string());

        if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year = value[..4].parse::<i32>().map_err(|_| invalid())?;
        let month = value[4..].parse::<u32>().map_err(|_| invalid())?;

        Self::from_ymd(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Midnight of the first day in Tokyo time.
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// `YYYYMM`, used for sheet titles and file names.
    pub fn compact(&self) -> String {
        self.first.format("%Y%m").to_string()
    }

    /// `YYYY/MM/DD` of the first day.
    pub fn slash_date(&self) -> String {
        self.first.format("%Y/%m/%d").to_string()
    }

    pub fn previous(&self) -> AttendanceResult<Self> {
        if self.month() == 1 {
            Self::from_ymd(self.year() - 1, 12)
        } else {
            Self::from_ymd(self.year(), self.month() - 1)
        }
    }

    /// One month and one day before [`Self::start`]. Calendar queries begin
    /// here so events near the boundary survive timezone skew.
    pub fn query_lower_bound(&self) -> DateTime<FixedOffset> {
        self.lower_bound
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every date of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.last;
        self.first.iter_days().take_while(move |d| *d <= last)
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compact())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_month() {
        let month = TargetMonth::from_compact("202402").unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 2);
        assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(month.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(month.compact(), "202402");
        assert_eq!(month.slash_date(), "2024/02/01");
    }

    #[test]
    fn rejects_malformed_months() {
        for value in ["2024", "2024-02", "202413", "202400", "20240a", "2024021"] {
            assert!(
                matches!(
                    TargetMonth::from_compact(value),
                    Err(AttendanceError::InvalidMonth(_))
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn previous_month_wraps_year() {
        let month = TargetMonth::from_compact("202401").unwrap();
        assert_eq!(month.previous().unwrap().compact(), "202312");

        let month = TargetMonth::from_compact("202403").unwrap();
        assert_eq!(month.previous().unwrap().compact(), "202402");
    }

    #[test]
    fn start_is_midnight_in_tokyo() {
        let month = TargetMonth::from_compact("202402").unwrap();
        assert_eq!(month.start().to_rfc3339(), "2024-02-01T00:00:00+09:00");
    }

    #[test]
    fn lower_bound_is_one_month_and_one_day_earlier() {
        let month = TargetMonth::from_compact("202403").unwrap();
        assert_eq!(
            month.query_lower_bound().to_rfc3339(),
            "2024-01-31T00:00:00+09:00"
        );

        let month = TargetMonth::from_compact("202401").unwrap();
        assert_eq!(
            month.query_lower_bound().to_rfc3339(),
            "2023-11-30T00:00:00+09:00"
        );
    }

    #[test]
    fn rejects_month_without_representable_query_window() {
        assert!(matches!(
            TargetMonth::containing(NaiveDate::MIN),
            Err(AttendanceError::InvalidMonth(_))
        ));
        assert!(TargetMonth::containing(NaiveDate::MAX).is_err());
    }

    #[test]
    fn tokyo_is_nine_hours_east() {
        assert_eq!(TOKYO.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn days_cover_whole_month() {
        let month = TargetMonth::from_compact("202304").unwrap();
        let days: Vec<_> = month.days().collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days[0].day(), 1);
        assert_eq!(days[29].day(), 30);
        assert!(days.iter().all(|d| month.contains(*d)));
    }
}
