//! Timezone-aware calendar used for every week-boundary computation.
//!
//! Nothing else in the crate touches chrono's local-time resolution
//! directly. Everything goes through [`CalendarProvider`] so tests can pin a
//! timezone and the digest logic never depends on the host's locale.
//!
//! Weeks always start on Monday and are numbered per ISO-8601.

mod zoned;

pub use zoned::ZonedCalendar;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// Units accepted by [`CalendarProvider::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// Granularities accepted by [`CalendarProvider::is_same`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    /// ISO week number together with the ISO week-year.
    WeekOfYear,
    Month,
    Year,
}

/// Local wall-clock fields of an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub weekday: Weekday,
    pub iso_week: u32,
    pub iso_year: i32,
}

impl DateComponents {
    /// The local calendar date these components describe.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Calendar operations the digest needs.
///
/// Implementations resolve instants in a fixed timezone with Monday as the
/// first weekday. Arithmetic that cannot be represented returns the input
/// unchanged.
pub trait CalendarProvider {
    /// The timezone local wall-clock values are read in.
    fn timezone(&self) -> Tz;

    /// First instant of the local day containing `date`.
    fn start_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc>;

    /// Local midnight of the Monday on or before `date`.
    fn start_of_week(&self, date: DateTime<Utc>) -> DateTime<Utc>;

    fn date_components(&self, date: DateTime<Utc>) -> DateComponents;

    /// Move `to` by `value` units. Day and larger units keep the local time
    /// of day; smaller units add elapsed time.
    fn add(&self, unit: CalendarUnit, value: i64, to: DateTime<Utc>) -> DateTime<Utc>;

    /// The instant on the same local day as `date` at `hour:minute`.
    fn with_time_of_day(&self, date: DateTime<Utc>, hour: u32, minute: u32) -> DateTime<Utc>;

    fn is_same(&self, a: DateTime<Utc>, b: DateTime<Utc>, granularity: Granularity) -> bool {
        let a = self.date_components(a);
        let b = self.date_components(b);
        match granularity {
            Granularity::Day => (a.year, a.month, a.day) == (b.year, b.month, b.day),
            Granularity::WeekOfYear => (a.iso_year, a.iso_week) == (b.iso_year, b.iso_week),
            Granularity::Month => (a.year, a.month) == (b.year, b.month),
            Granularity::Year => a.year == b.year,
        }
    }

    fn is_same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.is_same(a, b, Granularity::Day)
    }

    /// Local calendar date of `date`.
    fn local_date(&self, date: DateTime<Utc>) -> NaiveDate {
        date.with_timezone(&self.timezone()).date_naive()
    }

    /// Whole weeks from the week containing `from` to the week containing
    /// `to`. Counted on local dates so a DST week still counts as one.
    fn weeks_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        let from = self.local_date(self.start_of_week(from));
        let to = self.local_date(self.start_of_week(to));
        (to - from).num_days().div_euclid(7)
    }
}
