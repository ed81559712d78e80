use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike,
    Utc,
};
use chrono_tz::Tz;

use super::{CalendarProvider, CalendarUnit, DateComponents};

/// Gregorian calendar pinned to an IANA timezone, weeks starting Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedCalendar {
    tz: Tz,
}

impl ZonedCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// UTC calendar, mostly useful in tests.
    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Parse an IANA timezone name such as `Europe/Berlin`.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(Self::new)
    }

    fn local(&self, date: DateTime<Utc>) -> NaiveDateTime {
        date.with_timezone(&self.tz).naive_local()
    }

    /// Map a local wall-clock time back to an instant.
    ///
    /// Ambiguous times (fall-back) resolve to the earlier instant. Times
    /// inside a spring-forward gap are read with the offset in force before
    /// the transition, which pushes them forward by the length of the gap.
    fn resolve_local(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        if let Some(local) = self.tz.from_local_datetime(&naive).earliest() {
            return Some(local.with_timezone(&Utc));
        }
        let before = naive.checked_sub_signed(Duration::try_days(1)?)?;
        let offset = self.tz.from_local_datetime(&before).earliest()?.offset().fix();
        let utc = naive.checked_sub_signed(Duration::try_seconds(offset.local_minus_utc() as i64)?)?;
        Some(Utc.from_utc_datetime(&utc))
    }

    fn shift_local(&self, unit: CalendarUnit, value: i64, to: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = self.local(to);
        let shifted = match unit {
            CalendarUnit::Day => local.checked_add_signed(Duration::try_days(value)?)?,
            CalendarUnit::Week => local.checked_add_signed(Duration::try_weeks(value)?)?,
            CalendarUnit::Month | CalendarUnit::Year => {
                let per = if unit == CalendarUnit::Year { 12 } else { 1 };
                let months = value.checked_mul(per)?;
                let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
                let date = if months >= 0 {
                    local.date().checked_add_months(magnitude)?
                } else {
                    local.date().checked_sub_months(magnitude)?
                };
                date.and_time(local.time())
            }
            CalendarUnit::Second | CalendarUnit::Minute | CalendarUnit::Hour => return None,
        };
        self.resolve_local(shifted)
    }
}

impl Default for ZonedCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl CalendarProvider for ZonedCalendar {
    fn timezone(&self) -> Tz {
        self.tz
    }

    fn start_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.local(date).date().and_time(NaiveTime::MIN);
        self.resolve_local(midnight).unwrap_or_else(|| {
            tracing::warn!(%date, tz = %self.tz, "could not resolve local midnight");
            date
        })
    }

    fn start_of_week(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let local = self.local(date).date();
        let back = local.weekday().num_days_from_monday() as i64;
        let monday = local
            .checked_sub_signed(Duration::days(back))
            .and_then(|monday| self.resolve_local(monday.and_time(NaiveTime::MIN)));
        monday.unwrap_or_else(|| {
            tracing::warn!(%date, tz = %self.tz, "could not resolve start of week");
            date
        })
    }

    fn date_components(&self, date: DateTime<Utc>) -> DateComponents {
        let local = self.local(date);
        let iso = local.iso_week();
        DateComponents {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
            weekday: local.weekday(),
            iso_week: iso.week(),
            iso_year: iso.year(),
        }
    }

    fn add(&self, unit: CalendarUnit, value: i64, to: DateTime<Utc>) -> DateTime<Utc> {
        let elapsed = match unit {
            CalendarUnit::Second => Duration::try_seconds(value),
            CalendarUnit::Minute => Duration::try_minutes(value),
            CalendarUnit::Hour => Duration::try_hours(value),
            _ => None,
        };
        let result = match elapsed {
            Some(elapsed) => to.checked_add_signed(elapsed),
            None => self.shift_local(unit, value, to),
        };
        result.unwrap_or_else(|| {
            tracing::warn!(%to, ?unit, value, "calendar arithmetic out of range");
            to
        })
    }

    fn with_time_of_day(&self, date: DateTime<Utc>, hour: u32, minute: u32) -> DateTime<Utc> {
        self.local(date)
            .date()
            .and_hms_opt(hour, minute, 0)
            .and_then(|naive| self.resolve_local(naive))
            .unwrap_or_else(|| {
                tracing::warn!(%date, hour, minute, "could not resolve time of day");
                date
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Granularity;
    use chrono::Weekday;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn berlin() -> ZonedCalendar {
        ZonedCalendar::new(chrono_tz::Europe::Berlin)
    }

    #[test]
    fn test_start_of_week_across_year_boundary() {
        let cal = ZonedCalendar::utc();
        // 2021-01-01 is a Friday in ISO week 53 of 2020
        assert_eq!(cal.start_of_week(utc(2021, 1, 1, 15, 0)), utc(2020, 12, 28, 0, 0));
        let c = cal.date_components(utc(2021, 1, 1, 15, 0));
        assert_eq!((c.iso_year, c.iso_week), (2020, 53));
    }

    #[test]
    fn test_start_of_week_leap_day() {
        let cal = ZonedCalendar::utc();
        assert_eq!(cal.start_of_week(utc(2024, 2, 29, 9, 0)), utc(2024, 2, 26, 0, 0));
    }

    #[test]
    fn test_start_of_week_on_monday_midnight_is_identity() {
        let cal = ZonedCalendar::utc();
        let monday = utc(2024, 3, 4, 0, 0);
        assert_eq!(cal.start_of_week(monday), monday);
    }

    #[test]
    fn test_start_of_week_sunday_belongs_to_previous_monday() {
        let cal = ZonedCalendar::utc();
        assert_eq!(cal.start_of_week(utc(2024, 3, 10, 23, 59)), utc(2024, 3, 4, 0, 0));
    }

    #[test]
    fn test_start_of_week_uses_local_date() {
        // 23:30 UTC Sunday is already Monday in Berlin
        let cal = berlin();
        let start = cal.start_of_week(utc(2024, 1, 14, 23, 30));
        assert_eq!(start, utc(2024, 1, 14, 23, 0));
        assert_eq!(cal.date_components(start).weekday, Weekday::Mon);
    }

    #[test]
    fn test_week_spanning_spring_forward_is_167_hours() {
        let cal = berlin();
        let start = cal.start_of_week(utc(2026, 3, 27, 12, 0));
        assert_eq!(start, utc(2026, 3, 22, 23, 0));
        let end = cal.add(CalendarUnit::Day, 7, start);
        assert_eq!(end, utc(2026, 3, 29, 22, 0));
        assert_eq!((end - start).num_hours(), 167);
    }

    #[test]
    fn test_week_spanning_fall_back_is_169_hours() {
        let cal = berlin();
        let start = cal.start_of_week(utc(2026, 10, 25, 12, 0));
        let end = cal.add(CalendarUnit::Week, 1, start);
        assert_eq!((end - start).num_hours(), 169);
        assert_eq!(cal.date_components(end).hour, 0);
    }

    #[test]
    fn test_start_of_day_inside_midnight_gap() {
        // Sao Paulo skipped 00:00-01:00 on 2018-11-04
        let cal = ZonedCalendar::new(chrono_tz::America::Sao_Paulo);
        let start = cal.start_of_day(utc(2018, 11, 4, 15, 0));
        assert_eq!(start, utc(2018, 11, 4, 3, 0));
        assert_eq!(cal.date_components(start).hour, 1);
    }

    #[test]
    fn test_add_day_into_gap_moves_forward() {
        let cal = berlin();
        // 2026-03-28 02:30 local, next day 02:30 does not exist
        let before = utc(2026, 3, 28, 1, 30);
        let after = cal.add(CalendarUnit::Day, 1, before);
        let c = cal.date_components(after);
        assert_eq!((c.day, c.hour, c.minute), (29, 3, 30));
    }

    #[test]
    fn test_add_day_into_ambiguous_hour_takes_earlier() {
        let cal = berlin();
        let before = utc(2026, 10, 24, 0, 30); // 02:30 CEST
        let after = cal.add(CalendarUnit::Day, 1, before);
        assert_eq!(after, utc(2026, 10, 25, 0, 30));
    }

    #[test]
    fn test_add_month_clamps_to_month_end() {
        let cal = ZonedCalendar::utc();
        assert_eq!(
            cal.add(CalendarUnit::Month, 1, utc(2024, 1, 31, 8, 0)),
            utc(2024, 2, 29, 8, 0)
        );
        assert_eq!(
            cal.add(CalendarUnit::Year, -1, utc(2024, 2, 29, 8, 0)),
            utc(2023, 2, 28, 8, 0)
        );
    }

    #[test]
    fn test_add_hours_is_elapsed_time() {
        let cal = berlin();
        let before = utc(2026, 3, 29, 0, 30); // 01:30 CET
        let after = cal.add(CalendarUnit::Hour, 1, before);
        assert_eq!(after, utc(2026, 3, 29, 1, 30));
        assert_eq!(cal.date_components(after).hour, 3);
    }

    #[test]
    fn test_add_out_of_range_returns_input() {
        let cal = ZonedCalendar::utc();
        let date = utc(2024, 1, 1, 0, 0);
        assert_eq!(cal.add(CalendarUnit::Year, i64::MAX, date), date);
    }

    #[test]
    fn test_with_time_of_day() {
        let cal = berlin();
        let noonish = cal.with_time_of_day(utc(2024, 7, 1, 5, 0), 12, 15);
        assert_eq!(noonish, utc(2024, 7, 1, 10, 15));
    }

    #[test]
    fn test_is_same_week_across_new_year() {
        let cal = ZonedCalendar::utc();
        assert!(cal.is_same(
            utc(2020, 12, 31, 10, 0),
            utc(2021, 1, 3, 10, 0),
            Granularity::WeekOfYear
        ));
        assert!(!cal.is_same(
            utc(2021, 1, 3, 10, 0),
            utc(2021, 1, 4, 10, 0),
            Granularity::WeekOfYear
        ));
        assert!(!cal.is_same(
            utc(2020, 12, 31, 10, 0),
            utc(2021, 1, 3, 10, 0),
            Granularity::Year
        ));
    }

    #[test]
    fn test_is_same_day_in_local_time() {
        let cal = berlin();
        assert!(cal.is_same_day(utc(2024, 1, 14, 23, 30), utc(2024, 1, 15, 12, 0)));
        assert!(!ZonedCalendar::utc().is_same_day(utc(2024, 1, 14, 23, 30), utc(2024, 1, 15, 12, 0)));
    }

    #[test]
    fn test_weeks_between_counts_local_weeks() {
        let cal = berlin();
        let a = utc(2026, 3, 23, 12, 0);
        let b = utc(2026, 4, 6, 12, 0);
        assert_eq!(cal.weeks_between(a, b), 2);
        assert_eq!(cal.weeks_between(b, a), -2);
    }

    #[test]
    fn test_from_name() {
        assert!(ZonedCalendar::from_name("America/New_York").is_some());
        assert!(ZonedCalendar::from_name("Mars/Olympus").is_none());
    }
}
