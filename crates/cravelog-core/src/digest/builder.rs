//! Builds a [`DigestModel`] for a week offset from a snapshot of events.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::calendar::{CalendarProvider, CalendarUnit, ZonedCalendar};
use crate::events::LoggedEvent;

use super::model::{DigestModel, WeekKey, WeekTally};

/// How far back a streak is scanned.
pub const STREAK_HORIZON_WEEKS: u32 = 52;

/// Inclusive bounds of one calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: DateTime<Utc>,
    /// Exclusive end, the next week's start.
    pub end: DateTime<Utc>,
    /// `end` minus one second; the last instant counted in this week.
    pub inclusive_end: DateTime<Utc>,
}

impl WeekWindow {
    /// The week whose start of week is that of `date`.
    ///
    /// `end` is the next week's start, so adjacent windows never overlap even
    /// when one of the Mondays has no local midnight.
    pub fn containing<C: CalendarProvider>(calendar: &C, date: DateTime<Utc>) -> Self {
        let start = calendar.start_of_week(date);
        let end = calendar.start_of_week(calendar.add(CalendarUnit::Day, 7, start));
        let inclusive_end = calendar.add(CalendarUnit::Second, -1, end);
        Self {
            start,
            end,
            inclusive_end,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.inclusive_end
    }

    /// The week before this one.
    pub fn previous<C: CalendarProvider>(&self, calendar: &C) -> Self {
        Self::containing(calendar, calendar.add(CalendarUnit::Week, -1, self.start))
    }
}

/// Computes digests relative to a fixed `now`.
pub struct DigestModelBuilder<'a, C = ZonedCalendar> {
    events: &'a [LoggedEvent],
    now: DateTime<Utc>,
    calendar: C,
}

impl<'a> DigestModelBuilder<'a, ZonedCalendar> {
    /// Builder over a UTC calendar.
    pub fn new(events: &'a [LoggedEvent], now: DateTime<Utc>) -> Self {
        Self::with_calendar(events, now, ZonedCalendar::utc())
    }
}

impl<'a, C: CalendarProvider> DigestModelBuilder<'a, C> {
    pub fn with_calendar(events: &'a [LoggedEvent], now: DateTime<Utc>, calendar: C) -> Self {
        Self {
            events,
            now,
            calendar,
        }
    }

    /// Digest for the week `offset` weeks before the week containing `now`.
    pub fn digest(&self, offset: u32) -> DigestModel {
        let base = self
            .calendar
            .add(CalendarUnit::Week, -i64::from(offset), self.now);
        let window = WeekWindow::containing(&self.calendar, base);

        let tally = self.tally(&window);
        let streak_length = self.streak_length(window);
        let components = self.calendar.date_components(window.start);

        tracing::debug!(
            offset,
            week_start = %window.start,
            week_end = %window.end,
            events = tally.events_logged,
            streak = streak_length,
            "computed digest"
        );

        DigestModel::new(
            WeekKey {
                week_start: window.start,
                week_end: window.end,
                iso_week: components.iso_week,
                iso_year: components.iso_year,
                month: components.month,
            },
            tally,
            streak_length,
        )
    }

    pub fn digests(&self, offsets: &[u32]) -> Vec<DigestModel> {
        offsets.iter().map(|&offset| self.digest(offset)).collect()
    }

    fn tally(&self, window: &WeekWindow) -> WeekTally {
        let mut tally = WeekTally::default();
        let mut counts: HashMap<&str, u32> = HashMap::new();

        for event in self.events.iter().filter(|e| window.contains(e.timestamp)) {
            tally.events_logged += 1;
            if event.resisted() {
                tally.resisted_count += 1;
            } else {
                tally.succumbed_count += 1;
            }
            *counts.entry(event.name.as_str()).or_insert(0) += 1;
        }

        tally.most_common_name = most_common(&counts);
        tally
    }

    /// Contiguous non-empty weeks ending at `window`, newest first.
    fn streak_length(&self, mut window: WeekWindow) -> u32 {
        let mut streak = 0;
        for _ in 0..STREAK_HORIZON_WEEKS {
            if !self.events.iter().any(|e| window.contains(e.timestamp)) {
                break;
            }
            streak += 1;
            window = window.previous(&self.calendar);
        }
        streak
    }
}

/// Highest count wins; equal counts go to the alphabetically first name.
fn most_common(counts: &HashMap<&str, u32>) -> Option<String> {
    counts
        .iter()
        .max_by(|(a_name, a_count), (b_name, b_count)| {
            a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
        })
        .map(|(name, _)| name.to_string())
}
