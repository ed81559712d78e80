//! Which week offsets the digest pager can show.

use chrono::{DateTime, Utc};

use crate::calendar::{CalendarProvider, CalendarUnit, ZonedCalendar};
use crate::events::LoggedEvent;

use super::builder::WeekWindow;

/// Offsets shown before anything has been logged: last week and this week.
pub const EMPTY_HISTORY_OFFSETS: [u32; 2] = [1, 0];

/// Computes pageable week offsets from the event history.
pub struct DigestWeekBuilder<'a, C = ZonedCalendar> {
    events: &'a [LoggedEvent],
    now: DateTime<Utc>,
    calendar: C,
}

impl<'a> DigestWeekBuilder<'a, ZonedCalendar> {
    pub fn new(events: &'a [LoggedEvent], now: DateTime<Utc>) -> Self {
        Self::with_calendar(events, now, ZonedCalendar::utc())
    }
}

impl<'a, C: CalendarProvider> DigestWeekBuilder<'a, C> {
    pub fn with_calendar(events: &'a [LoggedEvent], now: DateTime<Utc>, calendar: C) -> Self {
        Self {
            events,
            now,
            calendar,
        }
    }

    /// Offsets from the oldest pageable week down to `0`, the current week.
    ///
    /// Every week from the first one with an event through the current week
    /// is included, empty gap weeks too. At most one empty week before the
    /// first active week is kept.
    pub fn available_offsets(&self) -> Vec<u32> {
        let Some(earliest) = self.events.iter().map(|e| e.timestamp).min() else {
            return EMPTY_HISTORY_OFFSETS.to_vec();
        };

        let current = WeekWindow::containing(&self.calendar, self.now);
        let weeks = self.week_windows(earliest.min(current.start), current);

        let Some(first_active) = weeks
            .iter()
            .position(|week| self.events.iter().any(|e| week.contains(e.timestamp)))
        else {
            tracing::debug!(%earliest, "no events up to the current week");
            return EMPTY_HISTORY_OFFSETS.to_vec();
        };

        let mut offsets: Vec<u32> = weeks[first_active.saturating_sub(1)..]
            .iter()
            .filter_map(|week| {
                u32::try_from(self.calendar.weeks_between(week.start, current.start)).ok()
            })
            .collect();
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets
    }

    /// Contiguous week windows from the week containing `from` to `current`.
    fn week_windows(&self, from: DateTime<Utc>, current: WeekWindow) -> Vec<WeekWindow> {
        let mut weeks = Vec::new();
        let mut week = WeekWindow::containing(&self.calendar, from);
        while week.start <= current.start {
            weeks.push(week);
            let next = WeekWindow::containing(
                &self.calendar,
                self.calendar.add(CalendarUnit::Week, 1, week.start),
            );
            if next.start <= week.start {
                tracing::warn!(week_start = %week.start, "week iteration did not advance");
                break;
            }
            week = next;
        }
        weeks
    }
}
