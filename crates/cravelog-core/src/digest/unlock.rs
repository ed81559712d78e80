//! Time gate for the current week's digest.
//!
//! ## States
//!
//! - **Locked**: the current week, before the scheduled unlock time
//! - **Unlockable**: unlock time has passed but the reveal has not been
//!   recorded yet; the caller plays its reveal and then calls
//!   [`DigestUnlockHandler::mark_unlocked`]
//! - **Unlocked**: the reveal was recorded, or the digest is for any week
//!   other than the current one
//!
//! The unlock and nudge records are one-way flags in a [`FlagStore`] keyed
//! by the local date of the week start.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarProvider, CalendarUnit, Granularity, ZonedCalendar};
use crate::error::Result;
use crate::notify::NotificationCenter;
use crate::storage::FlagStore;

use super::model::DigestModel;

/// Thread identifier on every digest notification.
pub const DIGEST_THREAD_ID: &str = "weekly-digest";

const UNLOCKED_KEY_PREFIX: &str = "digest_unlocked_";
const NUDGE_SENT_KEY_PREFIX: &str = "digest_nudge_sent_";

/// Visibility of a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityState {
    Locked,
    Unlockable,
    Unlocked,
}

/// Weekday and local time at which the current week unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockSchedule {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl UnlockSchedule {
    /// `None` unless `hour < 24` and `minute < 60`.
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self {
            weekday,
            hour,
            minute,
        })
    }
}

impl Default for UnlockSchedule {
    fn default() -> Self {
        Self {
            weekday: Weekday::Mon,
            hour: 12,
            minute: 15,
        }
    }
}

/// Wall clock for one availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockClock {
    pub now: DateTime<Utc>,
    /// Replaces the scheduled unlock time, but only while it falls in the
    /// same ISO week as `now`.
    pub unlock_override: Option<DateTime<Utc>>,
}

impl UnlockClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            unlock_override: None,
        }
    }

    pub fn with_override(mut self, unlock_at: DateTime<Utc>) -> Self {
        self.unlock_override = Some(unlock_at);
        self
    }
}

/// Gates the current week's digest behind its unlock time.
pub struct DigestUnlockHandler<S, N, C = ZonedCalendar> {
    store: S,
    notifications: N,
    calendar: C,
    schedule: UnlockSchedule,
}

impl<S: FlagStore, N: NotificationCenter, C: CalendarProvider> DigestUnlockHandler<S, N, C> {
    pub fn new(store: S, notifications: N, calendar: C, schedule: UnlockSchedule) -> Self {
        Self {
            store,
            notifications,
            calendar,
            schedule,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    pub fn availability_state(&self, digest: &DigestModel, clock: UnlockClock) -> AvailabilityState {
        if !self.is_current_week(digest, clock.now) {
            return AvailabilityState::Unlocked;
        }

        if clock.now < self.unlock_time(digest, clock) {
            AvailabilityState::Locked
        } else if self.read_flag(&self.unlocked_key(digest)) {
            AvailabilityState::Unlocked
        } else {
            AvailabilityState::Unlockable
        }
    }

    /// When `digest`'s week unlocks: the scheduled weekday and time within
    /// that week, unless the clock carries an override for the current week.
    pub fn unlock_time(&self, digest: &DigestModel, clock: UnlockClock) -> DateTime<Utc> {
        if let Some(unlock_at) = clock.unlock_override {
            if self
                .calendar
                .is_same(unlock_at, clock.now, Granularity::WeekOfYear)
            {
                return unlock_at;
            }
        }

        let day = self.calendar.add(
            CalendarUnit::Day,
            i64::from(self.schedule.weekday.num_days_from_monday()),
            digest.week_start,
        );
        self.calendar
            .with_time_of_day(day, self.schedule.hour, self.schedule.minute)
    }

    /// Human-readable hint such as "Check back on Monday at 12:15 PM".
    pub fn unlock_message(&self, digest: &DigestModel, clock: UnlockClock) -> String {
        let local = self
            .unlock_time(digest, clock)
            .with_timezone(&self.calendar.timezone());
        format!(
            "Check back on {} at {}",
            local.format("%A"),
            local.format("%-I:%M %p")
        )
    }

    /// Record that the reveal for `digest`'s week has finished.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub fn mark_unlocked(&mut self, digest: &DigestModel) -> Result<()> {
        let key = self.unlocked_key(digest);
        if self.read_flag(&key) {
            return Ok(());
        }
        self.store.set_flag(&key)?;
        tracing::info!(week_start = %digest.week_start, "digest marked unlocked");
        Ok(())
    }

    /// Record that the "digest is ready" notification went out.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub fn mark_nudge_sent(&mut self, digest: &DigestModel) -> Result<()> {
        let key = self.nudge_sent_key(digest);
        if self.read_flag(&key) {
            return Ok(());
        }
        self.store.set_flag(&key)?;
        tracing::info!(week_start = %digest.week_start, "digest nudge recorded");
        Ok(())
    }

    pub fn has_nudge_sent(&self, digest: &DigestModel) -> bool {
        self.read_flag(&self.nudge_sent_key(digest))
    }

    /// Whether the one-time "digest is ready" notification is due: the
    /// current week has reached its unlock time and no nudge was recorded.
    pub fn should_nudge(&self, digest: &DigestModel, clock: UnlockClock) -> bool {
        self.is_current_week(digest, clock.now)
            && clock.now >= self.unlock_time(digest, clock)
            && !self.has_nudge_sent(digest)
    }

    /// Remove delivered digest notifications. Failures are ignored.
    pub fn clear_delivered_notifications(&mut self) {
        let delivered = match self.notifications.delivered(DIGEST_THREAD_ID) {
            Ok(delivered) => delivered,
            Err(e) => {
                tracing::debug!("could not list delivered notifications: {e}");
                return;
            }
        };
        if delivered.is_empty() {
            return;
        }

        let ids: Vec<String> = delivered.into_iter().map(|n| n.id).collect();
        if let Err(e) = self.notifications.remove_delivered(&ids) {
            tracing::debug!(count = ids.len(), "could not remove delivered notifications: {e}");
        }
    }

    fn is_current_week(&self, digest: &DigestModel, now: DateTime<Utc>) -> bool {
        self.calendar
            .is_same(digest.week_start, now, Granularity::WeekOfYear)
    }

    fn read_flag(&self, key: &str) -> bool {
        self.store.flag(key).unwrap_or_else(|e| {
            tracing::warn!(key, "flag read failed, treating as unset: {e}");
            false
        })
    }

    fn unlocked_key(&self, digest: &DigestModel) -> String {
        self.week_key(UNLOCKED_KEY_PREFIX, digest)
    }

    fn nudge_sent_key(&self, digest: &DigestModel) -> String {
        self.week_key(NUDGE_SENT_KEY_PREFIX, digest)
    }

    fn week_key(&self, prefix: &str, digest: &DigestModel) -> String {
        format!(
            "{prefix}{}",
            self.calendar.local_date(digest.week_start).format("%Y-%m-%d")
        )
    }
}
