//! # Cravelog Core Library
//!
//! Core logic for Cravelog's weekly digest. The CLI binary and any app shell
//! sit on top of the same library.
//!
//! ## Architecture
//!
//! - **Calendar**: timezone-aware week math behind [`CalendarProvider`]
//! - **Digest**: week summaries, the weeks available for browsing, and the
//!   time gate on the current week
//! - **Storage**: SQLite-backed flags and TOML-based configuration
//! - **Notify**: the slice of the system notification service the digest uses
//!
//! ## Key Components
//!
//! - [`DigestModelBuilder`]: builds one [`DigestModel`] per week offset
//! - [`DigestWeekBuilder`]: lists the week offsets worth showing
//! - [`DigestUnlockHandler`]: availability state and unlock bookkeeping
//! - [`Database`]: flag persistence
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod digest;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;

pub use calendar::{CalendarProvider, CalendarUnit, Granularity, ZonedCalendar};
pub use digest::{
    AvailabilityState, DigestModel, DigestModelBuilder, DigestUnlockHandler, DigestWeekBuilder,
    Mood, Season, TipId, UnlockClock, UnlockSchedule,
};
pub use error::{ConfigError, CoreError, NotifyError, StoreError};
pub use events::{LoggedEvent, Outcome};
pub use notify::{DeliveredNotification, NotificationCenter};
pub use storage::{Config, Database, FlagStore, MemoryFlagStore};
