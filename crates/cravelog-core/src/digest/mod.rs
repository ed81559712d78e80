//! Weekly digest: per-week summaries of logged events, the list of weeks
//! that have one, and the unlock gate for the current week.

mod builder;
mod content;
mod model;
mod rng;
mod unlock;
mod weeks;

pub use builder::{DigestModelBuilder, WeekWindow, STREAK_HORIZON_WEEKS};
pub use content::TipId;
pub use model::{content_seed, DigestModel, Mood, Season, WeekKey, WeekTally, NO_EVENTS_NAME};
pub use rng::SeededGenerator;
pub use unlock::{
    AvailabilityState, DigestUnlockHandler, UnlockClock, UnlockSchedule, DIGEST_THREAD_ID,
};
pub use weeks::{DigestWeekBuilder, EMPTY_HISTORY_OFFSETS};
