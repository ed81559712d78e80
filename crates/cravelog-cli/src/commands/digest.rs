use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use cravelog_core::digest::{
    AvailabilityState, DigestModel, DigestModelBuilder, DigestUnlockHandler, DigestWeekBuilder,
    UnlockClock,
};
use cravelog_core::notify::NoopNotificationCenter;
use cravelog_core::storage::Database;
use cravelog_core::{Config, LoggedEvent, ZonedCalendar};

#[derive(Subcommand)]
pub enum DigestAction {
    /// List pageable week offsets, oldest first
    Offsets {
        #[command(flatten)]
        input: Input,
    },
    /// Show the digest for one week
    Show {
        #[command(flatten)]
        input: Input,
        /// Weeks before the current one (0 = this week)
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show whether a week's digest is locked
    Status {
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Unlock at this instant instead of the configured time (RFC 3339)
        #[arg(long)]
        unlock_at: Option<DateTime<Utc>>,
    },
    /// Record that this week's digest has been revealed
    Unlock {
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Record the "digest is ready" notification if one is due
    Nudge {
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

#[derive(Args)]
pub struct Input {
    /// JSON array of logged events; omit for an empty history
    #[arg(long)]
    events: Option<PathBuf>,
    /// Evaluate at this instant instead of the current time (RFC 3339)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

impl Input {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn load_events(&self) -> Result<Vec<LoggedEvent>, Box<dyn std::error::Error>> {
        let Some(path) = &self.events else {
            return Ok(Vec::new());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let events: Vec<LoggedEvent> = serde_json::from_str(&content)?;
        tracing::debug!(count = events.len(), path = %path.display(), "loaded events");
        Ok(events)
    }

    fn digest(
        &self,
        calendar: ZonedCalendar,
        offset: u32,
    ) -> Result<DigestModel, Box<dyn std::error::Error>> {
        let events = self.load_events()?;
        Ok(DigestModelBuilder::with_calendar(&events, self.now(), calendar).digest(offset))
    }
}

type Handler<'a> = DigestUnlockHandler<&'a mut Database, NoopNotificationCenter>;

fn handler<'a>(
    db: &'a mut Database,
    config: &Config,
    calendar: ZonedCalendar,
) -> Result<Handler<'a>, Box<dyn std::error::Error>> {
    Ok(DigestUnlockHandler::new(
        db,
        NoopNotificationCenter,
        calendar,
        config.unlock_schedule()?,
    ))
}

pub fn run(action: DigestAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let calendar = config.calendar()?;

    match action {
        DigestAction::Offsets { input } => {
            let events = input.load_events()?;
            let offsets =
                DigestWeekBuilder::with_calendar(&events, input.now(), calendar).available_offsets();
            println!("{}", serde_json::to_string_pretty(&offsets)?);
        }
        DigestAction::Show { input, offset } => {
            let digest = input.digest(calendar, offset)?;
            println!("{}", serde_json::to_string_pretty(&digest)?);
        }
        DigestAction::Status {
            input,
            offset,
            unlock_at,
        } => {
            let digest = input.digest(calendar, offset)?;
            let mut clock = UnlockClock::at(input.now());
            if let Some(at) = unlock_at {
                clock = clock.with_override(at);
            }

            let mut db = Database::open()?;
            let handler = handler(&mut db, &config, calendar)?;
            let state = handler.availability_state(&digest, clock);
            let status = serde_json::json!({
                "week_start": digest.week_start,
                "state": state,
                "unlock_time": handler.unlock_time(&digest, clock),
                "message": (state == AvailabilityState::Locked)
                    .then(|| handler.unlock_message(&digest, clock)),
                "nudge_sent": handler.has_nudge_sent(&digest),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        DigestAction::Unlock { input, offset } => {
            let digest = input.digest(calendar, offset)?;
            let clock = UnlockClock::at(input.now());

            let mut db = Database::open()?;
            let mut handler = handler(&mut db, &config, calendar)?;
            match handler.availability_state(&digest, clock) {
                AvailabilityState::Locked => {
                    return Err(format!(
                        "digest is locked. {}",
                        handler.unlock_message(&digest, clock)
                    )
                    .into());
                }
                AvailabilityState::Unlockable => {
                    handler.mark_unlocked(&digest)?;
                    handler.clear_delivered_notifications();
                    println!("unlocked");
                }
                AvailabilityState::Unlocked => println!("already unlocked"),
            }
        }
        DigestAction::Nudge { input, offset } => {
            let digest = input.digest(calendar, offset)?;
            let clock = UnlockClock::at(input.now());

            let mut db = Database::open()?;
            let mut handler = handler(&mut db, &config, calendar)?;
            if handler.should_nudge(&digest, clock) {
                handler.mark_nudge_sent(&digest)?;
                println!("nudge recorded");
            } else {
                println!("no nudge due");
            }
        }
    }
    Ok(())
}
