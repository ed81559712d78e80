//! The weekly digest value and its deterministic content selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{self, TipId, GENERIC_TITLES};
use super::rng::SeededGenerator;

/// Placeholder for the most common item of an empty week.
pub const NO_EVENTS_NAME: &str = "N/A";

/// Overall tone of a week, from resisted vs. succumbed counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Strong,
    Tough,
    Balanced,
    NoEvents,
}

impl Mood {
    pub fn from_counts(resisted: u32, succumbed: u32) -> Self {
        if resisted == 0 && succumbed == 0 {
            Mood::NoEvents
        } else if resisted > succumbed {
            Mood::Strong
        } else if succumbed > resisted {
            Mood::Tough
        } else {
            Mood::Balanced
        }
    }
}

/// Meteorological season (northern hemisphere) of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

/// Counts for one week of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekTally {
    pub events_logged: u32,
    pub resisted_count: u32,
    pub succumbed_count: u32,
    pub most_common_name: Option<String>,
}

/// Calendar position of a digest week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekKey {
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub iso_week: u32,
    pub iso_year: i32,
    /// Local month of `week_start`.
    pub month: u32,
}

/// Aggregated report for one calendar week.
///
/// Recomputed on every query. `tip` and `title` depend only on the ISO week,
/// the ISO week-year, the streak and the week's own counts, so rendering the
/// same week twice always shows the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestModel {
    pub week_start: DateTime<Utc>,
    /// Exclusive.
    pub week_end: DateTime<Utc>,
    pub events_logged: u32,
    pub resisted_count: u32,
    pub succumbed_count: u32,
    pub most_common_name: String,
    pub streak_length: u32,
    pub tip: TipId,
    pub title: String,
    iso_week: u32,
    iso_year: i32,
    season: Season,
}

impl DigestModel {
    pub fn new(key: WeekKey, tally: WeekTally, streak_length: u32) -> Self {
        let mood = Mood::from_counts(tally.resisted_count, tally.succumbed_count);
        let season = Season::from_month(key.month);
        let most_common_name = tally
            .most_common_name
            .filter(|_| tally.events_logged > 0)
            .unwrap_or_else(|| NO_EVENTS_NAME.to_string());

        let mut rng = SeededGenerator::new(content_seed(key.iso_week, key.iso_year, streak_length));
        let tip = rng
            .choose(&TipId::ALL)
            .copied()
            .unwrap_or(TipId::CelebrateSmallWins);
        let pool = title_pool(mood, season, streak_length, &most_common_name, tally.events_logged);
        let title = rng
            .choose(&pool)
            .cloned()
            .unwrap_or_else(|| GENERIC_TITLES[0].to_string());

        Self {
            week_start: key.week_start,
            week_end: key.week_end,
            events_logged: tally.events_logged,
            resisted_count: tally.resisted_count,
            succumbed_count: tally.succumbed_count,
            most_common_name,
            streak_length,
            tip,
            title,
            iso_week: key.iso_week,
            iso_year: key.iso_year,
            season,
        }
    }

    pub fn iso_week(&self) -> u32 {
        self.iso_week
    }

    pub fn iso_year(&self) -> i32 {
        self.iso_year
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn mood(&self) -> Mood {
        Mood::from_counts(self.resisted_count, self.succumbed_count)
    }

    pub fn has_events(&self) -> bool {
        self.events_logged > 0
    }
}

/// Seed for a week's tip and title.
pub fn content_seed(iso_week: u32, iso_year: i32, streak_length: u32) -> u64 {
    let seed = i64::from(iso_week) + i64::from(iso_year) * 1_000 + i64::from(streak_length) * 100_000;
    seed as u64
}

/// Candidate titles in priority order: mood and season, mood, season,
/// generic, then the data-driven ones.
fn title_pool(
    mood: Mood,
    season: Season,
    streak_length: u32,
    most_common_name: &str,
    events_logged: u32,
) -> Vec<String> {
    let mut pool: Vec<String> = content::mood_season_titles(mood, season)
        .iter()
        .chain(content::mood_titles(mood))
        .chain(content::season_titles(season))
        .chain(GENERIC_TITLES)
        .map(|title| title.to_string())
        .collect();

    if streak_length >= 2 {
        pool.push(format!("{streak_length} Weeks and Counting"));
    }
    if events_logged > 0 {
        pool.push(format!("The {most_common_name} Chronicles"));
        pool.push(match events_logged {
            1 => "One Moment Logged".to_string(),
            n => format!("{n} Moments Logged"),
        });
    }
    pool
}
