//! Static tip and title pools for the weekly digest.

use serde::{Deserialize, Serialize};

use super::model::{Mood, Season};

/// A tip shown at the bottom of a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipId {
    DrinkWaterFirst,
    WaitTenMinutes,
    NameTheTrigger,
    PlanYourSnacks,
    EatSlowly,
    SleepMatters,
    MoveYourBody,
    KeepItOutOfSight,
    PortionInAdvance,
    CheckYourMood,
    CelebrateSmallWins,
    BeKindToYourself,
}

impl TipId {
    pub const ALL: [TipId; 12] = [
        TipId::DrinkWaterFirst,
        TipId::WaitTenMinutes,
        TipId::NameTheTrigger,
        TipId::PlanYourSnacks,
        TipId::EatSlowly,
        TipId::SleepMatters,
        TipId::MoveYourBody,
        TipId::KeepItOutOfSight,
        TipId::PortionInAdvance,
        TipId::CheckYourMood,
        TipId::CelebrateSmallWins,
        TipId::BeKindToYourself,
    ];

    pub fn text(&self) -> &'static str {
        match self {
            TipId::DrinkWaterFirst => "Thirst often feels like hunger. Try a glass of water before you reach for a snack.",
            TipId::WaitTenMinutes => "Cravings peak and fade. Set a ten minute timer and see if it still matters.",
            TipId::NameTheTrigger => "Write down what happened right before a craving. Patterns show up fast.",
            TipId::PlanYourSnacks => "Decide on tomorrow's snacks today, while you are not hungry.",
            TipId::EatSlowly => "Put the fork down between bites. Fullness takes about twenty minutes to register.",
            TipId::SleepMatters => "Short nights make cravings louder. Protect your sleep this week.",
            TipId::MoveYourBody => "A short walk can take the edge off a craving.",
            TipId::KeepItOutOfSight => "Out of sight really is out of mind. Move tempting food off the counter.",
            TipId::PortionInAdvance => "Serve a portion onto a plate instead of eating from the bag.",
            TipId::CheckYourMood => "Ask yourself whether you are hungry, bored, tired or stressed.",
            TipId::CelebrateSmallWins => "Every craving you log is information. Count it as progress.",
            TipId::BeKindToYourself => "One rough day does not undo a good week. Reset and keep going.",
        }
    }
}

pub(crate) fn mood_season_titles(mood: Mood, season: Season) -> &'static [&'static str] {
    match (mood, season) {
        (Mood::Strong, Season::Winter) => &["Frost-Proof Willpower", "Cold Days, Steady Hands"],
        (Mood::Strong, Season::Spring) => &["In Full Bloom", "Spring in Your Step"],
        (Mood::Strong, Season::Summer) => &["Heatwave of Resolve", "Sunny Side of Strong"],
        (Mood::Strong, Season::Autumn) => &["Harvest of Wins", "Falling Into Good Habits"],
        (Mood::Tough, Season::Winter) => &["Weathering the Storm", "A Long Winter Week"],
        (Mood::Tough, Season::Spring) => &["Spring Showers", "Growing Pains"],
        (Mood::Tough, Season::Summer) => &["Summer Slump", "Melting Moments"],
        (Mood::Tough, Season::Autumn) => &["Leaves Fall, You Get Back Up", "Autumn Wobbles"],
        (Mood::Balanced, Season::Winter) => &["Even Keel in the Cold"],
        (Mood::Balanced, Season::Spring) => &["Spring Equinox"],
        (Mood::Balanced, Season::Summer) => &["Midsummer Balance"],
        (Mood::Balanced, Season::Autumn) => &["Autumn Equilibrium"],
        (Mood::NoEvents, Season::Winter) => &["Hibernation Mode"],
        (Mood::NoEvents, Season::Spring) => &["A Quiet Spring Week"],
        (Mood::NoEvents, Season::Summer) => &["Gone to the Beach"],
        (Mood::NoEvents, Season::Autumn) => &["Quiet as Falling Leaves"],
    }
}

pub(crate) fn mood_titles(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Strong => &["Unshakeable", "Craving Crusher", "Steel Resolve", "On a Roll"],
        Mood::Tough => &["Tough Week, Tougher You", "Room to Grow", "Still Showing Up"],
        Mood::Balanced => &["Finding Your Balance", "Give and Take", "Middle Ground"],
        Mood::NoEvents => &["A Blank Page", "Fresh Start"],
    }
}

pub(crate) fn season_titles(season: Season) -> &'static [&'static str] {
    match season {
        Season::Winter => &["Winter Recap", "Snow Day Summary"],
        Season::Spring => &["Spring Recap", "Spring Check-In"],
        Season::Summer => &["Summer Recap", "Sunshine Summary"],
        Season::Autumn => &["Autumn Recap", "Sweater Weather Summary"],
    }
}

pub(crate) const GENERIC_TITLES: &[&str] = &[
    "Your Week in Review",
    "The Weekly Rundown",
    "Seven Days, Summarized",
    "Week at a Glance",
    "Your Craving Report",
];
