//! Mood vocabulary and the four-period mood timeline.
//!
//! Categories constrain which feelings are meaningful, but stored periods keep
//! their raw strings: a feeling from another category is reported by
//! [`MoodEntry::is_consistent`] and never rewritten.

use super::lenient;
use crate::constants::DEFAULT_MOOD_LEVEL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of mood categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodCategory {
    PositiveHighEnergy,
    NeutralBalanced,
    LowEnergyTired,
    NegativeHeavy,
    Cognitive,
}

impl MoodCategory {
    /// Every category, in presentation order.
    pub const ALL: [MoodCategory; 5] = [
        MoodCategory::PositiveHighEnergy,
        MoodCategory::NeutralBalanced,
        MoodCategory::LowEnergyTired,
        MoodCategory::NegativeHeavy,
        MoodCategory::Cognitive,
    ];

    /// Key stored in `mood_category`.
    pub fn key(self) -> &'static str {
        match self {
            MoodCategory::PositiveHighEnergy => "positive_high_energy",
            MoodCategory::NeutralBalanced => "neutral_balanced",
            MoodCategory::LowEnergyTired => "low_energy_tired",
            MoodCategory::NegativeHeavy => "negative_heavy",
            MoodCategory::Cognitive => "cognitive",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MoodCategory::PositiveHighEnergy => "Positive High Energy",
            MoodCategory::NeutralBalanced => "Neutral Balanced",
            MoodCategory::LowEnergyTired => "Low Energy Tired",
            MoodCategory::NegativeHeavy => "Negative Heavy",
            MoodCategory::Cognitive => "Cognitive",
        }
    }

    /// Feelings allowed under this category.
    pub fn feelings(self) -> &'static [&'static str] {
        match self {
            MoodCategory::PositiveHighEnergy => &[
                "happy",
                "calm",
                "peaceful",
                "relaxed",
                "content",
                "motivated",
                "energetic",
                "confident",
                "hopeful",
                "satisfied",
            ],
            MoodCategory::NeutralBalanced => &[
                "neutral",
                "normal",
                "stable",
                "okay",
                "composed",
                "indifferent",
            ],
            MoodCategory::LowEnergyTired => {
                &["tired", "sleepy", "exhausted", "lazy", "drained", "dull"]
            }
            MoodCategory::NegativeHeavy => &[
                "stressed",
                "anxious",
                "irritated",
                "frustrated",
                "overwhelmed",
                "sad",
                "low",
                "lonely",
                "bored",
            ],
            MoodCategory::Cognitive => &[
                "focused",
                "distracted",
                "confused",
                "overthinking",
                "mentally_heavy",
                "mentally_clear",
            ],
        }
    }

    pub fn allows(self, feeling: &str) -> bool {
        self.feelings().contains(&feeling)
    }
}

impl fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MoodCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoodCategory::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("Unknown mood category: {}", s))
    }
}

/// Emoji shown next to a 1-10 mood level.
pub fn mood_emoji(level: u8) -> &'static str {
    match level {
        9.. => "🌟",
        7..=8 => "😊",
        5..=6 => "😐",
        3..=4 => "😔",
        _ => "😢",
    }
}

/// One period's mood capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodEntry {
    #[serde(deserialize_with = "lenient::mood_level")]
    pub mood_level: u8,
    #[serde(deserialize_with = "lenient::text")]
    pub mood_category: String,
    #[serde(deserialize_with = "lenient::text")]
    pub mood_feeling: String,
}

impl Default for MoodEntry {
    fn default() -> Self {
        MoodEntry {
            mood_level: DEFAULT_MOOD_LEVEL,
            mood_category: String::new(),
            mood_feeling: String::new(),
        }
    }
}

impl MoodEntry {
    /// The parsed category, if the stored key is one of the known ones.
    pub fn category(&self) -> Option<MoodCategory> {
        self.mood_category.parse().ok()
    }

    /// True when both category and feeling are filled in.
    pub fn is_filled(&self) -> bool {
        !self.mood_category.is_empty() && !self.mood_feeling.is_empty()
    }

    /// Whether the feeling belongs to the selected category's vocabulary.
    ///
    /// An empty feeling is consistent with anything. An unknown category makes
    /// every non-empty feeling inconsistent.
    pub fn is_consistent(&self) -> bool {
        if self.mood_feeling.is_empty() {
            return true;
        }
        self.category()
            .is_some_and(|category| category.allows(&self.mood_feeling))
    }

    /// Feelings the UI may offer for the current category.
    pub fn allowed_feelings(&self) -> &'static [&'static str] {
        self.category().map_or(&[], MoodCategory::feelings)
    }
}

/// Day periods of the mood timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Morning,
        Period::Afternoon,
        Period::Evening,
        Period::Night,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::Evening => "evening",
            Period::Night => "night",
        }
    }
}

/// The four-period timeline. Every period is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodTimeline {
    #[serde(deserialize_with = "lenient::section")]
    pub morning: MoodEntry,
    #[serde(deserialize_with = "lenient::section")]
    pub afternoon: MoodEntry,
    #[serde(deserialize_with = "lenient::section")]
    pub evening: MoodEntry,
    #[serde(deserialize_with = "lenient::section")]
    pub night: MoodEntry,
}

impl MoodTimeline {
    pub fn get(&self, period: Period) -> &MoodEntry {
        match period {
            Period::Morning => &self.morning,
            Period::Afternoon => &self.afternoon,
            Period::Evening => &self.evening,
            Period::Night => &self.night,
        }
    }

    pub fn get_mut(&mut self, period: Period) -> &mut MoodEntry {
        match period {
            Period::Morning => &mut self.morning,
            Period::Afternoon => &mut self.afternoon,
            Period::Evening => &mut self.evening,
            Period::Night => &mut self.night,
        }
    }

    /// Periods paired with their entries, morning first.
    pub fn periods(&self) -> impl Iterator<Item = (Period, &MoodEntry)> {
        Period::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    pub fn all_filled(&self) -> bool {
        self.periods().all(|(_, entry)| entry.is_filled())
    }

    /// Periods whose feeling does not belong to their category.
    pub fn inconsistent_periods(&self) -> Vec<Period> {
        self.periods()
            .filter(|(_, entry)| !entry.is_consistent())
            .map(|(period, _)| period)
            .collect()
    }
}
