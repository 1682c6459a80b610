//! The diary entry document.
//!
//! An [`Entry`] is one calendar date's full record. It is a plain value
//! object: the store owns persistence, and nothing in here holds a reference
//! back to it. Field names match the JSON file format exactly, so an entry
//! serializes to the same document the store writes and the codec exports.
//!
//! Decoding is lenient (see the private `lenient` module). Unknown top-level
//! fields are kept in [`Entry::extra`] and written back unchanged.

pub mod completeness;
pub mod days;
mod lenient;
pub mod mood;

pub use completeness::{has_summary, is_complete, missing_fields, SectionGroup, SectionStatus};
pub use days::DayCounter;
pub use mood::{MoodCategory, MoodEntry, MoodTimeline, Period};

use crate::constants::{ENTRY_SCHEMA_VERSION, MAX_APP_ROWS, STATUS_NO, STATUS_YES};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Weather and surroundings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Range in the `min-max` form, see [`TemperatureRange`].
    #[serde(deserialize_with = "lenient::text")]
    pub temperature_c: String,
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub air_quality_index: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub humidity_percent: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub uv_index: Option<u32>,
    #[serde(deserialize_with = "lenient::text")]
    pub weather_condition: String,
    #[serde(deserialize_with = "lenient::text")]
    pub environment_experience: String,
}

impl Environment {
    pub fn temperature_range(&self) -> Option<TemperatureRange> {
        TemperatureRange::parse(&self.temperature_c)
    }

    pub fn set_temperature_range(&mut self, range: &TemperatureRange) {
        self.temperature_c = range.to_string();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyMeasurements {
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub weight_kg: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub height_cm: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub chest: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub belly: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthAndFitness {
    /// Free text, usually `H:MM`.
    #[serde(deserialize_with = "lenient::text")]
    pub sleep_hours: String,
    #[serde(deserialize_with = "lenient::opt_u8")]
    pub sleep_quality: Option<u8>,
    #[serde(deserialize_with = "lenient::text")]
    pub sleep_quality_description: String,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub steps_count: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub steps_distance_km: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub kilocalorie: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub water_intake_liters: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub medications_taken: String,
    #[serde(deserialize_with = "lenient::text")]
    pub physical_symptoms: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentalAndEmotionalHealth {
    #[serde(deserialize_with = "lenient::text")]
    pub mental_state: String,
    #[serde(deserialize_with = "lenient::text")]
    pub mental_state_reason: String,
    #[serde(deserialize_with = "lenient::section")]
    pub mood_timeline: MoodTimeline,
    #[serde(deserialize_with = "lenient::opt_u8")]
    pub energy_level: Option<u8>,
    #[serde(deserialize_with = "lenient::text")]
    pub energy_reason: String,
    #[serde(deserialize_with = "lenient::opt_u8")]
    pub stress_level: Option<u8>,
    #[serde(deserialize_with = "lenient::text")]
    pub stress_reason: String,
    /// `"Yes"` or `"No"`.
    #[serde(deserialize_with = "lenient::text")]
    pub meditation_status: String,
    /// Only meaningful when `meditation_status` is `"Yes"`.
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub meditation_duration_min: Option<u32>,
}

impl MentalAndEmotionalHealth {
    pub fn meditated(&self) -> bool {
        self.meditation_status == STATUS_YES
    }

    /// Meditation minutes, or 0 unless the status says the user meditated.
    pub fn effective_meditation_minutes(&self) -> u32 {
        if self.meditated() {
            self.meditation_duration_min.unwrap_or(0)
        } else {
            0
        }
    }

    /// Zeroes the stored duration when the status is not `"Yes"`.
    pub fn normalize_meditation(&mut self) {
        if !self.meditated() {
            self.meditation_duration_min = Some(0);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalCare {
    #[serde(deserialize_with = "lenient::text")]
    pub face_product_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub face_product_brand: String,
    #[serde(deserialize_with = "lenient::text")]
    pub hair_product_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub hair_product_brand: String,
    #[serde(deserialize_with = "lenient::text")]
    pub hair_oil: String,
    #[serde(deserialize_with = "lenient::text")]
    pub skincare_routine: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietAndNutrition {
    #[serde(deserialize_with = "lenient::text")]
    pub breakfast: String,
    #[serde(deserialize_with = "lenient::text")]
    pub lunch: String,
    #[serde(deserialize_with = "lenient::text")]
    pub dinner: String,
    #[serde(deserialize_with = "lenient::text")]
    pub additional_items: String,
}

/// One row of the most-used-apps list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppUsage {
    /// 1-based row position. Assigned by [`ActivitiesAndProductivity::set_app_rows`].
    #[serde(deserialize_with = "lenient::i64_or_zero")]
    pub rank: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Usage time, usually `H:MM`.
    #[serde(deserialize_with = "lenient::text")]
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivitiesAndProductivity {
    #[serde(deserialize_with = "lenient::text")]
    pub tasks_today_english: String,
    #[serde(deserialize_with = "lenient::text")]
    pub travel_destination: String,
    /// Screen-on time, usually `HH:MM`.
    #[serde(deserialize_with = "lenient::text")]
    pub phone_screen_on_hr: String,
    #[serde(deserialize_with = "lenient::apps")]
    pub most_used_apps: Vec<AppUsage>,
    #[serde(deserialize_with = "lenient::text")]
    pub app_usage_intent: String,
}

impl ActivitiesAndProductivity {
    /// Rebuilds `most_used_apps` from `(name, time)` rows in display order.
    ///
    /// Rows with both cells empty are skipped, but every kept row is ranked by
    /// its position in `rows`, so a gap leaves a gap in the ranks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when more than five rows are given.
    ///
    /// # Examples
    ///
    /// ```
    /// use daybook::entry::ActivitiesAndProductivity;
    ///
    /// let mut activities = ActivitiesAndProductivity::default();
    /// let rows = vec![
    ///     ("Mail".to_string(), "0:20".to_string()),
    ///     (String::new(), String::new()),
    ///     ("Maps".to_string(), String::new()),
    /// ];
    /// activities.set_app_rows(&rows).unwrap();
    ///
    /// let ranks: Vec<i64> = activities.most_used_apps.iter().map(|a| a.rank).collect();
    /// assert_eq!(ranks, vec![1, 3]);
    /// ```
    pub fn set_app_rows(&mut self, rows: &[(String, String)]) -> AppResult<()> {
        if rows.len() > MAX_APP_ROWS {
            return Err(AppError::Validation(format!(
                "At most {} app rows are allowed, got {}",
                MAX_APP_ROWS,
                rows.len()
            )));
        }

        self.most_used_apps = rows
            .iter()
            .enumerate()
            .filter(|(_, (name, time))| !name.is_empty() || !time.is_empty())
            .map(|(index, (name, time))| AppUsage {
                rank: index as i64 + 1,
                name: name.clone(),
                time: time.clone(),
            })
            .collect();
        Ok(())
    }

    /// Total minutes across all app rows. Unreadable times count as zero.
    pub fn total_app_minutes(&self) -> u32 {
        self.most_used_apps
            .iter()
            .filter_map(|app| clock_minutes(&app.time))
            .fold(0u32, |total, minutes| total.saturating_add(minutes))
    }

    /// True when screen time is positive and the app times add up to more.
    pub fn app_time_exceeds_screen_time(&self) -> bool {
        let screen = clock_minutes(&self.phone_screen_on_hr).unwrap_or(0);
        screen > 0 && self.total_app_minutes() > screen
    }
}

/// Parses `H:MM` (or a bare hour count) into minutes.
pub fn clock_minutes(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.split_once(':') {
        Some((hours, minutes)) => {
            let hours: u32 = hours.trim().parse().ok()?;
            let minutes: u32 = minutes.trim().parse().ok()?;
            hours.checked_mul(60)?.checked_add(minutes)
        }
        None => text.parse::<u32>().ok()?.checked_mul(60),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalNotes {
    #[serde(deserialize_with = "lenient::text")]
    pub key_events: String,
    /// `"Yes"` or `"No"`.
    #[serde(deserialize_with = "lenient::text")]
    pub other_note_status: String,
}

/// One date's diary record.
///
/// `day_id` and `weekday` are derived from `date`; call
/// [`Entry::refresh_derived`] rather than trusting stored values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    /// Schema tag, passed through untouched.
    #[serde(
        deserialize_with = "lenient::text",
        skip_serializing_if = "String::is_empty"
    )]
    pub version: String,
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(deserialize_with = "lenient::i64_or_zero")]
    pub day_id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub weekday: String,
    #[serde(deserialize_with = "lenient::section")]
    pub environment: Environment,
    #[serde(deserialize_with = "lenient::section")]
    pub body_measurements: BodyMeasurements,
    #[serde(deserialize_with = "lenient::section")]
    pub health_and_fitness: HealthAndFitness,
    #[serde(deserialize_with = "lenient::section")]
    pub mental_and_emotional_health: MentalAndEmotionalHealth,
    #[serde(deserialize_with = "lenient::section")]
    pub personal_care: PersonalCare,
    #[serde(deserialize_with = "lenient::section")]
    pub diet_and_nutrition: DietAndNutrition,
    #[serde(deserialize_with = "lenient::section")]
    pub activities_and_productivity: ActivitiesAndProductivity,
    #[serde(deserialize_with = "lenient::section")]
    pub additional_notes: AdditionalNotes,
    #[serde(deserialize_with = "lenient::text")]
    pub daily_activity_summary: String,
    #[serde(deserialize_with = "lenient::text")]
    pub overall_day_experience: String,
    /// Free-form decision records attached to the day.
    #[serde(
        deserialize_with = "lenient::json_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub decisions: Vec<Value>,
    /// Top-level fields this version does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// A fresh draft for `date` carrying the form defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use daybook::entry::{DayCounter, Entry};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let draft = Entry::draft(date, &DayCounter::default());
    ///
    /// assert_eq!(draft.date, "2024-01-01");
    /// assert_eq!(draft.weekday, "Monday");
    /// assert_eq!(draft.environment.air_quality_index, Some(100));
    /// assert_eq!(draft.health_and_fitness.sleep_hours, "8:00");
    /// ```
    pub fn draft(date: NaiveDate, counter: &DayCounter) -> Self {
        let mut entry = Entry {
            version: ENTRY_SCHEMA_VERSION.to_string(),
            date: days::date_key(date),
            ..Entry::default()
        };
        entry.apply_defaults();
        entry.refresh_derived(counter);
        entry
    }

    fn apply_defaults(&mut self) {
        self.environment.set_temperature_range(&TemperatureRange {
            min: "15".to_string(),
            max: "25".to_string(),
        });
        self.environment.air_quality_index = Some(100);
        self.environment.humidity_percent = Some(50);
        self.environment.uv_index = Some(5);

        self.health_and_fitness.sleep_hours = "8:00".to_string();
        self.health_and_fitness.medications_taken = STATUS_NO.to_string();
        self.health_and_fitness.physical_symptoms = STATUS_NO.to_string();

        let mental = &mut self.mental_and_emotional_health;
        mental.mood_timeline = MoodTimeline::default();
        mental.meditation_status = STATUS_NO.to_string();
        mental.meditation_duration_min = Some(0);

        self.additional_notes.other_note_status = STATUS_NO.to_string();
    }

    /// Recomputes `day_id` and `weekday` from `date`.
    ///
    /// Leaves both untouched if `date` is not a valid date key.
    pub fn refresh_derived(&mut self, counter: &DayCounter) {
        if let Ok(date) = days::parse_entry_date(&self.date) {
            self.day_id = counter.day_id(date);
            self.weekday = counter.weekday(date);
        }
    }

    /// The parsed `date`, if it is a valid date key.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        days::parse_entry_date(&self.date).ok()
    }

    pub fn is_complete(&self) -> bool {
        completeness::is_complete(self)
    }

    pub fn has_summary(&self) -> bool {
        completeness::has_summary(self)
    }

    pub fn section_status(&self) -> SectionStatus {
        SectionStatus::of(self)
    }

    /// Morning mood level, the figure history rows and the `happy` filter use.
    pub fn morning_mood(&self) -> u8 {
        self.mental_and_emotional_health.mood_timeline.morning.mood_level
    }
}

/// A temperature range stored as `min-max` in `temperature_c`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemperatureRange {
    pub min: String,
    pub max: String,
}

impl TemperatureRange {
    /// Splits `min-max`. A value without a separator is a lone minimum.
    ///
    /// A leading `-` belongs to the minimum, so `-5-3` reads as -5 to 3.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let separator = text
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(i, _)| i);
        Some(match separator {
            Some(i) => TemperatureRange {
                min: text[..i].trim().to_string(),
                max: text[i + 1..].trim().to_string(),
            },
            None => TemperatureRange {
                min: text.to_string(),
                max: String::new(),
            },
        })
    }
}

impl fmt::Display for TemperatureRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min.is_empty(), self.max.is_empty()) {
            (false, false) => write!(f, "{}-{}", self.min, self.max),
            (false, true) => f.write_str(&self.min),
            _ => Ok(()),
        }
    }
}
