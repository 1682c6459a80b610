//! Completeness predicates for entries.
//!
//! Two notions of "finished" exist and are kept apart on purpose:
//!
//! - [`is_complete`] is strict: every required field of all five section
//!   groups must be filled in.
//! - [`has_summary`] is loose: the daily summary is non-empty. History uses it
//!   for its `complete` filter.
//!
//! Numbers count as filled when present, text when non-empty.

use super::Entry;
use crate::constants::MAX_APP_ROWS;
use std::fmt;

/// The five section groups checked by [`is_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionGroup {
    /// Temperature, air quality, humidity, UV and weather notes.
    Environment,
    /// Body measurements together with health and fitness.
    Body,
    /// Mental state, the mood timeline, energy, stress and meditation.
    Mental,
    /// Meals together with personal care.
    Diet,
    /// Notes, summaries, activities and app usage.
    Summary,
}

impl SectionGroup {
    pub const ALL: [SectionGroup; 5] = [
        SectionGroup::Environment,
        SectionGroup::Body,
        SectionGroup::Mental,
        SectionGroup::Diet,
        SectionGroup::Summary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SectionGroup::Environment => "environment",
            SectionGroup::Body => "body & health",
            SectionGroup::Mental => "mental",
            SectionGroup::Diet => "diet & personal care",
            SectionGroup::Summary => "summary & activities",
        }
    }
}

impl fmt::Display for SectionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn filled(text: &str) -> bool {
    !text.is_empty()
}

/// Every required field of `group`, paired with whether it is filled in.
fn required_fields(entry: &Entry, group: SectionGroup) -> Vec<(&'static str, bool)> {
    match group {
        SectionGroup::Environment => {
            let env = &entry.environment;
            vec![
                ("temperature_c", filled(&env.temperature_c)),
                ("weather_condition", filled(&env.weather_condition)),
                ("air_quality_index", env.air_quality_index.is_some()),
                ("humidity_percent", env.humidity_percent.is_some()),
                ("uv_index", env.uv_index.is_some()),
                ("environment_experience", filled(&env.environment_experience)),
            ]
        }
        SectionGroup::Body => {
            let body = &entry.body_measurements;
            let health = &entry.health_and_fitness;
            vec![
                ("weight_kg", body.weight_kg.is_some()),
                ("height_cm", body.height_cm.is_some()),
                ("chest", body.chest.is_some()),
                ("belly", body.belly.is_some()),
                ("sleep_hours", filled(&health.sleep_hours)),
                ("sleep_quality", health.sleep_quality.is_some()),
                (
                    "sleep_quality_description",
                    filled(&health.sleep_quality_description),
                ),
                ("steps_count", health.steps_count.is_some()),
                ("steps_distance_km", health.steps_distance_km.is_some()),
                ("kilocalorie", health.kilocalorie.is_some()),
                ("water_intake_liters", health.water_intake_liters.is_some()),
                ("medications_taken", filled(&health.medications_taken)),
                ("physical_symptoms", filled(&health.physical_symptoms)),
            ]
        }
        SectionGroup::Mental => {
            let mental = &entry.mental_and_emotional_health;
            let timeline = &mental.mood_timeline;
            vec![
                ("mental_state", filled(&mental.mental_state)),
                ("mental_state_reason", filled(&mental.mental_state_reason)),
                ("mood_timeline.morning", timeline.morning.is_filled()),
                ("mood_timeline.afternoon", timeline.afternoon.is_filled()),
                ("mood_timeline.evening", timeline.evening.is_filled()),
                ("mood_timeline.night", timeline.night.is_filled()),
                ("energy_level", mental.energy_level.is_some()),
                ("energy_reason", filled(&mental.energy_reason)),
                ("stress_level", mental.stress_level.is_some()),
                ("stress_reason", filled(&mental.stress_reason)),
                ("meditation_status", filled(&mental.meditation_status)),
                (
                    "meditation_duration_min",
                    mental.meditation_duration_min.is_some(),
                ),
            ]
        }
        SectionGroup::Diet => {
            let diet = &entry.diet_and_nutrition;
            let care = &entry.personal_care;
            vec![
                ("breakfast", filled(&diet.breakfast)),
                ("lunch", filled(&diet.lunch)),
                ("dinner", filled(&diet.dinner)),
                ("additional_items", filled(&diet.additional_items)),
                ("face_product_name", filled(&care.face_product_name)),
                ("face_product_brand", filled(&care.face_product_brand)),
                ("hair_product_name", filled(&care.hair_product_name)),
                ("hair_product_brand", filled(&care.hair_product_brand)),
                ("hair_oil", filled(&care.hair_oil)),
                ("skincare_routine", filled(&care.skincare_routine)),
            ]
        }
        SectionGroup::Summary => {
            let notes = &entry.additional_notes;
            let activities = &entry.activities_and_productivity;
            let apps = &activities.most_used_apps;
            vec![
                ("key_events", filled(&notes.key_events)),
                ("daily_activity_summary", filled(&entry.daily_activity_summary)),
                ("overall_day_experience", filled(&entry.overall_day_experience)),
                ("other_note_status", filled(&notes.other_note_status)),
                ("tasks_today_english", filled(&activities.tasks_today_english)),
                ("travel_destination", filled(&activities.travel_destination)),
                ("phone_screen_on_hr", filled(&activities.phone_screen_on_hr)),
                (
                    "most_used_apps",
                    apps.len() == MAX_APP_ROWS
                        && apps.iter().all(|app| filled(&app.name) && filled(&app.time)),
                ),
                ("app_usage_intent", filled(&activities.app_usage_intent)),
            ]
        }
    }
}

/// Names of the required fields of `group` that are still empty.
pub fn missing_fields(entry: &Entry, group: SectionGroup) -> Vec<&'static str> {
    required_fields(entry, group)
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
}

/// Per-group completeness of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionStatus {
    pub environment: bool,
    pub body: bool,
    pub mental: bool,
    pub diet: bool,
    pub summary: bool,
}

impl SectionStatus {
    pub fn of(entry: &Entry) -> Self {
        let group_done =
            |group| required_fields(entry, group).iter().all(|(_, present)| *present);
        SectionStatus {
            environment: group_done(SectionGroup::Environment),
            body: group_done(SectionGroup::Body),
            mental: group_done(SectionGroup::Mental),
            diet: group_done(SectionGroup::Diet),
            summary: group_done(SectionGroup::Summary),
        }
    }

    pub fn get(&self, group: SectionGroup) -> bool {
        match group {
            SectionGroup::Environment => self.environment,
            SectionGroup::Body => self.body,
            SectionGroup::Mental => self.mental,
            SectionGroup::Diet => self.diet,
            SectionGroup::Summary => self.summary,
        }
    }

    pub fn all(&self) -> bool {
        SectionGroup::ALL.iter().all(|group| self.get(*group))
    }
}

/// Strict completeness: every required field of every section group is filled.
pub fn is_complete(entry: &Entry) -> bool {
    SectionStatus::of(entry).all()
}

/// Loose completeness used by history filtering: the daily summary is non-empty.
pub fn has_summary(entry: &Entry) -> bool {
    filled(&entry.daily_activity_summary)
}
