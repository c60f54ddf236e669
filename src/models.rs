use serde::{Deserialize, Deserializer, Serialize};

fn default_difficulty() -> i32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub department: String,
    pub credits: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: i32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub gened: Vec<String>,
    #[serde(default)]
    pub career_relevance: Vec<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub schedule: Vec<TimeSlot>,
    #[serde(default)]
    pub average_gpa: Option<f64>,
    #[serde(default)]
    pub syllabus: Option<String>,
    #[serde(default)]
    pub syllabus_topics: Vec<String>,
    #[serde(default)]
    pub syllabus_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: String,
    #[serde(default)]
    pub major: Vec<String>,
    #[serde(default)]
    pub minor: Vec<String>,
    #[serde(default)]
    pub gpa: f64,
    #[serde(default)]
    pub completed_courses: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub career_goals: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_preference: i32,
    #[serde(default)]
    pub gened_remaining: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub teaching_style: String,
    #[serde(default)]
    pub entrepreneurship: bool,
}

/// Difficulty wish expressed in a query, as opposed to the 1-5 scale a
/// profile carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyPreference {
    Easy,
    Moderate,
    Challenging,
    #[default]
    Unset,
}

impl<'de> Deserialize<'de> for DifficultyPreference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The judgment service sends null or free-form strings here; anything
        // unrecognized counts as unset rather than a parse failure.
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::to_lowercase).as_deref() {
            Some("easy") => DifficultyPreference::Easy,
            Some("moderate") => DifficultyPreference::Moderate,
            Some("challenging") => DifficultyPreference::Challenging,
            _ => DifficultyPreference::Unset,
        })
    }
}

/// Structured interpretation of one free-text query. Built fresh per
/// `recommend` call, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryIntent {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub career_goals: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub schedule_preferences: Vec<String>,
    #[serde(default)]
    pub difficulty_preference: DifficultyPreference,
    #[serde(default)]
    pub instructor_preferences: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub course: Course,
    pub score: i32,
    pub reasons: Vec<String>,
    pub instructor: Option<Instructor>,
}
