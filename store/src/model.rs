use chrono::{DateTime, Utc};
use exercise::ExerciseKind;
use serde::{Deserialize, Serialize};

/// Registered user of the wellness app.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub age: u8,
    pub gender: String,
    /// Contact notified when a critical pattern is detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A single mood rating with optional free-text notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    /// Rating on the 1 (worst) to 5 (best) scale.
    pub mood: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

/// A completed guided exercise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub id: i64,
    pub user_id: i64,
    pub kind: ExerciseKind,
    pub duration_secs: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub age: u8,
    pub gender: String,
    #[serde(default)]
    pub guardian_email: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMoodEntry {
    pub user_id: i64,
    pub mood: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewExerciseSession {
    pub user_id: i64,
    pub kind: ExerciseKind,
    pub duration_secs: u32,
}
