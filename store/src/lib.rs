//! Storage for users, mood entries and exercise sessions.
//!
//! The [`MoodStore`] trait is the single seam between the service and its
//! persistence backend; [`MemStore`] is the in-memory implementation used in
//! production today. Mood ratings are validated here, at the ingestion
//! boundary, so downstream consumers such as the pattern classifier can
//! trust their input.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub mod mem;
pub mod model;

pub use mem::MemStore;
pub use model::{
    ExerciseSession, MoodEntry, NewExerciseSession, NewMoodEntry, NewUser, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown user {0}")]
    UnknownUser(i64),
    #[error("mood rating {0} is outside the 1-5 scale")]
    InvalidMood(u8),
}

/// Persistence operations required by the wellness service.
#[async_trait]
pub trait MoodStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn user(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Insert a mood entry after validating the rating and the user.
    async fn add_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry, StoreError>;

    /// All of a user's entries, newest first.
    async fn mood_entries(&self, user_id: i64) -> Result<Vec<MoodEntry>, StoreError>;

    /// Entries from the last `days` days, newest first.
    async fn recent_mood_trend(
        &self,
        user_id: i64,
        days: i64,
    ) -> Result<Vec<MoodEntry>, StoreError>;

    async fn add_exercise_session(
        &self,
        session: NewExerciseSession,
    ) -> Result<ExerciseSession, StoreError>;

    /// A user's completed sessions, newest first.
    async fn exercise_sessions(&self, user_id: i64) -> Result<Vec<ExerciseSession>, StoreError>;
}

pub(crate) fn trend_cutoff(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}
