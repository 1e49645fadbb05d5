//! In-memory [`MoodStore`] backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::model::{
    ExerciseSession, MoodEntry, NewExerciseSession, NewMoodEntry, NewUser, User,
};
use crate::{trend_cutoff, MoodStore, StoreError};

/// Map-backed store with monotonically increasing ids.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<i64, User>,
    moods: Vec<MoodEntry>,
    sessions: Vec<ExerciseSession>,
    next_user_id: i64,
    next_mood_id: i64,
    next_session_id: i64,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort newest first; ids break ties between same-instant writes.
fn newest_first<T, K: Fn(&T) -> (chrono::DateTime<Utc>, i64)>(items: &mut [T], key: K) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl MoodStore for MemStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: user.username,
            age: user.age,
            gender: user.gender,
            guardian_email: user.guardian_email.filter(|e| !e.is_empty()),
            guardian_name: user.guardian_name.filter(|n| !n.is_empty()),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        log::debug!("created user {}", user.id);
        Ok(user)
    }

    async fn user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn add_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry, StoreError> {
        if !(1..=5).contains(&entry.mood) {
            return Err(StoreError::InvalidMood(entry.mood));
        }
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(&entry.user_id) {
            return Err(StoreError::UnknownUser(entry.user_id));
        }
        inner.next_mood_id += 1;
        let entry = MoodEntry {
            id: inner.next_mood_id,
            user_id: entry.user_id,
            mood: entry.mood,
            notes: entry.notes.filter(|n| !n.is_empty()),
            date: Utc::now(),
        };
        inner.moods.push(entry.clone());
        Ok(entry)
    }

    async fn mood_entries(&self, user_id: i64) -> Result<Vec<MoodEntry>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut entries: Vec<MoodEntry> = inner
            .moods
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut entries, |e| (e.date, e.id));
        Ok(entries)
    }

    async fn recent_mood_trend(
        &self,
        user_id: i64,
        days: i64,
    ) -> Result<Vec<MoodEntry>, StoreError> {
        let cutoff = trend_cutoff(Utc::now(), days);
        let inner = self.inner.lock().unwrap();
        let mut entries: Vec<MoodEntry> = inner
            .moods
            .iter()
            .filter(|e| e.user_id == user_id && e.date >= cutoff)
            .cloned()
            .collect();
        newest_first(&mut entries, |e| (e.date, e.id));
        Ok(entries)
    }

    async fn add_exercise_session(
        &self,
        session: NewExerciseSession,
    ) -> Result<ExerciseSession, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(&session.user_id) {
            return Err(StoreError::UnknownUser(session.user_id));
        }
        inner.next_session_id += 1;
        let session = ExerciseSession {
            id: inner.next_session_id,
            user_id: session.user_id,
            kind: session.kind,
            duration_secs: session.duration_secs,
            completed_at: Utc::now(),
        };
        inner.sessions.push(session.clone());
        Ok(session)
    }

    async fn exercise_sessions(&self, user_id: i64) -> Result<Vec<ExerciseSession>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut sessions: Vec<ExerciseSession> = inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut sessions, |s| (s.completed_at, s.id));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exercise::ExerciseKind;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.into(),
            age: 16,
            gender: "female".into(),
            guardian_email: None,
            guardian_name: None,
        }
    }

    #[tokio::test]
    async fn users_get_sequential_ids() {
        let store = MemStore::new();
        let a = store.create_user(new_user("ana")).await.unwrap();
        let b = store.create_user(new_user("ben")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.user(1).await.unwrap().unwrap().username, "ana");
        assert!(store.user(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_guardian_fields_are_dropped() {
        let store = MemStore::new();
        let user = store
            .create_user(NewUser {
                guardian_email: Some(String::new()),
                guardian_name: Some(String::new()),
                ..new_user("ana")
            })
            .await
            .unwrap();
        assert!(user.guardian_email.is_none());
        assert!(user.guardian_name.is_none());
    }

    #[tokio::test]
    async fn mood_entries_come_back_newest_first() {
        let store = MemStore::new();
        let user = store.create_user(new_user("ana")).await.unwrap();
        for mood in [3, 1, 5] {
            store
                .add_mood_entry(NewMoodEntry {
                    user_id: user.id,
                    mood,
                    notes: None,
                })
                .await
                .unwrap();
        }
        let entries = store.mood_entries(user.id).await.unwrap();
        let moods: Vec<u8> = entries.iter().map(|e| e.mood).collect();
        assert_eq!(moods, vec![5, 1, 3]);
    }

    #[tokio::test]
    async fn out_of_range_mood_is_rejected() {
        let store = MemStore::new();
        let user = store.create_user(new_user("ana")).await.unwrap();
        for mood in [0, 6] {
            let err = store
                .add_mood_entry(NewMoodEntry {
                    user_id: user.id,
                    mood,
                    notes: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidMood(m) if m == mood));
        }
        assert!(store.mood_entries(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn entries_for_unknown_users_are_rejected() {
        let store = MemStore::new();
        let err = store
            .add_mood_entry(NewMoodEntry {
                user_id: 42,
                mood: 3,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser(42)));
    }

    #[tokio::test]
    async fn trend_window_excludes_old_entries() {
        let store = MemStore::new();
        let user = store.create_user(new_user("ana")).await.unwrap();
        store
            .add_mood_entry(NewMoodEntry {
                user_id: user.id,
                mood: 4,
                notes: None,
            })
            .await
            .unwrap();
        // Backdate a second entry past the window.
        {
            let mut inner = store.inner.lock().unwrap();
            inner.next_mood_id += 1;
            let id = inner.next_mood_id;
            inner.moods.push(MoodEntry {
                id,
                user_id: user.id,
                mood: 1,
                notes: None,
                date: Utc::now() - Duration::days(10),
            });
        }
        let trend = store.recent_mood_trend(user.id, 7).await.unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].mood, 4);
        // The full history still has both.
        assert_eq!(store.mood_entries(user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn sessions_round_trip() {
        let store = MemStore::new();
        let user = store.create_user(new_user("ana")).await.unwrap();
        store
            .add_exercise_session(NewExerciseSession {
                user_id: user.id,
                kind: ExerciseKind::Breathing,
                duration_secs: 120,
            })
            .await
            .unwrap();
        let sessions = store.exercise_sessions(user.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].kind, ExerciseKind::Breathing);
        assert_eq!(sessions[0].duration_secs, 120);
    }
}
