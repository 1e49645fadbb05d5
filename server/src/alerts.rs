//! Event-driven escalation of mood patterns.
//!
//! [`escalate`] runs after every mood write: it loads the user's recent
//! window, classifies it, pushes any actionable verdict to WebSocket
//! subscribers and, on a critical verdict, queues a guardian email. Mail
//! delivery happens on a spawned task so responses never wait on it, and a
//! given window triggers at most one send.

use notify::Alert;
use pattern::{MoodSample, Verdict};
use serde::Serialize;
use store::{MoodEntry, User};
use tracing::{debug, error, warn};

use crate::web::AppState;

/// Days of history the classifier window is drawn from.
pub const TREND_DAYS: i64 = 7;

/// Pushed to WebSocket clients when a mood write yields a verdict.
#[derive(Clone, Debug, Serialize)]
pub struct AlertEvent {
    pub user_id: i64,
    pub verdict: Verdict,
}

/// Convert a newest-first trend into the classifier's capped window.
pub fn window_samples(entries: &[MoodEntry]) -> Vec<MoodSample> {
    entries
        .iter()
        .take(pattern::WINDOW)
        .map(|e| MoodSample::new(e.mood))
        .collect()
}

/// Build the guardian alert for a user's current window.
pub fn guardian_alert(user: &User, to: String, entries: &[MoodEntry]) -> Alert {
    let low = entries.iter().filter(|e| e.mood <= 2).count();
    Alert {
        to,
        guardian_name: user
            .guardian_name
            .clone()
            .unwrap_or_else(|| "Guardian".to_string()),
        student_name: user.username.clone(),
        details: format!(
            "{low} entries with low mood in the last {TREND_DAYS} days. \
            The records show a concerning trend that needs attention."
        ),
    }
}

/// Classify `user_id`'s current window and fan out any resulting alert.
pub async fn escalate(state: &AppState, user_id: i64) {
    let entries = match state.store.recent_mood_trend(user_id, TREND_DAYS).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("could not load mood trend for user {user_id}: {e}");
            return;
        }
    };

    let verdict = pattern::classify(&window_samples(&entries));
    if verdict.is_none() {
        return;
    }
    debug!(user_id, ?verdict, "pattern verdict");
    state.broadcast(AlertEvent {
        user_id,
        verdict: verdict.clone(),
    });

    if !verdict.is_critical() {
        return;
    }
    if !state.mark_notified(user_id, &entries) {
        debug!(user_id, "window already triggered a guardian alert");
        return;
    }

    let user = match state.store.user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            warn!("could not load user {user_id}: {e}");
            return;
        }
    };
    let Some(email) = user.guardian_email.clone() else {
        debug!(user_id, "no guardian email on file, skipping notification");
        return;
    };

    let alert = guardian_alert(&user, email, &entries);
    let gateway = state.gateway.clone();
    tokio::spawn(async move {
        if let Err(e) = gateway.send(&alert).await {
            error!("guardian alert delivery failed: {e}");
        }
    });
}
