use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use exercise::BreathPhase;
use notify::NotificationGateway;
use pattern::Verdict;
use store::{MoodEntry, MoodStore, NewExerciseSession, NewMoodEntry, NewUser, User};

use crate::alerts::{self, AlertEvent};
use crate::resources;

/// State shared across HTTP handlers and WebSocket tasks.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MoodStore>,
    pub gateway: Arc<dyn NotificationGateway>,
    alerts: broadcast::Sender<AlertEvent>,
    /// Per-user fingerprint of the last window that triggered a guardian send.
    notified: Arc<Mutex<HashMap<i64, Vec<i64>>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn MoodStore>, gateway: Arc<dyn NotificationGateway>) -> Self {
        let (alerts, _) = broadcast::channel(100);
        Self {
            store,
            gateway,
            alerts,
            notified: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Obtain a receiver for future alert events.
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.alerts.subscribe()
    }

    /// Broadcast an alert to all subscribers. Errors are ignored.
    pub(crate) fn broadcast(&self, event: AlertEvent) {
        let _ = self.alerts.send(event);
    }

    /// Record that this window triggered a guardian send; false if it
    /// already had.
    pub(crate) fn mark_notified(&self, user_id: i64, entries: &[MoodEntry]) -> bool {
        let ids: Vec<i64> = entries
            .iter()
            .take(pattern::WINDOW)
            .map(|e| e.id)
            .collect();
        let mut notified = self.notified.lock().unwrap();
        if notified.get(&user_id) == Some(&ids) {
            return false;
        }
        notified.insert(user_id, ids);
        true
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

async fn index() -> &'static str {
    "MindCare API is running. Connect to /ws for pattern alerts."
}

async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
    if user.username.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "invalid user data"));
    }
    if let Some(email) = user.guardian_email.as_deref() {
        if !email.is_empty() && !email.contains('@') {
            return Err(api_error(StatusCode::BAD_REQUEST, "invalid guardian email"));
        }
    }
    let user = state
        .store
        .create_user(user)
        .await
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "invalid user data"))?;
    info!(id = user.id, "user created");
    Ok(Json(user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    state
        .store
        .user(id)
        .await
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "user not found"))
}

async fn create_mood_entry(
    State(state): State<AppState>,
    Json(entry): Json<NewMoodEntry>,
) -> Result<Json<MoodEntry>, ApiError> {
    let entry = state.store.add_mood_entry(entry).await.map_err(|e| {
        debug!("rejected mood entry: {e}");
        api_error(StatusCode::BAD_REQUEST, "invalid mood entry data")
    })?;
    // Classification is re-run on every write rather than polled.
    alerts::escalate(&state, entry.user_id).await;
    Ok(Json(entry))
}

async fn mood_entries(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<MoodEntry>>, ApiError> {
    state
        .store
        .mood_entries(user_id)
        .await
        .map(Json)
        .map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch mood entries",
            )
        })
}

async fn mood_trend(
    State(state): State<AppState>,
    Path((user_id, days)): Path<(i64, i64)>,
) -> Result<Json<Vec<MoodEntry>>, ApiError> {
    state
        .store
        .recent_mood_trend(user_id, days)
        .await
        .map(Json)
        .map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch mood trend",
            )
        })
}

#[derive(Serialize)]
pub struct PatternResponse {
    pub verdict: Verdict,
    /// First five wellness recommendations; empty when nothing is actionable.
    pub recommendations: Vec<&'static str>,
}

async fn pattern_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<PatternResponse>, ApiError> {
    let entries = state
        .store
        .recent_mood_trend(user_id, alerts::TREND_DAYS)
        .await
        .map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch mood trend",
            )
        })?;
    let verdict = pattern::classify(&alerts::window_samples(&entries));
    let recommendations = if verdict.is_none() {
        Vec::new()
    } else {
        pattern::visible_recommendations().to_vec()
    };
    Ok(Json(PatternResponse {
        verdict,
        recommendations,
    }))
}

async fn create_exercise_session(
    State(state): State<AppState>,
    Json(session): Json<NewExerciseSession>,
) -> Result<Json<store::ExerciseSession>, ApiError> {
    state
        .store
        .add_exercise_session(session)
        .await
        .map(Json)
        .map_err(|_| {
            api_error(
                StatusCode::BAD_REQUEST,
                "invalid exercise session data",
            )
        })
}

async fn exercise_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<store::ExerciseSession>>, ApiError> {
    state
        .store
        .exercise_sessions(user_id)
        .await
        .map(Json)
        .map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch exercise sessions",
            )
        })
}

async fn emergency_resources() -> Json<resources::Directory> {
    Json(resources::directory())
}

#[derive(Serialize)]
pub struct PhaseStep {
    pub phase: BreathPhase,
    pub label: &'static str,
    pub duration_secs: u32,
}

#[derive(Serialize)]
pub struct ExercisePlans {
    /// One full 4-7-8 breathing cycle, in order.
    pub breathing: Vec<PhaseStep>,
    pub meditation_secs: u32,
}

async fn exercise_plans() -> Json<ExercisePlans> {
    let mut breathing = Vec::new();
    let mut phase = BreathPhase::Inhale;
    loop {
        breathing.push(PhaseStep {
            phase,
            label: phase.label(),
            duration_secs: phase.duration_secs(),
        });
        phase = phase.next();
        if phase == BreathPhase::Inhale {
            break;
        }
    }
    Json(ExercisePlans {
        breathing,
        meditation_secs: exercise::MEDITATION_SECS,
    })
}

#[derive(Deserialize)]
pub struct GuardianAlertRequest {
    pub user_id: i64,
}

async fn send_guardian_alert(
    State(state): State<AppState>,
    Json(req): Json<GuardianAlertRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .store
        .user(req.user_id)
        .await
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "user not found"))?;
    let Some(email) = user.guardian_email.clone() else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "no guardian email configured",
        ));
    };

    let entries = state
        .store
        .recent_mood_trend(req.user_id, alerts::TREND_DAYS)
        .await
        .map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch mood trend",
            )
        })?;
    let alert = alerts::guardian_alert(&user, email, &entries);
    match state.gateway.send(&alert).await {
        Ok(()) => Ok(Json(
            json!({ "success": true, "message": "alert email sent" }),
        )),
        Err(e) => {
            error!("guardian alert delivery failed: {e}");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to send alert email",
            ))
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("alert websocket upgrade initiated");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    info!("alert websocket connected");
    let mut rx = state.subscribe();
    loop {
        match rx.recv().await {
            Ok(event) => {
                let payload = serde_json::to_string(&event).unwrap();
                if socket.send(WsMessage::Text(payload)).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Closed) => break,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
        }
    }
    info!("alert websocket disconnected");
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/users", post(create_user))
        .route("/api/users/:id", get(get_user))
        .route("/api/mood-entries", post(create_mood_entry))
        .route("/api/mood-entries/:user_id", get(mood_entries))
        .route("/api/mood-entries/:user_id/trend/:days", get(mood_trend))
        .route("/api/pattern/:user_id", get(pattern_for_user))
        .route("/api/exercises", get(exercise_plans))
        .route("/api/exercise-sessions", post(create_exercise_session))
        .route("/api/exercise-sessions/:user_id", get(exercise_sessions))
        .route("/api/resources", get(emergency_resources))
        .route("/api/alerts/guardian", post(send_guardian_alert))
        .route("/ws", get(ws_handler))
        .with_state(state)
}
