use async_trait::async_trait;
use mindcare_server::{app, AppState};
use notify::{Alert, NotificationGateway, NotifyError};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use store::MemStore;
use tokio::time::{sleep, Duration};

#[derive(Clone, Default)]
struct RecordingGateway {
    sent: Arc<Mutex<Vec<Alert>>>,
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

struct FailingGateway;

#[async_trait]
impl NotificationGateway for FailingGateway {
    async fn send(&self, _alert: &Alert) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected(503))
    }
}

async fn spawn_app(gateway: Arc<dyn NotificationGateway>) -> SocketAddr {
    let state = AppState::new(Arc::new(MemStore::new()), gateway);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn create_user(client: &reqwest::Client, addr: SocketAddr, body: Value) -> Value {
    let resp = client
        .post(format!("http://{addr}/api/users"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

async fn post_mood(client: &reqwest::Client, addr: SocketAddr, user_id: i64, mood: u8) -> reqwest::Response {
    client
        .post(format!("http://{addr}/api/mood-entries"))
        .json(&json!({ "user_id": user_id, "mood": mood }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn user_round_trip() {
    let addr = spawn_app(Arc::new(RecordingGateway::default())).await;
    let client = reqwest::Client::new();

    let user = create_user(
        &client,
        addr,
        json!({ "username": "ana", "age": 16, "gender": "female" }),
    )
    .await;
    assert_eq!(user["id"], 1);

    let resp = client
        .get(format!("http://{addr}/api/users/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["username"], "ana");

    let resp = client
        .get(format!("http://{addr}/api/users/99"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn invalid_mood_entries_are_rejected() {
    let addr = spawn_app(Arc::new(RecordingGateway::default())).await;
    let client = reqwest::Client::new();
    create_user(
        &client,
        addr,
        json!({ "username": "ana", "age": 16, "gender": "female" }),
    )
    .await;

    let resp = post_mood(&client, addr, 1, 6).await;
    assert_eq!(resp.status(), 400);

    // Unknown user.
    let resp = post_mood(&client, addr, 42, 3).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn mood_history_is_newest_first() {
    let addr = spawn_app(Arc::new(RecordingGateway::default())).await;
    let client = reqwest::Client::new();
    create_user(
        &client,
        addr,
        json!({ "username": "ana", "age": 16, "gender": "female" }),
    )
    .await;

    for mood in [3u8, 1, 5] {
        assert_eq!(post_mood(&client, addr, 1, mood).await.status(), 200);
    }

    let entries: Value = client
        .get(format!("http://{addr}/api/mood-entries/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let moods: Vec<u64> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["mood"].as_u64().unwrap())
        .collect();
    assert_eq!(moods, vec![5, 1, 3]);

    let trend: Value = client
        .get(format!("http://{addr}/api/mood-entries/1/trend/7"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trend.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn pattern_endpoint_reports_the_current_tier() {
    let addr = spawn_app(Arc::new(RecordingGateway::default())).await;
    let client = reqwest::Client::new();
    create_user(
        &client,
        addr,
        json!({ "username": "ana", "age": 16, "gender": "female" }),
    )
    .await;

    let body: Value = client
        .get(format!("http://{addr}/api/pattern/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["verdict"]["tier"], "none");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 0);

    for mood in [2u8, 2, 2] {
        post_mood(&client, addr, 1, mood).await;
    }
    let body: Value = client
        .get(format!("http://{addr}/api/pattern/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["verdict"]["tier"], "high");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn critical_writes_notify_the_guardian() {
    let gateway = RecordingGateway::default();
    let addr = spawn_app(Arc::new(gateway.clone())).await;
    let client = reqwest::Client::new();
    create_user(
        &client,
        addr,
        json!({
            "username": "ana",
            "age": 16,
            "gender": "female",
            "guardian_email": "guardian@example.com",
            "guardian_name": "Sam"
        }),
    )
    .await;

    // Window builds to [1, 1, 1, 3] newest-first: four in-range entries,
    // three of them very bad.
    for mood in [3u8, 1, 1, 1] {
        assert_eq!(post_mood(&client, addr, 1, mood).await.status(), 200);
    }
    sleep(Duration::from_millis(100)).await;

    let sent = gateway.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "guardian@example.com");
    assert_eq!(sent[0].student_name, "ana");
    assert!(sent[0].details.contains("3 entries with low mood"));
}

#[tokio::test]
async fn no_guardian_on_file_skips_notification() {
    let gateway = RecordingGateway::default();
    let addr = spawn_app(Arc::new(gateway.clone())).await;
    let client = reqwest::Client::new();
    create_user(
        &client,
        addr,
        json!({ "username": "ana", "age": 16, "gender": "female" }),
    )
    .await;

    for mood in [3u8, 1, 1, 1] {
        assert_eq!(post_mood(&client, addr, 1, mood).await.status(), 200);
    }
    sleep(Duration::from_millis(100)).await;

    assert!(gateway.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn explicit_guardian_alert_route() {
    let gateway = RecordingGateway::default();
    let addr = spawn_app(Arc::new(gateway.clone())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/alerts/guardian"))
        .json(&json!({ "user_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    create_user(
        &client,
        addr,
        json!({ "username": "ana", "age": 16, "gender": "female" }),
    )
    .await;
    let resp = client
        .post(format!("http://{addr}/api/alerts/guardian"))
        .json(&json!({ "user_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    create_user(
        &client,
        addr,
        json!({
            "username": "ben",
            "age": 15,
            "gender": "male",
            "guardian_email": "dad@example.com"
        }),
    )
    .await;
    let resp = client
        .post(format!("http://{addr}/api/alerts/guardian"))
        .json(&json!({ "user_id": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(gateway.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_delivery_surfaces_as_server_error() {
    let addr = spawn_app(Arc::new(FailingGateway)).await;
    let client = reqwest::Client::new();
    create_user(
        &client,
        addr,
        json!({
            "username": "ana",
            "age": 16,
            "gender": "female",
            "guardian_email": "guardian@example.com"
        }),
    )
    .await;

    let resp = client
        .post(format!("http://{addr}/api/alerts/guardian"))
        .json(&json!({ "user_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn exercise_sessions_round_trip() {
    let addr = spawn_app(Arc::new(RecordingGateway::default())).await;
    let client = reqwest::Client::new();
    create_user(
        &client,
        addr,
        json!({ "username": "ana", "age": 16, "gender": "female" }),
    )
    .await;

    let resp = client
        .post(format!("http://{addr}/api/exercise-sessions"))
        .json(&json!({ "user_id": 1, "kind": "breathing", "duration_secs": 120 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let sessions: Value = client
        .get(format!("http://{addr}/api/exercise-sessions/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["kind"], "breathing");
}

#[tokio::test]
async fn exercise_plans_describe_the_breathing_cycle() {
    let addr = spawn_app(Arc::new(RecordingGateway::default())).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("http://{addr}/api/exercises"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let phases = body["breathing"].as_array().unwrap();
    assert_eq!(phases.len(), 4);
    assert_eq!(phases[0]["phase"], "inhale");
    assert_eq!(phases[0]["duration_secs"], 4);
    assert_eq!(body["meditation_secs"], 300);
}

#[tokio::test]
async fn resources_directory_is_served() {
    let addr = spawn_app(Arc::new(RecordingGateway::default())).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("http://{addr}/api/resources"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["crisis_lines"][0]["phone"], "988");
    assert_eq!(body["centers"].as_array().unwrap().len(), 3);
}
