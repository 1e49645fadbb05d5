//! MindCare wellness service.
//!
//! An axum application exposing mood tracking, guided exercise session
//! records, an emergency-resources directory and guardian notification.
//! Every mood write re-runs the pattern classifier over the user's recent
//! window; actionable verdicts are pushed to WebSocket subscribers and a
//! critical verdict queues a guardian email. There is no polling loop.

pub mod alerts;
pub mod resources;
pub mod web;

pub use alerts::AlertEvent;
pub use web::{app, AppState};
