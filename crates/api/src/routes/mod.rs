//! API routes

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

pub mod health;
pub mod page;
pub mod params;
pub mod report;


pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(page::index))
        .route("/api/summary", get(report::summary))
        .route("/api/engineers", get(report::engineers))
        .route("/api/engineers/:login", get(report::engineer))
        .route("/api/top", get(report::top))
        .route("/api/breakdown", get(report::breakdown))
        .route("/api/refresh", post(report::refresh))
        .with_state(state)
}
