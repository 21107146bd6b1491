//! JSON report routes
//!
//! Rows are scored once per snapshot; every request here only recombines
//! them with the weights from the query string.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::models::{EngineerScoreRow, SnapshotSummary};
use processor::scoring::{find_engineer, top_engineers};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiResult, OptionExt};
use crate::routes::params::{BreakdownQuery, TopQuery, WeightsQuery};
use crate::state::AppState;

/// Weighted components of one engineer's impact
#[derive(Debug, Serialize)]
pub struct BreakdownEntry {
    pub engineer_login: String,
    pub rank: u32,
    pub w_shipping: f64,
    pub w_collaboration: f64,
    pub w_speed: f64,
    pub impact_score: f64,
}

impl From<&EngineerScoreRow> for BreakdownEntry {
    fn from(row: &EngineerScoreRow) -> Self {
        Self {
            engineer_login: row.engineer_login.clone(),
            rank: row.rank,
            w_shipping: row.weighted.w_shipping,
            w_collaboration: row.weighted.w_collaboration,
            w_speed: row.weighted.w_speed,
            impact_score: row.impact_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EngineerDetail {
    pub engineer: EngineerScoreRow,
    pub total_engineers: usize,
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Json<SnapshotSummary> {
    Json(state.report().await.summary.clone())
}

pub async fn engineers(
    State(state): State<Arc<AppState>>,
    Query(weights): Query<WeightsQuery>,
) -> Json<Vec<EngineerScoreRow>> {
    let report = state.report().await;
    Json(report.ranked(weights.weights()))
}

pub async fn top(
    State(state): State<Arc<AppState>>,
    Query(weights): Query<WeightsQuery>,
    Query(query): Query<TopQuery>,
) -> Json<Vec<EngineerScoreRow>> {
    let report = state.report().await;
    let rows = report.ranked(weights.weights());
    Json(top_engineers(&rows, query.k).to_vec())
}

pub async fn breakdown(
    State(state): State<Arc<AppState>>,
    Query(weights): Query<WeightsQuery>,
    Query(query): Query<BreakdownQuery>,
) -> Json<Vec<BreakdownEntry>> {
    let report = state.report().await;
    let rows = report.ranked(weights.weights());
    Json(
        top_engineers(&rows, query.top)
            .iter()
            .map(BreakdownEntry::from)
            .collect(),
    )
}

pub async fn engineer(
    State(state): State<Arc<AppState>>,
    Path(login): Path<String>,
    Query(weights): Query<WeightsQuery>,
) -> ApiResult<Json<EngineerDetail>> {
    let report = state.report().await;
    let rows = report.ranked(weights.weights());
    let row = find_engineer(&rows, &login)
        .not_found(format!("Engineer '{}' not found", login))?
        .clone();

    Ok(Json(EngineerDetail {
        engineer: row,
        total_engineers: rows.len(),
    }))
}

/// Force a fresh fetch and swap the scored report
pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Json<SnapshotSummary>> {
    let report = state.refresh().await?;
    Ok(Json(report.summary.clone()))
}
