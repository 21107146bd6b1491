//! HTML report page

use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;

use crate::render::{self, PageView};
use crate::routes::params::{PageQuery, WeightsQuery};
use crate::state::AppState;

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(weights): Query<WeightsQuery>,
    Query(page): Query<PageQuery>,
) -> Html<String> {
    let report = state.report().await;
    let weights = weights.weights();
    let rows = report.ranked(weights);

    let view = PageView {
        weights,
        top: page.top(),
        engineer: page.engineer(),
    };
    Html(render::render(&report.summary, &rows, &view))
}
