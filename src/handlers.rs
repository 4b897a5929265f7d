use crate::errors::AppError;
use crate::models::{HeatSample, StatusResponse};
use crate::state::{AppState, RenderedChart};
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.view.snapshot();
    let chart = state.chart.read().await;
    Html(render_index(
        state.view.started_at(),
        state.clock.now(),
        &snapshot,
        &chart.svg,
        chart.revision,
    ))
}

pub async fn get_heat(State(state): State<AppState>) -> Result<Json<Vec<HeatSample>>, AppError> {
    let samples = state
        .view
        .snapshot()
        .samples
        .ok_or_else(|| AppError::unavailable("no heat data loaded yet"))?;
    Ok(Json(samples.as_ref().clone()))
}

pub async fn get_chart(State(state): State<AppState>) -> Json<RenderedChart> {
    Json(state.chart.read().await.clone())
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.view.snapshot();
    Json(StatusResponse {
        started_at: state.view.started_at(),
        current_time: state.clock.now(),
        refreshed_at: snapshot.refreshed_at,
        revision: snapshot.revision,
        sample_count: snapshot.samples.map(|samples| samples.len()),
    })
}
