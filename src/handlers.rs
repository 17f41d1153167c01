use crate::models::DashboardResponse;
use crate::state::AppState;
use crate::ui::{dashboard_response, render_index};
use axum::{extract::State, response::Html, Json};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_index(&state.config, &dashboard))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard_response(&state.config, &dashboard))
}

pub async fn health_check() -> &'static str {
    "ok"
}
