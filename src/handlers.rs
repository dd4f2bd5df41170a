use crate::dashboard::{load_snapshot, log_session, remove_session};
use crate::errors::AppError;
use crate::models::{DashboardResponse, Record, RecordFields, SessionForm};
use crate::state::AppState;
use crate::stats::build_dashboard;
use crate::ui::{render_index, render_load_error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{de::DeserializeOwned, Serialize};

pub async fn index(State(state): State<AppState>) -> Response {
    match load_snapshot(&state.client).await {
        Ok(snapshot) => {
            let dashboard = build_dashboard(&snapshot, &state.settings);
            Html(render_index(&dashboard)).into_response()
        }
        Err(err) => (StatusCode::BAD_GATEWAY, Html(render_load_error(&err.to_string()))).into_response(),
    }
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let snapshot = load_snapshot(&state.client).await?;
    Ok(Json(build_dashboard(&snapshot, &state.settings)))
}

pub async fn list_records<F>(State(state): State<AppState>) -> Result<Json<Vec<Record<F>>>, AppError>
where
    F: RecordFields + DeserializeOwned + Serialize + Default + Send + Sync + 'static,
{
    let records = state.client.list::<F>().await?;
    Ok(Json(records))
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(form): Json<SessionForm>,
) -> Result<(StatusCode, Json<DashboardResponse>), AppError> {
    let snapshot = log_session(&state.client, &form).await?;
    Ok((StatusCode::CREATED, Json(build_dashboard(&snapshot, &state.settings))))
}

pub async fn create_session_form(
    State(state): State<AppState>,
    Form(form): Form<SessionForm>,
) -> Result<Redirect, AppError> {
    log_session(&state.client, &form).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let snapshot = remove_session(&state.client, &record_id).await?;
    Ok(Json(build_dashboard(&snapshot, &state.settings)))
}
