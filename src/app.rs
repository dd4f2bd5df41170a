use crate::handlers;
use crate::models::{ExerciseFields, GoalFields, MeasurementFields, SessionFields};
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/sessions", post(handlers::create_session_form))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/sessions",
            get(handlers::list_records::<SessionFields>).post(handlers::create_session),
        )
        .route("/api/sessions/:id", delete(handlers::delete_session))
        .route("/api/measurements", get(handlers::list_records::<MeasurementFields>))
        .route("/api/goals", get(handlers::list_records::<GoalFields>))
        .route("/api/exercises", get(handlers::list_records::<ExerciseFields>))
        .with_state(state)
}
