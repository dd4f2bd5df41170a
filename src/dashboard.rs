use crate::client::{RecordsClient, RecordsError};
use crate::models::{
    Collection, GoalFields, Intensity, MeasurementFields, Mood, SessionFields, SessionForm, Snapshot,
};
use chrono::{Local, NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum SessionFormError {
    #[error("date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),
    #[error("{field} must be a non-negative number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Form(#[from] SessionFormError),
    #[error(transparent)]
    Records(#[from] RecordsError),
}

/// Fetches the three collections the dashboard needs in parallel.
///
/// Either all three arrive or the load fails as a whole.
pub async fn load_snapshot(client: &RecordsClient) -> Result<Snapshot, RecordsError> {
    let result = tokio::try_join!(
        client.list::<SessionFields>(),
        client.list::<MeasurementFields>(),
        client.list::<GoalFields>(),
    );

    match result {
        Ok((sessions, measurements, goals)) => Ok(Snapshot {
            sessions,
            measurements,
            goals,
        }),
        Err(err) => {
            warn!("dashboard load failed: {err}");
            Err(err)
        }
    }
}

/// Stores a new training session and reloads everything afterwards.
pub async fn log_session(client: &RecordsClient, form: &SessionForm) -> Result<Snapshot, DashboardError> {
    let fields = session_fields_from_form(form, Local::now().time())?;
    let record_id = client.create(&fields).await?;
    info!(record_id = record_id.as_deref().unwrap_or("-"), "logged training session");
    Ok(load_snapshot(client).await?)
}

pub async fn remove_session(client: &RecordsClient, record_id: &str) -> Result<Snapshot, RecordsError> {
    client.delete(Collection::Sessions, record_id).await?;
    load_snapshot(client).await
}

/// Turns the submitted form into wire fields, stamping the date with `time`.
pub fn session_fields_from_form(
    form: &SessionForm,
    time: NaiveTime,
) -> Result<SessionFields, SessionFormError> {
    let date = form.date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| SessionFormError::InvalidDate(date.to_string()))?;

    Ok(SessionFields {
        date: Some(format!("{date}T{}", time.format("%H:%M"))),
        duration_minutes: parse_amount("duration_minutes", form.duration_minutes.as_deref())?,
        calories: parse_amount("calories", form.calories.as_deref())?,
        intensity: non_blank(form.intensity.as_deref()).map(Intensity::from),
        mood: non_blank(form.mood.as_deref()).map(Mood::from),
        notes: non_blank(form.notes.as_deref()),
        exercises: None,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_amount(field: &'static str, value: Option<&str>) -> Result<Option<f64>, SessionFormError> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(Some(amount)),
        _ => Err(SessionFormError::InvalidNumber { field, value: raw }),
    }
}
