use crate::dates::{effective_date, parse_calendar_date, parse_local, week_bounds};
use crate::models::{
    DashboardResponse, Goal, Measurement, Record, RecordFields, Session, Snapshot, WeeklyProgress,
    WeightPoint,
};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::collections::HashSet;

pub const DEFAULT_WEEKLY_GOAL: u32 = 4;
pub const DEFAULT_WEIGHT_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_GOAL_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub weekly_goal: u32,
    pub weight_window_days: i64,
    pub recent_limit: usize,
    pub goal_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            weight_window_days: DEFAULT_WEIGHT_WINDOW_DAYS,
            recent_limit: DEFAULT_RECENT_LIMIT,
            goal_limit: DEFAULT_GOAL_LIMIT,
        }
    }
}

pub fn build_dashboard(snapshot: &Snapshot, settings: &DashboardSettings) -> DashboardResponse {
    build_dashboard_at(&Local::now(), snapshot, settings)
}

pub fn build_dashboard_at<Tz: TimeZone>(
    now: &DateTime<Tz>,
    snapshot: &Snapshot,
    settings: &DashboardSettings,
) -> DashboardResponse {
    let tz = now.timezone();

    DashboardResponse {
        generated_at: now.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
        weekly_progress: compute_weekly_progress(&snapshot.sessions, now, settings.weekly_goal),
        latest_weight: compute_latest_weight(&snapshot.measurements, &tz),
        streak: compute_streak(&snapshot.sessions, now),
        calories_this_week: compute_calories_this_week(&snapshot.sessions, now),
        weight_series: compute_weight_series(
            &snapshot.measurements,
            now,
            settings.weight_window_days,
        )
        .collect(),
        recent_sessions: compute_recent_sessions(&snapshot.sessions, &tz, settings.recent_limit)
            .into_iter()
            .cloned()
            .collect(),
        active_goals: compute_active_goals(&snapshot.goals, &tz, settings.goal_limit)
            .into_iter()
            .cloned()
            .collect(),
    }
}

/// Sessions whose effective date falls in the Monday-start week around `now`.
fn sessions_this_week<'a, Tz: TimeZone>(
    sessions: &'a [Session],
    now: &DateTime<Tz>,
) -> impl Iterator<Item = &'a Session> {
    let tz = now.timezone();
    let (start, end) = week_bounds(now.date_naive());
    sessions.iter().filter(move |session| {
        effective_date(*session, &tz).is_some_and(|date| date >= start && date < end)
    })
}

pub fn compute_weekly_progress<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
    weekly_goal: u32,
) -> WeeklyProgress {
    let count = sessions_this_week(sessions, now).count();
    let progress_percent = if weekly_goal == 0 {
        0.0
    } else {
        count as f64 / f64::from(weekly_goal) * 100.0
    };

    WeeklyProgress {
        count,
        goal: weekly_goal,
        progress_percent,
    }
}

pub fn compute_calories_this_week<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> f64 {
    sessions_this_week(sessions, now)
        .map(|session| session.fields.calories.unwrap_or(0.0))
        .sum()
}

/// Consecutive training days ending today, or ending yesterday when today
/// has nothing logged yet.
pub fn compute_streak<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let days: HashSet<NaiveDate> = sessions
        .iter()
        .filter_map(|session| effective_date(session, &tz))
        .map(|date| date.date())
        .collect();

    let today = now.date_naive();
    let anchor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 1;
    let mut cursor = anchor;
    while let Some(previous) = cursor.pred_opt() {
        if !days.contains(&previous) {
            break;
        }
        streak += 1;
        cursor = previous;
    }
    streak
}

/// Weight of the most recent measurement, whether or not that one has a weight.
pub fn compute_latest_weight<Tz: TimeZone>(measurements: &[Measurement], tz: &Tz) -> Option<f64> {
    newest_first(measurements, tz)
        .first()
        .and_then(|measurement| measurement.fields.weight)
}

/// Weights taken at or after `now - window_days`, oldest first.
///
/// Only a lower bound applies, so future-dated measurements stay in. A window
/// reaching past the representable range has no lower bound at all.
pub fn compute_weight_series<Tz: TimeZone>(
    measurements: &[Measurement],
    now: &DateTime<Tz>,
    window_days: i64,
) -> impl Iterator<Item = WeightPoint> {
    let tz = now.timezone();
    let cutoff = Duration::try_days(window_days.max(0))
        .and_then(|window| now.naive_local().checked_sub_signed(window));

    let mut points: Vec<(NaiveDateTime, f64)> = measurements
        .iter()
        .filter_map(|measurement| {
            let weight = measurement.fields.weight?;
            let date = effective_date(measurement, &tz)?;
            cutoff.is_none_or(|cutoff| date >= cutoff).then_some((date, weight))
        })
        .collect();
    points.sort_by(|a, b| a.0.cmp(&b.0));

    points.into_iter().map(|(date, weight)| WeightPoint {
        date: date.format("%Y-%m-%dT%H:%M:%S").to_string(),
        weight,
    })
}

pub fn compute_recent_sessions<'a, Tz: TimeZone>(
    sessions: &'a [Session],
    tz: &Tz,
    limit: usize,
) -> Vec<&'a Session> {
    let mut sorted = newest_first(sessions, tz);
    sorted.truncate(limit);
    sorted
}

/// Open goals, nearest target first; undated goals go last.
///
/// A target carrying a time of day orders within its day; a bare or
/// partially readable date counts as midnight.
pub fn compute_active_goals<'a, Tz: TimeZone>(
    goals: &'a [Goal],
    tz: &Tz,
    limit: usize,
) -> Vec<&'a Goal> {
    let mut active: Vec<(NaiveDateTime, &Goal)> = goals
        .iter()
        .filter(|goal| goal.fields.status.as_ref().is_some_and(|status| status.is_active()))
        .map(|goal| {
            let deadline = goal
                .fields
                .target_date
                .as_deref()
                .and_then(|raw| {
                    parse_local(raw, tz).or_else(|| {
                        parse_calendar_date(raw).map(|date| date.and_time(NaiveTime::MIN))
                    })
                })
                .unwrap_or(NaiveDateTime::MAX);
            (deadline, goal)
        })
        .collect();
    active.sort_by(|a, b| a.0.cmp(&b.0));

    active.into_iter().take(limit).map(|(_, goal)| goal).collect()
}

/// Stable newest-first ordering; records without an effective date trail.
fn newest_first<'a, F, Tz>(records: &'a [Record<F>], tz: &Tz) -> Vec<&'a Record<F>>
where
    F: RecordFields,
    Tz: TimeZone,
{
    let mut keyed: Vec<(Option<NaiveDateTime>, &Record<F>)> = records
        .iter()
        .map(|record| (effective_date(record, tz), record))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, record)| record).collect()
}
