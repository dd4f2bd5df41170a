use crate::dates::{effective_date, parse_calendar_date, parse_local};
use crate::models::{DashboardResponse, Goal, Session, WeightPoint};
use chrono::Local;

const RING_RADIUS: f64 = 70.0;
const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 220.0;
const CHART_PADDING: f64 = 36.0;

pub fn render_index(dashboard: &DashboardResponse) -> String {
    let progress = &dashboard.weekly_progress;
    let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;
    let ring_offset = circumference - progress.progress_percent.clamp(0.0, 100.0) / 100.0 * circumference;
    let latest_weight = dashboard
        .latest_weight
        .map(|weight| format!("{} kg", format_number(weight)))
        .unwrap_or_else(|| "-".to_string());

    INDEX_HTML
        .replace("{{GENERATED_AT}}", &escape_html(&dashboard.generated_at))
        .replace("{{WEEK_COUNT}}", &progress.count.to_string())
        .replace("{{WEEK_GOAL}}", &progress.goal.to_string())
        .replace("{{PROGRESS}}", &format!("{:.0}", progress.progress_percent))
        .replace("{{RING_CIRCUMFERENCE}}", &format!("{circumference:.2}"))
        .replace("{{RING_OFFSET}}", &format!("{ring_offset:.2}"))
        .replace("{{LATEST_WEIGHT}}", &latest_weight)
        .replace("{{STREAK}}", &dashboard.streak.to_string())
        .replace("{{CALORIES}}", &format_number(dashboard.calories_this_week))
        .replace("{{WEIGHT_CHART}}", &render_weight_chart(&dashboard.weight_series))
        .replace("{{RECENT_SESSIONS}}", &render_sessions(&dashboard.recent_sessions))
        .replace("{{ACTIVE_GOALS}}", &render_goals(&dashboard.active_goals))
}

pub fn render_load_error(message: &str) -> String {
    ERROR_HTML.replace("{{MESSAGE}}", &escape_html(message))
}

fn render_sessions(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return r#"<p class="empty">No training sessions logged yet.</p>"#.to_string();
    }

    let items: String = sessions
        .iter()
        .map(|session| {
            let when = effective_date(session, &Local)
                .map(|date| date.format("%d.%m.%Y %H:%M").to_string())
                .unwrap_or_else(|| "unknown date".to_string());

            let mut details = Vec::new();
            if let Some(minutes) = session.fields.duration_minutes {
                details.push(format!("{} min", format_number(minutes)));
            }
            if let Some(calories) = session.fields.calories {
                details.push(format!("{} kcal", format_number(calories)));
            }
            if let Some(intensity) = &session.fields.intensity {
                details.push(escape_html(intensity.label()));
            }

            let notes = session
                .fields
                .notes
                .as_deref()
                .map(|notes| format!(r#"<span class="notes">{}</span>"#, escape_html(notes)))
                .unwrap_or_default();

            format!(
                r#"<li><span class="when">{when}</span><span class="details">{}</span>{notes}</li>"#,
                details.join(" &middot; ")
            )
        })
        .collect();

    format!(r#"<ul class="list">{items}</ul>"#)
}

fn render_goals(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return r#"<p class="empty">No active goals.</p>"#.to_string();
    }

    let items: String = goals
        .iter()
        .map(|goal| {
            let title = goal.fields.title.as_deref().unwrap_or("Untitled goal");
            let category = goal
                .fields
                .category
                .as_ref()
                .map(|category| format!(r#"<span class="badge">{}</span>"#, escape_html(category.label())))
                .unwrap_or_default();
            let target = goal
                .fields
                .target_value
                .as_deref()
                .map(|value| format!(r#"<span class="details">{}</span>"#, escape_html(value)))
                .unwrap_or_default();
            let due = goal
                .fields
                .target_date
                .as_deref()
                .and_then(parse_calendar_date)
                .map(|date| format!(r#"<span class="when">due {}</span>"#, date.format("%d.%m.%y")))
                .unwrap_or_default();

            format!(
                r#"<li><span class="title">{}</span>{category}{target}{due}</li>"#,
                escape_html(title)
            )
        })
        .collect();

    format!(r#"<ul class="list">{items}</ul>"#)
}

fn render_weight_chart(points: &[WeightPoint]) -> String {
    if points.is_empty() {
        return r#"<p class="empty">No weight measurements in this window.</p>"#.to_string();
    }

    let mut min = points.iter().map(|point| point.weight).fold(f64::INFINITY, f64::min);
    let mut max = points.iter().map(|point| point.weight).fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        min -= 1.0;
        max += 1.0;
    }

    let x_step = if points.len() > 1 {
        (CHART_WIDTH - CHART_PADDING * 2.0) / (points.len() - 1) as f64
    } else {
        0.0
    };
    let scale_y = (CHART_HEIGHT - CHART_PADDING * 2.0) / (max - min);
    let x = |index: usize| CHART_PADDING + index as f64 * x_step;
    let y = |weight: f64| CHART_HEIGHT - CHART_PADDING - (weight - min) * scale_y;

    let line: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(index, point)| format!("{:.2},{:.2}", x(index), y(point.weight)))
        .collect();

    let mut svg = format!(
        r#"<svg class="chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="Weight trend"><polyline class="chart-line" points="{}" />"#,
        line.join(" ")
    );
    for (index, point) in points.iter().enumerate() {
        let label = parse_local(&point.date, &Local)
            .map(|date| date.format("%d. %b").to_string())
            .unwrap_or_default();
        svg.push_str(&format!(
            r#"<circle class="chart-point" cx="{:.2}" cy="{:.2}" r="4"><title>{label}: {} kg</title></circle>"#,
            x(index),
            y(point.weight),
            format_number(point.weight)
        ));
    }
    svg.push_str(&format!(
        r#"<text class="chart-label" x="{CHART_PADDING}" y="{}">{} kg</text><text class="chart-label" x="{CHART_PADDING}" y="{}">{} kg</text></svg>"#,
        CHART_PADDING - 10.0,
        format_number(max),
        CHART_HEIGHT - 10.0,
        format_number(min)
    ));
    svg
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Training Dashboard</title>
  <style>
    :root {
      --bg: #f3f1ec;
      --ink: #23211f;
      --muted: #77716a;
      --accent: #e4572e;
      --accent-2: #29335c;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(41, 51, 92, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Helvetica Neue", sans-serif;
      padding: 28px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      align-items: end;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.15rem;
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .hero {
      display: grid;
      grid-template-columns: auto 1fr;
      gap: 24px;
      align-items: center;
    }

    .ring-track {
      fill: none;
      stroke: rgba(41, 51, 92, 0.1);
      stroke-width: 12;
    }

    .ring-fill {
      fill: none;
      stroke: var(--accent);
      stroke-width: 12;
      stroke-linecap: round;
      transform: rotate(-90deg);
      transform-origin: 80px 80px;
    }

    .ring-value {
      font-size: 28px;
      font-weight: 700;
      fill: var(--ink);
    }

    .ring-caption {
      font-size: 12px;
      fill: var(--muted);
    }

    .kpis {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .kpi .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .kpi .value {
      display: block;
      font-size: 1.6rem;
      font-weight: 700;
      color: var(--accent-2);
    }

    .columns {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 24px;
    }

    .chart {
      width: 100%;
      height: 220px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent-2);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent-2);
      stroke-width: 2;
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .list {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .list li {
      display: grid;
      gap: 2px;
      padding-bottom: 10px;
      border-bottom: 1px solid rgba(41, 51, 92, 0.08);
    }

    .when, .details, .notes {
      font-size: 0.9rem;
      color: var(--muted);
    }

    .title {
      font-weight: 600;
    }

    .badge {
      justify-self: start;
      font-size: 0.75rem;
      padding: 2px 10px;
      border-radius: 999px;
      background: rgba(228, 87, 46, 0.12);
      color: var(--accent);
    }

    .empty {
      color: var(--muted);
      margin: 0;
    }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    input, select, textarea {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(41, 51, 92, 0.2);
    }

    button {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      background: var(--accent);
      color: white;
      cursor: pointer;
      align-self: end;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #b3261e;
    }

    @media (max-width: 600px) {
      .hero {
        grid-template-columns: 1fr;
        justify-items: center;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Training Dashboard</h1>
        <p class="subtitle">Updated {{GENERATED_AT}}</p>
      </div>
    </header>

    <section class="card hero">
      <svg width="160" height="160" viewBox="0 0 160 160" role="img" aria-label="Weekly progress">
        <circle class="ring-track" cx="80" cy="80" r="70" />
        <circle class="ring-fill" cx="80" cy="80" r="70"
          stroke-dasharray="{{RING_CIRCUMFERENCE}}" stroke-dashoffset="{{RING_OFFSET}}" />
        <text class="ring-value" x="80" y="84" text-anchor="middle">{{WEEK_COUNT}}/{{WEEK_GOAL}}</text>
        <text class="ring-caption" x="80" y="106" text-anchor="middle">{{PROGRESS}}% this week</text>
      </svg>
      <div class="kpis">
        <div class="kpi">
          <span class="label">Latest weight</span>
          <span class="value" id="latest-weight">{{LATEST_WEIGHT}}</span>
        </div>
        <div class="kpi">
          <span class="label">Streak</span>
          <span class="value" id="streak">{{STREAK}} days</span>
        </div>
        <div class="kpi">
          <span class="label">Calories this week</span>
          <span class="value" id="calories">{{CALORIES}} kcal</span>
        </div>
      </div>
    </section>

    <section class="card">
      <h2>Weight trend</h2>
      {{WEIGHT_CHART}}
    </section>

    <section class="columns">
      <div class="card">
        <h2>Recent sessions</h2>
        {{RECENT_SESSIONS}}
      </div>
      <div class="card">
        <h2>Active goals</h2>
        {{ACTIVE_GOALS}}
      </div>
    </section>

    <section class="card">
      <h2>Log a session</h2>
      <form id="session-form" method="post" action="/sessions">
        <label>Date<input type="date" name="date" id="session-date" required /></label>
        <label>Duration (min)<input type="number" name="duration_minutes" min="0" placeholder="45" /></label>
        <label>Calories (kcal)<input type="number" name="calories" min="0" placeholder="350" /></label>
        <label>Intensity
          <select name="intensity">
            <option value="">-</option>
            <option value="sehr_leicht">Sehr leicht</option>
            <option value="leicht">Leicht</option>
            <option value="mittel">Mittel</option>
            <option value="hoch">Hoch</option>
            <option value="sehr_hoch">Sehr hoch</option>
            <option value="maximal">Maximal</option>
          </select>
        </label>
        <label>Mood
          <select name="mood">
            <option value="">-</option>
            <option value="sehr_schlecht">Sehr schlecht</option>
            <option value="schlecht">Schlecht</option>
            <option value="neutral">Neutral</option>
            <option value="gut">Gut</option>
            <option value="sehr_gut">Sehr gut</option>
            <option value="ausgezeichnet">Ausgezeichnet</option>
          </select>
        </label>
        <label>Notes<textarea name="notes" rows="1"></textarea></label>
        <button type="submit">Save session</button>
      </form>
      <div class="status" id="status"></div>
    </section>
  </main>

  <script>
    const form = document.getElementById('session-form');
    const statusEl = document.getElementById('status');
    const dateInput = document.getElementById('session-date');

    if (!dateInput.value) {
      dateInput.value = new Date().toISOString().slice(0, 10);
    }

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      setStatus('Saving...', 'info');
      const payload = Object.fromEntries(new FormData(form).entries());
      try {
        const res = await fetch('/api/sessions', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(payload)
        });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Request failed');
        }
        window.location.reload();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });
  </script>
</body>
</html>
"#;

const ERROR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Training Dashboard</title>
  <style>
    body {
      font-family: "Inter", "Helvetica Neue", sans-serif;
      background: #f3f1ec;
      color: #23211f;
      display: grid;
      place-items: center;
      min-height: 100vh;
      margin: 0;
    }
    .card {
      background: white;
      border-radius: 20px;
      padding: 28px;
      max-width: 520px;
      box-shadow: 0 18px 40px rgba(41, 51, 92, 0.12);
    }
    a {
      color: #e4572e;
      font-weight: 600;
    }
  </style>
</head>
<body>
  <div class="card">
    <h1>Could not load your data</h1>
    <p id="error-message">{{MESSAGE}}</p>
    <p><a href="/">Try again</a></p>
  </div>
</body>
</html>
"#;
