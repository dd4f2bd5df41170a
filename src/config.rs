use crate::client::DEFAULT_BASE_URL;
use crate::stats::DashboardSettings;
use std::env;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const MAX_WEIGHT_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub session_cookie: Option<String>,
    pub settings: DashboardSettings,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = DashboardSettings::default();

        let weekly_goal = match parse_var(&lookup, "APP_WEEKLY_GOAL", defaults.weekly_goal) {
            0 => {
                warn!("APP_WEEKLY_GOAL must be at least 1, using {}", defaults.weekly_goal);
                defaults.weekly_goal
            }
            goal => goal,
        };
        let weight_window_days =
            match parse_var(&lookup, "APP_WEIGHT_WINDOW_DAYS", defaults.weight_window_days) {
                days @ 0..=MAX_WEIGHT_WINDOW_DAYS => days,
                days => {
                    warn!(
                        "APP_WEIGHT_WINDOW_DAYS={days} is outside 0..={MAX_WEIGHT_WINDOW_DAYS}, using {}",
                        defaults.weight_window_days
                    );
                    defaults.weight_window_days
                }
            };

        Self {
            port: parse_var(&lookup, "PORT", DEFAULT_PORT),
            api_base_url: lookup("APP_API_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            session_cookie: lookup("APP_SESSION_COOKIE").filter(|cookie| !cookie.trim().is_empty()),
            settings: DashboardSettings {
                weekly_goal,
                weight_window_days,
                ..defaults
            },
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw}, using {default}");
            default
        }),
        None => default,
    }
}
