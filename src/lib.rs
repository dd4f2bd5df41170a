pub mod app;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use client::RecordsClient;
pub use config::Config;
pub use state::AppState;
