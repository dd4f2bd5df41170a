use crate::client::RecordsClient;
use crate::stats::DashboardSettings;
use std::sync::Arc;

/// Shared handles only; the records themselves are reloaded per request.
#[derive(Clone)]
pub struct AppState {
    pub client: RecordsClient,
    pub settings: Arc<DashboardSettings>,
}

impl AppState {
    pub fn new(client: RecordsClient, settings: DashboardSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }
}
