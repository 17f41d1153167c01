use crate::config::DashboardConfig;
use crate::models::DashboardState;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub dashboard: Arc<Mutex<DashboardState>>,
}

impl AppState {
    pub fn new(config: DashboardConfig, initial: DashboardState) -> Self {
        Self {
            config: Arc::new(config),
            dashboard: Arc::new(Mutex::new(initial)),
        }
    }
}
