use config::Config;
use log::info;
use session_group::Manager;
use std::sync::Arc;

pub mod config;
pub mod logging;

// Process-level state shared by request handlers: configuration plus the
// registry of named session groups.
#[derive(Clone)]
pub struct AppState {
    pub group_manager: Arc<Manager>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        info!(
            "Starting in {} mode, default group [{}]",
            app_config.runtime_env(),
            app_config.group_name()
        );
        Self {
            group_manager: Arc::new(Manager::new()),
            config: app_config,
        }
    }

    pub fn group_manager_ref(&self) -> &Manager {
        self.group_manager.as_ref()
    }
}
