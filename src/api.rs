//! HTTP API and page hosting

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::llm::ConfigError;
use crate::session::SessionStore;
use crate::shell::Shell;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The configured shell, or the startup configuration error that keeps
    /// the interface from loading
    pub shell: Result<Shell, ConfigError>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(shell: Result<Shell, ConfigError>, sessions: SessionStore) -> Self {
        Self {
            shell,
            sessions: Arc::new(sessions),
        }
    }
}
