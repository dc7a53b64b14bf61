//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::{ApiConfig, Credentials, EventConfig};
use crate::store::EventStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Dataset store
    pub store: Arc<EventStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Event settings (name, window, timeline hours)
    pub event: Arc<EventConfig>,
    /// Keys every `/api/v1` request must present
    pub credentials: Arc<Credentials>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<EventStore>,
        config: ApiConfig,
        event: EventConfig,
        credentials: Credentials,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            event: Arc::new(event),
            credentials: Arc::new(credentials),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
