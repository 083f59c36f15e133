pub mod health;
pub mod query;
pub mod train;

use crate::services::db_service::ConnectionProvider;
use crate::services::vanna::VannaClient;
use std::sync::Arc;

/// Application state
///
/// `vanna` is `None` for the whole process lifetime when no API key was
/// configured at startup; every generation and training endpoint then reports
/// the service unavailable.
#[derive(Clone)]
pub struct AppState {
    pub vanna: Option<Arc<dyn VannaClient>>,
    pub provider: Arc<dyn ConnectionProvider>,
    /// Result of the one-time connectivity probe at startup, reported by the
    /// root endpoint. `/health` re-probes on every call instead.
    pub database_connected_at_startup: bool,
}
