use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::services::propagation::EventPublisher;
use crate::services::sessions::SessionDirectory;
use crate::ws::hub::WsRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Live sessions, one per room
    pub sessions: Arc<SessionDirectory>,
    /// Local websocket connections
    pub registry: Arc<WsRegistry>,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        sessions: Arc<SessionDirectory>,
        registry: Arc<WsRegistry>,
    ) -> Self {
        Self {
            security,
            sessions,
            registry,
        }
    }

    /// Single-process state: events go straight to the local registry.
    pub fn local(security: SecurityConfig) -> Self {
        let registry = Arc::new(WsRegistry::new());
        let publisher: Arc<dyn EventPublisher> = registry.clone();
        let sessions = Arc::new(SessionDirectory::new(publisher));
        Self::new(security, sessions, registry)
    }

    /// Local state with a random JWT secret
    pub fn for_tests() -> Self {
        Self::local(SecurityConfig::for_tests())
    }
}
