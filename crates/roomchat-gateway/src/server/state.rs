//! Gateway state

use std::sync::Arc;
use std::time::Duration;

use roomchat_service::ServiceContext;
use tokio::sync::watch;

use crate::gatekeeper::ConnectionContext;
use crate::session::ChatSession;

/// Shared dependencies of every websocket connection
#[derive(Clone)]
pub struct GatewayState {
    service_context: Arc<ServiceContext>,
    idle_timeout: Option<Duration>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl GatewayState {
    pub fn new(service_context: Arc<ServiceContext>, idle_timeout: Option<Duration>) -> Self {
        Self {
            service_context,
            idle_timeout,
            shutdown: Arc::new(watch::channel(false).0),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &Arc<ServiceContext> {
        &self.service_context
    }

    /// Build the session that will own a connection
    pub fn session(&self, connection: ConnectionContext) -> ChatSession {
        ChatSession::new(
            self.service_context.clone(),
            connection,
            self.idle_timeout,
            self.shutdown.subscribe(),
        )
    }

    /// Receiver that fires when the server begins shutting down
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Ask every open session to close with a normal close code
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("idle_timeout", &self.idle_timeout)
            .field("sessions", &self.shutdown.receiver_count())
            .finish_non_exhaustive()
    }
}
