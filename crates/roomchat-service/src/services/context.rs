//! Service context - dependency container for services
//!
//! Holds the repositories, the token service, the id generator and the broadcaster.

use std::sync::Arc;

use roomchat_common::auth::JwtService;
use roomchat_core::traits::{IdentityRepository, MessageRepository, RoomRepository};
use roomchat_core::{Snowflake, SnowflakeGenerator};
use roomchat_pubsub::Broadcaster;

/// Default upper bound on message body length, in characters
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4000;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    identity_repo: Arc<dyn IdentityRepository>,
    room_repo: Arc<dyn RoomRepository>,
    message_repo: Arc<dyn MessageRepository>,

    // Broadcast groups
    broadcaster: Broadcaster,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    max_message_length: usize,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        identity_repo: Arc<dyn IdentityRepository>,
        room_repo: Arc<dyn RoomRepository>,
        message_repo: Arc<dyn MessageRepository>,
        broadcaster: Broadcaster,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            identity_repo,
            room_repo,
            message_repo,
            broadcaster,
            jwt_service,
            snowflake_generator,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }

    // === Repositories ===

    /// Get the identity repository
    pub fn identity_repo(&self) -> &dyn IdentityRepository {
        self.identity_repo.as_ref()
    }

    /// Get the room repository
    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    // === Broadcast ===

    /// Get the broadcaster for room and lobby groups
    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Longest accepted message body, in characters
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("broadcaster", &self.broadcaster)
            .field("max_message_length", &self.max_message_length)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    identity_repo: Option<Arc<dyn IdentityRepository>>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    broadcaster: Option<Broadcaster>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    max_message_length: Option<usize>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity_repo(mut self, repo: Arc<dyn IdentityRepository>) -> Self {
        self.identity_repo = Some(repo);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn broadcaster(mut self, broadcaster: Broadcaster) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = Some(max);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        let mut ctx = ServiceContext::new(
            self.identity_repo
                .ok_or_else(|| ServiceError::validation("identity_repo is required"))?,
            self.room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.broadcaster
                .ok_or_else(|| ServiceError::validation("broadcaster is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
        );
        if let Some(max) = self.max_message_length {
            ctx.max_message_length = max;
        }
        Ok(ctx)
    }
}
