//! Hermetic service context over in-memory repositories

use std::sync::Arc;

use roomchat_common::JwtService;
use roomchat_core::{Identity, Role, SnowflakeGenerator};
use roomchat_db::{MemoryIdentityRepository, MemoryMessageRepository, MemoryRoomRepository};
use roomchat_pubsub::{BroadcastHub, Broadcaster};

use super::context::{ServiceContext, ServiceContextBuilder};

pub(crate) const TEST_SECRET: &str = "test-secret-key-that-is-long-enough-for-hs256";

pub(crate) struct TestContext {
    pub ctx: ServiceContext,
    pub identities: Arc<MemoryIdentityRepository>,
    pub rooms: Arc<MemoryRoomRepository>,
    pub messages: Arc<MemoryMessageRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_max_message_length(4000)
    }

    pub fn with_max_message_length(max: usize) -> Self {
        let identities = Arc::new(MemoryIdentityRepository::new());
        let rooms = Arc::new(MemoryRoomRepository::new());
        let messages = Arc::new(MemoryMessageRepository::new());

        let ctx = ServiceContextBuilder::new()
            .identity_repo(identities.clone())
            .room_repo(rooms.clone())
            .message_repo(messages.clone())
            .broadcaster(Broadcaster::local(BroadcastHub::new(64)))
            .jwt_service(Arc::new(JwtService::new(TEST_SECRET, 3600)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .max_message_length(max)
            .build()
            .unwrap();

        Self {
            ctx,
            identities,
            rooms,
            messages,
        }
    }

    pub async fn identity(&self, id: i64, username: &str) -> Identity {
        use roomchat_core::IdentityRepository;

        let identity = Identity::new(id, username, Role::Client);
        self.identities.upsert(&identity).await.unwrap();
        identity
    }
}
