//! Identity model -> entity mapper

use roomchat_core::entities::{Identity, Role};
use roomchat_core::value_objects::Snowflake;

use crate::models::IdentityModel;

impl From<IdentityModel> for Identity {
    fn from(model: IdentityModel) -> Self {
        let role = model.role.parse::<Role>().unwrap_or_else(|e| {
            tracing::warn!(identity_id = model.id, error = %e, "Unknown role, using default");
            Role::default()
        });

        Identity {
            id: Snowflake::new(model.id),
            username: model.username,
            role,
        }
    }
}
