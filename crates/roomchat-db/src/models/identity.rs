//! Identity database model

use sqlx::FromRow;

/// Database model for identities table
#[derive(Debug, Clone, FromRow)]
pub struct IdentityModel {
    pub id: i64,
    pub username: String,
    pub role: String,
}
