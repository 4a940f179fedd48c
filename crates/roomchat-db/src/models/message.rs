//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub room_id: Option<i64>,
    pub sender_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
