//! # roomchat-service
//!
//! Application layer: resolves bearer tokens to identities, provisions rooms,
//! persists messages, and gates room membership changes.

pub mod dto;
pub mod services;

pub use services::{
    AuthFailure, IdentityResolver, MessageStore, RoomAdminService, RoomDirectory, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
