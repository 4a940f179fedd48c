//! # roomchat-api
//!
//! Room administration REST API built with Axum. The server assembled here
//! also mounts the websocket gateway routes.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, serve};
pub use state::AppState;
