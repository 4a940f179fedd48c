//! Integration test utilities for the roomchat server
//!
//! Spawns the full server in-process and drives it over HTTP and websockets.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
