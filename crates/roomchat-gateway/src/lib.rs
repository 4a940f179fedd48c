//! # roomchat-gateway
//!
//! WebSocket surface for real-time chat.
//!
//! A connection to `/ws/chat/{room_name}?token=...` passes through the
//! [`Gatekeeper`], which resolves the token once and binds the result into a
//! [`ConnectionContext`]. A [`ChatSession`] then owns the socket: it rejects
//! anonymous connections, joins the room's broadcast group, and relays sends
//! and broadcasts until the connection closes.

pub mod error;
pub mod gatekeeper;
pub mod lobby;
pub mod protocol;
pub mod server;
pub mod session;

pub use error::SessionError;
pub use gatekeeper::{ConnectQuery, ConnectionContext, ConnectionIdentity, Gatekeeper};
pub use protocol::{CloseCode, InboundFrame, OutboundFrame};
pub use server::{gateway_router, GatewayState};
pub use session::{ChatSession, SessionState};
