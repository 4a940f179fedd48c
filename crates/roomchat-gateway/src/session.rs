//! Chat session
//!
//! One task per connection. The session moves through
//! `Connecting -> {Rejected, Joined} -> Active -> Closed` and, while active,
//! merges two inputs: frames from the socket and events from the room's
//! broadcast group. Its own publications come back through the group like
//! everyone else's.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use roomchat_core::{GroupKey, Identity, MessagePayload, RoomEvent, RoomName};
use roomchat_pubsub::{GroupSubscription, RecvError};
use roomchat_service::{MessageStore, RoomDirectory, ServiceContext};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{SessionError, SessionResult};
use crate::gatekeeper::{ConnectionContext, ConnectionIdentity};
use crate::protocol::{CloseCode, InboundFrame, OutboundFrame};

/// Idle window used when idle timeouts are disabled; the timer branch is off in that case
const IDLE_DISABLED_WINDOW: Duration = Duration::from_secs(3600);

/// Lifecycle of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Connecting,
    /// Terminal: connection had no identity
    Rejected,
    Joined,
    Active,
    Closed,
}

impl SessionState {
    /// Check if the transition is allowed
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Rejected | Self::Joined | Self::Closed)
                | (Self::Joined, Self::Active | Self::Closed)
                | (Self::Active, Self::Closed)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Closed)
    }
}

/// Room membership held while the session is joined
struct Joined {
    identity: Identity,
    name: RoomName,
    group: GroupKey,
    subscription: GroupSubscription,
}

/// Per-connection state machine
pub struct ChatSession {
    ctx: Arc<ServiceContext>,
    connection: ConnectionContext,
    idle_timeout: Option<Duration>,
    shutdown: watch::Receiver<bool>,
    state: SessionState,
}

impl ChatSession {
    pub fn new(
        ctx: Arc<ServiceContext>,
        connection: ConnectionContext,
        idle_timeout: Option<Duration>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ctx,
            connection,
            idle_timeout,
            shutdown,
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session until the connection ends; returns the terminal state
    #[instrument(
        skip_all,
        fields(
            connection_id = %self.connection.connection_id,
            room = %self.connection.room_name,
        )
    )]
    pub async fn run<Tx, Rx>(mut self, mut sink: Tx, mut stream: Rx) -> SessionState
    where
        Tx: Sink<Message> + Unpin,
        Rx: Stream<Item = Result<Message, axum::Error>> + Unpin,
    {
        let close_code = match self.join().await {
            Ok(joined) => {
                self.transition(SessionState::Active);
                self.relay(joined, &mut sink, &mut stream).await
            }
            Err(SessionError::Unauthenticated(failure)) => {
                debug!(reason = failure.reason(), "Rejecting anonymous connection");
                self.transition(SessionState::Rejected);
                Some(CloseCode::AuthenticationRequired)
            }
            Err(e) => {
                let code = e.close_code();
                if code == CloseCode::InternalError {
                    error!(error = %e, "Failed to join room");
                } else {
                    info!(error = %e, close_code = code.as_u16(), "Join refused");
                }
                Some(code)
            }
        };

        if let Some(code) = close_code {
            send_close(&mut sink, code).await;
        }

        if !self.state.is_terminal() {
            self.transition(SessionState::Closed);
        }
        self.state
    }

    async fn join(&mut self) -> SessionResult<Joined> {
        let identity = match &self.connection.identity {
            ConnectionIdentity::Authenticated(identity) => identity.clone(),
            ConnectionIdentity::Anonymous(failure) => {
                return Err(SessionError::Unauthenticated(failure.clone()));
            }
        };

        let name = RoomName::parse(&self.connection.room_name).map_err(SessionError::InvalidRoomName)?;
        let room = RoomDirectory::new(&self.ctx).ensure_room(&name, &identity).await?;

        let group = GroupKey::room(&name);
        let subscription = self.ctx.broadcaster().subscribe(&group);

        debug!(room_id = %room.id, user_id = %identity.id, group = %group, "Joined room group");
        self.transition(SessionState::Joined);

        Ok(Joined {
            identity,
            name,
            group,
            subscription,
        })
    }

    /// Active loop. Returns the close code to send, or `None` if the peer went away.
    async fn relay<Tx, Rx>(&mut self, mut joined: Joined, sink: &mut Tx, stream: &mut Rx) -> Option<CloseCode>
    where
        Tx: Sink<Message> + Unpin,
        Rx: Stream<Item = Result<Message, axum::Error>> + Unpin,
    {
        let idle_enabled = self.idle_timeout.is_some();
        let idle_window = self.idle_timeout.unwrap_or(IDLE_DISABLED_WINDOW);
        let idle = tokio::time::sleep(idle_window);
        tokio::pin!(idle);

        let mut shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                frame = stream.next() => {
                    idle.as_mut().reset(Instant::now() + idle_window);
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match self.on_text(&joined, &text, sink).await {
                                Ok(true) => {}
                                Ok(false) => return None,
                                Err(e) => {
                                    info!(error = %e, "Closing session");
                                    return Some(e.close_code());
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            debug!(user_id = %joined.identity.id, "Client disconnected");
                            return None;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            debug!(error = %e, "WebSocket error");
                            return None;
                        }
                    }
                }
                event = joined.subscription.recv() => match event {
                    Ok(payload) => {
                        if sink.send(Message::Text(payload.to_string())).await.is_err() {
                            return None;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Subscriber lagged; events dropped");
                    }
                    Err(RecvError::Closed) => return Some(SessionError::GroupClosed.close_code()),
                },
                () = &mut idle, if idle_enabled => {
                    info!(user_id = %joined.identity.id, "Idle timeout");
                    return Some(CloseCode::IdleTimeout);
                }
                Ok(()) = shutdown.changed() => {
                    return Some(CloseCode::Normal);
                }
            }
        }
    }

    /// Handle one text frame. `Ok(false)` means the socket is gone.
    async fn on_text<Tx>(&self, joined: &Joined, text: &str, sink: &mut Tx) -> SessionResult<bool>
    where
        Tx: Sink<Message> + Unpin,
    {
        match InboundFrame::parse(text) {
            Ok(InboundFrame::SendMessage { body }) => {
                self.send_message(joined, &body).await?;
                Ok(true)
            }
            Ok(InboundFrame::Ping) => {
                let Ok(pong) = OutboundFrame::Pong.to_json() else {
                    return Ok(true);
                };
                Ok(sink.send(Message::Text(pong)).await.is_ok())
            }
            Err(e) => {
                debug!(error = %e, "Ignoring frame");
                Ok(true)
            }
        }
    }

    /// Persist then publish. Failures drop this message only, except a room
    /// that no longer resolves, which ends the session.
    async fn send_message(&self, joined: &Joined, body: &str) -> SessionResult<()> {
        if body.trim().is_empty() {
            debug!("Blank message dropped");
            return Ok(());
        }

        let room = match RoomDirectory::new(&self.ctx).resolve_for_send(&joined.name).await {
            Ok(room) => room,
            Err(e) if e.is_not_found() => return Err(e.into()),
            Err(e) => {
                error!(error = %e, "Room resolution failed; message dropped");
                return Ok(());
            }
        };

        let message = match MessageStore::new(&self.ctx).append(&room, &joined.identity, body).await {
            Ok(message) => message,
            Err(e) if e.status_code() == 400 => {
                warn!(error = %e, "Message rejected");
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "Failed to persist message; not broadcast");
                return Ok(());
            }
        };

        let event = RoomEvent::Message(MessagePayload::new(&message, &room.name, &joined.identity));
        match self.ctx.broadcaster().publish(&joined.group, &event).await {
            Ok(receivers) => debug!(message_id = %message.id, receivers, "Message broadcast"),
            Err(e) => error!(message_id = %message.id, error = %e, "Broadcast failed"),
        }

        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid session transition {:?} -> {next:?}",
            self.state
        );
        debug!(
            connection_id = %self.connection.connection_id,
            user_id = ?self.connection.identity.identity().map(|i| i.id),
            from = ?self.state,
            to = ?next,
            "Session state changed"
        );
        self.state = next;
    }
}

/// Send a close frame; the peer may already be gone
pub(crate) async fn send_close<Tx>(sink: &mut Tx, code: CloseCode)
where
    Tx: Sink<Message> + Unpin,
{
    let frame = CloseFrame {
        code: code.as_u16(),
        reason: Cow::Borrowed(code.description()),
    };
    sink.send(Message::Close(Some(frame))).await.ok();
}
