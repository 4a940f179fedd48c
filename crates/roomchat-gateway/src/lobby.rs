//! Lobby feed
//!
//! Authenticated clients on `/ws/rooms` receive `room_created` notifications.
//! Inbound frames other than `ping` are ignored.

use std::sync::Arc;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use roomchat_core::GroupKey;
use roomchat_pubsub::RecvError;
use roomchat_service::ServiceContext;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::gatekeeper::{ConnectionContext, ConnectionIdentity};
use crate::protocol::{CloseCode, InboundFrame, OutboundFrame};
use crate::session::send_close;

/// Forward lobby events to one connection until it closes
#[instrument(skip_all, fields(connection_id = %connection.connection_id))]
pub async fn run_lobby<Tx, Rx>(
    ctx: Arc<ServiceContext>,
    connection: ConnectionContext,
    mut shutdown: watch::Receiver<bool>,
    mut sink: Tx,
    mut stream: Rx,
) where
    Tx: Sink<Message> + Unpin,
    Rx: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    if let ConnectionIdentity::Anonymous(failure) = &connection.identity {
        debug!(reason = failure.reason(), "Rejecting anonymous lobby connection");
        send_close(&mut sink, CloseCode::AuthenticationRequired).await;
        return;
    }

    let mut subscription = ctx.broadcaster().subscribe(&GroupKey::lobby());

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if matches!(InboundFrame::parse(&text), Ok(InboundFrame::Ping)) {
                        let Ok(pong) = OutboundFrame::Pong.to_json() else { continue };
                        if sink.send(Message::Text(pong)).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            event = subscription.recv() => match event {
                Ok(payload) => {
                    if sink.send(Message::Text(payload.to_string())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Lobby subscriber lagged"),
                Err(RecvError::Closed) => break,
            },
            Ok(()) = shutdown.changed() => {
                send_close(&mut sink, CloseCode::Normal).await;
                break;
            }
        }
    }

    debug!("Lobby connection closed");
}
