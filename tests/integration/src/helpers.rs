//! Test helpers for integration tests
//!
//! `TestServer` runs the real router on an ephemeral port with in-memory
//! storage; `WsClient` wraps a websocket connection to it.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use roomchat_api::{create_app_state, serve, AppState};
use roomchat_common::AppConfig;
use roomchat_core::{Identity, Role};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{protocol::CloseFrame, Message},
    MaybeTlsStream, WebSocketStream,
};

/// How long a websocket read may wait before the test fails
pub const WS_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the in-memory test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::for_tests()).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            let signal = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = serve(listener, server_state, signal).await {
                eprintln!("test server stopped: {e}");
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            shutdown: Some(shutdown_tx),
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Websocket URL for `path`, with `token` as the query parameter when given
    pub fn ws_url(&self, path: &str, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("ws://{}{path}?token={token}", self.addr),
            None => format!("ws://{}{path}", self.addr),
        }
    }

    /// Register an identity with the account read model and issue its token
    pub async fn register(&self, id: i64, username: &str) -> Result<String> {
        let identity = Identity::new(id, username, Role::Client);
        self.state
            .service_context()
            .identity_repo()
            .upsert(&identity)
            .await?;
        Ok(self.state.jwt_service().issue(&identity)?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// POST with a JSON body
    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).bearer_auth(token).send().await?)
    }

    /// POST without a body
    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).bearer_auth(token).send().await?)
    }

    pub async fn connect(&self, path: &str, token: Option<&str>) -> Result<WsClient> {
        WsClient::connect(&self.ws_url(path, token)).await
    }

    /// Trigger graceful shutdown and wait for the server task
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(WS_TIMEOUT, &mut self.handle)
            .await
            .context("server did not stop")??;
        Ok(())
    }
}

/// Websocket client speaking the gateway's JSON frames
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _response) = connect_async(url).await?;
        Ok(Self { stream })
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    pub async fn send_message(&mut self, body: &str) -> Result<()> {
        let frame = serde_json::json!({ "type": "send_message", "body": body });
        self.send_text(&frame.to_string()).await
    }

    /// Next text frame as JSON; fails on close or timeout
    pub async fn next_json(&mut self) -> Result<serde_json::Value> {
        loop {
            let frame = tokio::time::timeout(WS_TIMEOUT, self.stream.next())
                .await
                .context("timed out waiting for a frame")?
                .context("connection ended")??;
            match frame {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(frame) => anyhow::bail!("connection closed: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Round-trip a ping; once the pong arrives the session is joined and subscribed
    pub async fn sync(&mut self) -> Result<()> {
        self.send_text(r#"{"type":"ping"}"#).await?;
        let pong = self.next_json().await?;
        anyhow::ensure!(pong["type"] == "pong", "expected pong, got {pong}");
        Ok(())
    }

    /// Wait for the server's close frame and return its code
    pub async fn close_code(&mut self) -> Result<u16> {
        loop {
            let frame = tokio::time::timeout(WS_TIMEOUT, self.stream.next())
                .await
                .context("timed out waiting for close")?
                .context("connection ended without a close frame")??;
            if let Message::Close(frame) = frame {
                let frame: CloseFrame<'_> = frame.context("close frame without a code")?;
                return Ok(u16::from(frame.code));
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status and return the error code from the envelope
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .context("error envelope without a code")
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
