//! Socket transport seam.
//!
//! The production transport speaks JSON frames over tokio-tungstenite. The
//! handshake carries the access token as a query parameter; the server
//! validates it before acknowledging. Connections split into a sink and a
//! stream so the service can pump both directions from one select loop.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::protocol::{ClientEvent, ServerEvent};

/// Outgoing half of a realtime connection.
#[async_trait]
pub trait SocketSink: Send {
    async fn send(&mut self, event: &ClientEvent) -> Result<()>;
    async fn close(&mut self) -> Result<()>;
}

/// Incoming half of a realtime connection.
#[async_trait]
pub trait SocketStream: Send {
    /// Next server event. `None` means the connection is gone.
    async fn next_event(&mut self) -> Option<Result<ServerEvent>>;
}

pub struct SocketPair {
    pub sink: Box<dyn SocketSink>,
    pub stream: Box<dyn SocketStream>,
}

#[async_trait]
pub trait BaseSocketTransport: Send + Sync {
    async fn connect(&self, url: &str, token: &str) -> Result<SocketPair>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WsTransport;

#[async_trait]
impl BaseSocketTransport for WsTransport {
    async fn connect(&self, url: &str, token: &str) -> Result<SocketPair> {
        let handshake_url = format!("{}?token={}", url, token);
        let (ws, _response) = connect_async(&handshake_url)
            .await
            .context("WebSocket handshake failed")?;

        let (sink, stream) = ws.split();
        Ok(SocketPair {
            sink: Box::new(WsSink { sink }),
            stream: Box::new(WsEventStream { stream }),
        })
    }
}

struct WsSink {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl SocketSink for WsSink {
    async fn send(&mut self, event: &ClientEvent) -> Result<()> {
        let payload = serde_json::to_string(event)?;
        self.sink
            .send(Message::text(payload))
            .await
            .context("Failed to send realtime event")
    }

    async fn close(&mut self) -> Result<()> {
        self.sink.close().await.context("Failed to close socket")
    }
}

struct WsEventStream {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl SocketStream for WsEventStream {
    async fn next_event(&mut self) -> Option<Result<ServerEvent>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => match serde_json::from_str(text.as_str()) {
                    Ok(event) => return Some(Ok(event)),
                    Err(e) => {
                        // Unknown event kinds are skipped, not fatal: the
                        // server may ship events this client predates.
                        tracing::debug!(error = %e, "skipping unrecognized realtime frame");
                        continue;
                    }
                },
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(anyhow::Error::from(e))),
            }
        }
    }
}
