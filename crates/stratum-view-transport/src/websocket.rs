//! WebSocket connector for the state stream.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{Stream, StreamExt};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_tungstenite::{connect_async, tungstenite};
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::location::{LocationError, PageLocation};

/// Transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Connection to {endpoint} failed: {source}")]
    Connect {
        endpoint: Url,
        #[source]
        source: Box<tungstenite::Error>,
    },
}

/// Lifecycle of an open connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake done, frames are being read.
    Connected,
    /// The server closed the socket or the stream ended.
    Closed,
    /// The socket failed with a protocol or I/O error.
    Failed,
}

/// Opens the state socket for a page.
#[derive(Debug, Clone)]
pub struct Connector {
    id: Uuid,
    endpoint: Url,
}

impl Connector {
    /// Create a connector targeting the page's socket endpoint.
    ///
    /// # Errors
    /// Returns error if the endpoint cannot be derived from the location.
    pub fn new(location: &PageLocation) -> Result<Self, TransportError> {
        Ok(Self {
            id: Uuid::new_v4(),
            endpoint: location.socket_endpoint()?,
        })
    }

    /// Derived websocket endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Open the connection.
    ///
    /// Inbound frames are forwarded, in arrival order, to the returned
    /// [`Connection`]. Nothing is ever written to the socket.
    ///
    /// # Errors
    /// Returns error if the websocket handshake fails.
    pub async fn connect(self) -> Result<Connection, TransportError> {
        let span = tracing::info_span!("connection", id = %self.id, endpoint = %self.endpoint);

        let handshake = connect_async(self.endpoint.as_str())
            .instrument(span.clone())
            .await;
        let (socket, _) = match handshake {
            Ok(ok) => ok,
            Err(e) => {
                span.in_scope(|| tracing::error!("Failed to connect: {e}"));
                return Err(TransportError::Connect {
                    endpoint: self.endpoint,
                    source: Box::new(e),
                });
            }
        };
        span.in_scope(|| tracing::info!("Connected"));

        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connected);
        let reader = tokio::spawn(read_frames(socket, tx, state_tx).instrument(span));

        Ok(Connection {
            id: self.id,
            endpoint: self.endpoint,
            inbound: UnboundedReceiverStream::new(rx),
            state: state_rx,
            reader,
        })
    }
}

async fn read_frames<S>(
    mut socket: S,
    tx: mpsc::UnboundedSender<String>,
    state: watch::Sender<ConnectionState>,
) where
    S: Stream<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
{
    let mut end = ConnectionState::Closed;

    while let Some(msg) = socket.next().await {
        let text = match msg {
            Ok(tungstenite::Message::Text(text)) => text,
            Ok(tungstenite::Message::Binary(data)) => match String::from_utf8(data) {
                Ok(text) => text,
                Err(_) => {
                    tracing::warn!("Dropping non-UTF-8 binary frame");
                    continue;
                }
            },
            Ok(tungstenite::Message::Close(frame)) => {
                tracing::info!(?frame, "Server closed connection");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("WebSocket error: {e}");
                end = ConnectionState::Failed;
                break;
            }
        };

        if tx.send(text).is_err() {
            tracing::debug!("Inbound receiver dropped");
            break;
        }
    }

    let _ = state.send(end);
}

/// An open state socket.
///
/// Yields raw inbound messages in arrival order. Dropping the connection
/// stops the reader task and closes the socket.
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    endpoint: Url,
    inbound: UnboundedReceiverStream<String>,
    state: watch::Receiver<ConnectionState>,
    reader: JoinHandle<()>,
}

impl Connection {
    /// Connection identifier used in logs.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Endpoint the connection was opened to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch lifecycle changes.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Receive the next raw message.
    ///
    /// Returns `None` once the socket is closed and all buffered messages
    /// have been received.
    pub async fn recv(&mut self) -> Option<String> {
        self.inbound.next().await
    }
}

impl Stream for Connection {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        Pin::new(&mut self.inbound).poll_next(cx)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
