//! RealtimeListener: forwards the server's change feed into a channel
//!
//! Connects to `GET /api/realtime` for one table and pushes every decoded
//! [`RealtimeMessage`] into an mpsc sender. Dropped connections are retried;
//! after a reconnect a synthetic `Resync` is emitted because changes may have
//! been missed while offline.

use futures::StreamExt;
use reqwest::Url;
use shared::{RealtimeMessage, Table};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::{ClientResult, HttpClient};

/// Delay between reconnect attempts
const RECONNECT_DELAY_SECS: u64 = 3;

/// Why a single connection ended
enum SessionEnd {
    Cancelled,
    ReceiverGone,
    Disconnected,
}

pub struct RealtimeListener {
    url: Url,
    table: Table,
    tx: mpsc::Sender<RealtimeMessage>,
    shutdown: CancellationToken,
    reconnect_delay: Duration,
}

impl RealtimeListener {
    pub fn new(
        http: &HttpClient,
        table: Table,
        tx: mpsc::Sender<RealtimeMessage>,
        shutdown: CancellationToken,
    ) -> ClientResult<Self> {
        Ok(Self {
            url: http.realtime_url(table)?,
            table,
            tx,
            shutdown,
            reconnect_delay: Duration::from_secs(RECONNECT_DELAY_SECS),
        })
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Spawn the listener onto the runtime
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until cancelled or until the receiving side is dropped
    pub async fn run(self) {
        tracing::info!(table = %self.table, "Realtime listener started");
        let mut connected_before = false;

        loop {
            match tokio_tungstenite::connect_async(self.url.as_str()).await {
                Ok((stream, _response)) => {
                    tracing::debug!(table = %self.table, "Realtime connected");
                    if connected_before
                        && self
                            .tx
                            .send(RealtimeMessage::Resync { table: self.table })
                            .await
                            .is_err()
                    {
                        break;
                    }
                    connected_before = true;

                    match self.session(stream).await {
                        SessionEnd::Cancelled | SessionEnd::ReceiverGone => break,
                        SessionEnd::Disconnected => {
                            tracing::warn!(table = %self.table, "Realtime connection lost");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(table = %self.table, "Realtime connect failed: {e}");
                }
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }

        tracing::info!(table = %self.table, "Realtime listener stopped");
    }

    async fn session<S>(&self, stream: S) -> SessionEnd
    where
        S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        let mut stream = stream;
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return SessionEnd::Cancelled,
                frame = stream.next() => {
                    let text = match frame {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(_))) | None => return SessionEnd::Disconnected,
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            tracing::debug!(table = %self.table, "Realtime read error: {e}");
                            return SessionEnd::Disconnected;
                        }
                    };
                    let message = match serde_json::from_str::<RealtimeMessage>(text.as_str()) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::warn!("Ignoring malformed realtime message: {e}");
                            continue;
                        }
                    };
                    if self.tx.send(message).await.is_err() {
                        return SessionEnd::ReceiverGone;
                    }
                }
            }
        }
    }
}
