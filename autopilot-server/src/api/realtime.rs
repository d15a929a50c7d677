//! Realtime WebSocket endpoint: table change feed
//!
//! GET /api/realtime?table=<rooms|reservations|housekeeping>&apikey=<anon key>
//!
//! Protocol (Server → Dashboard, JSON text frames):
//! - `{"type":"subscribed","table":..}` once, right after the upgrade
//! - `{"type":"change","table":..,"kind":..,"id":..}` per row mutation
//! - `{"type":"resync","table":..}` when events were dropped
//!
//! Incoming client frames other than Close are ignored.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::realtime::{RealtimeMessage, Table};
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct RealtimeQuery {
    table: Table,
}

pub async fn handle_realtime_ws(
    State(state): State<AppState>,
    Query(query): Query<RealtimeQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| realtime_session(socket, state, query.table))
}

async fn realtime_session(socket: WebSocket, state: AppState, table: Table) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before acknowledging so no change after `subscribed` is missed
    let mut changes = state.changes().subscribe(table);
    tracing::info!(%table, "Realtime subscriber connected");

    if send_message(&mut sink, &RealtimeMessage::Subscribed { table })
        .await
        .is_err()
    {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = changes.recv() => {
                let msg = match event {
                    Ok(event) => RealtimeMessage::Change(event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%table, lagged = n, "Realtime subscriber lagged, requesting resync");
                        changes = state.changes().subscribe(table);
                        RealtimeMessage::Resync { table }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if send_message(&mut sink, &msg).await.is_err() {
                    break;
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    tracing::info!(%table, "Realtime subscriber disconnected");
}

async fn send_message<S>(sink: &mut S, msg: &RealtimeMessage) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
