//! ChangeHub - per-table row change fan-out
//!
//! ```text
//! PgStore LISTEN task / MemoryStore mutation
//!       │ ChangeEvent
//!       ▼
//! ChangeHub
//!   └── channels: Table → broadcast::Sender<ChangeEvent>
//!         │
//!         ▼
//!   Realtime WS handler (subscribe(table) → push to dashboard)
//! ```
//!
//! Delivery is at-most-once. A subscriber that falls more than
//! [`BROADCAST_CAPACITY`] events behind gets `RecvError::Lagged` and must
//! re-read the whole table.

use dashmap::DashMap;
use shared::realtime::{ChangeEvent, Table};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel capacity per table
pub const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone, Default)]
pub struct ChangeHub {
    channels: Arc<DashMap<Table, broadcast::Sender<ChangeEvent>>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a row change to the table's subscribers
    pub fn publish(&self, event: ChangeEvent) {
        let tx = self.sender(event.table);
        // No subscribers is not an error
        let receivers = tx.send(event).unwrap_or(0);
        tracing::trace!(receivers, "Change event published");
    }

    /// Subscribe to one table's changes
    pub fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent> {
        self.sender(table).subscribe()
    }

    /// Current number of live subscribers on a table
    pub fn subscriber_count(&self, table: Table) -> usize {
        self.channels
            .get(&table)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn sender(&self, table: Table) -> broadcast::Sender<ChangeEvent> {
        self.channels
            .entry(table)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .clone()
    }
}
