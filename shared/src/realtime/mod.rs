//! Realtime change-notification protocol
//!
//! Server → Dashboard: [`RealtimeMessage`] over WebSocket.
//! The store emits one [`ChangeEvent`] per inserted, updated or deleted row;
//! subscribers only learn *that* a table changed and re-query it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tables that emit change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Rooms,
    Reservations,
    Housekeeping,
}

impl Table {
    pub const ALL: [Table; 3] = [Self::Rooms, Self::Reservations, Self::Housekeeping];

    /// Parse from the SQL table name
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "rooms" => Some(Self::Rooms),
            "reservations" => Some(Self::Reservations),
            "housekeeping" => Some(Self::Housekeeping),
            _ => None,
        }
    }

    /// SQL table name
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Rooms => "rooms",
            Self::Reservations => "reservations",
            Self::Housekeeping => "housekeeping",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db())
    }
}

/// Row-level mutation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    /// Parse a trigger `TG_OP` value (`INSERT` / `UPDATE` / `DELETE`)
    pub fn from_tg_op(op: &str) -> Option<Self> {
        match op.to_ascii_uppercase().as_str() {
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// A single row mutation observed on a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    /// Primary key of the affected row, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ChangeEvent {
    pub fn new(table: Table, kind: ChangeKind, id: impl Into<String>) -> Self {
        Self {
            table,
            kind,
            id: Some(id.into()),
        }
    }
}

/// Server → Dashboard push message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeMessage {
    /// Subscription established
    Subscribed { table: Table },

    /// A row in the subscribed table changed
    Change(ChangeEvent),

    /// Events were dropped (slow subscriber); the whole table must be re-read
    Resync { table: Table },
}

impl RealtimeMessage {
    /// Table whose client-side copy is now stale, if any
    pub fn stale_table(&self) -> Option<Table> {
        match self {
            Self::Subscribed { .. } => None,
            Self::Change(event) => Some(event.table),
            Self::Resync { table } => Some(*table),
        }
    }
}
