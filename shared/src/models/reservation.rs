//! Reservation Model
//!
//! `checkin` / `checkout` are kept as the `YYYY-MM-DD` text the provider sent.
//! Nothing in this crate checks that checkout falls after checkin.

use serde::{Deserialize, Serialize};

use super::room::RoomSummary;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Cancelled,
    ];

    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "checked_in" => Some(Self::CheckedIn),
            "checked_out" => Some(Self::CheckedOut),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }

    /// Does a reservation in this status earn revenue?
    pub fn is_billable(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn | Self::CheckedOut)
    }
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub room_id: String,
    pub guest: String,
    pub checkin: String,
    pub checkout: String,
    pub status: ReservationStatus,
}

/// Create reservation payload (also the full-record form used by upserts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub room_id: String,
    pub guest: String,
    pub checkin: String,
    pub checkout: String,
    pub status: ReservationStatus,
}

/// Update reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub room_id: Option<String>,
    pub guest: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub status: Option<ReservationStatus>,
}

impl From<ReservationCreate> for ReservationUpdate {
    fn from(data: ReservationCreate) -> Self {
        Self {
            room_id: Some(data.room_id),
            guest: Some(data.guest),
            checkin: Some(data.checkin),
            checkout: Some(data.checkout),
            status: Some(data.status),
        }
    }
}

/// Reservation row joined with its room's name and capacity
///
/// `rooms` is `None` when the referenced room no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationWithRoom {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub rooms: Option<RoomSummary>,
}

/// Select filter for reservation queries (all bounds inclusive)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    /// Lower bound on checkin
    pub from: Option<String>,
    /// Upper bound on checkout
    pub to: Option<String>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let Some(status) = self.status
            && reservation.status != status
        {
            return false;
        }
        if let Some(from) = &self.from
            && reservation.checkin.as_str() < from.as_str()
        {
            return false;
        }
        if let Some(to) = &self.to
            && reservation.checkout.as_str() > to.as_str()
        {
            return false;
        }
        true
    }
}
