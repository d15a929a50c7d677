//! Room Model

use serde::{Deserialize, Serialize};

/// Room housekeeping/occupancy status (informational, no transition rules)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Clean,
    Dirty,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub const ALL: [RoomStatus; 4] = [
        Self::Clean,
        Self::Dirty,
        Self::Occupied,
        Self::Maintenance,
    ];

    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "clean" => Some(Self::Clean),
            "dirty" => Some(Self::Dirty),
            "occupied" => Some(Self::Occupied),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

/// Room entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub status: RoomStatus,
    pub capacity: i32,
}

/// Create room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreate {
    pub name: String,
    pub status: RoomStatus,
    pub capacity: i32,
}

/// Update room payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomUpdate {
    pub name: Option<String>,
    pub status: Option<RoomStatus>,
    pub capacity: Option<i32>,
}

/// Room columns embedded into a reservation projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub name: String,
    pub capacity: i32,
}
