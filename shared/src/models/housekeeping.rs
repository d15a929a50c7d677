//! Housekeeping Task Model

use serde::{Deserialize, Serialize};

/// Kind of housekeeping work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Cleaning,
    Linen,
    Inspection,
    Repair,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [Self::Cleaning, Self::Linen, Self::Inspection, Self::Repair];

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "cleaning" => Some(Self::Cleaning),
            "linen" => Some(Self::Linen),
            "inspection" => Some(Self::Inspection),
            "repair" => Some(Self::Repair),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Linen => "linen",
            Self::Inspection => "inspection",
            Self::Repair => "repair",
        }
    }
}

/// Housekeeping task progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Done];

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

/// Housekeeping task entity (stored in the `housekeeping` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingTask {
    pub id: String,
    pub room_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub assigned: String,
    pub status: TaskStatus,
}

/// Create housekeeping task payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingTaskCreate {
    pub room_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub assigned: String,
    pub status: TaskStatus,
}

/// Update housekeeping task payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HousekeepingTaskUpdate {
    pub room_id: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub assigned: Option<String>,
    pub status: Option<TaskStatus>,
}

impl From<HousekeepingTaskCreate> for HousekeepingTaskUpdate {
    fn from(data: HousekeepingTaskCreate) -> Self {
        Self {
            room_id: Some(data.room_id),
            task_type: Some(data.task_type),
            assigned: Some(data.assigned),
            status: Some(data.status),
        }
    }
}
