//! Dashboard edit forms

use shared::models::{
    HousekeepingTask, HousekeepingTaskCreate, Reservation, ReservationCreate, ReservationStatus,
    TaskStatus, TaskType,
};

/// Reservation form state (new reservations default to `confirmed`)
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationForm {
    pub room_id: String,
    pub guest: String,
    pub checkin: String,
    pub checkout: String,
    pub status: ReservationStatus,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            room_id: String::new(),
            guest: String::new(),
            checkin: String::new(),
            checkout: String::new(),
            status: ReservationStatus::Confirmed,
        }
    }
}

impl ReservationForm {
    pub fn is_complete(&self) -> bool {
        !self.room_id.is_empty()
            && !self.guest.is_empty()
            && !self.checkin.is_empty()
            && !self.checkout.is_empty()
    }

    pub fn to_payload(&self) -> ReservationCreate {
        ReservationCreate {
            room_id: self.room_id.clone(),
            guest: self.guest.clone(),
            checkin: self.checkin.clone(),
            checkout: self.checkout.clone(),
            status: self.status,
        }
    }
}

impl From<&Reservation> for ReservationForm {
    fn from(r: &Reservation) -> Self {
        Self {
            room_id: r.room_id.clone(),
            guest: r.guest.clone(),
            checkin: r.checkin.clone(),
            checkout: r.checkout.clone(),
            status: r.status,
        }
    }
}

/// Housekeeping form state
#[derive(Debug, Clone, PartialEq)]
pub struct HousekeepingForm {
    pub room_id: String,
    pub task_type: TaskType,
    pub assigned: String,
    pub status: TaskStatus,
}

impl Default for HousekeepingForm {
    fn default() -> Self {
        Self {
            room_id: String::new(),
            task_type: TaskType::Cleaning,
            assigned: String::new(),
            status: TaskStatus::Pending,
        }
    }
}

impl HousekeepingForm {
    pub fn is_complete(&self) -> bool {
        !self.room_id.is_empty() && !self.assigned.is_empty()
    }

    pub fn to_payload(&self) -> HousekeepingTaskCreate {
        HousekeepingTaskCreate {
            room_id: self.room_id.clone(),
            task_type: self.task_type,
            assigned: self.assigned.clone(),
            status: self.status,
        }
    }
}

impl From<&HousekeepingTask> for HousekeepingForm {
    fn from(t: &HousekeepingTask) -> Self {
        Self {
            room_id: t.room_id.clone(),
            task_type: t.task_type,
            assigned: t.assigned.clone(),
            status: t.status,
        }
    }
}
