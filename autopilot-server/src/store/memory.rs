//! In-process store
//!
//! Backs `STORE_BACKEND=memory` and the test suites. Ids are fresh v4
//! UUIDs. Incoming ids are lowercased so they compare the way PostgreSQL's
//! `uuid` type does. Every mutation publishes a [`ChangeEvent`] after the write lock
//! is released. No CHECK constraints are enforced, so any `YYYY-MM-DD`
//! shaped text is kept as-is.

use async_trait::async_trait;
use shared::models::{
    HousekeepingTask, HousekeepingTaskCreate, HousekeepingTaskUpdate, Reservation,
    ReservationCreate, ReservationFilter, ReservationStatus, ReservationUpdate,
    ReservationWithRoom, Room, RoomCreate, RoomSummary, RoomUpdate,
};
use shared::realtime::{ChangeEvent, ChangeKind, Table};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DataStore, StoreResult};
use crate::live::ChangeHub;

#[derive(Default)]
struct Tables {
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    housekeeping: Vec<HousekeepingTask>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    hub: ChangeHub,
}

impl MemoryStore {
    pub fn new(hub: ChangeHub) -> Self {
        Self {
            tables: Arc::default(),
            hub,
        }
    }

    fn notify(&self, table: Table, kind: ChangeKind, id: &str) {
        self.hub.publish(ChangeEvent::new(table, kind, id));
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Canonical text form of a caller-supplied UUID
fn canonical_id(id: &str) -> String {
    id.to_ascii_lowercase()
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn list_rooms(&self) -> StoreResult<Vec<Room>> {
        let mut rooms = self.tables.read().await.rooms.clone();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rooms)
    }

    async fn insert_room(&self, data: &RoomCreate) -> StoreResult<Room> {
        let room = Room {
            id: new_id(),
            name: data.name.clone(),
            status: data.status,
            capacity: data.capacity,
        };
        self.tables.write().await.rooms.push(room.clone());
        self.notify(Table::Rooms, ChangeKind::Insert, &room.id);
        Ok(room)
    }

    async fn update_room(&self, id: &str, data: &RoomUpdate) -> StoreResult<Option<Room>> {
        let id = canonical_id(id);
        let id = id.as_str();
        let updated = {
            let mut tables = self.tables.write().await;
            tables.rooms.iter_mut().find(|r| r.id == id).map(|room| {
                if let Some(name) = &data.name {
                    room.name = name.clone();
                }
                if let Some(status) = data.status {
                    room.status = status;
                }
                if let Some(capacity) = data.capacity {
                    room.capacity = capacity;
                }
                room.clone()
            })
        };
        if updated.is_some() {
            self.notify(Table::Rooms, ChangeKind::Update, id);
        }
        Ok(updated)
    }

    async fn delete_room(&self, id: &str) -> StoreResult<bool> {
        let id = canonical_id(id);
        let id = id.as_str();
        let removed = {
            let mut tables = self.tables.write().await;
            let before = tables.rooms.len();
            tables.rooms.retain(|r| r.id != id);
            tables.rooms.len() != before
        };
        if removed {
            self.notify(Table::Rooms, ChangeKind::Delete, id);
        }
        Ok(removed)
    }

    async fn select_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> StoreResult<Vec<ReservationWithRoom>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ReservationWithRoom> = tables
            .reservations
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| ReservationWithRoom {
                reservation: r.clone(),
                rooms: tables
                    .rooms
                    .iter()
                    .find(|room| room.id == r.room_id)
                    .map(|room| RoomSummary {
                        name: room.name.clone(),
                        capacity: room.capacity,
                    }),
            })
            .collect();
        // Stable: equal checkins keep insertion order
        rows.sort_by(|a, b| a.reservation.checkin.cmp(&b.reservation.checkin));
        Ok(rows)
    }

    async fn insert_reservation(&self, data: &ReservationCreate) -> StoreResult<Reservation> {
        let reservation = reservation_from(new_id(), data);
        self.tables
            .write()
            .await
            .reservations
            .push(reservation.clone());
        self.notify(Table::Reservations, ChangeKind::Insert, &reservation.id);
        Ok(reservation)
    }

    async fn upsert_reservation(
        &self,
        id: &str,
        data: &ReservationCreate,
    ) -> StoreResult<Reservation> {
        let id = canonical_id(id);
        let id = id.as_str();
        let reservation = reservation_from(id.to_string(), data);
        let kind = {
            let mut tables = self.tables.write().await;
            match tables.reservations.iter_mut().find(|r| r.id == id) {
                Some(existing) => {
                    *existing = reservation.clone();
                    ChangeKind::Update
                }
                None => {
                    tables.reservations.push(reservation.clone());
                    ChangeKind::Insert
                }
            }
        };
        self.notify(Table::Reservations, kind, id);
        Ok(reservation)
    }

    async fn update_reservation(
        &self,
        id: &str,
        data: &ReservationUpdate,
    ) -> StoreResult<Option<Reservation>> {
        let id = canonical_id(id);
        let id = id.as_str();
        let updated = {
            let mut tables = self.tables.write().await;
            tables.reservations.iter_mut().find(|r| r.id == id).map(|r| {
                if let Some(room_id) = &data.room_id {
                    r.room_id = canonical_id(room_id);
                }
                if let Some(guest) = &data.guest {
                    r.guest = guest.clone();
                }
                if let Some(checkin) = &data.checkin {
                    r.checkin = checkin.clone();
                }
                if let Some(checkout) = &data.checkout {
                    r.checkout = checkout.clone();
                }
                if let Some(status) = data.status {
                    r.status = status;
                }
                r.clone()
            })
        };
        if updated.is_some() {
            self.notify(Table::Reservations, ChangeKind::Update, id);
        }
        Ok(updated)
    }

    async fn set_reservation_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> StoreResult<u64> {
        let id = canonical_id(id);
        let id = id.as_str();
        let touched = {
            let mut tables = self.tables.write().await;
            let mut touched = 0;
            for r in tables.reservations.iter_mut().filter(|r| r.id == id) {
                r.status = status;
                touched += 1;
            }
            touched
        };
        if touched > 0 {
            self.notify(Table::Reservations, ChangeKind::Update, id);
        }
        Ok(touched)
    }

    async fn delete_reservation(&self, id: &str) -> StoreResult<bool> {
        let id = canonical_id(id);
        let id = id.as_str();
        let removed = {
            let mut tables = self.tables.write().await;
            let before = tables.reservations.len();
            tables.reservations.retain(|r| r.id != id);
            tables.reservations.len() != before
        };
        if removed {
            self.notify(Table::Reservations, ChangeKind::Delete, id);
        }
        Ok(removed)
    }

    async fn list_housekeeping(&self) -> StoreResult<Vec<HousekeepingTask>> {
        let mut tasks = self.tables.read().await.housekeeping.clone();
        tasks.sort_by(|a, b| a.assigned.cmp(&b.assigned));
        Ok(tasks)
    }

    async fn insert_housekeeping(
        &self,
        data: &HousekeepingTaskCreate,
    ) -> StoreResult<HousekeepingTask> {
        let task = HousekeepingTask {
            id: new_id(),
            room_id: canonical_id(&data.room_id),
            task_type: data.task_type,
            assigned: data.assigned.clone(),
            status: data.status,
        };
        self.tables.write().await.housekeeping.push(task.clone());
        self.notify(Table::Housekeeping, ChangeKind::Insert, &task.id);
        Ok(task)
    }

    async fn update_housekeeping(
        &self,
        id: &str,
        data: &HousekeepingTaskUpdate,
    ) -> StoreResult<Option<HousekeepingTask>> {
        let id = canonical_id(id);
        let id = id.as_str();
        let updated = {
            let mut tables = self.tables.write().await;
            tables.housekeeping.iter_mut().find(|t| t.id == id).map(|t| {
                if let Some(room_id) = &data.room_id {
                    t.room_id = canonical_id(room_id);
                }
                if let Some(task_type) = data.task_type {
                    t.task_type = task_type;
                }
                if let Some(assigned) = &data.assigned {
                    t.assigned = assigned.clone();
                }
                if let Some(status) = data.status {
                    t.status = status;
                }
                t.clone()
            })
        };
        if updated.is_some() {
            self.notify(Table::Housekeeping, ChangeKind::Update, id);
        }
        Ok(updated)
    }

    async fn delete_housekeeping(&self, id: &str) -> StoreResult<bool> {
        let id = canonical_id(id);
        let id = id.as_str();
        let removed = {
            let mut tables = self.tables.write().await;
            let before = tables.housekeeping.len();
            tables.housekeeping.retain(|t| t.id != id);
            tables.housekeeping.len() != before
        };
        if removed {
            self.notify(Table::Housekeeping, ChangeKind::Delete, id);
        }
        Ok(removed)
    }

    fn changes(&self) -> &ChangeHub {
        &self.hub
    }
}

fn reservation_from(id: String, data: &ReservationCreate) -> Reservation {
    Reservation {
        id,
        room_id: canonical_id(&data.room_id),
        guest: data.guest.clone(),
        checkin: data.checkin.clone(),
        checkout: data.checkout.clone(),
        status: data.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::RoomStatus;

    fn booking(room_id: &str, checkin: &str, checkout: &str) -> ReservationCreate {
        ReservationCreate {
            room_id: room_id.into(),
            guest: "Grace".into(),
            checkin: checkin.into(),
            checkout: checkout.into(),
            status: ReservationStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn test_select_orders_by_checkin_and_joins_room() {
        let store = MemoryStore::default();
        let room = store
            .insert_room(&RoomCreate {
                name: "101".into(),
                status: RoomStatus::Clean,
                capacity: 2,
            })
            .await
            .unwrap();

        store
            .insert_reservation(&booking(&room.id, "2024-06-10", "2024-06-12"))
            .await
            .unwrap();
        store
            .insert_reservation(&booking(&new_id(), "2024-06-01", "2024-06-03"))
            .await
            .unwrap();

        let rows = store
            .select_reservations(&ReservationFilter::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reservation.checkin, "2024-06-01");
        assert!(rows[0].rooms.is_none());
        assert_eq!(rows[1].rooms.as_ref().unwrap().name, "101");
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = MemoryStore::default();
        let id = new_id();
        let room_id = new_id();

        store
            .upsert_reservation(&id, &booking(&room_id, "2024-01-01", "2024-01-02"))
            .await
            .unwrap();
        let mut changed = booking(&room_id, "2024-01-05", "2024-01-06");
        changed.status = ReservationStatus::Pending;
        let row = store.upsert_reservation(&id, &changed).await.unwrap();

        assert_eq!(row.id, id);
        let all = store.list_reservations().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].checkin, "2024-01-05");
        assert_eq!(all[0].status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn test_ids_match_case_insensitively() {
        let store = MemoryStore::default();
        let id = "6F1C2A9E-4B1D-4C3A-9A55-0D2A7C1E9B10";
        let room_id = "0D2A7C1E-9B10-4C3A-9A55-6F1C2A9E4B1D";

        store
            .upsert_reservation(id, &booking(room_id, "2024-01-01", "2024-01-02"))
            .await
            .unwrap();
        let row = store
            .upsert_reservation(
                &id.to_lowercase(),
                &booking(room_id, "2024-01-03", "2024-01-04"),
            )
            .await
            .unwrap();

        assert_eq!(row.id, id.to_lowercase());
        assert_eq!(row.room_id, room_id.to_lowercase());
        let all = store.list_reservations().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].checkin, "2024-01-03");

        let touched = store
            .set_reservation_status(id, ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(touched, 1);
        assert!(store.delete_reservation(id).await.unwrap());
        assert!(store.list_reservations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_status_unknown_id_touches_nothing() {
        let store = MemoryStore::default();
        let touched = store
            .set_reservation_status(&new_id(), ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(touched, 0);
    }

    #[tokio::test]
    async fn test_mutations_publish_changes() {
        let store = MemoryStore::default();
        let mut rx = store.changes().subscribe(Table::Housekeeping);

        let task = store
            .insert_housekeeping(&HousekeepingTaskCreate {
                room_id: new_id(),
                task_type: shared::models::TaskType::Cleaning,
                assigned: "Marta".into(),
                status: shared::models::TaskStatus::Pending,
            })
            .await
            .unwrap();
        assert!(store.delete_housekeeping(&task.id).await.unwrap());
        assert!(!store.delete_housekeeping(&task.id).await.unwrap());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, ChangeKind::Insert);
        assert_eq!(first.id.as_deref(), Some(task.id.as_str()));
        assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::Delete);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let store = MemoryStore::default();
        let room = store
            .insert_room(&RoomCreate {
                name: "201".into(),
                status: RoomStatus::Dirty,
                capacity: 3,
            })
            .await
            .unwrap();

        let updated = store
            .update_room(
                &room.id,
                &RoomUpdate {
                    status: Some(RoomStatus::Clean),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, RoomStatus::Clean);
        assert_eq!(updated.name, "201");

        assert!(
            store
                .update_room(&new_id(), &RoomUpdate::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
