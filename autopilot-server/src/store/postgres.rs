//! PostgreSQL store
//!
//! Ids and dates are bound as text and cast in SQL (`$1::uuid`, `$2::date`);
//! they are read back through `::text` so the models stay string-typed.
//! A malformed id or an impossible date (`2024-02-30`) surfaces as a
//! [`StoreError::Database`] from the cast.

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{
    HousekeepingTask, HousekeepingTaskCreate, HousekeepingTaskUpdate, Reservation,
    ReservationCreate, ReservationFilter, ReservationStatus, ReservationUpdate,
    ReservationWithRoom, Room, RoomCreate, RoomStatus, RoomSummary, RoomUpdate, TaskStatus,
    TaskType,
};
use shared::realtime::{ChangeEvent, ChangeKind, Table};
use sqlx::PgPool;
use sqlx::postgres::{PgListener, PgPoolOptions};
use tokio::task::JoinHandle;

use super::{DataStore, StoreError, StoreResult};
use crate::live::ChangeHub;

/// `pg_notify` channel written by the `notify_hotel_change()` trigger
pub const CHANGE_CHANNEL: &str = "hotel_changes";

const ROOM_COLUMNS: &str = "id::text AS id, name, status, capacity";
const RESERVATION_COLUMNS: &str = "id::text AS id, room_id::text AS room_id, guest, \
     checkin::text AS checkin, checkout::text AS checkout, status";
const HOUSEKEEPING_COLUMNS: &str =
    "id::text AS id, room_id::text AS room_id, type AS task_type, assigned, status";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    hub: ChangeHub,
}

impl PgStore {
    /// Connect and apply pending migrations
    pub async fn connect(database_url: &str, hub: ChangeHub) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool, hub })
    }

    /// Forward trigger notifications into the [`ChangeHub`] until the
    /// listener connection fails for good
    pub fn spawn_listener(&self) -> JoinHandle<()> {
        let pool = self.pool.clone();
        let hub = self.hub.clone();
        tokio::spawn(async move {
            if let Err(e) = listen(&pool, &hub).await {
                tracing::error!(error = %e, "Change listener stopped");
            }
        })
    }
}

async fn listen(pool: &PgPool, hub: &ChangeHub) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANGE_CHANNEL).await?;
    tracing::info!(channel = CHANGE_CHANNEL, "Listening for row changes");

    loop {
        // recv() reconnects transparently; notifications sent while
        // disconnected are lost, which subscribers tolerate.
        let notification = listener.recv().await?;
        match parse_notification(notification.payload()) {
            Some(event) => hub.publish(event),
            None => tracing::warn!(
                payload = notification.payload(),
                "Ignoring malformed change notification"
            ),
        }
    }
}

#[derive(Deserialize)]
struct NotifyPayload {
    table: String,
    kind: String,
    id: Option<String>,
}

/// Parse the trigger's JSON payload: `{"table":..,"kind":"INSERT",..,"id":..}`
fn parse_notification(payload: &str) -> Option<ChangeEvent> {
    let raw: NotifyPayload = serde_json::from_str(payload).ok()?;
    Some(ChangeEvent {
        table: Table::from_db(&raw.table)?,
        kind: ChangeKind::from_tg_op(&raw.kind)?,
        id: raw.id,
    })
}

// ── Row mapping ──

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: String,
    name: String,
    status: String,
    capacity: i32,
}

impl TryFrom<RoomRow> for Room {
    type Error = StoreError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let status = RoomStatus::from_db(&row.status).ok_or_else(|| StoreError::Decode {
            table: "rooms",
            reason: format!("unknown status '{}'", row.status),
        })?;
        Ok(Room {
            id: row.id,
            name: row.name,
            status,
            capacity: row.capacity,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: String,
    room_id: String,
    guest: String,
    checkin: String,
    checkout: String,
    status: String,
    #[sqlx(default)]
    room_name: Option<String>,
    #[sqlx(default)]
    room_capacity: Option<i32>,
}

impl ReservationRow {
    fn into_joined(mut self) -> StoreResult<ReservationWithRoom> {
        let rooms = match (self.room_name.take(), self.room_capacity) {
            (Some(name), Some(capacity)) => Some(RoomSummary { name, capacity }),
            _ => None,
        };
        Ok(ReservationWithRoom {
            reservation: self.try_into()?,
            rooms,
        })
    }
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status = ReservationStatus::from_db(&row.status).ok_or_else(|| StoreError::Decode {
            table: "reservations",
            reason: format!("unknown status '{}'", row.status),
        })?;
        Ok(Reservation {
            id: row.id,
            room_id: row.room_id,
            guest: row.guest,
            checkin: row.checkin,
            checkout: row.checkout,
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HousekeepingRow {
    id: String,
    room_id: String,
    task_type: String,
    assigned: String,
    status: String,
}

impl TryFrom<HousekeepingRow> for HousekeepingTask {
    type Error = StoreError;

    fn try_from(row: HousekeepingRow) -> Result<Self, Self::Error> {
        let decode = |reason: String| StoreError::Decode {
            table: "housekeeping",
            reason,
        };
        let task_type = TaskType::from_db(&row.task_type)
            .ok_or_else(|| decode(format!("unknown type '{}'", row.task_type)))?;
        let status = TaskStatus::from_db(&row.status)
            .ok_or_else(|| decode(format!("unknown status '{}'", row.status)))?;
        Ok(HousekeepingTask {
            id: row.id,
            room_id: row.room_id,
            task_type,
            assigned: row.assigned,
            status,
        })
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn list_rooms(&self) -> StoreResult<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Room::try_from).collect()
    }

    async fn insert_room(&self, data: &RoomCreate) -> StoreResult<Room> {
        let row: RoomRow = sqlx::query_as(&format!(
            "INSERT INTO rooms (name, status, capacity) VALUES ($1, $2, $3)
             RETURNING {ROOM_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(data.status.as_db())
        .bind(data.capacity)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_room(&self, id: &str, data: &RoomUpdate) -> StoreResult<Option<Room>> {
        let row: Option<RoomRow> = sqlx::query_as(&format!(
            "UPDATE rooms SET
                name = COALESCE($1, name),
                status = COALESCE($2, status),
                capacity = COALESCE($3, capacity)
             WHERE id = $4::uuid
             RETURNING {ROOM_COLUMNS}"
        ))
        .bind(data.name.as_deref())
        .bind(data.status.map(|s| s.as_db()))
        .bind(data.capacity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Room::try_from).transpose()
    }

    async fn delete_room(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn select_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> StoreResult<Vec<ReservationWithRoom>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            "SELECT r.id::text AS id, r.room_id::text AS room_id, r.guest,
                    r.checkin::text AS checkin, r.checkout::text AS checkout, r.status,
                    rm.name AS room_name, rm.capacity AS room_capacity
             FROM reservations r
             LEFT JOIN rooms rm ON rm.id = r.room_id
             WHERE ($1::text IS NULL OR r.status = $1)
               AND ($2::text IS NULL OR r.checkin >= $2::date)
               AND ($3::text IS NULL OR r.checkout <= $3::date)
             ORDER BY r.checkin ASC, r.id ASC",
        )
        .bind(filter.status.map(|s| s.as_db()))
        .bind(filter.from.as_deref())
        .bind(filter.to.as_deref())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ReservationRow::into_joined).collect()
    }

    async fn insert_reservation(&self, data: &ReservationCreate) -> StoreResult<Reservation> {
        let row: ReservationRow = sqlx::query_as(&format!(
            "INSERT INTO reservations (room_id, guest, checkin, checkout, status)
             VALUES ($1::uuid, $2, $3::date, $4::date, $5)
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(&data.room_id)
        .bind(&data.guest)
        .bind(&data.checkin)
        .bind(&data.checkout)
        .bind(data.status.as_db())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn upsert_reservation(
        &self,
        id: &str,
        data: &ReservationCreate,
    ) -> StoreResult<Reservation> {
        let row: ReservationRow = sqlx::query_as(&format!(
            "INSERT INTO reservations (id, room_id, guest, checkin, checkout, status)
             VALUES ($1::uuid, $2::uuid, $3, $4::date, $5::date, $6)
             ON CONFLICT (id) DO UPDATE SET
                room_id = EXCLUDED.room_id,
                guest = EXCLUDED.guest,
                checkin = EXCLUDED.checkin,
                checkout = EXCLUDED.checkout,
                status = EXCLUDED.status
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.room_id)
        .bind(&data.guest)
        .bind(&data.checkin)
        .bind(&data.checkout)
        .bind(data.status.as_db())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_reservation(
        &self,
        id: &str,
        data: &ReservationUpdate,
    ) -> StoreResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "UPDATE reservations SET
                room_id = COALESCE($1::uuid, room_id),
                guest = COALESCE($2, guest),
                checkin = COALESCE($3::date, checkin),
                checkout = COALESCE($4::date, checkout),
                status = COALESCE($5, status)
             WHERE id = $6::uuid
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(data.room_id.as_deref())
        .bind(data.guest.as_deref())
        .bind(data.checkin.as_deref())
        .bind(data.checkout.as_deref())
        .bind(data.status.map(|s| s.as_db()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Reservation::try_from).transpose()
    }

    async fn set_reservation_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE reservations SET status = $1 WHERE id = $2::uuid")
            .bind(status.as_db())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_reservation(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_housekeeping(&self) -> StoreResult<Vec<HousekeepingTask>> {
        let rows: Vec<HousekeepingRow> = sqlx::query_as(&format!(
            "SELECT {HOUSEKEEPING_COLUMNS} FROM housekeeping ORDER BY assigned ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(HousekeepingTask::try_from).collect()
    }

    async fn insert_housekeeping(
        &self,
        data: &HousekeepingTaskCreate,
    ) -> StoreResult<HousekeepingTask> {
        let row: HousekeepingRow = sqlx::query_as(&format!(
            "INSERT INTO housekeeping (room_id, type, assigned, status)
             VALUES ($1::uuid, $2, $3, $4)
             RETURNING {HOUSEKEEPING_COLUMNS}"
        ))
        .bind(&data.room_id)
        .bind(data.task_type.as_db())
        .bind(&data.assigned)
        .bind(data.status.as_db())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_housekeeping(
        &self,
        id: &str,
        data: &HousekeepingTaskUpdate,
    ) -> StoreResult<Option<HousekeepingTask>> {
        let row: Option<HousekeepingRow> = sqlx::query_as(&format!(
            "UPDATE housekeeping SET
                room_id = COALESCE($1::uuid, room_id),
                type = COALESCE($2, type),
                assigned = COALESCE($3, assigned),
                status = COALESCE($4, status)
             WHERE id = $5::uuid
             RETURNING {HOUSEKEEPING_COLUMNS}"
        ))
        .bind(data.room_id.as_deref())
        .bind(data.task_type.map(|t| t.as_db()))
        .bind(data.assigned.as_deref())
        .bind(data.status.map(|s| s.as_db()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(HousekeepingTask::try_from).transpose()
    }

    async fn delete_housekeeping(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM housekeeping WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn changes(&self) -> &ChangeHub {
        &self.hub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trigger_payload() {
        let event = parse_notification(
            r#"{"table":"reservations","kind":"UPDATE","id":"123e4567-e89b-12d3-a456-426614174000"}"#,
        )
        .unwrap();
        assert_eq!(event.table, Table::Reservations);
        assert_eq!(event.kind, ChangeKind::Update);
        assert_eq!(
            event.id.as_deref(),
            Some("123e4567-e89b-12d3-a456-426614174000")
        );
    }

    #[test]
    fn test_parse_trigger_payload_rejects_unknown() {
        assert!(parse_notification(r#"{"table":"guests","kind":"INSERT","id":null}"#).is_none());
        assert!(parse_notification(r#"{"table":"rooms","kind":"TRUNCATE"}"#).is_none());
        assert!(parse_notification("not json").is_none());
    }

    #[test]
    fn test_row_status_decode_error() {
        let row = RoomRow {
            id: "1".into(),
            name: "101".into(),
            status: "flooded".into(),
            capacity: 2,
        };
        let err = Room::try_from(row).unwrap_err();
        assert!(err.to_string().contains("flooded"));
    }

    #[test]
    fn test_joined_row_without_room() {
        let row = ReservationRow {
            id: "r".into(),
            room_id: "gone".into(),
            guest: "Ada".into(),
            checkin: "2024-05-01".into(),
            checkout: "2024-05-03".into(),
            status: "confirmed".into(),
            room_name: None,
            room_capacity: None,
        };
        let joined = row.into_joined().unwrap();
        assert!(joined.rooms.is_none());
        assert_eq!(joined.reservation.status, ReservationStatus::Confirmed);
    }
}
