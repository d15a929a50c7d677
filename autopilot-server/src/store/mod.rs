//! Data store access layer
//!
//! [`DataStore`] is the privileged (server-side) view of the hotel tables:
//! filtered select, insert, update, delete, upsert-by-id, plus a per-table
//! change subscription through [`ChangeHub`]. Two backends:
//!
//! - [`PgStore`]: PostgreSQL via sqlx; change events come from a
//!   `LISTEN hotel_changes` task fed by row triggers.
//! - [`MemoryStore`]: in-process tables; publishes its own change events.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use shared::error::AppError;
use shared::models::{
    HousekeepingTask, HousekeepingTaskCreate, HousekeepingTaskUpdate, Reservation,
    ReservationCreate, ReservationFilter, ReservationStatus, ReservationUpdate,
    ReservationWithRoom, Room, RoomCreate, RoomUpdate,
};
use thiserror::Error;

use crate::live::ChangeHub;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store-layer error
///
/// Every variant is opaque to callers: handlers surface the message and
/// fail the current request, nothing is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error (connection, constraint violation, bad cast, ...)
    #[error("{}", database_message(.0))]
    Database(#[from] sqlx::Error),
    /// Schema migration failed at startup
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    /// Row could not be mapped onto a model
    #[error("Failed to decode {table} row: {reason}")]
    Decode {
        table: &'static str,
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Server-reported errors keep the database's own message; everything else
/// uses sqlx's description.
fn database_message(e: &sqlx::Error) -> String {
    match e {
        sqlx::Error::Database(db) => db.message().to_string(),
        other => other.to_string(),
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Store error");
        AppError::database(e.to_string())
    }
}

#[async_trait]
pub trait DataStore: Send + Sync {
    // ── Rooms ──

    /// All rooms ordered by name
    async fn list_rooms(&self) -> StoreResult<Vec<Room>>;
    async fn insert_room(&self, data: &RoomCreate) -> StoreResult<Room>;
    /// Returns `None` when no row has this id
    async fn update_room(&self, id: &str, data: &RoomUpdate) -> StoreResult<Option<Room>>;
    /// Returns `false` when no row has this id
    async fn delete_room(&self, id: &str) -> StoreResult<bool>;

    // ── Reservations ──

    /// Reservations matching `filter`, ordered by checkin ascending, each
    /// joined with its room's name and capacity
    async fn select_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> StoreResult<Vec<ReservationWithRoom>>;

    /// Plain reservation rows ordered by checkin ascending
    async fn list_reservations(&self) -> StoreResult<Vec<Reservation>> {
        let rows = self
            .select_reservations(&ReservationFilter::default())
            .await?;
        Ok(rows.into_iter().map(|row| row.reservation).collect())
    }

    /// Insert with a store-assigned id, returning the stored row
    async fn insert_reservation(&self, data: &ReservationCreate) -> StoreResult<Reservation>;

    /// Insert-or-replace keyed on `id`, returning the stored row
    async fn upsert_reservation(
        &self,
        id: &str,
        data: &ReservationCreate,
    ) -> StoreResult<Reservation>;

    async fn update_reservation(
        &self,
        id: &str,
        data: &ReservationUpdate,
    ) -> StoreResult<Option<Reservation>>;

    /// Set the status of the row with this id; returns the number of rows touched
    async fn set_reservation_status(&self, id: &str, status: ReservationStatus)
    -> StoreResult<u64>;

    async fn delete_reservation(&self, id: &str) -> StoreResult<bool>;

    // ── Housekeeping ──

    /// All housekeeping tasks ordered by assignee
    async fn list_housekeeping(&self) -> StoreResult<Vec<HousekeepingTask>>;
    async fn insert_housekeeping(
        &self,
        data: &HousekeepingTaskCreate,
    ) -> StoreResult<HousekeepingTask>;
    async fn update_housekeeping(
        &self,
        id: &str,
        data: &HousekeepingTaskUpdate,
    ) -> StoreResult<Option<HousekeepingTask>>;
    async fn delete_housekeeping(&self, id: &str) -> StoreResult<bool>;

    // ── Change notification ──

    /// Fan-out of row mutations; call `.subscribe(table)` for one table's feed
    fn changes(&self) -> &ChangeHub;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::fmt;

    #[derive(Debug)]
    struct CheckViolation;

    impl fmt::Display for CheckViolation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("new row for relation \"rooms\" violates check constraint")
        }
    }

    impl std::error::Error for CheckViolation {}

    impl DatabaseError for CheckViolation {
        fn message(&self) -> &str {
            "new row for relation \"rooms\" violates check constraint"
        }
        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }
        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }
        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
        fn kind(&self) -> ErrorKind {
            ErrorKind::CheckViolation
        }
    }

    #[test]
    fn test_database_message_is_verbatim() {
        let err = StoreError::Database(sqlx::Error::Database(Box::new(CheckViolation)));
        assert_eq!(
            err.to_string(),
            "new row for relation \"rooms\" violates check constraint"
        );

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(
            app.message,
            "new row for relation \"rooms\" violates check constraint"
        );
    }

    #[test]
    fn test_non_database_errors_keep_sqlx_text() {
        let err = StoreError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), sqlx::Error::PoolTimedOut.to_string());
    }
}
