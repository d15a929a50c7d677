//! Dashboard controller
//!
//! Holds the client-side copy of rooms, reservations and housekeeping tasks,
//! the two edit forms and a single status line. Every mutation goes through
//! [`HttpClient`] and is followed by a full reload.

pub mod forms;
pub mod render;
pub mod stats;

use std::collections::HashSet;

use shared::models::{
    HousekeepingTask, HousekeepingTaskUpdate, Reservation, ReservationUpdate, Room,
};
use shared::{RealtimeMessage, Table};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::HttpClient;

pub use forms::{HousekeepingForm, ReservationForm};
pub use stats::Summary;

/// Quiet period that closes a burst of change events
const COALESCE_MS: u64 = 150;

pub struct Dashboard {
    http: HttpClient,
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    housekeeping: Vec<HousekeepingTask>,
    message: String,
    pub reservation_form: ReservationForm,
    pub housekeeping_form: HousekeepingForm,
    editing_reservation_id: Option<String>,
    editing_housekeeping_id: Option<String>,
}

impl Dashboard {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            rooms: Vec::new(),
            reservations: Vec::new(),
            housekeeping: Vec::new(),
            message: String::new(),
            reservation_form: ReservationForm::default(),
            housekeeping_form: HousekeepingForm::default(),
            editing_reservation_id: None,
            editing_housekeeping_id: None,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn housekeeping(&self) -> &[HousekeepingTask] {
        &self.housekeeping
    }

    /// Last status or error message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn editing_reservation_id(&self) -> Option<&str> {
        self.editing_reservation_id.as_deref()
    }

    pub fn editing_housekeeping_id(&self) -> Option<&str> {
        self.editing_housekeeping_id.as_deref()
    }

    // ========== Loading ==========

    /// Fetch all three tables concurrently
    ///
    /// A failed table keeps its previous copy and sets the status message.
    pub async fn load_all(&mut self) {
        let (rooms, reservations, housekeeping) = tokio::join!(
            self.http.list_rooms(),
            self.http.list_reservations(),
            self.http.list_housekeeping(),
        );

        match rooms {
            Ok(rows) => self.rooms = rows,
            Err(e) => self.message = format!("Rooms error: {}", e.message()),
        }
        match reservations {
            Ok(rows) => self.reservations = rows,
            Err(e) => self.message = format!("Reservations error: {}", e.message()),
        }
        match housekeeping {
            Ok(rows) => self.housekeeping = rows,
            Err(e) => self.message = format!("Housekeeping error: {}", e.message()),
        }
    }

    pub async fn load_rooms(&mut self) {
        match self.http.list_rooms().await {
            Ok(rows) => self.rooms = rows,
            Err(e) => self.message = format!("Rooms error: {}", e.message()),
        }
    }

    pub async fn load_reservations(&mut self) {
        match self.http.list_reservations().await {
            Ok(rows) => self.reservations = rows,
            Err(e) => self.message = format!("Reservations error: {}", e.message()),
        }
    }

    pub async fn load_housekeeping(&mut self) {
        match self.http.list_housekeeping().await {
            Ok(rows) => self.housekeeping = rows,
            Err(e) => self.message = format!("Housekeeping error: {}", e.message()),
        }
    }

    // ========== Reservations ==========

    /// Load a reservation into the form for editing
    pub fn edit_reservation(&mut self, id: &str) -> bool {
        let Some(reservation) = self.reservations.iter().find(|r| r.id == id) else {
            return false;
        };
        self.reservation_form = ReservationForm::from(reservation);
        self.editing_reservation_id = Some(reservation.id.clone());
        true
    }

    pub fn clear_reservation_form(&mut self) {
        self.editing_reservation_id = None;
        self.reservation_form = ReservationForm::default();
    }

    /// Create, or update when editing, from the reservation form
    pub async fn submit_reservation(&mut self) {
        if !self.reservation_form.is_complete() {
            self.message = "Reservation form is incomplete.".to_string();
            return;
        }

        let payload = self.reservation_form.to_payload();
        let result = match &self.editing_reservation_id {
            Some(id) => self
                .http
                .update_reservation(id, &ReservationUpdate::from(payload))
                .await
                .map(|_| "Reservation updated."),
            None => self
                .http
                .create_reservation(&payload)
                .await
                .map(|_| "Reservation created."),
        };

        match result {
            Ok(message) => {
                self.message = message.to_string();
                self.clear_reservation_form();
                self.load_all().await;
            }
            Err(e) => self.message = e.message(),
        }
    }

    pub async fn delete_reservation(&mut self, id: &str) {
        if let Err(e) = self.http.delete_reservation(id).await {
            self.message = e.message();
            return;
        }
        self.message = "Reservation deleted.".to_string();
        self.load_all().await;
    }

    // ========== Housekeeping ==========

    pub fn edit_housekeeping(&mut self, id: &str) -> bool {
        let Some(task) = self.housekeeping.iter().find(|t| t.id == id) else {
            return false;
        };
        self.housekeeping_form = HousekeepingForm::from(task);
        self.editing_housekeeping_id = Some(task.id.clone());
        true
    }

    pub fn clear_housekeeping_form(&mut self) {
        self.editing_housekeeping_id = None;
        self.housekeeping_form = HousekeepingForm::default();
    }

    pub async fn submit_housekeeping(&mut self) {
        if !self.housekeeping_form.is_complete() {
            self.message = "Housekeeping form is incomplete.".to_string();
            return;
        }

        let payload = self.housekeeping_form.to_payload();
        let result = match &self.editing_housekeeping_id {
            Some(id) => self
                .http
                .update_housekeeping(id, &HousekeepingTaskUpdate::from(payload))
                .await
                .map(|_| "Housekeeping task updated."),
            None => self
                .http
                .create_housekeeping(&payload)
                .await
                .map(|_| "Housekeeping task created."),
        };

        match result {
            Ok(message) => {
                self.message = message.to_string();
                self.clear_housekeeping_form();
                self.load_all().await;
            }
            Err(e) => self.message = e.message(),
        }
    }

    pub async fn delete_housekeeping(&mut self, id: &str) {
        if let Err(e) = self.http.delete_housekeeping(id).await {
            self.message = e.message();
            return;
        }
        self.message = "Housekeeping task deleted.".to_string();
        self.load_all().await;
    }

    // ========== Derived values ==========

    /// Room name for display, or the first 8 characters of an unknown id
    pub fn room_name(&self, room_id: &str) -> String {
        self.rooms
            .iter()
            .find(|room| room.id == room_id)
            .map(|room| room.name.clone())
            .unwrap_or_else(|| room_id.chars().take(8).collect())
    }

    pub fn summary(&self, today: &str) -> Summary {
        Summary::compute(self.rooms.len(), &self.reservations, today)
    }

    // ========== Realtime ==========

    /// Re-query tables as change notifications arrive
    ///
    /// Events are coalesced: each burst (closed by a short quiet period)
    /// triggers one reload per stale table, then `on_reload` is called.
    /// Returns when `cancel` fires or the sender side is dropped.
    pub async fn run_realtime<F>(
        &mut self,
        rx: &mut mpsc::Receiver<RealtimeMessage>,
        cancel: &CancellationToken,
        mut on_reload: F,
    ) where
        F: FnMut(&Dashboard),
    {
        let mut stale: HashSet<Table> = HashSet::new();
        let mut deadline: Option<Instant> = None;

        loop {
            let sleep_until = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = cancel.cancelled() => break,

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    deadline = None;
                    for table in stale.drain().collect::<Vec<_>>() {
                        self.reload(table).await;
                    }
                    on_reload(&*self);
                }

                message = rx.recv() => {
                    let Some(message) = message else { break };
                    if let Some(table) = message.stale_table() {
                        tracing::debug!(%table, "Change notification received");
                        stale.insert(table);
                        deadline = Some(Instant::now() + Duration::from_millis(COALESCE_MS));
                    }
                }
            }
        }
    }

    async fn reload(&mut self, table: Table) {
        match table {
            Table::Rooms => self.load_rooms().await,
            Table::Reservations => self.load_reservations().await,
            Table::Housekeeping => self.load_housekeeping().await,
        }
    }
}
