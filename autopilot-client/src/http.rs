//! HTTP client for the dashboard API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::Table;
use shared::models::{
    HousekeepingTask, HousekeepingTaskCreate, HousekeepingTaskUpdate, Reservation,
    ReservationCreate, ReservationUpdate, Room, RoomCreate, RoomUpdate,
};

/// Header carrying the public (anon) key
pub const API_KEY_HEADER: &str = "apikey";

/// Session-scoped HTTP client for autopilot-server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(API_KEY_HEADER, &self.anon_key)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.put(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.delete(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Error bodies are `ApiResponse` envelopes; their `message` becomes the
    /// error text, falling back to the raw body.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(message)),
                _ => Err(ClientError::Internal(message)),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    // ========== Rooms ==========

    pub async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        self.get("/api/rooms").await
    }

    pub async fn create_room(&self, data: &RoomCreate) -> ClientResult<Room> {
        self.post("/api/rooms", data).await
    }

    pub async fn update_room(&self, id: &str, data: &RoomUpdate) -> ClientResult<Room> {
        self.put(&format!("/api/rooms/{id}"), data).await
    }

    pub async fn delete_room(&self, id: &str) -> ClientResult<()> {
        self.delete::<ApiResponse<()>>(&format!("/api/rooms/{id}"))
            .await
            .map(|_| ())
    }

    // ========== Reservations ==========

    pub async fn list_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.get("/api/reservations").await
    }

    pub async fn create_reservation(&self, data: &ReservationCreate) -> ClientResult<Reservation> {
        self.post("/api/reservations", data).await
    }

    pub async fn update_reservation(
        &self,
        id: &str,
        data: &ReservationUpdate,
    ) -> ClientResult<Reservation> {
        self.put(&format!("/api/reservations/{id}"), data).await
    }

    pub async fn delete_reservation(&self, id: &str) -> ClientResult<()> {
        self.delete::<ApiResponse<()>>(&format!("/api/reservations/{id}"))
            .await
            .map(|_| ())
    }

    // ========== Housekeeping ==========

    pub async fn list_housekeeping(&self) -> ClientResult<Vec<HousekeepingTask>> {
        self.get("/api/housekeeping").await
    }

    pub async fn create_housekeeping(
        &self,
        data: &HousekeepingTaskCreate,
    ) -> ClientResult<HousekeepingTask> {
        self.post("/api/housekeeping", data).await
    }

    pub async fn update_housekeeping(
        &self,
        id: &str,
        data: &HousekeepingTaskUpdate,
    ) -> ClientResult<HousekeepingTask> {
        self.put(&format!("/api/housekeeping/{id}"), data).await
    }

    pub async fn delete_housekeeping(&self, id: &str) -> ClientResult<()> {
        self.delete::<ApiResponse<()>>(&format!("/api/housekeeping/{id}"))
            .await
            .map(|_| ())
    }

    // ========== Realtime ==========

    /// WebSocket URL of the change feed for `table`, anon key in `?apikey=`
    pub fn realtime_url(&self, table: Table) -> ClientResult<Url> {
        let invalid = || ClientError::Config(format!("invalid base URL: {}", self.base_url));

        let mut url = Url::parse(&self.url("/api/realtime")).map_err(|_| invalid())?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            _ => return Err(invalid()),
        };
        url.set_scheme(scheme).map_err(|_| invalid())?;
        url.query_pairs_mut()
            .append_pair("table", table.as_db())
            .append_pair("apikey", &self.anon_key);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, anon_key: &str) -> HttpClient {
        HttpClient::new(&ClientConfig::new(base_url, anon_key)).unwrap()
    }

    fn query(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_realtime_url() {
        let url = client("http://localhost:8080/", "anon")
            .realtime_url(Table::Reservations)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "ws://localhost:8080/api/realtime?table=reservations&apikey=anon"
        );

        let url = client("https://hotel.example", "anon")
            .realtime_url(Table::Rooms)
            .unwrap();
        assert!(url.as_str().starts_with("wss://hotel.example/api/realtime?table=rooms"));

        assert!(matches!(
            client("hotel.example", "anon").realtime_url(Table::Rooms),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            client("ftp://hotel.example", "anon").realtime_url(Table::Rooms),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_realtime_url_encodes_api_key() {
        let url = client("http://h", "k+y&z=1 #%")
            .realtime_url(Table::Reservations)
            .unwrap();

        assert!(url.as_str().contains("apikey=k%2By%26z%3D1+%23%25"));
        assert_eq!(query(&url, "apikey").as_deref(), Some("k+y&z=1 #%"));
        assert_eq!(query(&url, "table").as_deref(), Some("reservations"));
        assert_eq!(query(&url, "z"), None);
    }
}
