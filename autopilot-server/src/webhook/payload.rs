//! Inbound reservation event shape
//!
//! The body arrives as untyped JSON and is checked field by field so that
//! every problem is reported at once, keyed by its dotted path
//! (`reservation.checkin`). Unknown keys are ignored; an explicit `null`
//! for an optional field is a type error, not an omission.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::models::{ReservationCreate, ReservationStatus};
use shared::util::{is_date_pattern, is_uuid};
use std::collections::BTreeMap;

/// Provider event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "reservation.created")]
    Created,
    #[serde(rename = "reservation.updated")]
    Updated,
    #[serde(rename = "reservation.cancelled")]
    Cancelled,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 3] = [Self::Created, Self::Updated, Self::Cancelled];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "reservation.created",
            Self::Updated => "reservation.updated",
            Self::Cancelled => "reservation.cancelled",
        }
    }

    /// Status stored when the payload carries none
    pub fn default_status(&self) -> ReservationStatus {
        match self {
            Self::Created => ReservationStatus::Confirmed,
            Self::Updated => ReservationStatus::Pending,
            Self::Cancelled => ReservationStatus::Cancelled,
        }
    }
}

/// `reservation` object of a validated event
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationPayload {
    pub id: Option<String>,
    pub room_id: String,
    pub guest: String,
    pub checkin: String,
    pub checkout: String,
    pub status: Option<ReservationStatus>,
}

impl ReservationPayload {
    /// Full record to store for a created/updated event
    pub fn into_record(self, event: WebhookEvent) -> (Option<String>, ReservationCreate) {
        let record = ReservationCreate {
            room_id: self.room_id,
            guest: self.guest,
            checkin: self.checkin,
            checkout: self.checkout,
            status: self.status.unwrap_or_else(|| event.default_status()),
        };
        (self.id, record)
    }
}

/// A payload that passed shape validation
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEnvelope {
    pub event: WebhookEvent,
    pub reservation: ReservationPayload,
}

/// Everything wrong with a rejected payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationDetails {
    /// Problems with the body as a whole
    pub form_errors: Vec<String>,
    /// Dotted field path → messages
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationDetails {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    fn field(&mut self, path: &str, message: impl Into<String>) {
        self.field_errors
            .entry(path.to_string())
            .or_default()
            .push(message.into());
    }
}

impl WebhookEnvelope {
    pub fn parse(payload: &Value) -> Result<Self, ValidationDetails> {
        let mut errors = ValidationDetails::default();

        let Some(root) = payload.as_object() else {
            errors.form_errors.push(expected("object", payload));
            return Err(errors);
        };

        let event = required_str(root, "event", "event", &mut errors).and_then(|s| {
            let parsed = WebhookEvent::parse(s);
            if parsed.is_none() {
                let options: Vec<&str> = WebhookEvent::ALL.iter().map(|e| e.as_str()).collect();
                errors.field("event", invalid_enum(&options, s));
            }
            parsed
        });

        let reservation = match root.get("reservation") {
            None => {
                errors.field("reservation", "Required");
                None
            }
            Some(Value::Object(obj)) => parse_reservation(obj, &mut errors),
            Some(other) => {
                errors.field("reservation", expected("object", other));
                None
            }
        };

        match (event, reservation) {
            (Some(event), Some(reservation)) if errors.is_empty() => Ok(Self { event, reservation }),
            _ => Err(errors),
        }
    }
}

fn parse_reservation(
    obj: &Map<String, Value>,
    errors: &mut ValidationDetails,
) -> Option<ReservationPayload> {
    let id = optional_str(obj, "id", "reservation.id", errors);
    if let Some(id) = id
        && !is_uuid(id)
    {
        errors.field("reservation.id", "Invalid uuid");
    }

    let room_id = required_str(obj, "room_id", "reservation.room_id", errors);
    if let Some(room_id) = room_id
        && !is_uuid(room_id)
    {
        errors.field("reservation.room_id", "Invalid uuid");
    }

    let guest = required_str(obj, "guest", "reservation.guest", errors);
    if guest.is_some_and(str::is_empty) {
        errors.field(
            "reservation.guest",
            "String must contain at least 1 character(s)",
        );
    }

    let checkin = required_date(obj, "checkin", errors);
    let checkout = required_date(obj, "checkout", errors);

    let status = optional_str(obj, "status", "reservation.status", errors).and_then(|s| {
        let parsed = ReservationStatus::from_db(s);
        if parsed.is_none() {
            let options: Vec<&str> = ReservationStatus::ALL.iter().map(|s| s.as_db()).collect();
            errors.field("reservation.status", invalid_enum(&options, s));
        }
        parsed
    });

    Some(ReservationPayload {
        id: id.map(str::to_string),
        room_id: room_id?.to_string(),
        guest: guest?.to_string(),
        checkin: checkin?.to_string(),
        checkout: checkout?.to_string(),
        status,
    })
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut ValidationDetails,
) -> Option<&'a str> {
    match obj.get(key) {
        None => {
            errors.field(path, "Required");
            None
        }
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            errors.field(path, expected("string", other));
            None
        }
    }
}

fn required_date<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    errors: &mut ValidationDetails,
) -> Option<&'a str> {
    let path = format!("reservation.{key}");
    let value = required_str(obj, key, &path, errors);
    if let Some(value) = value
        && !is_date_pattern(value)
    {
        errors.field(&path, "Invalid date, expected YYYY-MM-DD");
    }
    value
}

/// Absent is fine; present must be a string
fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut ValidationDetails,
) -> Option<&'a str> {
    match obj.get(key) {
        None => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            errors.field(path, expected("string", other));
            None
        }
    }
}

fn expected(kind: &str, got: &Value) -> String {
    format!("Expected {kind}, received {}", json_type(got))
}

fn invalid_enum(options: &[&str], got: &str) -> String {
    let options: Vec<String> = options.iter().map(|o| format!("'{o}'")).collect();
    format!(
        "Invalid enum value. Expected {}, received '{got}'",
        options.join(" | ")
    )
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOM: &str = "123e4567-e89b-12d3-a456-426614174000";
    const RES: &str = "9b2f7c1e-3d4a-4f5b-8c6d-7e8f9a0b1c2d";

    fn valid() -> Value {
        json!({
            "event": "reservation.created",
            "reservation": {
                "room_id": ROOM,
                "guest": "Ada Lovelace",
                "checkin": "2024-05-01",
                "checkout": "2024-05-04"
            }
        })
    }

    fn field_errors(payload: Value) -> BTreeMap<String, Vec<String>> {
        WebhookEnvelope::parse(&payload).unwrap_err().field_errors
    }

    #[test]
    fn test_valid_payload() {
        let envelope = WebhookEnvelope::parse(&valid()).unwrap();
        assert_eq!(envelope.event, WebhookEvent::Created);
        assert_eq!(envelope.reservation.room_id, ROOM);
        assert_eq!(envelope.reservation.id, None);
        assert_eq!(envelope.reservation.status, None);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut payload = valid();
        payload["source"] = json!("cloudbeds");
        payload["reservation"]["notes"] = json!({"late": true});
        assert!(WebhookEnvelope::parse(&payload).is_ok());
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = field_errors(json!({
            "event": "reservation.created",
            "reservation": {}
        }));
        for path in [
            "reservation.room_id",
            "reservation.guest",
            "reservation.checkin",
            "reservation.checkout",
        ] {
            assert_eq!(errors[path], vec!["Required".to_string()], "{path}");
        }
        assert!(!errors.contains_key("reservation.id"));
        assert!(!errors.contains_key("reservation.status"));
    }

    #[test]
    fn test_date_pattern_is_syntactic() {
        let mut payload = valid();
        payload["reservation"]["checkin"] = json!("2024-02-30");
        payload["reservation"]["checkout"] = json!("2024-13-40");
        assert!(WebhookEnvelope::parse(&payload).is_ok());

        payload["reservation"]["checkin"] = json!("05/01/2024");
        payload["reservation"]["checkout"] = json!("2024-5-4");
        let errors = field_errors(payload);
        assert!(errors.contains_key("reservation.checkin"));
        assert!(errors.contains_key("reservation.checkout"));
    }

    #[test]
    fn test_uuid_fields() {
        let mut payload = valid();
        payload["reservation"]["id"] = json!("not-a-uuid");
        payload["reservation"]["room_id"] = json!("123e4567e89b12d3a456426614174000");
        let errors = field_errors(payload);
        assert_eq!(errors["reservation.id"], vec!["Invalid uuid".to_string()]);
        assert_eq!(errors["reservation.room_id"], vec!["Invalid uuid".to_string()]);
    }

    #[test]
    fn test_null_optional_is_rejected() {
        let mut payload = valid();
        payload["reservation"]["id"] = Value::Null;
        payload["reservation"]["status"] = Value::Null;
        let errors = field_errors(payload);
        assert_eq!(
            errors["reservation.id"],
            vec!["Expected string, received null".to_string()]
        );
        assert!(errors.contains_key("reservation.status"));
    }

    #[test]
    fn test_empty_guest_and_bad_status() {
        let mut payload = valid();
        payload["reservation"]["guest"] = json!("");
        payload["reservation"]["status"] = json!("no_show");
        let errors = field_errors(payload);
        assert!(errors.contains_key("reservation.guest"));
        assert!(errors["reservation.status"][0].contains("'no_show'"));
    }

    #[test]
    fn test_unknown_event_and_non_object_reservation() {
        let errors = field_errors(json!({
            "event": "reservation.deleted",
            "reservation": "abc"
        }));
        assert!(errors["event"][0].starts_with("Invalid enum value"));
        assert_eq!(
            errors["reservation"],
            vec!["Expected object, received string".to_string()]
        );
    }

    #[test]
    fn test_non_object_body() {
        let details = WebhookEnvelope::parse(&json!([1, 2])).unwrap_err();
        assert_eq!(details.form_errors, vec!["Expected object, received array"]);
        assert!(details.field_errors.is_empty());
    }

    #[test]
    fn test_default_status_per_event() {
        let envelope = WebhookEnvelope::parse(&valid()).unwrap();
        let (_, record) = envelope.reservation.clone().into_record(WebhookEvent::Created);
        assert_eq!(record.status, ReservationStatus::Confirmed);
        let (_, record) = envelope.reservation.into_record(WebhookEvent::Updated);
        assert_eq!(record.status, ReservationStatus::Pending);

        let mut payload = valid();
        payload["reservation"]["id"] = json!(RES);
        payload["reservation"]["status"] = json!("checked_in");
        let envelope = WebhookEnvelope::parse(&payload).unwrap();
        let (id, record) = envelope.reservation.into_record(WebhookEvent::Created);
        assert_eq!(id.as_deref(), Some(RES));
        assert_eq!(record.status, ReservationStatus::CheckedIn);
    }

    #[test]
    fn test_event_serde_name() {
        assert_eq!(
            serde_json::to_value(WebhookEvent::Cancelled).unwrap(),
            "reservation.cancelled"
        );
        assert_eq!(
            WebhookEvent::parse("reservation.updated"),
            Some(WebhookEvent::Updated)
        );
    }
}
