// Hotel detail and available-rooms upstream client. Detail lookups never
// raise: any failure degrades to "not found" so a flaky upstream cannot
// abort the page that asked.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::catalog::FetchError;
use crate::model::{Hotel, Room};
use crate::normalizer::normalize_hotel;

pub const DEFAULT_DETAIL_ENDPOINT: &str = "https://api.hotel.com.tn/hotels/detail";
pub const DEFAULT_INVENTORY_ENDPOINT: &str = "https://api.hotel.com.tn/inventory/search";

const BOOKING_CURRENCY: &str = "TND";

// Seam for the deferred booking transition: the session resolves a hotel by
// id through this trait so tests can substitute a scripted resolver.
#[async_trait]
pub trait HotelResolver: Send + Sync {
    async fn hotel_details(&self, hotel_id: &str) -> Option<Hotel>;
}

pub struct HotelDetailClient {
    client: reqwest::Client,
    detail_endpoint: String,
    inventory_endpoint: String,
}

impl HotelDetailClient {
    pub fn new(detail_endpoint: impl Into<String>, inventory_endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            detail_endpoint: detail_endpoint.into(),
            inventory_endpoint: inventory_endpoint.into(),
        }
    }

    // Rooms for a hotel, tolerating both payload shapes the upstream emits.
    // A 404 or an unrecognized shape degrades to an empty list; other
    // non-success statuses are real failures.
    pub async fn available_rooms(
        &self,
        hotel_id: &str,
        room_count: Option<u32>,
    ) -> Result<Vec<Room>, FetchError> {
        let Some(numeric_id) = numeric_hotel_id(hotel_id) else {
            error!(hotel_id, "invalid hotel id for available rooms");
            return Ok(Vec::new());
        };

        let mut payload = json!({ "hotelId": numeric_id });
        if let Some(count) = room_count.filter(|c| *c > 0) {
            payload["roomCount"] = json!(count);
        }

        let response = self
            .client
            .post(&self.inventory_endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            warn!(hotel_id, "no rooms found");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Shape(format!("body is not valid JSON: {e}")))?;
        Ok(rooms_from_payload(body).unwrap_or_else(|| {
            warn!(hotel_id, "unexpected available-rooms payload shape");
            Vec::new()
        }))
    }
}

impl Default for HotelDetailClient {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_ENDPOINT, DEFAULT_INVENTORY_ENDPOINT)
    }
}

#[async_trait]
impl HotelResolver for HotelDetailClient {
    async fn hotel_details(&self, hotel_id: &str) -> Option<Hotel> {
        let Some(numeric_id) = numeric_hotel_id(hotel_id) else {
            error!(hotel_id, "invalid hotel id for detail lookup");
            return None;
        };

        let response = self
            .client
            .post(&self.detail_endpoint)
            .json(&json!({ "hotelId": numeric_id, "currency": BOOKING_CURRENCY }))
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                error!(hotel_id, error = %e, "hotel detail fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            // Treated as not-found, not as an exception.
            error!(hotel_id, status = response.status().as_u16(), "hotel detail call failed");
            return None;
        }

        let body = match response.json::<Value>().await {
            Ok(b) => b,
            Err(e) => {
                error!(hotel_id, error = %e, "hotel detail body unreadable");
                return None;
            }
        };

        let mut hotel = normalize_hotel(&body);
        if hotel.id == "0" {
            // The detail payload may omit its own id; key the record by the
            // id we asked for.
            hotel.id = hotel_id.to_string();
        }
        Some(hotel)
    }
}

// Ids must be numeric and positive before they are put on the wire.
fn numeric_hotel_id(hotel_id: &str) -> Option<i64> {
    hotel_id.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

// Accept either a bare array of rooms or an object carrying a `rooms`
// array; `None` means the shape was not recognized.
fn rooms_from_payload(body: Value) -> Option<Vec<Room>> {
    if body.is_null() {
        return Some(Vec::new());
    }
    let rooms = match &body {
        Value::Array(_) => body.clone(),
        Value::Object(map) => map.get("rooms").filter(|v| v.is_array())?.clone(),
        _ => return None,
    };
    serde_json::from_value(rooms).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("12", Some(12) ; "plain numeric id")]
    #[test_case(" 7 ", Some(7) ; "surrounding whitespace")]
    #[test_case("0", None ; "zero rejected")]
    #[test_case("-3", None ; "negative rejected")]
    #[test_case("abc", None ; "non numeric rejected")]
    #[test_case("", None ; "empty rejected")]
    fn hotel_id_validation(raw: &str, expected: Option<i64>) {
        assert_eq!(numeric_hotel_id(raw), expected);
    }

    #[test]
    fn rooms_parse_from_bare_array() {
        let rooms = rooms_from_payload(json!([
            { "id": "DBL", "name": "Double", "price": 180.0 },
            { "id": "TRP", "name": "Triple", "price": 240.0 }
        ]))
        .unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[1].id, "TRP");
    }

    #[test]
    fn rooms_parse_from_wrapped_object() {
        let rooms = rooms_from_payload(json!({ "rooms": [{ "id": "SGL" }] })).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, "SGL");
    }

    #[test]
    fn null_body_means_no_rooms() {
        assert_eq!(rooms_from_payload(Value::Null), Some(Vec::new()));
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        assert_eq!(rooms_from_payload(json!({ "rooms": "DBL" })), None);
        assert_eq!(rooms_from_payload(json!("DBL")), None);
    }
}
