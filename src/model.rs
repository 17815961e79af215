// Canonical data model shared across the storefront core.
// Hotel records are produced exclusively by the normalizer module; nothing
// else assembles them field by field from upstream payloads.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CHECK_IN_TIME: &str = "15:00";
pub const DEFAULT_CHECK_OUT_TIME: &str = "12:00";

// Catalogue entries are passed through opaquely after a shape check; their
// schema is owned by the upstream catalogue service.
pub type City = Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub stars: f64,
    pub rating: f64,
    pub review_count: u64,
    pub description: String,
    pub image: String,
    pub images: Vec<String>,
    pub price: f64,
    pub has_price: bool,
    pub amenities: Vec<String>,
    pub boarding_type: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub check_in_time: String,
    pub check_out_time: String,
}

// The selectable unit of a booking. Tolerant of partially filled upstream
// records; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    pub board_type: String,
    pub price: f64,
    pub capacity: RoomCapacity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomCapacity {
    pub adults: u32,
    pub children: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    City,
    HotelName,
}

// One occupancy line of a search request; children carries ages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOccupancy {
    pub adults: u32,
    pub children: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_mode: SearchMode,
    pub city_id: Option<String>,
    pub hotel_name: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms: Vec<RoomOccupancy>,
}

impl Default for SearchParams {
    // City search, tonight for one night, one room of two adults.
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self {
            search_mode: SearchMode::City,
            city_id: None,
            hotel_name: None,
            check_in: today,
            check_out: today + Duration::days(1),
            rooms: vec![RoomOccupancy {
                adults: 2,
                children: Vec::new(),
            }],
        }
    }
}

// Last search outcome, retained so that returning from a detail page does
// not force a re-search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub hotels: Vec<Hotel>,
}
