// Inventory normalizer: converts upstream hotel records of unknown and
// variable shape (mixed field-name casing, missing fields, mixed types)
// into the one canonical Hotel shape the rest of the storefront consumes.
//
// Per field we try an ordered list of candidate source keys and take the
// first one whose value is defined, then apply a type-specific coercion.
// The function is total for any record-like input; passing a non-object
// value is a caller contract violation and simply yields the all-defaults
// record.

use serde_json::Value;

use crate::model::{Hotel, DEFAULT_CHECK_IN_TIME, DEFAULT_CHECK_OUT_TIME};

// A string counts as defined only when it is non-empty after trimming.
fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_string(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| record.get(key).and_then(non_empty_string))
}

// Only finite numeric values are accepted; anything else is skipped so the
// next candidate (or the fallback) gets a chance.
fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn first_number(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| record.get(key).and_then(finite_number))
}

// Identifier-ish values may arrive as strings or numbers; stringify either.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_scalar(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| record.get(key).and_then(scalar_string))
}

// First candidate that is itself an array wins, even when the filtered
// result ends up empty; elements that normalize to an empty string are
// dropped.
fn first_string_array(record: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| record.get(key).and_then(Value::as_array))
        .map(|items| items.iter().filter_map(non_empty_string).collect())
        .unwrap_or_default()
}

pub fn normalize_hotel(record: &Value) -> Hotel {
    let id = first_scalar(record, &["id", "Id", "hotelId", "HotelId"])
        .unwrap_or_else(|| "0".to_string());

    let city = first_string(record, &["city", "City", "cityName"]).unwrap_or_default();
    let address =
        first_string(record, &["address", "Address"]).unwrap_or_else(|| city.clone());
    let name = first_string(record, &["name", "Name"]).unwrap_or_else(|| id.clone());

    let image = first_string(record, &["image", "mainPhoto", "MainPhoto"]).unwrap_or_default();
    let mut images = first_string_array(record, &["images"]);
    if images.is_empty() && !image.is_empty() {
        images = vec![image.clone()];
    }

    let price = first_number(record, &["price", "minPrice", "MinPrice"]).unwrap_or(0.0);

    Hotel {
        id,
        name,
        city,
        address,
        stars: first_number(record, &["stars", "category", "Category"]).unwrap_or(0.0),
        rating: first_number(record, &["rating", "Rating"]).unwrap_or(0.0),
        review_count: first_number(record, &["reviewCount", "ReviewCount"])
            .filter(|n| *n >= 0.0)
            .map(|n| n as u64)
            .unwrap_or(0),
        description: first_string(record, &["description", "Description"]).unwrap_or_default(),
        image,
        images,
        price,
        // Always derived, never read from upstream.
        has_price: price > 0.0,
        amenities: first_string_array(record, &["amenities", "Amenities"]),
        boarding_type: first_string_array(record, &["boardingType", "boardingTypes"]),
        latitude: first_number(record, &["latitude", "Latitude"]),
        longitude: first_number(record, &["longitude", "Longitude"]),
        check_in_time: first_string(record, &["checkInTime", "CheckInTime"])
            .unwrap_or_else(|| DEFAULT_CHECK_IN_TIME.to_string()),
        check_out_time: first_string(record, &["checkOutTime", "CheckOutTime"])
            .unwrap_or_else(|| DEFAULT_CHECK_OUT_TIME.to_string()),
    }
}

// Stable identity for catalogue list entries that lack a canonical id.
// The fallback concatenates name, address and price so that equal inputs
// always yield equal keys; it is a list-rendering identity, never
// persisted.
pub fn catalog_identifier(entry: &Value) -> String {
    if let Some(id) = first_scalar(entry, &["Id", "id"]) {
        return id;
    }

    ["Name", "name", "Address", "address", "MinPrice", "minPrice"]
        .chunks(2)
        .filter_map(|pair| first_scalar(entry, pair))
        .collect::<Vec<_>>()
        .join("-")
}
