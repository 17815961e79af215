// Resilient city-catalogue fetch. A single last-known-good snapshot shields
// callers from transient upstream failure: once one fetch has succeeded in
// the session, later calls degrade to the snapshot instead of failing.
// Freshness is best-effort only; there is no expiry beyond the upstream's
// own not-modified signal.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::City;

pub const DEFAULT_CITIES_ENDPOINT: &str = "https://api.hotel.com.tn/static/cities";

const HTTP_NOT_MODIFIED: u16 = 304;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Shape(String),
}

// Which storefront operation the failure surfaced from; selects the
// user-facing degradation message shown when no snapshot exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Cities,
    Search,
    Booking,
    HotelDetails,
}

impl FetchError {
    pub fn user_message(&self, context: ErrorContext) -> &'static str {
        if matches!(self, FetchError::Network(_)) {
            return "Erreur de connexion. Vérifiez votre connexion internet et réessayez.";
        }
        match context {
            ErrorContext::Cities => {
                "Impossible de charger les villes depuis le serveur. Les villes par défaut sont affichées."
            }
            ErrorContext::Search => {
                "Le service de recherche est temporairement indisponible. Veuillez réessayer dans quelques instants."
            }
            ErrorContext::Booking => {
                "Le service de réservation est temporairement indisponible. Veuillez réessayer dans quelques instants."
            }
            ErrorContext::HotelDetails => {
                "Impossible de charger les détails de l'hôtel. Veuillez réessayer."
            }
        }
    }
}

// One upstream exchange: status plus the parsed body when one was returned.
// A 304 carries no body.
#[derive(Debug, Clone)]
pub struct CatalogResponse {
    pub status: u16,
    pub body: Option<Value>,
}

#[async_trait]
pub trait CatalogTransport: Send + Sync {
    // force_reload issues one unconditional re-fetch, used when a 304
    // arrives before anything has been cached.
    async fn get_cities(&self, force_reload: bool) -> Result<CatalogResponse, FetchError>;
}

pub struct HttpCatalogTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCatalogTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HttpCatalogTransport {
    fn default() -> Self {
        Self::new(DEFAULT_CITIES_ENDPOINT)
    }
}

#[async_trait]
impl CatalogTransport for HttpCatalogTransport {
    async fn get_cities(&self, force_reload: bool) -> Result<CatalogResponse, FetchError> {
        // Always revalidate; intermediate caches must not answer for us.
        let cache_directive = if force_reload { "no-cache" } else { "no-store" };
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("Cache-Control", cache_directive)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(CatalogResponse { status, body: None });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Shape(format!("body is not valid JSON: {e}")))?;
        Ok(CatalogResponse {
            status,
            body: Some(body),
        })
    }
}

pub struct CatalogCache<T> {
    transport: T,
    last_good: Mutex<Option<Vec<City>>>,
}

impl<T: CatalogTransport> CatalogCache<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_good: Mutex::new(None),
        }
    }

    // Fetch the city catalogue, degrading to the last-known-good snapshot
    // on any failure once one exists. Only propagates an error while the
    // snapshot slot is still empty.
    pub async fn fetch_cities(&self) -> Result<Vec<City>, FetchError> {
        match self.fetch_fresh().await {
            Ok(cities) => Ok(cities),
            Err(err) => {
                let cached = self.last_good.lock().clone();
                match cached {
                    Some(cities) => {
                        warn!(
                            error = %err,
                            cached = cities.len(),
                            "catalogue fetch failed, serving last known good snapshot"
                        );
                        Ok(cities)
                    }
                    None => Err(err),
                }
            }
        }
    }

    async fn fetch_fresh(&self) -> Result<Vec<City>, FetchError> {
        let response = self.transport.get_cities(false).await?;

        if response.status == HTTP_NOT_MODIFIED {
            if let Some(cities) = self.last_good.lock().clone() {
                debug!(cached = cities.len(), "HTTP 304, reusing cached cities");
                return Ok(cities);
            }
            // 304 with an empty slot: nothing to reuse, force one
            // unconditional reload and treat its result normally.
            let reload = self.transport.get_cities(true).await?;
            return self.accept(reload);
        }

        self.accept(response)
    }

    fn accept(&self, response: CatalogResponse) -> Result<Vec<City>, FetchError> {
        if !(200..300).contains(&response.status) {
            return Err(FetchError::Status(response.status));
        }
        let body = response
            .body
            .ok_or_else(|| FetchError::Shape("success response carried no body".to_string()))?;
        let cities = parse_cities(&body)?;
        debug!(count = cities.len(), "cities loaded");
        *self.last_good.lock() = Some(cities.clone());
        Ok(cities)
    }
}

// Structural check: the payload must be an object whose `items` field is an
// array of record-like entries. Anything else is a typed shape failure,
// never silently coerced.
fn parse_cities(body: &Value) -> Result<Vec<City>, FetchError> {
    if !body.is_object() {
        return Err(FetchError::Shape("response is not an object".to_string()));
    }
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Shape("\"items\" is not an array".to_string()))?;
    if !items.iter().all(Value::is_object) {
        return Err(FetchError::Shape(
            "\"items\" must contain objects".to_string(),
        ));
    }
    Ok(items.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;

    // Replays a scripted sequence of upstream exchanges, recording whether
    // each call asked for a forced reload.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<CatalogResponse, FetchError>>>,
        reload_flags: Mutex<Vec<bool>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<CatalogResponse, FetchError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                reload_flags: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CatalogTransport for ScriptedTransport {
        async fn get_cities(&self, force_reload: bool) -> Result<CatalogResponse, FetchError> {
            self.reload_flags.lock().push(force_reload);
            self.script
                .lock()
                .pop_front()
                .expect("script exhausted")
        }
    }

    fn ok_body(count: usize) -> CatalogResponse {
        let items: Vec<Value> = (0..count)
            .map(|i| json!({ "Id": i, "Name": format!("City {i}") }))
            .collect();
        CatalogResponse {
            status: 200,
            body: Some(json!({ "items": items })),
        }
    }

    #[tokio::test]
    async fn success_then_not_modified_then_network_error_all_return_same_cities() {
        let cache = CatalogCache::new(ScriptedTransport::new(vec![
            Ok(ok_body(3)),
            Ok(CatalogResponse {
                status: 304,
                body: None,
            }),
            Err(FetchError::Network("connection refused".to_string())),
        ]));

        let first = cache.fetch_cities().await.unwrap();
        assert_eq!(first.len(), 3);

        let second = cache.fetch_cities().await.unwrap();
        assert_eq!(second, first);

        let third = cache.fetch_cities().await.unwrap();
        assert_eq!(third, first);
    }

    #[tokio::test]
    async fn not_modified_with_empty_slot_forces_one_reload() {
        let transport = ScriptedTransport::new(vec![
            Ok(CatalogResponse {
                status: 304,
                body: None,
            }),
            Ok(ok_body(2)),
        ]);
        let cache = CatalogCache::new(transport);

        let cities = cache.fetch_cities().await.unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(*cache.transport.reload_flags.lock(), vec![false, true]);
    }

    #[tokio::test]
    async fn failure_without_snapshot_propagates() {
        let cache = CatalogCache::new(ScriptedTransport::new(vec![Ok(CatalogResponse {
            status: 503,
            body: None,
        })]));

        let err = cache.fetch_cities().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
    }

    #[tokio::test]
    async fn shape_failure_without_snapshot_propagates() {
        let cache = CatalogCache::new(ScriptedTransport::new(vec![Ok(CatalogResponse {
            status: 200,
            body: Some(json!({ "items": "not-an-array" })),
        })]));

        let err = cache.fetch_cities().await.unwrap_err();
        assert!(matches!(err, FetchError::Shape(_)));
    }

    #[tokio::test]
    async fn shape_failure_after_success_degrades_to_snapshot() {
        let cache = CatalogCache::new(ScriptedTransport::new(vec![
            Ok(ok_body(1)),
            Ok(CatalogResponse {
                status: 200,
                body: Some(json!({ "items": [1, 2, 3] })),
            }),
        ]));

        let first = cache.fetch_cities().await.unwrap();
        let second = cache.fetch_cities().await.unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn network_errors_map_to_the_connection_message() {
        let err = FetchError::Network("offline".to_string());
        assert!(err.user_message(ErrorContext::Search).contains("connexion"));
    }

    #[test]
    fn context_selects_the_degradation_message() {
        let err = FetchError::Status(503);
        assert!(err.user_message(ErrorContext::Cities).contains("villes"));
        assert!(err
            .user_message(ErrorContext::Booking)
            .contains("réservation"));
    }
}
