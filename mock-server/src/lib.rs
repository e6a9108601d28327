//! In-process imitation of the Realforce public API, for tests and local
//! experiments.
//!
//! Serves `GET /api/v1/{endpoint}` for the labels and listings endpoints
//! with canned JSON. Every payload echoes the received query parameters under
//! `"query"`. When started with an API key, requests whose `X-API-KEY` header
//! does not match get a 401.
//!
//! A few extra endpoints exercise transport edge cases: `empty` answers with
//! no body, `large` with a listing page over 10 MiB, `moved` with a 302 and
//! `binary` with bytes that are not UTF-8.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Key that requests must present; `None` accepts everyone.
    pub api_key: Option<String>,
}

type Shared = Arc<Settings>;

pub fn app(settings: Settings) -> Router {
    Router::new()
        .route("/api/v1/{endpoint}", get(endpoint))
        .with_state(Arc::new(settings))
}

pub async fn run(listener: TcpListener, settings: Settings) -> Result<(), std::io::Error> {
    axum::serve(listener, app(settings)).await
}

async fn endpoint(
    State(settings): State<Shared>,
    Path(endpoint): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Some(expected) = &settings.api_key {
        let presented = headers.get("x-api-key").and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            tracing::debug!(%endpoint, "rejecting request with bad api key");
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid API key"}))).into_response();
        }
    }

    let mut body = match (fixture(&endpoint), endpoint.as_str()) {
        (Some(body), _) => body,
        (None, "empty") => return StatusCode::OK.into_response(),
        (None, "large") => large_listing(),
        (None, "moved") => {
            return (
                StatusCode::FOUND,
                [(header::LOCATION, "/api/v1/get-categories-labels")],
                Json(json!({"message": "Moved"})),
            )
                .into_response()
        }
        (None, "binary") => {
            return (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                vec![0xff_u8, 0xfe, 0xfd],
            )
                .into_response()
        }
        (None, _) => return (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response(),
    };

    if let Value::Object(map) = &mut body {
        map.insert("query".to_string(), json!(query));
    }
    Json(body).into_response()
}

/// Bytes of filler per item in `large_listing`.
const FILLER_LEN: usize = 1024;

/// A full-listings page whose encoded size is above 11 MiB.
fn large_listing() -> Value {
    let items: Vec<Value> = (0..11 * 1024)
        .map(|id| json!({"id": id, "description": "x".repeat(FILLER_LEN)}))
        .collect();
    json!({"total": items.len(), "items": items})
}

fn fixture(endpoint: &str) -> Option<Value> {
    let body = match endpoint {
        "get-amenities-labels" => json!({
            "amenities": [
                {"id": 1, "label": "Balcony"},
                {"id": 2, "label": "Elevator"},
            ]
        }),
        "get-amenities-categories-labels" => json!({
            "categories": [{"id": 10, "label": "Comfort"}]
        }),
        "get-amenities-groups-labels" => json!({
            "groups": [{"id": 100, "label": "Outside"}]
        }),
        "get-categories-labels" => json!({
            "categories": [
                {"id": 1, "label": "Apartment"},
                {"id": 2, "label": "House"},
            ]
        }),
        "get-locations" => json!({
            "cities": [{"id": 6621, "label": "Genève", "canton_id": 25}]
        }),
        "get-full-listings" => json!({
            "total": 1,
            "items": [{"id": "R-1001", "category": 1, "price": 1250000}]
        }),
        _ => return None,
    };
    Some(body)
}
