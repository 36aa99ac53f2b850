//! In-memory mock of the Waypost pin API.
//!
//! Implements the HTTP surface the real service exposes: bearer-auth
//! enforcement, pin CRUD under `/pins`, and metadata lookup under
//! `/metadata/{meta_id}`. Server-side behavior the client relies on lives
//! here: id assignment, defaults for omitted optional fields, and JSON
//! error bodies with 4xx statuses.
//!
//! The [`MockApi`] handle doubles as the shared state, so tests can seed
//! metadata and inspect what the server observed (stored pins, the
//! `Authorization` values of every request) while the router is serving.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Error response: status plus JSON body
type Rejection = (StatusCode, Json<Value>);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

/// A stored pin, as the server returns it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pin {
    pub id: String,
    pub meta_id: String,
    pub position: Vec3,
    pub offset: Vec3,
    pub html: String,
    pub opacity: f64,
    #[serde(rename = "enableLine")]
    pub enable_line: bool,
    pub alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePin {
    pub meta_id: String,
    pub position: Vec3,
    pub html: String,
    pub offset: Option<Vec3>,
    pub opacity: Option<f64>,
    #[serde(rename = "enableLine")]
    pub enable_line: Option<bool>,
    pub alert: Option<bool>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePin {
    pub id: String,
    pub meta_id: Option<String>,
    pub position: Option<Vec3>,
    pub offset: Option<Vec3>,
    pub html: Option<String>,
    pub opacity: Option<f64>,
    #[serde(rename = "enableLine")]
    pub enable_line: Option<bool>,
    pub alert: Option<bool>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PinsQuery {
    #[serde(rename = "meta-id")]
    meta_id: String,
}

#[derive(Debug, Default)]
struct Store {
    key: String,
    pins: Vec<Pin>,
    metadata: HashMap<String, Value>,
    authorization_log: Vec<Vec<String>>,
}

/// Mock pin API: router plus shared, inspectable state
#[derive(Clone)]
pub struct MockApi {
    store: Arc<RwLock<Store>>,
}

impl MockApi {
    /// Create a mock accepting `Bearer <key>` as the only valid credential
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store {
                key: key.into(),
                ..Store::default()
            })),
        }
    }

    /// Build the router serving the pin API
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/pins",
                get(list_pins)
                    .post(create_pins)
                    .put(update_pins)
                    .delete(delete_pins),
            )
            .route("/metadata/{meta_id}", get(get_metadata))
            .with_state(self.clone())
    }

    /// Serve the router on the given listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), std::io::Error> {
        axum::serve(listener, self.router()).await
    }

    /// Seed a metadata document for a meta id
    pub async fn put_metadata(&self, meta_id: impl Into<String>, document: Value) {
        self.store
            .write()
            .await
            .metadata
            .insert(meta_id.into(), document);
    }

    /// Snapshot of every stored pin, in insertion order
    pub async fn pins(&self) -> Vec<Pin> {
        self.store.read().await.pins.clone()
    }

    /// `Authorization` values observed per request, in arrival order
    ///
    /// Each entry is the full list of values that request carried, so tests
    /// can assert both content and cardinality.
    pub async fn recorded_authorization(&self) -> Vec<Vec<String>> {
        self.store.read().await.authorization_log.clone()
    }

    async fn authorize(&self, headers: &HeaderMap) -> Result<(), Rejection> {
        let values: Vec<String> = headers
            .get_all(AUTHORIZATION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(ToString::to_string)
            .collect();

        let mut store = self.store.write().await;
        store.authorization_log.push(values.clone());

        let expected = format!("Bearer {}", store.key);
        if values.len() == 1 && values[0] == expected {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "unauthorized"})),
            ))
        }
    }
}

async fn create_pins(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(input): Json<Vec<CreatePin>>,
) -> Result<Json<Vec<Pin>>, Rejection> {
    api.authorize(&headers).await?;

    let mut store = api.store.write().await;
    let mut created = Vec::with_capacity(input.len());
    for pin in input {
        let record = Pin {
            id: Uuid::new_v4().to_string(),
            meta_id: pin.meta_id,
            position: pin.position,
            offset: pin.offset.unwrap_or(Vec3::ZERO),
            html: pin.html,
            opacity: pin.opacity.unwrap_or(1.0),
            enable_line: pin.enable_line.unwrap_or(false),
            alert: pin.alert.unwrap_or(false),
            icon: pin.icon,
            color: pin.color,
        };
        store.pins.push(record.clone());
        created.push(record);
    }
    Ok(Json(created))
}

async fn update_pins(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(input): Json<Vec<UpdatePin>>,
) -> Result<Json<Vec<Pin>>, Rejection> {
    api.authorize(&headers).await?;

    let mut store = api.store.write().await;
    let mut updated = Vec::with_capacity(input.len());
    for change in input {
        let Some(pin) = store.pins.iter_mut().find(|p| p.id == change.id) else {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({"error": "pin not found"})),
            ));
        };
        if let Some(meta_id) = change.meta_id {
            pin.meta_id = meta_id;
        }
        if let Some(position) = change.position {
            pin.position = position;
        }
        if let Some(offset) = change.offset {
            pin.offset = offset;
        }
        if let Some(html) = change.html {
            pin.html = html;
        }
        if let Some(opacity) = change.opacity {
            pin.opacity = opacity;
        }
        if let Some(enable_line) = change.enable_line {
            pin.enable_line = enable_line;
        }
        if let Some(alert) = change.alert {
            pin.alert = alert;
        }
        if let Some(icon) = change.icon {
            pin.icon = Some(icon);
        }
        if let Some(color) = change.color {
            pin.color = Some(color);
        }
        updated.push(pin.clone());
    }
    Ok(Json(updated))
}

async fn delete_pins(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(ids): Json<Vec<String>>,
) -> Result<Json<Value>, Rejection> {
    api.authorize(&headers).await?;

    let mut store = api.store.write().await;
    let before = store.pins.len();
    store.pins.retain(|p| !ids.contains(&p.id));
    let deleted = before - store.pins.len();
    Ok(Json(json!({"deleted": deleted})))
}

async fn list_pins(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(query): Query<PinsQuery>,
) -> Result<Json<Vec<Pin>>, Rejection> {
    api.authorize(&headers).await?;

    let store = api.store.read().await;
    let pins: Vec<Pin> = store
        .pins
        .iter()
        .filter(|p| p.meta_id == query.meta_id)
        .cloned()
        .collect();
    Ok(Json(pins))
}

async fn get_metadata(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(meta_id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    api.authorize(&headers).await?;

    let store = api.store.read().await;
    store.metadata.get(&meta_id).cloned().map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({"error": "metadata not found"})),
    ))
}
