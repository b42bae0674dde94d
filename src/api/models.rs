//! Models for the catalog backend REST API.
//!
//! Catalog records are kept as raw JSON objects so that every field the
//! backend sends survives a backup untouched; only `_id`, `name` and `image`
//! are ever looked at.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// A brand or device record as exported by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRecord(pub Map<String, Value>);

pub type Brand = CatalogRecord;
pub type Device = CatalogRecord;

impl CatalogRecord {
    /// Unique identifier, accepting both string and numeric ids.
    pub fn id(&self) -> Option<String> {
        match self.0.get("_id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// A top-level field, only when it holds a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn image(&self) -> Option<&str> {
        self.str_field("image")
    }

    pub fn set_image(&mut self, value: impl Into<String>) {
        self.0
            .insert("image".to_string(), Value::String(value.into()));
    }
}

impl From<Value> for CatalogRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => CatalogRecord(map),
            _ => CatalogRecord::default(),
        }
    }
}

/// Full exported state of the catalog.
///
/// Services, inquiries and any unknown top-level keys pass through as-is.
/// A collection missing from the export stays missing when serialized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<Brand>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<Device>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiries: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogSnapshot {
    pub fn brands(&self) -> &[Brand] {
        self.brands.as_deref().unwrap_or_default()
    }

    pub fn devices(&self) -> &[Device] {
        self.devices.as_deref().unwrap_or_default()
    }

    pub fn services(&self) -> &[Value] {
        self.services.as_deref().unwrap_or_default()
    }

    pub fn inquiries(&self) -> &[Value] {
        self.inquiries.as_deref().unwrap_or_default()
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Response of `GET /backup/export`.
#[derive(Clone, Debug, Deserialize)]
pub struct ExportResponse {
    pub data: Option<CatalogSnapshot>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Generic `{ message }` payload returned by write endpoints.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageResponse {
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// `{ success, data: [...] }` envelope of the listing endpoints.
#[derive(Clone, Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<T>,
    pub message: Option<String>,
}

// =============================================================================
// Inquiries
// =============================================================================

/// A customer repair inquiry (booking).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub device_model: Option<String>,
    pub status: Option<String>,
    pub total_estimated_price: Option<f64>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
}
