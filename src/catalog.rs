//! Read-only catalog listings.

use crate::api::{ApiClient, ApiError, Brand, CatalogRecord, Device};

pub async fn list_brands(client: &ApiClient) -> Result<Vec<Brand>, ApiError> {
    client.get_list("/catalog/brands").await
}

/// Devices belonging to one brand.
pub async fn list_devices(client: &ApiClient, brand_id: &str) -> Result<Vec<Device>, ApiError> {
    client.get_list(&devices_path(brand_id)?).await
}

/// Repair services offered for one device.
pub async fn list_services(
    client: &ApiClient,
    device_id: &str,
) -> Result<Vec<CatalogRecord>, ApiError> {
    client.get_list(&services_path(device_id)?).await
}

fn devices_path(brand_id: &str) -> Result<String, ApiError> {
    scoped_path("/catalog/devices", brand_id)
}

fn services_path(device_id: &str) -> Result<String, ApiError> {
    scoped_path("/catalog/services", device_id)
}

fn scoped_path(base: &str, id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidRequest("id must not be empty".to_string()));
    }
    Ok(format!("{}/{}", base, urlencoding::encode(id)))
}

/// One-line label for a listed record: `<name or title> (<id>)`.
pub fn record_label(record: &CatalogRecord) -> String {
    let name = record
        .name()
        .or_else(|| record.str_field("title"))
        .unwrap_or("unnamed");
    match record.id() {
        Some(id) => format!("{} ({})", name, id),
        None => name.to_string(),
    }
}
