//! Customer inquiry (repair booking) tracking.
//!
//! Inquiries are created by customers on the public site; the admin side
//! lists them, moves them through their status and deletes them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

use crate::api::{ApiClient, ApiError, Inquiry, MessageResponse};

/// Progress of an inquiry, as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum InquiryStatus {
    Pending,
    Contacted,
    Resolved,
    Cancelled,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "Pending",
            InquiryStatus::Contacted => "Contacted",
            InquiryStatus::Resolved => "Resolved",
            InquiryStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: InquiryStatus,
}

fn inquiry_path(id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "inquiry id must not be empty".to_string(),
        ));
    }
    // `/inquiry/all` addresses the whole collection.
    if id == "all" {
        return Err(ApiError::InvalidRequest(
            "\"all\" is not an inquiry id".to_string(),
        ));
    }
    Ok(format!("/inquiry/{}", urlencoding::encode(id)))
}

/// All inquiries, as returned by the backend.
pub async fn list_inquiries(client: &ApiClient) -> Result<Vec<Inquiry>, ApiError> {
    client.get_list("/inquiry/all").await
}

/// Inquiries whose status is `status`. Missing statuses count as pending.
pub fn filter_by_status(inquiries: &[Inquiry], status: InquiryStatus) -> Vec<&Inquiry> {
    inquiries
        .iter()
        .filter(|i| i.status.as_deref().unwrap_or("Pending") == status.as_str())
        .collect()
}

/// Number of inquiries per status label.
pub fn count_by_status(inquiries: &[Inquiry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for inquiry in inquiries {
        let status = inquiry.status.as_deref().unwrap_or("Pending");
        *counts.entry(status.to_string()).or_insert(0) += 1;
    }
    counts
}

pub async fn update_status(
    client: &ApiClient,
    id: &str,
    status: InquiryStatus,
) -> Result<String, ApiError> {
    let response: MessageResponse = client
        .put_json(&inquiry_path(id)?, &StatusUpdate { status })
        .await?;
    info!("Inquiry {} set to {}", id, status);
    Ok(response.message_or("Inquiry updated"))
}

pub async fn delete_inquiry(client: &ApiClient, id: &str) -> Result<String, ApiError> {
    let response: MessageResponse = client.delete_json(&inquiry_path(id)?).await?;
    info!("Inquiry {} deleted", id);
    Ok(response.message_or("Inquiry deleted"))
}

/// Delete every inquiry on the backend.
pub async fn delete_all_inquiries(client: &ApiClient) -> Result<String, ApiError> {
    let response: MessageResponse = client.delete_json("/inquiry/all").await?;
    info!("All inquiries deleted");
    Ok(response.message_or("All inquiries deleted"))
}
