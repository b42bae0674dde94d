//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{admin_client, sample_export, TestBackend};
//!
//! #[tokio::test]
//! async fn test_backup() {
//!     let backend = TestBackend::spawn(sample_export()).await;
//!     let client = admin_client(&backend);
//!     // ...
//! }
//! ```
#![allow(dead_code)]

mod backend;
mod constants;
mod fixtures;

// Public API - this is what tests import
pub use backend::{BackendOptions, ReceivedUpload, TestBackend};
pub use constants::*;
pub use fixtures::sample_export;

use cellclinic_admin::ApiClient;

/// Client carrying the admin token accepted by the mock backend
pub fn admin_client(backend: &TestBackend) -> ApiClient {
    ApiClient::new(backend.base_url.clone(), REQUEST_TIMEOUT_SECS)
        .expect("Failed to build api client")
        .with_token(Some(ADMIN_TOKEN.to_string()))
}

/// Client without any token
pub fn anonymous_client(backend: &TestBackend) -> ApiClient {
    ApiClient::new(backend.base_url.clone(), REQUEST_TIMEOUT_SECS)
        .expect("Failed to build api client")
}
