//! Shared constants for end-to-end tests
//!
//! When test credentials or fixture data change, update only this file.

// ============================================================================
// Admin Credentials
// ============================================================================

pub const ADMIN_EMAIL: &str = "admin@cellclinic.test";

pub const ADMIN_PASSWORD: &str = "adminpass123";

/// Token handed out by the mock backend on successful login
pub const ADMIN_TOKEN: &str = "test-admin-token";

// ============================================================================
// Fixture Data
// ============================================================================

pub const BUSINESS_NAME: &str = "CellClinic";

pub const BRAND_APPLE_ID: &str = "brand-apple";

pub const DEVICE_IPHONE_15_ID: &str = "device-iphone-15";

pub const INQUIRY_PENDING_ID: &str = "inq-1";

pub const INQUIRY_RESOLVED_ID: &str = "inq-2";

/// base64 of the bytes [0, 0, 0]
pub const TINY_PNG_PAYLOAD: &str = "AAAA";

/// File name announced by the Excel report endpoint
pub const EXCEL_REPORT_FILE_NAME: &str = "CellClinic_Report_2026-03-14.xlsx";

// ============================================================================
// Timeouts
// ============================================================================

pub const REQUEST_TIMEOUT_SECS: u64 = 5;

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
