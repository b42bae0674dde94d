//! Export payloads served by the mock backend

use super::constants::*;
use serde_json::{json, Value};

/// Export with one inline brand image, one URL image and a device
/// carrying a malformed data URI.
pub fn sample_export() -> Value {
    json!({
        "success": true,
        "exportedAt": "2026-03-14T09:30:00Z",
        "data": {
            "brands": [
                {
                    "_id": BRAND_APPLE_ID,
                    "name": "Apple",
                    "image": format!("data:image/png;base64,{}", TINY_PNG_PAYLOAD)
                },
                { "_id": "brand-samsung", "name": "Samsung", "image": "https://cdn/x.png" }
            ],
            "devices": [
                {
                    "_id": DEVICE_IPHONE_15_ID,
                    "name": "iPhone 15",
                    "brand": BRAND_APPLE_ID,
                    "image": "data:image/jpeg;base64,AQID"
                },
                {
                    "_id": "device-broken",
                    "name": "Broken Phone",
                    "brand": BRAND_APPLE_ID,
                    "image": "data:image/png;base64"
                },
                { "_id": "device-no-image", "name": "Nokia 3310", "brand": "brand-nokia" }
            ],
            "services": [
                { "_id": "svc-1", "device": DEVICE_IPHONE_15_ID, "title": "Display", "price": 5000 }
            ],
            "inquiries": [
                {
                    "_id": INQUIRY_PENDING_ID,
                    "name": "Ravi",
                    "mobileNumber": "9000000000",
                    "deviceModel": "iPhone 15",
                    "totalEstimatedPrice": 5000,
                    "status": "Pending",
                    "createdAt": "2026-03-13T11:00:00Z"
                },
                {
                    "_id": INQUIRY_RESOLVED_ID,
                    "name": "Meena",
                    "mobileNumber": "9111111111",
                    "deviceModel": "Galaxy S24",
                    "totalEstimatedPrice": 2500,
                    "status": "Resolved",
                    "createdAt": "2026-03-10T16:45:00Z"
                }
            ]
        }
    })
}
