//! ZEI device protocol
//!
//! Identification and GATT layout of the Timeular ZEI orientation device.

use std::collections::HashMap;
use uuid::Uuid;

/// Advertised local name of every ZEI device (compared case-insensitively)
pub const DEVICE_NAME: &str = "Timeular ZEI";

/// Orientation service UUID
pub const ORIENTATION_SERVICE_UUID: Uuid = Uuid::from_u128(0xc7e70010_c847_11e6_8175_8c89a55d403c);

/// Orientation characteristic UUID - single byte, the side facing up (1-8)
pub const ORIENTATION_CHAR_UUID: Uuid = Uuid::from_u128(0xc7e70012_c847_11e6_8175_8c89a55d403c);

/// Whether an advertised local name belongs to a ZEI device
pub fn is_zei_name(local_name: Option<&str>) -> bool {
    local_name.is_some_and(|name| name.trim().eq_ignore_ascii_case(DEVICE_NAME))
}

/// Serial number carried in the advertisement's manufacturer data.
///
/// The raw manufacturer-specific field (company identifier, little-endian,
/// followed by the payload) is read as text.
pub fn device_serial(manufacturer_data: &HashMap<u16, Vec<u8>>) -> String {
    let mut companies: Vec<_> = manufacturer_data.keys().copied().collect();
    companies.sort_unstable();

    let mut raw = Vec::new();
    for company in companies {
        raw.extend_from_slice(&company.to_le_bytes());
        raw.extend_from_slice(&manufacturer_data[&company]);
    }

    String::from_utf8_lossy(&raw)
        .trim_matches(|c: char| c.is_control() || c.is_whitespace())
        .to_string()
}
