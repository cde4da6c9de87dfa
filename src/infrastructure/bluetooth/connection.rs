//! BLE Connection Module
//!
//! Connects to the selected peripheral and locates the orientation
//! characteristic.

use crate::domain::error::{Result, ZeiError};
use crate::infrastructure::bluetooth::protocol;
use crate::infrastructure::bluetooth::scanner::device_error;
use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::Peripheral;
use tracing::info;
use uuid::Uuid;

/// Configuration for connection behavior
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Service the orientation characteristic belongs to
    pub orientation_service_uuid: Uuid,
    /// Orientation characteristic UUID
    pub orientation_char_uuid: Uuid,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            orientation_service_uuid: protocol::ORIENTATION_SERVICE_UUID,
            orientation_char_uuid: protocol::ORIENTATION_CHAR_UUID,
        }
    }
}

impl ConnectionConfig {
    fn is_orientation(&self, characteristic: &Characteristic) -> bool {
        characteristic.service_uuid == self.orientation_service_uuid
            && characteristic.uuid == self.orientation_char_uuid
    }
}

/// Result of a successful connection
pub struct ConnectionResult {
    pub peripheral: Peripheral,
    pub orientation: Characteristic,
}

/// BLE Connection handler
pub struct BleConnection {
    config: ConnectionConfig,
}

impl BleConnection {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Connect and discover the orientation characteristic
    pub async fn connect(&self, peripheral: Peripheral) -> Result<ConnectionResult> {
        info!("Connecting to ZEI device...");

        // Step 1: Connect to BLE device
        if !peripheral.is_connected().await.map_err(device_error)? {
            peripheral.connect().await.map_err(device_error)?;
        }
        info!("connection to device successful");

        // Step 2: Discover GATT services and characteristics
        peripheral.discover_services().await.map_err(device_error)?;

        let orientation = peripheral
            .characteristics()
            .into_iter()
            .find(|c| self.config.is_orientation(c))
            .ok_or_else(|| {
                ZeiError::Device("could not find orientation characteristic".to_string())
            })?;
        info!("Found orientation characteristic");

        Ok(ConnectionResult {
            peripheral,
            orientation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btleplug::api::CharPropFlags;
    use std::collections::BTreeSet;

    fn characteristic(service_uuid: Uuid, uuid: Uuid) -> Characteristic {
        Characteristic {
            uuid,
            service_uuid,
            properties: CharPropFlags::READ | CharPropFlags::NOTIFY,
            descriptors: BTreeSet::new(),
        }
    }

    #[test]
    fn test_orientation_needs_service_and_characteristic() {
        let config = ConnectionConfig::default();
        assert!(config.is_orientation(&characteristic(
            protocol::ORIENTATION_SERVICE_UUID,
            protocol::ORIENTATION_CHAR_UUID
        )));
        assert!(!config.is_orientation(&characteristic(
            Uuid::from_u128(0x1800),
            protocol::ORIENTATION_CHAR_UUID
        )));
        assert!(!config.is_orientation(&characteristic(
            protocol::ORIENTATION_SERVICE_UUID,
            Uuid::from_u128(0x2a00)
        )));
    }
}
