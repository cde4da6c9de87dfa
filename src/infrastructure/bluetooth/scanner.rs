//! BLE Scanner Module
//!
//! Finds the ZEI device to connect to among advertising peripherals.

use crate::domain::error::{Result, ZeiError};
use crate::infrastructure::bluetooth::protocol;
use crate::infrastructure::bluetooth::selection::{Decision, DeviceSelector};
use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Asks the user whether to connect to the device with the given serial
pub type ConfirmFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

pub(crate) fn device_error(e: btleplug::Error) -> ZeiError {
    ZeiError::Device(e.to_string())
}

/// One advertiser that cannot be queried must not end the scan
fn readable<T>(result: std::result::Result<T, btleplug::Error>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Skipping advertiser: {}", e);
            None
        }
    }
}

/// BLE Scanner for discovering ZEI devices
pub struct BleScanner {
    adapter: Adapter,
}

impl BleScanner {
    /// Use the first Bluetooth adapter of the host
    pub async fn new() -> Result<Self> {
        let manager = Manager::new().await.map_err(device_error)?;
        let adapter = manager
            .adapters()
            .await
            .map_err(device_error)?
            .into_iter()
            .next()
            .ok_or_else(|| ZeiError::Device("no Bluetooth adapter found".to_string()))?;

        Ok(Self { adapter })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Scan until `selector` claims a device.
    pub async fn find_device(
        &self,
        selector: Arc<DeviceSelector>,
        confirm: ConfirmFn,
    ) -> Result<Peripheral> {
        let mut events = self.adapter.events().await.map_err(device_error)?;
        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(device_error)?;
        info!("Scanning for ZEI devices...");

        let mut declined: HashSet<PeripheralId> = HashSet::new();

        while let Some(event) = events.next().await {
            let id = match event {
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                _ => continue,
            };
            if declined.contains(&id) {
                continue;
            }

            let Some(peripheral) = readable(self.adapter.peripheral(&id).await) else {
                continue;
            };
            let Some(Some(properties)) = readable(peripheral.properties().await) else {
                continue;
            };
            if !protocol::is_zei_name(properties.local_name.as_deref()) {
                continue;
            }

            let serial = protocol::device_serial(&properties.manufacturer_data);
            debug!(serial = %serial, "ZEI device advertising");

            let selector = selector.clone();
            let confirm = confirm.clone();
            let name = properties.local_name.clone();
            // The confirmation prompt blocks on the terminal.
            let decision = tokio::task::spawn_blocking(move || {
                selector.consider(name.as_deref(), &serial, |s| confirm(s))
            })
            .await
            .map_err(|e| ZeiError::Device(format!("device selection task: {}", e)))?;

            match decision {
                Decision::Claimed => {
                    self.adapter.stop_scan().await.map_err(device_error)?;
                    return Ok(peripheral);
                }
                Decision::Declined => {
                    declined.insert(id);
                }
                Decision::Skipped => {}
            }
        }

        Err(ZeiError::Device("scan ended without finding a device".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_advertiser_is_skipped() {
        let failed: std::result::Result<u8, btleplug::Error> = Err(btleplug::Error::DeviceNotFound);
        assert_eq!(readable(failed), None);
        assert_eq!(readable(Ok::<u8, btleplug::Error>(3)), Some(3));
    }
}
