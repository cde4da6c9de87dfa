//! Bluetooth Service Module
//!
//! The connected ZEI device: snapshot reads of the orientation and a
//! subscription that forwards every notification (and the disconnect) as a
//! [`DeviceEvent`].

use crate::domain::error::Result;
use crate::domain::models::DeviceEvent;
use crate::domain::ports::OrientationSensor;
use crate::infrastructure::bluetooth::{
    connection::{BleConnection, ConnectionConfig, ConnectionResult},
    scanner::{device_error, BleScanner, ConfirmFn},
    selection::DeviceSelector,
};
use async_trait::async_trait;
use btleplug::api::{Central, CentralEvent, Characteristic, Peripheral as _};
use btleplug::platform::{Adapter, Peripheral};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, trace, warn};

pub struct ZeiDevice {
    adapter: Adapter,
    peripheral: Peripheral,
    orientation: Characteristic,
}

impl ZeiDevice {
    /// Scan, select and connect to a ZEI device
    pub async fn discover(selector: Arc<DeviceSelector>, confirm: ConfirmFn) -> Result<Self> {
        let scanner = BleScanner::new().await?;
        let peripheral = scanner.find_device(selector.clone(), confirm).await?;

        let connection = BleConnection::new(ConnectionConfig::default());
        let ConnectionResult {
            peripheral,
            orientation,
        } = match connection.connect(peripheral).await {
            Ok(result) => result,
            Err(e) => {
                selector.release();
                return Err(e);
            }
        };
        selector.mark_connected();

        Ok(Self {
            adapter: scanner.adapter().clone(),
            peripheral,
            orientation,
        })
    }

    /// Forward orientation notifications and the disconnect to `events`
    pub async fn subscribe(&self, events: mpsc::UnboundedSender<DeviceEvent>) -> Result<()> {
        self.peripheral
            .subscribe(&self.orientation)
            .await
            .map_err(device_error)?;

        let mut notifications = self.peripheral.notifications().await.map_err(device_error)?;
        let orientation_uuid = self.orientation.uuid;
        let sender = events.clone();
        tokio::spawn(async move {
            while let Some(notification) = notifications.next().await {
                if notification.uuid != orientation_uuid {
                    continue;
                }
                trace!("Raw orientation: {:02X?}", notification.value);
                if sender.send(DeviceEvent::Orientation(notification.value)).is_err() {
                    return;
                }
            }
            warn!("Notification stream ended");
            let _ = sender.send(DeviceEvent::Disconnected);
        });

        let mut central_events = self.adapter.events().await.map_err(device_error)?;
        let id = self.peripheral.id();
        tokio::spawn(async move {
            while let Some(event) = central_events.next().await {
                if let CentralEvent::DeviceDisconnected(disconnected) = event {
                    if disconnected == id {
                        info!("Device disconnected");
                        let _ = events.send(DeviceEvent::Disconnected);
                        return;
                    }
                }
            }
        });

        Ok(())
    }

    /// Disconnect from the device
    pub async fn disconnect(&self) -> Result<()> {
        if self.peripheral.is_connected().await.map_err(device_error)? {
            self.peripheral.disconnect().await.map_err(device_error)?;
            info!("Disconnected from device");
        }
        Ok(())
    }
}

#[async_trait]
impl OrientationSensor for ZeiDevice {
    async fn read_orientation(&self) -> Result<Vec<u8>> {
        self.peripheral
            .read(&self.orientation)
            .await
            .map_err(device_error)
    }
}
