//! Bluetooth Module
//!
//! Provides BLE communication with the ZEI orientation device.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       ZeiDevice                          │
//! │  (OrientationSensor + notification subscription)         │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!         ┌─────────────┼─────────────┬──────────────┐
//!         │             │             │              │
//!         ▼             ▼             ▼              ▼
//! ┌───────────┐  ┌────────────┐  ┌──────────┐  ┌───────────┐
//! │  Scanner  │  │ Connection │  │ Protocol │  │ Selection │
//! │           │  │            │  │          │  │           │
//! │ - BLE     │  │ - Connect  │  │ - UUIDs  │  │ - Serial/ │
//! │  discovery│  │ - GATT     │  │ - Serial │  │   prompt  │
//! └───────────┘  └────────────┘  └──────────┘  └───────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - Device name, UUIDs and serial number extraction
//! - [`selection`] - Which advertising device to claim, and the connection state
//! - `scanner` - BLE device discovery (`ble` feature)
//! - `connection` - Connection and GATT characteristic lookup (`ble` feature)
//! - `service` - The connected device (`ble` feature)

pub mod protocol;
pub mod selection;

#[cfg(feature = "ble")]
pub mod connection;
#[cfg(feature = "ble")]
pub mod scanner;
#[cfg(feature = "ble")]
pub mod service;

#[cfg(feature = "ble")]
pub use service::ZeiDevice;
