//! Bridge between a Timeular ZEI orientation device and the Timeular
//! time-tracking API.
//!
//! The daemon (`zeid`) follows the device over BLE and starts/stops remote
//! tracking as it is flipped; the CLI (`zei`) and the tray window (`zei-tray`)
//! talk to the daemon over a local HTTP RPC facade.

pub mod domain;
pub mod infrastructure;
pub mod presentation;
