//! Device selection
//!
//! Decides which advertising ZEI device to connect to. The connection state
//! has a single owner and only changes inside its lock, so concurrent
//! advertisement callbacks can claim at most one device.

use crate::infrastructure::bluetooth::protocol;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Scanning,
    Connecting { serial: String },
    Connected { serial: String },
}

/// What happened to one advertisement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// This device was claimed; connect to it
    Claimed,
    /// The user said no; don't ask again for this device
    Declined,
    /// Not a candidate (wrong name, wrong serial, or already claimed)
    Skipped,
}

pub struct DeviceSelector {
    serial_number: Option<String>,
    state: Mutex<ConnectionState>,
}

impl DeviceSelector {
    /// `serial_number` pre-selects a device; without it the user confirms
    pub fn new(serial_number: Option<String>) -> Self {
        Self {
            serial_number: serial_number.filter(|s| !s.trim().is_empty()),
            state: Mutex::new(ConnectionState::Scanning),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConnectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ConnectionState {
        self.lock().clone()
    }

    /// Consider an advertisement. `confirm` is only called when no serial
    /// number is configured, and is called with the lock held so two
    /// advertisements can never both be confirmed.
    pub fn consider<F>(&self, local_name: Option<&str>, serial: &str, confirm: F) -> Decision
    where
        F: FnOnce(&str) -> bool,
    {
        let mut state = self.lock();
        if *state != ConnectionState::Scanning || !protocol::is_zei_name(local_name) {
            return Decision::Skipped;
        }

        let decision = match &self.serial_number {
            Some(expected) if expected == serial => Decision::Claimed,
            Some(_) => Decision::Skipped,
            None if confirm(serial) => Decision::Claimed,
            None => Decision::Declined,
        };

        if decision == Decision::Claimed {
            info!(serial = %serial, "Selected ZEI device");
            *state = ConnectionState::Connecting {
                serial: serial.to_string(),
            };
        } else {
            debug!(serial = %serial, ?decision, "Ignoring ZEI device");
        }
        decision
    }

    /// Connecting -> Connected
    pub fn mark_connected(&self) {
        let mut state = self.lock();
        if let ConnectionState::Connecting { serial } = &*state {
            *state = ConnectionState::Connected {
                serial: serial.clone(),
            };
        }
    }

    /// Back to Scanning after a failed connection attempt
    pub fn release(&self) {
        *self.lock() = ConnectionState::Scanning;
    }
}
