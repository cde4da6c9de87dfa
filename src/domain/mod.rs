//! Domain layer: the data model, the side table, the tracking state machine
//! and the service that owns them.

pub mod error;
pub mod models;
pub mod ports;
pub mod service;
pub mod settings;
pub mod side_table;
pub mod tracker;

pub use error::{Result, ZeiError};
pub use service::{ActivityService, ServiceOptions};
