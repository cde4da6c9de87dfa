pub mod api;
pub mod bluetooth;
pub mod logging;
pub mod notifier;
pub mod rpc;
