//! Local RPC facade
//!
//! - [`protocol`] - routes, request/response and error payloads
//! - [`server`] - axum router over the activity service
//! - [`client`] - reqwest client for the CLI and the tray

pub mod client;
pub mod protocol;
pub mod server;

pub use client::RpcClient;
