//! Remote tracking API
//!
//! - [`client`] - reqwest implementation of [`TrackingApi`](crate::domain::ports::TrackingApi)
//! - [`wire`] - request/response payloads and the timestamp format

pub mod client;
pub mod wire;

pub use client::{ApiClientConfig, ZeiApiClient};
