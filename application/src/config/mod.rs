//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`RetryPolicy`] - backoff for throttled backend calls
//! - [`GatewayParams`] - per-request parameters shared by every participant

pub mod gateway_params;
pub mod retry_policy;

pub use gateway_params::GatewayParams;
pub use retry_policy::RetryPolicy;
