//! Application support for binaries built on this crate: `.env` loading and tracing subscribers.

#[cfg(feature = "app_env")]
pub mod env;
#[cfg(feature = "app_tracing")]
pub mod tracing;
