//! Spinitron relay
//!
//! This module provides:
//! - `SpinSource` trait for abstracting where spins come from
//! - `SpinitronSource` for fetching spins from the Spinitron API
//! - `SpinStore`, the in-memory copy of the latest upstream document
//! - HTTP routes for refreshing and serving the cached spins

pub mod routes;
mod service;
mod source;
mod store;
mod types;

pub use routes::{RelayAppState, relay_routes};
pub use service::RelayService;
pub use source::{SpinSource, SpinitronSource};
pub use store::SpinStore;
pub use types::RelayError;
