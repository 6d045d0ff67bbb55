//! Spinrelay Server Library
//!
//! This module exports the relay components and the load-testing harness
//! for use by the binaries, integration tests and external tooling.

pub mod app;
pub mod config;
pub mod load;
pub mod relay;

// Re-export commonly used types
pub use app::build_app;
pub use config::Config;
pub use load::{LoadConfig, LoadRunner, UserBehavior, quickstart_user};
pub use relay::{RelayAppState, RelayError, RelayService, SpinSource, SpinStore, relay_routes};
