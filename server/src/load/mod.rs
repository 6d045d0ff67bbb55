//! Load generation against the relay
//!
//! A simulated user is described declaratively by a [`UserBehavior`]: a set of
//! weighted [`Task`]s and a [`WaitTime`] policy applied between them. The
//! behavior knows nothing about scheduling; it only receives an
//! [`HttpSession`] bound to the target host.
//!
//! The harness side lives in [`runner`], [`session`] and [`stats`]:
//! - **Runner**: spawns users at a spawn rate and stops on run time,
//!   iteration count, or an explicit stop signal
//! - **Session**: an instrumented HTTP client that records every request
//! - **Stats**: per-endpoint counters and latency percentiles
//!
//! ## Running against a local relay
//!
//! ```bash
//! spinrelay-load --host http://127.0.0.1:80 --users 50 --spawn-rate 10 --run-time 60
//! ```

pub mod runner;
pub mod session;
pub mod stats;
pub mod task;
mod types;
pub mod user;
pub mod wait;

pub use runner::{LoadConfig, LoadRunner, StopHandle};
pub use session::HttpSession;
pub use stats::{EndpointSummary, LatencyStats, RequestStats, RunSummary};
pub use task::{GET_SPINS_PATH, GetSpins, Task};
pub use types::{LoadError, RequestOutcome};
pub use user::{UserBehavior, quickstart_user};
pub use wait::WaitTime;
