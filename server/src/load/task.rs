//! Task capability and the relay's read task

use async_trait::async_trait;

use super::session::HttpSession;

/// Path the relay serves cached spins on
pub const GET_SPINS_PATH: &str = "/get";

/// One discrete action a simulated user performs
///
/// Tasks return nothing: timing, status and failures are recorded by the
/// session they are given.
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &str;

    /// Relative selection weight; zero disables the task
    fn weight(&self) -> u32 {
        1
    }

    async fn run(&self, session: &HttpSession);
}

/// Fetch the cached spins with a single `GET /get`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetSpins;

#[async_trait]
impl Task for GetSpins {
    fn name(&self) -> &str {
        "get"
    }

    async fn run(&self, session: &HttpSession) {
        session.get(GET_SPINS_PATH).await;
    }
}
