//! Simulated user descriptors

use rand::Rng;
use std::sync::Arc;

use super::task::{GetSpins, Task};
use super::wait::WaitTime;

/// Declarative description of one simulated user
///
/// Registers a set of weighted tasks and the wait policy applied after each
/// of them. Holds no per-run state, so one descriptor is shared by every
/// spawned user.
#[derive(Clone)]
pub struct UserBehavior {
    name: String,
    wait_time: WaitTime,
    tasks: Vec<Arc<dyn Task>>,
}

impl UserBehavior {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wait_time: WaitTime::default(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task<T: Task + 'static>(mut self, task: T) -> Self {
        self.tasks.push(Arc::new(task));
        self
    }

    pub fn with_wait_time(mut self, wait_time: WaitTime) -> Self {
        self.wait_time = wait_time;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wait_time(&self) -> WaitTime {
        self.wait_time
    }

    pub fn tasks(&self) -> &[Arc<dyn Task>] {
        &self.tasks
    }

    fn total_weight(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.weight())).sum()
    }

    /// Whether at least one task can be picked
    pub fn is_runnable(&self) -> bool {
        self.total_weight() > 0
    }

    /// Pick the next task by weight
    pub fn pick_task<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Arc<dyn Task>> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }

        let mut roll = rng.random_range(0..total);
        for task in &self.tasks {
            let weight = u64::from(task.weight());
            if roll < weight {
                return Some(task);
            }
            roll -= weight;
        }
        None
    }
}

impl std::fmt::Debug for UserBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserBehavior")
            .field("name", &self.name)
            .field("wait_time", &self.wait_time)
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The relay's default user: fetches `/get` with no think time
pub fn quickstart_user() -> UserBehavior {
    UserBehavior::new("QuickstartUser").with_task(GetSpins)
}
