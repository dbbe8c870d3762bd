//! Search configuration parameters.

use std::time::Duration;

/// Configuration for the time-boxed tree search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// UCT exploration constant.
    pub exploration: f64,

    /// Wall-clock budget measured from the start of the search. Callers with
    /// an external deadline pass it directly instead.
    pub time_limit: Duration,

    /// Hard cap on iterations; `None` runs until the deadline.
    pub max_iterations: Option<u64>,

    /// Arena size at which the tree stops growing. Leaves reached after that
    /// are simulated without expansion.
    pub max_nodes: usize,
}

impl SearchConfig {
    pub const DEFAULT_EXPLORATION: f64 = 1.414;
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(1150);
    pub const DEFAULT_MAX_NODES: usize = 250_000;

    /// Small deterministic budget for tests and benchmarks.
    pub fn for_testing(iterations: u64) -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            max_iterations: Some(iterations),
            ..Self::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: Self::DEFAULT_EXPLORATION,
            time_limit: Self::DEFAULT_TIME_LIMIT,
            max_iterations: None,
            max_nodes: Self::DEFAULT_MAX_NODES,
        }
    }
}
