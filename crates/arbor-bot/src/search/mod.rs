//! Time-boxed Monte Carlo tree search over complete turns.
//!
//! Each iteration:
//! 1. Selection: UCT down fully expanded nodes
//! 2. Expansion: exactly one untried move
//! 3. Simulation: random playout to the end of the deck
//! 4. Backpropagation: alternate the value's sign up to the root

mod config;
mod node;
mod playout;
mod tree;

pub use config::SearchConfig;
pub use node::{NodeId, SearchNode, calculate_uct_score};
pub use playout::{SearchState, random_playout};
pub use tree::SearchTree;

use arbor_core::game::{GameState, Move};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStats {
    pub iterations: u64,
    pub nodes: usize,
    /// Visits summed over the root's children.
    pub root_visits: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub mv: Move,
    /// Visits of the chosen root child.
    pub visits: u32,
    pub stats: SearchStats,
}

/// Searches until `deadline` with the default configuration.
pub fn run_search(state: &GameState, deadline: Instant) -> Option<Move> {
    let mut rng = SmallRng::from_entropy();
    MctsSearch::new(SearchConfig::default())
        .run_until(state, deadline, &mut rng)
        .map(|outcome| outcome.mv)
}

pub struct MctsSearch {
    config: SearchConfig,
}

impl MctsSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches for `config.time_limit` from now.
    pub fn run<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> Option<SearchOutcome> {
        self.run_until(state, Instant::now() + self.config.time_limit, rng)
    }

    /// Returns the most visited root move, or `None` if nothing was expanded.
    pub fn run_until<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        deadline: Instant,
        rng: &mut R,
    ) -> Option<SearchOutcome> {
        let started = Instant::now();
        let mut tree = SearchTree::new(SearchState::determinize(state, rng), rng);
        if tree.get(tree.root()).untried.is_empty() {
            return None;
        }

        let mut iterations = 0u64;
        loop {
            if Instant::now() >= deadline {
                break;
            }
            if self.config.max_iterations.is_some_and(|max| iterations >= max) {
                break;
            }

            let mut leaf = tree.select_leaf(self.config.exploration);
            let node = tree.get(leaf);
            let can_grow = leaf == tree.root() || tree.len() < self.config.max_nodes;
            if !node.is_terminal() && !node.is_fully_expanded() && can_grow {
                if let Some(child) = tree.expand(leaf, rng) {
                    leaf = child;
                }
            }

            let value = tree.simulate(leaf, rng);
            tree.backpropagate(leaf, value);
            iterations += 1;
        }

        let best = tree.best_root_child()?;
        let mv = best.mv?;
        let stats = SearchStats {
            iterations,
            nodes: tree.len(),
            root_visits: tree.root_children().map(|child| child.visits).sum(),
            elapsed: started.elapsed(),
        };
        let outcome = SearchOutcome {
            mv,
            visits: best.visits,
            stats,
        };
        log_search(&outcome, best.mean_value());
        Some(outcome)
    }
}

fn log_search(outcome: &SearchOutcome, mean_value: f64) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    event!(
        target: "arbor_bot::search",
        Level::INFO,
        iterations = outcome.stats.iterations,
        nodes = outcome.stats.nodes,
        root_visits = outcome.stats.root_visits,
        elapsed_ms = outcome.stats.elapsed.as_millis() as u64,
        chosen = %outcome.mv,
        chosen_visits = outcome.visits,
        mean_value,
    );
}
