mod heuristic;
mod mcts;
mod random;

pub use heuristic::HeuristicPolicy;
pub use mcts::SearchPolicy;
pub use random::RandomPolicy;

use crate::bot::{BotParams, DecisionError};
use arbor_core::game::{DrawSource, GameState};
use arbor_core::model::card::Card;
use arbor_core::model::coord::Coord;
use std::time::Instant;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub state: &'a GameState,
    pub params: &'a BotParams,
    /// Point by which an answer is due, when the caller has one.
    pub deadline: Option<Instant>,
}

impl<'a> PolicyContext<'a> {
    pub fn new(state: &'a GameState, params: &'a BotParams) -> Self {
        Self {
            state,
            params,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// One decision per sub-turn: two draws, a placement, a discard.
pub trait Policy: Send {
    fn name(&self) -> &'static str;

    /// Pile to draw from (called twice per turn)
    fn choose_draw(&mut self, ctx: &PolicyContext) -> DrawSource;

    /// Card to place and where
    fn choose_placement(&mut self, ctx: &PolicyContext) -> Result<(Card, Coord), DecisionError>;

    /// Card to discard once the placement is made
    fn choose_discard(&mut self, ctx: &PolicyContext) -> Result<Card, DecisionError>;

    /// Optional: observe the final scores, ours first
    fn observe_game_end(&mut self, _final_scores: [u32; 2]) {}
}

/// Builds a policy by its configured name.
pub fn policy_by_name(name: &str, seed: u64) -> Option<Box<dyn Policy>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "heuristic" | "greedy" => Some(Box::new(HeuristicPolicy::new())),
        "search" | "mcts" => Some(Box::new(SearchPolicy::with_seed(seed))),
        "random" => Some(Box::new(RandomPolicy::with_seed(seed))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::policy_by_name;

    #[test]
    fn policies_resolve_by_name() {
        assert_eq!(policy_by_name("heuristic", 1).unwrap().name(), "heuristic");
        assert_eq!(policy_by_name(" MCTS ", 1).unwrap().name(), "search");
        assert_eq!(policy_by_name("random", 1).unwrap().name(), "random");
        assert!(policy_by_name("oracle", 1).is_none());
    }
}
