mod discard;
mod draw;
mod error;
mod params;
mod place;
mod valuator;

pub use discard::{DiscardDecision, DiscardPlanner};
pub use draw::{DrawDecision, DrawPlanner};
pub use error::DecisionError;
pub use params::BotParams;
pub use place::{CardRanking, PlacementDecision, PlacementPlanner};
pub use valuator::{StateValuator, weighted_value, weighted_value_with};

use arbor_core::game::GameState;
use arbor_core::model::card::Card;
use arbor_core::model::coord::Coord;

/// Placement entry point: the chosen card and coordinate.
pub fn best_play(state: &GameState) -> Result<(Card, Coord), DecisionError> {
    PlacementPlanner::best_play(state, &BotParams::default()).map(|decision| (decision.card, decision.coord))
}

/// Discard entry point. Pass the rankings from a preceding placement decision
/// when available.
pub fn choose_discard(state: &GameState, rankings: Option<&[CardRanking]>) -> Result<Card, DecisionError> {
    DiscardPlanner::choose(state, rankings, &BotParams::default())
}
