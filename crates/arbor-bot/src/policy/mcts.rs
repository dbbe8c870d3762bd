use super::{Policy, PolicyContext};
use crate::bot::{DecisionError, DiscardPlanner, DrawPlanner, PlacementPlanner};
use crate::search::MctsSearch;
use arbor_core::game::DrawSource;
use arbor_core::model::card::Card;
use arbor_core::model::coord::Coord;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Instant;
use tracing::{Level, event};

/// Tree search for the placement; the discard of the searched move follows.
/// Draws use the one-ply draw planner.
pub struct SearchPolicy {
    rng: SmallRng,
    planned_discard: Option<Card>,
}

impl SearchPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            planned_discard: None,
        }
    }
}

impl Policy for SearchPolicy {
    fn name(&self) -> &'static str {
        "search"
    }

    fn choose_draw(&mut self, ctx: &PolicyContext) -> DrawSource {
        DrawPlanner::choose(ctx.state, ctx.params)
    }

    fn choose_placement(&mut self, ctx: &PolicyContext) -> Result<(Card, Coord), DecisionError> {
        let search = MctsSearch::new(ctx.params.search);
        let deadline = ctx
            .deadline
            .unwrap_or_else(|| Instant::now() + ctx.params.search.time_limit);
        match search.run_until(ctx.state, deadline, &mut self.rng) {
            Some(outcome) => {
                self.planned_discard = Some(outcome.mv.discard);
                Ok((outcome.mv.play, outcome.mv.coord))
            }
            None => {
                if tracing::enabled!(Level::WARN) {
                    event!(
                        target: "arbor_bot::policy",
                        Level::WARN,
                        policy = "search",
                        turn = ctx.state.turn,
                        hand_size = ctx.state.hand.len(),
                        "search produced no move, using one-ply placement"
                    );
                }
                self.planned_discard = None;
                let decision = PlacementPlanner::best_play(ctx.state, ctx.params)?;
                Ok((decision.card, decision.coord))
            }
        }
    }

    fn choose_discard(&mut self, ctx: &PolicyContext) -> Result<Card, DecisionError> {
        match self.planned_discard.take() {
            Some(card) if ctx.state.hand.contains(card) => Ok(card),
            _ => DiscardPlanner::choose(ctx.state, None, ctx.params),
        }
    }
}
