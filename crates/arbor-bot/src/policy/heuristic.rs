use super::{Policy, PolicyContext};
use crate::bot::{CardRanking, DecisionError, DiscardPlanner, DrawPlanner, PlacementPlanner};
use arbor_core::game::DrawSource;
use arbor_core::model::card::Card;
use arbor_core::model::coord::Coord;
use tracing::{Level, event};

/// One-ply planners behind the `Policy` trait. The rankings computed for a
/// placement are carried over to the discard that follows it.
#[derive(Debug, Default)]
pub struct HeuristicPolicy {
    rankings: Option<Vec<CardRanking>>,
}

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for HeuristicPolicy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn choose_draw(&mut self, ctx: &PolicyContext) -> DrawSource {
        let decision = DrawPlanner::evaluate(ctx.state, ctx.params);
        log_decision(ctx, "draw", &decision.source.to_string());
        decision.source
    }

    fn choose_placement(&mut self, ctx: &PolicyContext) -> Result<(Card, Coord), DecisionError> {
        let decision = PlacementPlanner::best_play(ctx.state, ctx.params)?;
        log_decision(ctx, "place", &format!("{} at {}", decision.card, decision.coord));
        let choice = (decision.card, decision.coord);
        self.rankings = Some(decision.rankings);
        Ok(choice)
    }

    fn choose_discard(&mut self, ctx: &PolicyContext) -> Result<Card, DecisionError> {
        let rankings = self.rankings.take();
        let card = DiscardPlanner::choose(ctx.state, rankings.as_deref(), ctx.params)?;
        log_decision(ctx, "discard", &card.to_string());
        Ok(card)
    }
}

fn log_decision(ctx: &PolicyContext, phase: &str, chosen: &str) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    event!(
        target: "arbor_bot::policy",
        Level::INFO,
        policy = "heuristic",
        phase,
        turn = ctx.state.turn,
        hand_size = ctx.state.hand.len(),
        deck = ctx.state.deck_count,
        chosen,
    );
}
