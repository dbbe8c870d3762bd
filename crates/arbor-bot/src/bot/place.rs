use super::{BotParams, DecisionError, StateValuator};
use arbor_core::game::GameState;
use arbor_core::model::card::Card;
use arbor_core::model::coord::Coord;
use tracing::{Level, event};

/// Best value a hand card reaches over every legal coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRanking {
    pub card: Card,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementDecision {
    pub card: Card,
    pub coord: Coord,
    pub value: f64,
    /// One entry per placeable hand card, in hand order.
    pub rankings: Vec<CardRanking>,
}

impl PlacementDecision {
    /// Rankings sorted weakest first; ties keep hand order.
    pub fn weakest_first(&self) -> Vec<CardRanking> {
        weakest_first(&self.rankings)
    }
}

pub(crate) fn weakest_first(rankings: &[CardRanking]) -> Vec<CardRanking> {
    let mut sorted = rankings.to_vec();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    sorted
}

pub struct PlacementPlanner;

impl PlacementPlanner {
    /// Tries every hand card on every legal coordinate and keeps the first
    /// placement that beats a zero baseline.
    ///
    /// The played card stays in the hand while valuing, so the scoring odds
    /// are shared by every trial.
    pub fn best_play(state: &GameState, params: &BotParams) -> Result<PlacementDecision, DecisionError> {
        let hand = state.hand.cards();
        let first_card = *hand.first().ok_or(DecisionError::EmptyHand)?;
        let coords = state.tableau.legal_placements();
        let first_coord = *coords.iter().next().ok_or(DecisionError::NoPlacement)?;

        let valuator = StateValuator::new(state, &params.inference);
        let mut best_value = 0.0;
        let mut best = (first_card, first_coord);
        let mut best_per_card: Vec<Option<f64>> = vec![None; hand.len()];

        for &coord in &coords {
            for (slot, &card) in hand.iter().enumerate() {
                let Ok(trial) = state.tableau.with_card(coord, card) else {
                    continue;
                };
                let value = valuator.value_of(&trial);
                let entry = &mut best_per_card[slot];
                if entry.is_none_or(|current| value > current) {
                    *entry = Some(value);
                }
                if value > best_value {
                    best_value = value;
                    best = (card, coord);
                }
            }
        }

        let rankings: Vec<CardRanking> = hand
            .iter()
            .zip(best_per_card)
            .filter_map(|(&card, value)| value.map(|value| CardRanking { card, value }))
            .collect();
        if rankings.is_empty() {
            return Err(DecisionError::NoPlacement);
        }

        let decision = PlacementDecision {
            card: best.0,
            coord: best.1,
            value: best_value,
            rankings,
        };
        log_placement(state, &decision, coords.len());
        Ok(decision)
    }
}

fn log_placement(state: &GameState, decision: &PlacementDecision, coord_count: usize) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "arbor_bot::place",
        Level::DEBUG,
        turn = state.turn,
        hand_size = state.hand.len(),
        coords = coord_count,
        card = %decision.card,
        coord = %decision.coord,
        value = decision.value,
    );
}
