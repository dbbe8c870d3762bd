use super::{BotParams, StateValuator};
use arbor_core::game::{DrawSource, GameState};
use arbor_core::model::card::Card;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawDecision {
    pub source: DrawSource,
    /// Value of every source that was available.
    pub values: Vec<(DrawSource, f64)>,
}

pub struct DrawPlanner;

impl DrawPlanner {
    pub fn choose(state: &GameState, params: &BotParams) -> DrawSource {
        Self::evaluate(state, params).source
    }

    /// Values each visible pile top by its best placement on our tableau and
    /// the deck by a sample of unseen cards. The deck wins ties.
    pub fn evaluate(state: &GameState, params: &BotParams) -> DrawDecision {
        let mut values = Vec::with_capacity(DrawSource::ALL.len());

        if state.deck_count > 0 {
            values.push((DrawSource::Deck, deck_value(state, params)));
        }
        let piles = [
            (DrawSource::OwnDiscard, &state.discard),
            (DrawSource::OpponentDiscard, &state.opponent_discard),
        ];
        for (source, pile) in piles {
            if let Some(&top) = pile.last() {
                let mut after = state.clone();
                match source {
                    DrawSource::OwnDiscard => after.discard.pop(),
                    _ => after.opponent_discard.pop(),
                };
                values.push((source, card_value(&after, top, params)));
            }
        }

        let mut source = DrawSource::Deck;
        let mut best = f64::NEG_INFINITY;
        for &(candidate, value) in &values {
            if value > best {
                best = value;
                source = candidate;
            }
        }

        let decision = DrawDecision { source, values };
        log_draw(state, &decision);
        decision
    }
}

/// Best weighted value of `card` over every legal coordinate of our tableau.
fn card_value(state: &GameState, card: Card, params: &BotParams) -> f64 {
    let coords = state.tableau.legal_placements();
    let mut best: Option<f64> = None;
    let mut valuator: Option<StateValuator> = None;
    for coord in coords {
        let Ok(tableau) = state.tableau.with_card(coord, card) else {
            continue;
        };
        // Placing the card makes it seen; odds are shared by every coordinate.
        let valuator = valuator.get_or_insert_with(|| {
            let mut trial = state.clone();
            trial.tableau = tableau.clone();
            StateValuator::new(&trial, &params.inference)
        });
        let value = valuator.value_of(&tableau);
        if best.is_none_or(|current| value > current) {
            best = Some(value);
        }
    }
    best.unwrap_or(0.0)
}

/// Mean best value over a sample of unseen cards, scaled down by the sample
/// size.
fn deck_value(state: &GameState, params: &BotParams) -> f64 {
    let coord_count = state.tableau.legal_placements().len().max(1);
    let sample_size = (params.draw_sample_budget / coord_count).max(1);

    let mut unseen = state.unseen_cards().to_vec();
    let mut rng = SmallRng::seed_from_u64(params.draw_seed ^ state.turn as u64);
    unseen.shuffle(&mut rng);
    unseen.truncate(sample_size);
    if unseen.is_empty() {
        return 0.0;
    }

    let total: f64 = unseen
        .iter()
        .map(|&card| card_value(state, card, params))
        .sum();
    let count = unseen.len() as f64;
    (total / count) / count
}

fn log_draw(state: &GameState, decision: &DrawDecision) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let values = decision
        .values
        .iter()
        .map(|(source, value)| format!("{source}:{value:.2}"))
        .collect::<Vec<_>>()
        .join(",");
    event!(
        target: "arbor_bot::draw",
        Level::DEBUG,
        turn = state.turn,
        deck = state.deck_count,
        values = %values,
        chosen = %decision.source,
    );
}

#[cfg(test)]
mod tests {
    use super::DrawPlanner;
    use crate::bot::BotParams;
    use arbor_core::game::{DrawSource, GameState};
    use arbor_core::model::card::Card;
    use arbor_core::model::coord::Coord;
    use arbor_core::model::hand::{Hand, OpponentHand};
    use arbor_core::model::rank::Rank;
    use arbor_core::model::species::Species;

    fn card(species: Species, rank: u8) -> Card {
        Card::new(species, Rank::from_value(rank).unwrap())
    }

    #[test]
    fn deck_is_the_default_when_nothing_is_visible() {
        let state = GameState::opening(Hand::with_cards(vec![card(Species::Oak, 3)]), 7, 30);
        let decision = DrawPlanner::evaluate(&state, &BotParams::default());
        assert_eq!(decision.source, DrawSource::Deck);
        assert_eq!(decision.values.len(), 1);
    }

    #[test]
    fn takes_a_discard_that_completes_a_contested_path() {
        let o = Species::Oak;
        let mut state = GameState::opening(Hand::with_cards(vec![card(Species::Cassia, 1)]), 0, 20);
        state.opponent_hand = OpponentHand::new(vec![Some(card(o, 7)), Some(card(o, 6))]);
        state.tableau.place(Coord::ORIGIN, card(o, 1)).unwrap();
        state.opponent_discard.push(card(o, 8));
        state.discard.push(card(Species::Willow, 2));

        let decision = DrawPlanner::evaluate(&state, &BotParams::default());
        assert_eq!(decision.values.len(), 3);
        assert_eq!(decision.source, DrawSource::OpponentDiscard);
        let top = decision
            .values
            .iter()
            .find(|(source, _)| *source == DrawSource::OpponentDiscard)
            .map(|(_, value)| *value)
            .unwrap();
        // Oak 1 then Oak 8: two cards, start and end bonuses.
        assert_eq!(top, 5.0);
    }

    #[test]
    fn empty_deck_is_never_chosen() {
        let mut state = GameState::opening(Hand::new(), 0, 0);
        state.discard.push(card(Species::Maple, 4));
        let decision = DrawPlanner::evaluate(&state, &BotParams::default());
        assert_eq!(decision.source, DrawSource::OwnDiscard);
        assert!(decision.values.iter().all(|(source, _)| *source != DrawSource::Deck));
    }
}
