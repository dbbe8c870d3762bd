use super::place::weakest_first;
use super::{BotParams, CardRanking, DecisionError, PlacementPlanner, StateValuator};
use arbor_core::game::GameState;
use arbor_core::model::card::Card;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq)]
pub struct DiscardDecision {
    pub card: Card,
    /// Best weighted value the opponent reaches by placing the chosen card.
    pub opponent_value: f64,
    /// Every candidate tested, weakest of ours first.
    pub candidates: Vec<(Card, f64)>,
}

pub struct DiscardPlanner;

impl DiscardPlanner {
    pub fn choose(
        state: &GameState,
        rankings: Option<&[CardRanking]>,
        params: &BotParams,
    ) -> Result<Card, DecisionError> {
        Self::evaluate(state, rankings, params).map(|decision| decision.card)
    }

    /// Takes our weakest cards and discards the one the opponent would gain
    /// least from. Rankings that are missing or no longer match the hand are
    /// recomputed.
    pub fn evaluate(
        state: &GameState,
        rankings: Option<&[CardRanking]>,
        params: &BotParams,
    ) -> Result<DiscardDecision, DecisionError> {
        if state.hand.is_empty() {
            return Err(DecisionError::EmptyHand);
        }

        let usable: Vec<CardRanking> = rankings
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|ranking| state.hand.contains(ranking.card))
            .collect();
        let ordered = if usable.is_empty() {
            PlacementPlanner::best_play(state, params)?.weakest_first()
        } else {
            weakest_first(&usable)
        };

        let theirs = state.swapped();
        let valuator = StateValuator::new(&theirs, &params.inference);
        let coords = theirs.tableau.legal_placements();

        let mut candidates = Vec::new();
        let mut chosen: Option<(Card, f64)> = None;
        for ranking in ordered.iter().take(params.discard_candidates.max(1)) {
            let card = ranking.card;
            let mut opponent_best: f64 = 0.0;
            for &coord in &coords {
                if let Ok(trial) = theirs.tableau.with_card(coord, card) {
                    opponent_best = opponent_best.max(valuator.value_of(&trial));
                }
            }
            candidates.push((card, opponent_best));
            if chosen.is_none_or(|(_, value)| opponent_best < value) {
                chosen = Some((card, opponent_best));
            }
        }

        let (card, opponent_value) = chosen.ok_or(DecisionError::EmptyHand)?;
        let decision = DiscardDecision {
            card,
            opponent_value,
            candidates,
        };
        log_discard(state, &decision);
        Ok(decision)
    }
}

fn log_discard(state: &GameState, decision: &DiscardDecision) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let preview = decision
        .candidates
        .iter()
        .map(|(card, value)| format!("{card}:{value:.2}"))
        .collect::<Vec<_>>()
        .join(",");
    event!(
        target: "arbor_bot::discard",
        Level::DEBUG,
        turn = state.turn,
        hand_size = state.hand.len(),
        candidates = %preview,
        chosen = %decision.card,
        opponent_value = decision.opponent_value,
    );
}

#[cfg(test)]
mod tests {
    use super::DiscardPlanner;
    use crate::bot::{BotParams, CardRanking, DecisionError};
    use arbor_core::game::GameState;
    use arbor_core::model::card::Card;
    use arbor_core::model::coord::Coord;
    use arbor_core::model::hand::Hand;
    use arbor_core::model::rank::Rank;
    use arbor_core::model::species::Species;

    fn card(species: Species, rank: u8) -> Card {
        Card::new(species, Rank::from_value(rank).unwrap())
    }

    #[test]
    fn empty_hand_is_an_error() {
        let state = GameState::opening(Hand::new(), 7, 30);
        assert_eq!(
            DiscardPlanner::choose(&state, None, &BotParams::default()),
            Err(DecisionError::EmptyHand)
        );
    }

    #[test]
    fn withholds_the_card_that_extends_the_opponent_path() {
        let w = Species::Willow;
        let helpful = card(w, 8);
        let harmless = card(Species::Maple, 3);
        let mut state = GameState::opening(Hand::with_cards(vec![helpful, harmless]), 0, 0);
        state.opponent_tableau.place(Coord::ORIGIN, card(w, 2)).unwrap();

        // Equal rankings: both cards are candidates, hand order breaks ties.
        let rankings = [
            CardRanking { card: helpful, value: 0.0 },
            CardRanking { card: harmless, value: 0.0 },
        ];
        let decision = DiscardPlanner::evaluate(&state, Some(&rankings), &BotParams::default()).unwrap();
        assert_eq!(decision.card, harmless);
        assert_eq!(decision.candidates.len(), 2);
        // W2 then W8 scores 2 + 2, and our hand of W8 outweighs their empty
        // Willow holding from their side of the table.
        assert_eq!(decision.candidates[0], (helpful, 4.0));
        assert_eq!(decision.candidates[1], (harmless, 0.0));
    }

    #[test]
    fn missing_or_stale_rankings_are_recomputed() {
        let hand = vec![card(Species::Oak, 2), card(Species::Cassia, 6)];
        let state = GameState::opening(Hand::with_cards(hand.clone()), 7, 30);
        let stale = [CardRanking { card: card(Species::Jacaranda, 1), value: 0.0 }];
        let params = BotParams::default();
        let from_none = DiscardPlanner::choose(&state, None, &params).unwrap();
        let from_stale = DiscardPlanner::choose(&state, Some(&stale), &params).unwrap();
        assert_eq!(from_none, from_stale);
        assert!(hand.contains(&from_none));
    }

    #[test]
    fn only_the_weakest_candidates_are_considered() {
        let hand: Vec<Card> = (1..=6).map(|rank| card(Species::Jacaranda, rank)).collect();
        let state = GameState::opening(Hand::with_cards(hand.clone()), 7, 30);
        let rankings: Vec<CardRanking> = hand
            .iter()
            .enumerate()
            .map(|(i, &card)| CardRanking { card, value: 10.0 - i as f64 })
            .collect();
        let decision = DiscardPlanner::evaluate(&state, Some(&rankings), &BotParams::default()).unwrap();
        assert_eq!(decision.candidates.len(), 4);
        let tested: Vec<Card> = decision.candidates.iter().map(|(card, _)| *card).collect();
        assert_eq!(tested, vec![hand[5], hand[4], hand[3], hand[2]]);
    }
}
