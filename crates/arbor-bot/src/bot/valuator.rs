use arbor_core::belief::{InferenceConfig, ScoringOdds};
use arbor_core::game::GameState;
use arbor_core::model::tableau::Tableau;
use arbor_core::scoring::total_species_scores;

/// Sum over species of our best path score, weighted by the probability the
/// opponent outholds us in that species.
pub fn weighted_value(state: &GameState) -> f64 {
    weighted_value_with(state, &InferenceConfig::default())
}

pub fn weighted_value_with(state: &GameState, config: &InferenceConfig) -> f64 {
    StateValuator::new(state, config).value_of(&state.tableau)
}

/// Scoring odds of one position, reusable across hypothetical tableaus that
/// leave the set of seen cards unchanged.
#[derive(Debug, Clone, Copy)]
pub struct StateValuator {
    odds: ScoringOdds,
}

impl StateValuator {
    pub fn new(state: &GameState, config: &InferenceConfig) -> Self {
        Self {
            odds: ScoringOdds::with_config(state, config),
        }
    }

    pub fn from_odds(odds: ScoringOdds) -> Self {
        Self { odds }
    }

    pub fn odds(&self) -> &ScoringOdds {
        &self.odds
    }

    pub fn value_of(&self, tableau: &Tableau) -> f64 {
        total_species_scores(tableau)
            .iter()
            .map(|(species, score)| score as f64 * self.odds.get(species))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{StateValuator, weighted_value};
    use arbor_core::belief::{InferenceConfig, ScoringOdds};
    use arbor_core::game::GameState;
    use arbor_core::model::card::Card;
    use arbor_core::model::coord::Coord;
    use arbor_core::model::hand::{Hand, OpponentHand};
    use arbor_core::model::rank::Rank;
    use arbor_core::model::species::Species;

    fn card(species: Species, rank: u8) -> Card {
        Card::new(species, Rank::from_value(rank).unwrap())
    }

    #[test]
    fn empty_and_single_card_tableaus_are_worth_nothing() {
        let mut state = GameState::opening(Hand::with_cards(vec![card(Species::Oak, 3)]), 7, 30);
        assert_eq!(weighted_value(&state), 0.0);
        state
            .tableau
            .place(Coord::ORIGIN, card(Species::Oak, 1))
            .unwrap();
        assert_eq!(weighted_value(&state), 0.0);
    }

    #[test]
    fn path_score_is_scaled_by_opponent_odds() {
        let o = Species::Oak;
        let mut state = GameState::opening(Hand::new(), 0, 0);
        state.opponent_hand = OpponentHand::new(vec![Some(card(o, 6))]);
        state.tableau.place(Coord::ORIGIN, card(o, 2)).unwrap();
        state.tableau.place(Coord::new(1, 0), card(o, 5)).unwrap();
        // Opponent certainly outholds our empty hand in Oak: weight 1.
        assert_eq!(weighted_value(&state), 2.0);

        state.hand.add(card(o, 7));
        assert_eq!(weighted_value(&state), 0.0);
    }

    #[test]
    fn valuator_reuses_odds_across_tableaus() {
        let state = GameState::opening(Hand::new(), 0, 0);
        let odds = ScoringOdds::with_config(&state, &InferenceConfig::default());
        let valuator = StateValuator::from_odds(odds);
        assert_eq!(valuator.value_of(&state.tableau), 0.0);
        assert_eq!(valuator.odds().get(Species::Willow), 0.0);
    }
}
