use super::combinations::{binomial, for_each_combination, for_each_sampled_combination};
use crate::game::state::GameState;
use crate::model::card::Card;
use crate::model::hand::species_value;
use crate::model::species::Species;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Limits on the hidden-hand enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Largest combination count enumerated exhaustively.
    pub max_enumerated: u64,
    /// Number of random combinations drawn above that limit.
    pub samples: usize,
    pub seed: u64,
}

impl InferenceConfig {
    pub const DEFAULT_MAX_ENUMERATED: u64 = 20_000;
    pub const DEFAULT_SAMPLES: usize = 2_048;
    pub const DEFAULT_SEED: u64 = 0xA5B0_2E7E;
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_enumerated: Self::DEFAULT_MAX_ENUMERATED,
            samples: Self::DEFAULT_SAMPLES,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// How a probability was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate {
    /// Every combination was visited.
    Exact { combinations: u64 },
    Sampled { samples: usize },
    /// The opponent hides more cards than remain unseen.
    Impossible,
}

/// Probability, per species, that the opponent's hand outweighs ours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringOdds {
    odds: [f64; Species::COUNT],
    estimate: Estimate,
}

impl ScoringOdds {
    pub fn for_state(state: &GameState) -> Self {
        Self::with_config(state, &InferenceConfig::default())
    }

    /// Evaluates all species in one pass over the hidden-hand combinations.
    pub fn with_config(state: &GameState, config: &InferenceConfig) -> Self {
        let unseen = state.unseen_cards().to_vec();
        let hidden = state.opponent_hand.unknown_count();
        let total = binomial(unseen.len(), hidden);
        if total == 0 {
            return Self {
                odds: [0.0; Species::COUNT],
                estimate: Estimate::Impossible,
            };
        }

        let known_cards: Vec<Card> = state.opponent_hand.known_cards().collect();
        let mut ours = [0u32; Species::COUNT];
        let mut known = [0u32; Species::COUNT];
        for species in Species::ALL {
            ours[species.index()] = state.hand.species_value(species);
            known[species.index()] = species_value(&known_cards, species);
        }

        let mut wins = [0u64; Species::COUNT];
        let mut visited = 0u64;
        let mut tally = |combo: &[usize]| {
            let mut theirs = known;
            for &index in combo {
                let card = unseen[index];
                theirs[card.species.index()] += card.rank.value() as u32;
            }
            for slot in 0..Species::COUNT {
                if theirs[slot] > ours[slot] {
                    wins[slot] += 1;
                }
            }
            visited += 1;
        };

        let estimate = if total <= config.max_enumerated {
            for_each_combination(unseen.len(), hidden, &mut tally);
            Estimate::Exact {
                combinations: total,
            }
        } else {
            let mut rng = SmallRng::seed_from_u64(config.seed);
            for_each_sampled_combination(unseen.len(), hidden, config.samples, &mut rng, &mut tally);
            Estimate::Sampled {
                samples: config.samples,
            }
        };

        let mut odds = [0.0; Species::COUNT];
        if visited > 0 {
            for slot in 0..Species::COUNT {
                odds[slot] = wins[slot] as f64 / visited as f64;
            }
        }
        Self { odds, estimate }
    }

    pub fn get(&self, species: Species) -> f64 {
        self.odds[species.index()]
    }

    pub fn estimate(&self) -> Estimate {
        self.estimate
    }

    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        Species::ALL.iter().map(|&species| (species, self.get(species)))
    }
}

/// Probability that the opponent's holding in `species` strictly exceeds ours,
/// over every way the hidden slots could be filled from unseen cards.
pub fn scoring_probability(species: Species, state: &GameState) -> f64 {
    scoring_probability_with(species, state, &InferenceConfig::default())
}

pub fn scoring_probability_with(species: Species, state: &GameState, config: &InferenceConfig) -> f64 {
    ScoringOdds::with_config(state, config).get(species)
}

/// Chance that `card` sits in the opponent's hand.
pub fn card_in_opponent_hand_probability(card: Card, state: &GameState) -> f64 {
    if state.seen_outside_opponent_hand().contains(card) {
        return 0.0;
    }
    if state.opponent_hand.contains_known(card) {
        return 1.0;
    }
    let hidden = state.opponent_hand.unknown_count();
    let pool = state.deck_count + hidden;
    if pool == 0 {
        return 0.0;
    }
    hidden as f64 / pool as f64
}

#[cfg(test)]
mod tests {
    use super::{
        Estimate, InferenceConfig, ScoringOdds, card_in_opponent_hand_probability,
        scoring_probability, scoring_probability_with,
    };
    use crate::game::state::GameState;
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::coord::Coord;
    use crate::model::hand::{Hand, OpponentHand};
    use crate::model::rank::Rank;
    use crate::model::species::Species;

    fn card(species: Species, rank: u8) -> Card {
        Card::new(species, Rank::from_value(rank).unwrap())
    }

    /// Every card is visible except `unseen`, which the opponent may hold.
    fn endgame_state(hand: Vec<Card>, unseen: &[Card], hidden: usize) -> GameState {
        let mut state = GameState::opening(Hand::with_cards(hand), 0, 0);
        state.opponent_hand = OpponentHand::hidden(hidden);
        let visible = CardSet::from_cards(state.hand.iter())
            .union(CardSet::from_cards(unseen.iter()))
            .complement();
        state.discard = visible.to_vec();
        state
    }

    #[test]
    fn exhaustive_fraction_counts_strict_wins() {
        let o = Species::Oak;
        // We hold Oak 4. Opponent hides one of {O5, O2, W3}: only O5 beats us.
        let state = endgame_state(
            vec![card(o, 4)],
            &[card(o, 5), card(o, 2), card(Species::Willow, 3)],
            1,
        );
        let odds = ScoringOdds::for_state(&state);
        assert!((odds.get(o) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(odds.estimate(), Estimate::Exact { combinations: 3 });
        // Willow: we have 0; opponent wins whenever they hold W3.
        assert!((odds.get(Species::Willow) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(odds.get(Species::Cassia), 0.0);
    }

    #[test]
    fn more_hidden_slots_than_unseen_cards_is_zero() {
        let state = endgame_state(vec![card(Species::Maple, 1)], &[card(Species::Maple, 2)], 3);
        let odds = ScoringOdds::for_state(&state);
        assert_eq!(odds.estimate(), Estimate::Impossible);
        assert_eq!(scoring_probability(Species::Maple, &state), 0.0);
    }

    #[test]
    fn no_hidden_slots_compares_known_cards_only() {
        let mut state = GameState::opening(Hand::with_cards(vec![card(Species::Cassia, 3)]), 0, 10);
        state.opponent_hand = OpponentHand::new(vec![Some(card(Species::Cassia, 5))]);
        assert_eq!(scoring_probability(Species::Cassia, &state), 1.0);
        state.hand.add(card(Species::Cassia, 4));
        assert_eq!(scoring_probability(Species::Cassia, &state), 0.0);
    }

    #[test]
    fn probabilities_stay_within_bounds_when_sampling() {
        let mut state = GameState::opening(
            Hand::with_cards(vec![card(Species::Jacaranda, 4), card(Species::Willow, 6)]),
            7,
            30,
        );
        state
            .opponent_tableau
            .place(Coord::ORIGIN, card(Species::Oak, 8))
            .unwrap();
        let config = InferenceConfig {
            max_enumerated: 1_000,
            samples: 256,
            seed: 5,
        };
        let odds = ScoringOdds::with_config(&state, &config);
        assert_eq!(odds.estimate(), Estimate::Sampled { samples: 256 });
        for (species, p) in odds.iter() {
            assert!((0.0..=1.0).contains(&p), "{species}: {p}");
        }
        let again = scoring_probability_with(Species::Jacaranda, &state, &config);
        assert_eq!(again, odds.get(Species::Jacaranda));
    }

    #[test]
    fn card_location_probabilities() {
        let mut state = GameState::opening(Hand::with_cards(vec![card(Species::Oak, 1)]), 0, 12);
        state.opponent_hand = OpponentHand::new(vec![Some(card(Species::Willow, 2)), None, None, None]);
        state.discard.push(card(Species::Maple, 3));

        assert_eq!(card_in_opponent_hand_probability(card(Species::Oak, 1), &state), 0.0);
        assert_eq!(card_in_opponent_hand_probability(card(Species::Maple, 3), &state), 0.0);
        assert_eq!(card_in_opponent_hand_probability(card(Species::Willow, 2), &state), 1.0);
        let p = card_in_opponent_hand_probability(card(Species::Cassia, 6), &state);
        assert!((p - 3.0 / 15.0).abs() < 1e-12);

        state.opponent_hand = OpponentHand::new(Vec::new());
        state.deck_count = 0;
        assert_eq!(card_in_opponent_hand_probability(card(Species::Cassia, 6), &state), 0.0);
    }
}
