use super::{Policy, PolicyContext};
use crate::bot::DecisionError;
use arbor_core::game::DrawSource;
use arbor_core::model::card::Card;
use arbor_core::model::coord::Coord;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};

/// Uniformly random legal choices.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_draw(&mut self, ctx: &PolicyContext) -> DrawSource {
        let state = ctx.state;
        let available: Vec<DrawSource> = DrawSource::ALL
            .into_iter()
            .filter(|source| match source {
                DrawSource::Deck => state.deck_count > 0,
                DrawSource::OwnDiscard => !state.discard.is_empty(),
                DrawSource::OpponentDiscard => !state.opponent_discard.is_empty(),
            })
            .collect();
        available
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(DrawSource::Deck)
    }

    fn choose_placement(&mut self, ctx: &PolicyContext) -> Result<(Card, Coord), DecisionError> {
        let card = *ctx
            .state
            .hand
            .cards()
            .choose(&mut self.rng)
            .ok_or(DecisionError::EmptyHand)?;
        let coord = ctx
            .state
            .tableau
            .legal_placements()
            .into_iter()
            .choose(&mut self.rng)
            .ok_or(DecisionError::NoPlacement)?;
        Ok((card, coord))
    }

    fn choose_discard(&mut self, ctx: &PolicyContext) -> Result<Card, DecisionError> {
        ctx.state
            .hand
            .cards()
            .choose(&mut self.rng)
            .copied()
            .ok_or(DecisionError::EmptyHand)
    }
}

#[cfg(test)]
mod tests {
    use super::RandomPolicy;
    use crate::bot::{BotParams, DecisionError};
    use crate::policy::{Policy, PolicyContext};
    use arbor_core::game::{DrawSource, GameState};
    use arbor_core::model::card::Card;
    use arbor_core::model::coord::Coord;
    use arbor_core::model::hand::Hand;
    use arbor_core::model::rank::Rank;
    use arbor_core::model::species::Species;

    #[test]
    fn choices_are_legal() {
        let hand = vec![
            Card::new(Species::Cassia, Rank::Two),
            Card::new(Species::Oak, Rank::Seven),
        ];
        let state = GameState::opening(Hand::with_cards(hand.clone()), 7, 0);
        let params = BotParams::default();
        let ctx = PolicyContext::new(&state, &params);
        let mut policy = RandomPolicy::with_seed(12);

        // Nothing to draw from at all: the deck is reported.
        assert_eq!(policy.choose_draw(&ctx), DrawSource::Deck);
        let (card, coord) = policy.choose_placement(&ctx).unwrap();
        assert!(hand.contains(&card));
        assert_eq!(coord, Coord::ORIGIN);
        assert!(hand.contains(&policy.choose_discard(&ctx).unwrap()));
    }

    #[test]
    fn empty_hand_is_an_error() {
        let state = GameState::opening(Hand::new(), 7, 20);
        let params = BotParams::default();
        let mut policy = RandomPolicy::with_seed(3);
        assert_eq!(
            policy.choose_placement(&PolicyContext::new(&state, &params)),
            Err(DecisionError::EmptyHand)
        );
    }
}
