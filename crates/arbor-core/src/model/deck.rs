use crate::model::card::{CARD_COUNT, Card};
use crate::model::rank::Rank;
use crate::model::species::Species;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Draw pile. The top of the deck is the end of the vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(CARD_COUNT);
        for species in Species::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(species, rank));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card_set::CardSet;

    #[test]
    fn standard_deck_has_48_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), 48);
        assert_eq!(CardSet::from_cards(deck.cards()).len(), 48);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn draw_takes_from_the_top() {
        let mut deck = Deck::standard();
        let top = *deck.cards().last().unwrap();
        assert_eq!(deck.draw(), Some(top));
        assert_eq!(deck.len(), 47);
    }
}
