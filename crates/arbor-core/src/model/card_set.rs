use crate::model::card::{CARD_COUNT, Card};

/// Bit set over the 48 card identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardSet(u64);

impl CardSet {
    pub const EMPTY: CardSet = CardSet(0);
    pub const FULL: CardSet = CardSet((1u64 << CARD_COUNT) - 1);

    pub fn from_cards<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut set = CardSet::EMPTY;
        for card in cards {
            set.insert(*card);
        }
        set
    }

    pub fn insert(&mut self, card: Card) -> bool {
        let bit = 1u64 << card.id();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn remove(&mut self, card: Card) -> bool {
        let bit = 1u64 << card.id();
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub const fn contains(self, card: Card) -> bool {
        self.0 & (1u64 << card.id()) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    pub const fn difference(self, other: CardSet) -> CardSet {
        CardSet(self.0 & !other.0)
    }

    pub const fn complement(self) -> CardSet {
        CardSet(CardSet::FULL.0 & !self.0)
    }

    /// Cards in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = Card> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let id = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Card::from_id(id)
        })
    }

    pub fn to_vec(self) -> Vec<Card> {
        self.iter().collect()
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut set = CardSet::EMPTY;
        for card in iter {
            set.insert(card);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::CardSet;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::species::Species;

    #[test]
    fn insert_remove_and_contains() {
        let card = Card::new(Species::Oak, Rank::Five);
        let mut set = CardSet::EMPTY;
        assert!(set.insert(card));
        assert!(!set.insert(card));
        assert!(set.contains(card));
        assert_eq!(set.len(), 1);
        assert!(set.remove(card));
        assert!(set.is_empty());
    }

    #[test]
    fn complement_covers_the_rest_of_the_deck() {
        let seen: CardSet = [
            Card::new(Species::Jacaranda, Rank::One),
            Card::new(Species::Willow, Rank::Eight),
        ]
        .into_iter()
        .collect();
        let unseen = seen.complement();
        assert_eq!(unseen.len(), 46);
        assert!(!unseen.contains(Card::new(Species::Willow, Rank::Eight)));
        assert_eq!(unseen.union(seen), CardSet::FULL);
    }

    #[test]
    fn iterates_in_id_order() {
        let cards = CardSet::FULL.to_vec();
        assert_eq!(cards.len(), 48);
        assert!(cards.windows(2).all(|pair| pair[0].id() < pair[1].id()));
    }
}
