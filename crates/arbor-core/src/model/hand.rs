use crate::model::card::Card;
use crate::model::species::Species;
use serde::{Deserialize, Serialize};

/// Cards held by a player, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Sum of ranks held in `species`.
    pub fn species_value(&self, species: Species) -> u32 {
        species_value(self.cards.iter(), species)
    }
}

pub fn species_value<'a, I>(cards: I, species: Species) -> u32
where
    I: IntoIterator<Item = &'a Card>,
{
    cards
        .into_iter()
        .filter(|card| card.is_species(species))
        .map(|card| card.rank.value() as u32)
        .sum()
}

/// The opponent's hand as we observe it: some slots are known cards, the rest
/// are placeholders whose identity is hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpponentHand {
    slots: Vec<Option<Card>>,
}

impl OpponentHand {
    pub fn new(slots: Vec<Option<Card>>) -> Self {
        Self { slots }
    }

    pub fn hidden(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    /// A hand with every slot known, as when viewing our own cards from the
    /// other side of the table.
    pub fn fully_known(hand: &Hand) -> Self {
        Self {
            slots: hand.iter().copied().map(Some).collect(),
        }
    }

    pub fn slots(&self) -> &[Option<Card>] {
        &self.slots
    }

    pub fn known_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    pub fn unknown_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn contains_known(&self, card: Card) -> bool {
        self.slots.contains(&Some(card))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn to_known_hand(&self) -> Hand {
        Hand::with_cards(self.known_cards().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Hand, OpponentHand};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::species::Species;

    #[test]
    fn add_and_remove_cards_keeps_order() {
        let mut hand = Hand::new();
        let first = Card::new(Species::Willow, Rank::Three);
        let second = Card::new(Species::Cassia, Rank::One);
        hand.add(first);
        hand.add(second);
        assert_eq!(hand.cards(), &[first, second]);
        assert!(hand.remove(first));
        assert!(!hand.contains(first));
        assert!(!hand.remove(first));
    }

    #[test]
    fn species_value_sums_matching_ranks() {
        let hand = Hand::with_cards(vec![
            Card::new(Species::Oak, Rank::Two),
            Card::new(Species::Oak, Rank::Seven),
            Card::new(Species::Maple, Rank::Eight),
        ]);
        assert_eq!(hand.species_value(Species::Oak), 9);
        assert_eq!(hand.species_value(Species::Willow), 0);
    }

    #[test]
    fn opponent_hand_separates_known_and_hidden_slots() {
        let known = Card::new(Species::Jacaranda, Rank::Four);
        let hand = OpponentHand::new(vec![None, Some(known), None]);
        assert_eq!(hand.unknown_count(), 2);
        assert!(hand.contains_known(known));
        assert_eq!(hand.known_cards().collect::<Vec<_>>(), vec![known]);
    }

    #[test]
    fn opponent_hand_decodes_null_placeholders() {
        let hand: OpponentHand = serde_json::from_str(r#"[null, ["R", 8]]"#).unwrap();
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.unknown_count(), 1);
    }
}
