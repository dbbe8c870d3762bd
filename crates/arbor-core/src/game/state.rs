use crate::game::turn::TurnPhase;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::hand::{Hand, OpponentHand};
use crate::model::tableau::Tableau;

/// Everything one player can observe when asked for a decision.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub hand: Hand,
    pub tableau: Tableau,
    pub discard: Vec<Card>,
    pub opponent_hand: OpponentHand,
    pub opponent_tableau: Tableau,
    pub opponent_discard: Vec<Card>,
    pub deck_count: usize,
    pub turn: u32,
    pub phase: TurnPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    DuplicateCard(Card),
}

impl GameState {
    /// Opening position with nothing on the table.
    pub fn opening(hand: Hand, opponent_hand_size: usize, deck_count: usize) -> Self {
        Self {
            hand,
            tableau: Tableau::new(),
            discard: Vec::new(),
            opponent_hand: OpponentHand::hidden(opponent_hand_size),
            opponent_tableau: Tableau::new(),
            opponent_discard: Vec::new(),
            deck_count,
            turn: 0,
            phase: TurnPhase::FirstDraw,
        }
    }

    /// Cards whose location is public or ours: both hands' known cards, both
    /// discard piles and both tableaus.
    pub fn seen_cards(&self) -> CardSet {
        self.seen_outside_opponent_hand()
            .union(self.opponent_hand.known_cards().collect())
    }

    pub fn seen_outside_opponent_hand(&self) -> CardSet {
        let mut seen = CardSet::from_cards(self.hand.iter());
        for card in self
            .discard
            .iter()
            .chain(self.opponent_discard.iter())
            .copied()
            .chain(self.tableau.cards())
            .chain(self.opponent_tableau.cards())
        {
            seen.insert(card);
        }
        seen
    }

    /// Cards that are either still in the deck or hidden in the opponent's hand.
    pub fn unseen_cards(&self) -> CardSet {
        self.seen_cards().complement()
    }

    pub fn top_discard(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn top_opponent_discard(&self) -> Option<Card> {
        self.opponent_discard.last().copied()
    }

    /// The same position seen from across the table. Our hand becomes a fully
    /// known opponent hand; the opponent's known cards become the hand.
    pub fn swapped(&self) -> GameState {
        GameState {
            hand: self.opponent_hand.to_known_hand(),
            tableau: self.opponent_tableau.clone(),
            discard: self.opponent_discard.clone(),
            opponent_hand: OpponentHand::fully_known(&self.hand),
            opponent_tableau: self.tableau.clone(),
            opponent_discard: self.discard.clone(),
            deck_count: self.deck_count,
            turn: self.turn,
            phase: self.phase,
        }
    }

    /// Checks that no card is observed in two places.
    pub fn validate(&self) -> Result<(), StateError> {
        let mut seen = CardSet::EMPTY;
        let all = self
            .hand
            .iter()
            .copied()
            .chain(self.opponent_hand.known_cards())
            .chain(self.discard.iter().copied())
            .chain(self.opponent_discard.iter().copied())
            .chain(self.tableau.cards())
            .chain(self.opponent_tableau.cards());
        for card in all {
            if !seen.insert(card) {
                return Err(StateError::DuplicateCard(card));
            }
        }
        Ok(())
    }
}
