//! Determinized game state used inside the search, and random playouts.

use arbor_core::game::{GameState, Move};
use arbor_core::model::card::Card;
use arbor_core::model::hand::Hand;
use arbor_core::model::seat::Seat;
use arbor_core::model::tableau::{PlacementError, Tableau};
use arbor_core::scoring::raw_tableau_value;
use rand::Rng;
use rand::seq::SliceRandom;

pub const DRAWS_PER_TURN: usize = 2;

/// One sampled world: both hands, both tableaus and a concrete deck order.
/// The searching player always sits in `Seat::First`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    hands: [Hand; 2],
    tableaus: [Tableau; 2],
    deck: Vec<Card>,
    to_move: Seat,
    finished: bool,
}

impl SearchState {
    pub const ROOT_SEAT: Seat = Seat::First;

    /// Fills the deck with a random arrangement of unseen cards. Hidden
    /// opponent cards are left out of the opponent's hand.
    pub fn determinize<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Self {
        let mut deck = state.unseen_cards().to_vec();
        deck.shuffle(rng);
        deck.truncate(state.deck_count);
        let hands = [state.hand.clone(), state.opponent_hand.to_known_hand()];
        let finished = hands[Self::ROOT_SEAT.index()].len() < 2;
        Self {
            hands,
            tableaus: [state.tableau.clone(), state.opponent_tableau.clone()],
            deck,
            to_move: Self::ROOT_SEAT,
            finished,
        }
    }

    pub fn to_move(&self) -> Seat {
        self.to_move
    }

    pub fn is_terminal(&self) -> bool {
        self.finished
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn tableau(&self, seat: Seat) -> &Tableau {
        &self.tableaus[seat.index()]
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Every (play, coordinate, discard) for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.finished {
            return Vec::new();
        }
        let hand = self.hands[self.to_move.index()].cards();
        let coords = self.tableaus[self.to_move.index()].legal_placements();
        let mut moves = Vec::with_capacity(hand.len() * coords.len() * hand.len().saturating_sub(1));
        for (i, &play) in hand.iter().enumerate() {
            for &coord in &coords {
                for (j, &discard) in hand.iter().enumerate() {
                    if i != j {
                        moves.push(Move::new(play, coord, discard));
                    }
                }
            }
        }
        moves
    }

    /// Plays `mv` for the side to move, then hands the turn over and draws
    /// for the next mover. The game ends once the deck is exhausted.
    pub fn apply(&mut self, mv: Move) -> Result<(), PlacementError> {
        let seat = self.to_move.index();
        self.tableaus[seat].place(mv.coord, mv.play)?;
        self.hands[seat].remove(mv.play);
        self.hands[seat].remove(mv.discard);

        if self.deck.is_empty() {
            self.finished = true;
            return Ok(());
        }
        self.to_move = self.to_move.other();
        let next = self.to_move.index();
        for _ in 0..DRAWS_PER_TURN {
            if let Some(card) = self.deck.pop() {
                self.hands[next].add(card);
            }
        }
        if self.hands[next].len() < 2 {
            self.finished = true;
        }
        Ok(())
    }

    /// Raw tableau value of `seat` minus that of the other seat.
    pub fn score_difference(&self, seat: Seat) -> f64 {
        let ours = raw_tableau_value(&self.tableaus[seat.index()]) as f64;
        let theirs = raw_tableau_value(&self.tableaus[seat.other().index()]) as f64;
        ours - theirs
    }
}

/// Plays uniformly random moves until the game ends.
pub fn random_playout<R: Rng + ?Sized>(state: &mut SearchState, rng: &mut R) {
    while !state.is_terminal() {
        let seat = state.to_move();
        let hand = state.hand(seat).cards();
        let play_index = rng.gen_range(0..hand.len());
        let play = hand[play_index];
        let mut discard_index = rng.gen_range(0..hand.len() - 1);
        if discard_index >= play_index {
            discard_index += 1;
        }
        let discard = hand[discard_index];
        let coords: Vec<_> = state.tableau(seat).legal_placements().into_iter().collect();
        let Some(&coord) = coords.choose(rng) else {
            break;
        };
        if state.apply(Move::new(play, coord, discard)).is_err() {
            break;
        }
    }
}
