use super::state::GameState;
use super::turn::{DrawSource, Move, TurnPhase};
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::coord::Coord;
use crate::model::deck::Deck;
use crate::model::hand::{Hand, OpponentHand};
use crate::model::seat::Seat;
use crate::model::tableau::{PlacementError, Tableau};
use crate::scoring::final_scores;
use std::array;

pub const STARTING_HAND_SIZE: usize = 7;

/// Authoritative two-player game: the full deck, both hands and every pile.
#[derive(Debug, Clone)]
pub struct GameRound {
    deck: Deck,
    hands: [Hand; 2],
    tableaus: [Tableau; 2],
    discards: [Vec<Card>; 2],
    /// Cards each seat holds that the other seat saw it pick up.
    revealed: [CardSet; 2],
    to_move: Seat,
    phase: TurnPhase,
    turn: u32,
    finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    GameOver,
    OutOfTurn { expected: Seat, actual: Seat },
    WrongPhase { expected: TurnPhase, actual: TurnPhase },
    EmptyPile(DrawSource),
    /// A draw was skipped while some pile still had cards.
    DrawAvailable,
    CardNotInHand(Card),
    Placement(PlacementError),
}

impl GameRound {
    pub fn deal(mut deck: Deck, starting_player: Seat) -> Self {
        let mut hands = array::from_fn(|_| Hand::new());
        let mut seat = starting_player;
        for _ in 0..STARTING_HAND_SIZE * 2 {
            if let Some(card) = deck.draw() {
                hands[seat.index()].add(card);
            }
            seat = seat.other();
        }
        Self {
            deck,
            hands,
            tableaus: array::from_fn(|_| Tableau::new()),
            discards: array::from_fn(|_| Vec::new()),
            revealed: [CardSet::EMPTY; 2],
            to_move: starting_player,
            phase: TurnPhase::FirstDraw,
            turn: 0,
            finished: false,
        }
    }

    pub fn with_seed(seed: u64, starting_player: Seat) -> Self {
        Self::deal(Deck::shuffled_with_seed(seed), starting_player)
    }

    pub fn to_move(&self) -> Seat {
        self.to_move
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn tableau(&self, seat: Seat) -> &Tableau {
        &self.tableaus[seat.index()]
    }

    pub fn discard_pile(&self, seat: Seat) -> &[Card] {
        &self.discards[seat.index()]
    }

    /// Piles `seat` may draw from right now.
    pub fn draw_sources(&self, seat: Seat) -> Vec<DrawSource> {
        DrawSource::ALL
            .into_iter()
            .filter(|source| match source {
                DrawSource::Deck => !self.deck.is_empty(),
                DrawSource::OwnDiscard => !self.discards[seat.index()].is_empty(),
                DrawSource::OpponentDiscard => !self.discards[seat.other().index()].is_empty(),
            })
            .collect()
    }

    pub fn draw(&mut self, seat: Seat, source: DrawSource) -> Result<Card, TurnError> {
        self.check_turn(seat)?;
        if !self.phase.is_draw() {
            return Err(TurnError::WrongPhase {
                expected: TurnPhase::FirstDraw,
                actual: self.phase,
            });
        }
        let card = match source {
            DrawSource::Deck => self.deck.draw(),
            DrawSource::OwnDiscard => self.discards[seat.index()].pop(),
            DrawSource::OpponentDiscard => self.discards[seat.other().index()].pop(),
        }
        .ok_or(TurnError::EmptyPile(source))?;

        if source != DrawSource::Deck {
            self.revealed[seat.index()].insert(card);
        }
        self.hands[seat.index()].add(card);
        self.advance_phase();
        Ok(card)
    }

    /// Passes a draw when the deck and both discard piles are empty.
    pub fn skip_draw(&mut self, seat: Seat) -> Result<(), TurnError> {
        self.check_turn(seat)?;
        if !self.phase.is_draw() {
            return Err(TurnError::WrongPhase {
                expected: TurnPhase::FirstDraw,
                actual: self.phase,
            });
        }
        if !self.draw_sources(seat).is_empty() {
            return Err(TurnError::DrawAvailable);
        }
        self.advance_phase();
        Ok(())
    }

    pub fn place(&mut self, seat: Seat, card: Card, coord: Coord) -> Result<(), TurnError> {
        self.check_turn(seat)?;
        self.expect_phase(TurnPhase::Place)?;
        if !self.hands[seat.index()].contains(card) {
            return Err(TurnError::CardNotInHand(card));
        }
        self.tableaus[seat.index()]
            .place(coord, card)
            .map_err(TurnError::Placement)?;
        self.hands[seat.index()].remove(card);
        self.revealed[seat.index()].remove(card);
        self.advance_phase();
        Ok(())
    }

    pub fn discard(&mut self, seat: Seat, card: Card) -> Result<(), TurnError> {
        self.check_turn(seat)?;
        self.expect_phase(TurnPhase::Discard)?;
        if !self.hands[seat.index()].remove(card) {
            return Err(TurnError::CardNotInHand(card));
        }
        self.revealed[seat.index()].remove(card);
        self.discards[seat.index()].push(card);
        self.end_turn();
        Ok(())
    }

    /// Placement followed by discard.
    pub fn apply_move(&mut self, seat: Seat, mv: Move) -> Result<(), TurnError> {
        self.place(seat, mv.play, mv.coord)?;
        self.discard(seat, mv.discard)
    }

    /// What `seat` is allowed to know about the game.
    pub fn view_for(&self, seat: Seat) -> GameState {
        let other = seat.other();
        let revealed = self.revealed[other.index()];
        let opponent_slots = self.hands[other.index()]
            .iter()
            .map(|&card| revealed.contains(card).then_some(card))
            .collect();
        GameState {
            hand: self.hands[seat.index()].clone(),
            tableau: self.tableaus[seat.index()].clone(),
            discard: self.discards[seat.index()].clone(),
            opponent_hand: OpponentHand::new(opponent_slots),
            opponent_tableau: self.tableaus[other.index()].clone(),
            opponent_discard: self.discards[other.index()].clone(),
            deck_count: self.deck.len(),
            turn: self.turn,
            phase: self.phase,
        }
    }

    /// Final totals after right-to-score resolution.
    pub fn final_scores(&self) -> [u32; 2] {
        final_scores(
            [&self.tableaus[0], &self.tableaus[1]],
            [&self.hands[0], &self.hands[1]],
        )
    }

    /// `None` on a tie.
    pub fn winner(&self) -> Option<Seat> {
        let [first, second] = self.final_scores();
        match first.cmp(&second) {
            std::cmp::Ordering::Greater => Some(Seat::First),
            std::cmp::Ordering::Less => Some(Seat::Second),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn check_turn(&self, seat: Seat) -> Result<(), TurnError> {
        if self.finished {
            return Err(TurnError::GameOver);
        }
        if seat != self.to_move {
            return Err(TurnError::OutOfTurn {
                expected: self.to_move,
                actual: seat,
            });
        }
        Ok(())
    }

    fn expect_phase(&self, expected: TurnPhase) -> Result<(), TurnError> {
        if self.phase != expected {
            return Err(TurnError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn advance_phase(&mut self) {
        if let Some(next) = self.phase.next() {
            self.phase = next;
        }
    }

    fn end_turn(&mut self) {
        // The game ends once the player who drew the last deck card finishes.
        if self.deck.is_empty() {
            self.finished = true;
            return;
        }
        self.to_move = self.to_move.other();
        self.phase = TurnPhase::FirstDraw;
        self.turn += 1;
    }
}
