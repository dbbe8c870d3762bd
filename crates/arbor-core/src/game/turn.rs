use crate::model::card::Card;
use crate::model::coord::Coord;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Sub-turn a player is in. A turn is two draws, one placement, one discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    FirstDraw,
    SecondDraw,
    Place,
    Discard,
}

impl TurnPhase {
    pub const fn from_sub_turn(sub_turn: u8) -> Option<Self> {
        match sub_turn {
            0 => Some(TurnPhase::FirstDraw),
            1 => Some(TurnPhase::SecondDraw),
            2 => Some(TurnPhase::Place),
            3 => Some(TurnPhase::Discard),
            _ => None,
        }
    }

    pub const fn sub_turn(self) -> u8 {
        match self {
            TurnPhase::FirstDraw => 0,
            TurnPhase::SecondDraw => 1,
            TurnPhase::Place => 2,
            TurnPhase::Discard => 3,
        }
    }

    pub const fn is_draw(self) -> bool {
        matches!(self, TurnPhase::FirstDraw | TurnPhase::SecondDraw)
    }

    pub const fn next(self) -> Option<TurnPhase> {
        match self {
            TurnPhase::FirstDraw => Some(TurnPhase::SecondDraw),
            TurnPhase::SecondDraw => Some(TurnPhase::Place),
            TurnPhase::Place => Some(TurnPhase::Discard),
            TurnPhase::Discard => None,
        }
    }
}

/// Where a drawn card comes from, relative to the drawing player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Deck,
    OwnDiscard,
    OpponentDiscard,
}

impl DrawSource {
    pub const ALL: [DrawSource; 3] = [
        DrawSource::Deck,
        DrawSource::OwnDiscard,
        DrawSource::OpponentDiscard,
    ];

    /// Numeric code used by the line protocol.
    pub const fn code(self) -> u8 {
        match self {
            DrawSource::Deck => 0,
            DrawSource::OwnDiscard => 1,
            DrawSource::OpponentDiscard => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DrawSource::Deck),
            1 => Some(DrawSource::OwnDiscard),
            2 => Some(DrawSource::OpponentDiscard),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DrawSource::Deck => "deck",
            DrawSource::OwnDiscard => "own_discard",
            DrawSource::OpponentDiscard => "opponent_discard",
        }
    }
}

impl fmt::Display for DrawSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn's complete action after drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub play: Card,
    pub coord: Coord,
    pub discard: Card,
}

impl Move {
    pub const fn new(play: Card, coord: Coord, discard: Card) -> Self {
        Self {
            play,
            coord,
            discard,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "play {} at {} discard {}",
            self.play, self.coord, self.discard
        )
    }
}
