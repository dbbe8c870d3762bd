use super::state::{GameState, StateError};
use super::turn::TurnPhase;
use crate::model::card::Card;
use crate::model::coord::Coord;
use crate::model::hand::{Hand, OpponentHand};
use crate::model::tableau::{PlacementError, Tableau};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tableau as it travels on the wire: `{"x": {"y": ["J", 3]}}`.
pub type WireTableau = BTreeMap<String, BTreeMap<String, Card>>;

/// Game state in the line protocol's JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(default)]
    pub deck: usize,
    #[serde(default)]
    pub hand: Vec<Card>,
    #[serde(default)]
    pub discard: Vec<Card>,
    #[serde(default)]
    pub opponent_discard: Vec<Card>,
    #[serde(default)]
    pub play_area: WireTableau,
    #[serde(default)]
    pub opponent_play_area: WireTableau,
    #[serde(default)]
    pub opponent_hand: Vec<Option<Card>>,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub sub_turn: u8,
    #[serde(default = "default_active_turn")]
    pub active_turn: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_active_turn() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    BadCoordinate(String),
    BadSubTurn(u8),
    Placement(PlacementError),
    State(StateError),
}

impl StateSnapshot {
    pub fn capture(state: &GameState) -> Self {
        StateSnapshot {
            deck: state.deck_count,
            hand: state.hand.cards().to_vec(),
            discard: state.discard.clone(),
            opponent_discard: state.opponent_discard.clone(),
            play_area: wire_tableau(&state.tableau),
            opponent_play_area: wire_tableau(&state.opponent_tableau),
            opponent_hand: state.opponent_hand.slots().to_vec(),
            turn: state.turn,
            sub_turn: state.phase.sub_turn(),
            active_turn: true,
            message: None,
        }
    }

    pub fn restore(&self) -> Result<GameState, SnapshotError> {
        let phase =
            TurnPhase::from_sub_turn(self.sub_turn).ok_or(SnapshotError::BadSubTurn(self.sub_turn))?;
        let state = GameState {
            hand: Hand::with_cards(self.hand.clone()),
            tableau: parse_tableau(&self.play_area)?,
            discard: self.discard.clone(),
            opponent_hand: OpponentHand::new(self.opponent_hand.clone()),
            opponent_tableau: parse_tableau(&self.opponent_play_area)?,
            opponent_discard: self.opponent_discard.clone(),
            deck_count: self.deck,
            turn: self.turn,
            phase,
        };
        state.validate().map_err(SnapshotError::State)?;
        Ok(state)
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        serde_json::to_string(&Self::capture(state))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn wire_tableau(tableau: &Tableau) -> WireTableau {
    let mut wire = WireTableau::new();
    for (coord, card) in tableau.iter() {
        wire.entry(coord.x.to_string())
            .or_default()
            .insert(coord.y.to_string(), card);
    }
    wire
}

fn parse_tableau(wire: &WireTableau) -> Result<Tableau, SnapshotError> {
    let mut cells = Vec::new();
    for (x_key, column) in wire {
        let x = parse_axis(x_key)?;
        for (y_key, card) in column {
            let y = parse_axis(y_key)?;
            cells.push((Coord::new(x, y), *card));
        }
    }
    Tableau::from_cells(cells).map_err(SnapshotError::Placement)
}

fn parse_axis(raw: &str) -> Result<i32, SnapshotError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| SnapshotError::BadCoordinate(raw.to_string()))
}
