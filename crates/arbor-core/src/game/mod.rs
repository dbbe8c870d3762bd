pub mod round;
pub mod serialization;
pub mod state;
pub mod turn;

pub use round::{GameRound, STARTING_HAND_SIZE, TurnError};
pub use serialization::{SnapshotError, StateSnapshot};
pub use state::{GameState, StateError};
pub use turn::{DrawSource, Move, TurnPhase};
