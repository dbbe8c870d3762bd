use thiserror::Error;

/// Why a planner could not produce a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("hand is empty")]
    EmptyHand,
    #[error("no card in hand can be placed on the tableau")]
    NoPlacement,
}
