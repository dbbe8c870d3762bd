//! Search tree node representation.
//!
//! Each node is a decision point for the side to move. Its statistics are kept
//! from the perspective of the seat whose move led to it, so a parent picks the
//! child with the best mean directly.

use super::playout::SearchState;
use arbor_core::game::Move;
use arbor_core::model::seat::Seat;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    /// `None` for the root.
    pub parent: Option<NodeId>,

    /// Move that led here from the parent.
    pub mv: Option<Move>,

    /// Seat that made `mv`. For the root, the seat that is not to move.
    pub mover: Seat,

    pub state: SearchState,

    pub children: Vec<NodeId>,

    /// Moves not yet expanded. Shuffled once; expansion pops from the end.
    pub untried: Vec<Move>,

    pub visits: u32,

    /// Sum of playout values from `mover`'s perspective.
    pub total_value: f64,
}

impl SearchNode {
    pub fn new(parent: Option<NodeId>, mv: Option<Move>, mover: Seat, state: SearchState, untried: Vec<Move>) -> Self {
        Self {
            parent,
            mv,
            mover,
            state,
            children: Vec::new(),
            untried,
            visits: 0,
            total_value: 0.0,
        }
    }

    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f64
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    pub fn update(&mut self, value: f64) {
        self.visits += 1;
        self.total_value += value;
    }
}

/// `mean + exploration * sqrt(ln(parent_visits) / visits)`; unvisited nodes
/// score positive infinity.
pub fn calculate_uct_score(total_value: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let visits = visits as f64;
    let mean = total_value / visits;
    let parent = (parent_visits.max(1)) as f64;
    mean + exploration * (parent.ln() / visits).sqrt()
}
