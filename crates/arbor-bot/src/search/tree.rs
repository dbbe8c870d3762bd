//! Arena-backed search tree.

use super::node::{NodeId, SearchNode, calculate_uct_score};
use super::playout::{SearchState, random_playout};
use rand::Rng;
use rand::seq::SliceRandom;

pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new<R: Rng + ?Sized>(state: SearchState, rng: &mut R) -> Self {
        let mover = state.to_move().other();
        let untried = shuffled_moves(&state, rng);
        Self {
            nodes: vec![SearchNode::new(None, None, mover, state, untried)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `id` with the highest UCT score; first wins ties.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let parent = self.get(id);
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &parent.children {
            let child = self.get(child_id);
            let score = calculate_uct_score(child.total_value, child.visits, parent.visits, exploration);
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((child_id, score));
            }
        }
        best.map(|(child_id, _)| child_id)
    }

    /// Walks down fully expanded nodes until one with untried moves or a
    /// terminal node.
    pub fn select_leaf(&self, exploration: f64) -> NodeId {
        let mut id = self.root();
        loop {
            let node = self.get(id);
            if node.is_terminal() || !node.is_fully_expanded() {
                return id;
            }
            match self.select_child(id, exploration) {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    /// Expands one untried move of `id`. Returns `None` when nothing could be
    /// expanded.
    pub fn expand<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R) -> Option<NodeId> {
        loop {
            let node = &mut self.nodes[id.index()];
            let mv = node.untried.pop()?;
            let mover = node.state.to_move();
            let mut state = node.state.clone();
            if state.apply(mv).is_err() {
                continue;
            }
            let untried = shuffled_moves(&state, rng);
            let child_id = NodeId(self.nodes.len() as u32);
            self.nodes
                .push(SearchNode::new(Some(id), Some(mv), mover, state, untried));
            self.nodes[id.index()].children.push(child_id);
            return Some(child_id);
        }
    }

    /// Random playout from `id`, valued for the seat that moved into it.
    pub fn simulate<R: Rng + ?Sized>(&self, id: NodeId, rng: &mut R) -> f64 {
        let node = self.get(id);
        let mut state = node.state.clone();
        random_playout(&mut state, rng);
        state.score_difference(node.mover)
    }

    /// Adds `value` to `id` and alternates its sign on the way to the root.
    pub fn backpropagate(&mut self, id: NodeId, value: f64) {
        let mut current = Some(id);
        let mut value = value;
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id.index()];
            node.update(value);
            value = -value;
            current = node.parent;
        }
    }

    /// Root child with the most visits; first wins ties.
    pub fn best_root_child(&self) -> Option<&SearchNode> {
        let mut best: Option<&SearchNode> = None;
        for &child_id in &self.get(self.root()).children {
            let child = self.get(child_id);
            if best.is_none_or(|current| child.visits > current.visits) {
                best = Some(child);
            }
        }
        best
    }

    pub fn root_children(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.get(self.root())
            .children
            .iter()
            .map(move |&child_id| self.get(child_id))
    }
}

fn shuffled_moves<R: Rng + ?Sized>(state: &SearchState, rng: &mut R) -> Vec<arbor_core::game::Move> {
    let mut moves = state.legal_moves();
    moves.shuffle(rng);
    moves
}
