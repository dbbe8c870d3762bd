use crate::model::card::Card;
use crate::model::coord::Coord;
use crate::model::species::Species;
use std::collections::{BTreeMap, BTreeSet};

/// A player's arboretum: a sparse grid of played cards.
///
/// Cards are only ever added. Every placement after the first must touch an
/// existing card orthogonally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tableau {
    cells: BTreeMap<Coord, Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    Occupied(Coord),
    NotAdjacent(Coord),
    DuplicateCard(Card),
}

impl Tableau {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a tableau from an observed snapshot without re-checking
    /// adjacency. Rejects a card that appears twice.
    pub fn from_cells<I>(cells: I) -> Result<Self, PlacementError>
    where
        I: IntoIterator<Item = (Coord, Card)>,
    {
        let mut tableau = Tableau::new();
        for (coord, card) in cells {
            if tableau.contains_card(card) {
                return Err(PlacementError::DuplicateCard(card));
            }
            if tableau.cells.insert(coord, card).is_some() {
                return Err(PlacementError::Occupied(coord));
            }
        }
        Ok(tableau)
    }

    pub fn place(&mut self, coord: Coord, card: Card) -> Result<(), PlacementError> {
        if self.cells.contains_key(&coord) {
            return Err(PlacementError::Occupied(coord));
        }
        if self.is_empty() {
            if coord != Coord::ORIGIN {
                return Err(PlacementError::NotAdjacent(coord));
            }
        } else if !coord
            .neighbors()
            .iter()
            .any(|neighbor| self.cells.contains_key(neighbor))
        {
            return Err(PlacementError::NotAdjacent(coord));
        }
        self.cells.insert(coord, card);
        Ok(())
    }

    /// Copy of this tableau with `card` placed at `coord`.
    pub fn with_card(&self, coord: Coord, card: Card) -> Result<Tableau, PlacementError> {
        let mut next = self.clone();
        next.place(coord, card)?;
        Ok(next)
    }

    pub fn get(&self, coord: Coord) -> Option<Card> {
        self.cells.get(&coord).copied()
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn contains_card(&self, card: Card) -> bool {
        self.cells.values().any(|&c| c == card)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Card)> + '_ {
        self.cells.iter().map(|(&coord, &card)| (coord, card))
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.cells.values().copied()
    }

    pub fn cells_of(&self, species: Species) -> impl Iterator<Item = (Coord, Card)> + '_ {
        self.iter().filter(move |(_, card)| card.is_species(species))
    }

    /// Every coordinate where the next card may be placed.
    pub fn legal_placements(&self) -> BTreeSet<Coord> {
        legal_placements(self)
    }
}

pub fn legal_placements(tableau: &Tableau) -> BTreeSet<Coord> {
    if tableau.is_empty() {
        return BTreeSet::from([Coord::ORIGIN]);
    }
    let mut open = BTreeSet::new();
    for coord in tableau.cells.keys() {
        for neighbor in coord.neighbors() {
            if !tableau.is_occupied(neighbor) {
                open.insert(neighbor);
            }
        }
    }
    open
}
