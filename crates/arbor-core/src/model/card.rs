use crate::model::rank::Rank;
use crate::model::species::Species;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Number of distinct cards in the game (6 species x 8 ranks).
pub const CARD_COUNT: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireCard", into = "WireCard")]
pub struct Card {
    pub species: Species,
    pub rank: Rank,
}

impl Card {
    pub const fn new(species: Species, rank: Rank) -> Self {
        Self { species, rank }
    }

    /// Dense identifier in `0..48`, species-major.
    pub const fn id(self) -> u8 {
        (self.species as u8) * 8 + (self.rank.value() - 1)
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        if id as usize >= CARD_COUNT {
            return None;
        }
        let species = match Species::from_index((id / 8) as usize) {
            Some(species) => species,
            None => return None,
        };
        match Rank::from_value(id % 8 + 1) {
            Some(rank) => Some(Card::new(species, rank)),
            None => None,
        }
    }

    pub fn all() -> impl Iterator<Item = Card> {
        (0..CARD_COUNT as u8).filter_map(Card::from_id)
    }

    pub fn is_species(self, species: Species) -> bool {
        self.species == species
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.species, self.rank)
    }
}

impl FromStr for Card {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let species = chars
            .next()
            .and_then(|c| Species::from_symbol(c.to_ascii_uppercase()))
            .ok_or(())?;
        let value = chars.as_str().parse::<u8>().map_err(|_| ())?;
        let rank = Rank::from_value(value).ok_or(())?;
        Ok(Card::new(species, rank))
    }
}

/// On-the-wire card representation: `["J", 8]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireCard(String, u8);

impl From<Card> for WireCard {
    fn from(card: Card) -> Self {
        WireCard(card.species.symbol().to_string(), card.rank.value())
    }
}

impl TryFrom<WireCard> for Card {
    type Error = String;

    fn try_from(wire: WireCard) -> Result<Self, Self::Error> {
        let species = wire
            .0
            .parse::<Species>()
            .map_err(|_| format!("unknown species '{}'", wire.0))?;
        let rank = Rank::from_value(wire.1).ok_or_else(|| format!("rank {} out of range", wire.1))?;
        Ok(Card::new(species, rank))
    }
}
