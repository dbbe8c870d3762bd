//! Tableau valuation.
//!
//! - `path`: longest scoring path search per species.
//! - `rights`: end-of-game resolution of which seat may score each species.

mod path;
mod rights;

pub use path::{best_path_score, score_path, score_species};
pub use rights::{contested_value, final_scores, scoring_rights};

use crate::model::species::Species;
use crate::model::tableau::Tableau;
use core::fmt;

/// Best path score for every species of one tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeciesScores([u32; Species::COUNT]);

impl SpeciesScores {
    pub fn get(&self, species: Species) -> u32 {
        self.0[species.index()]
    }

    pub fn set(&mut self, species: Species, score: u32) {
        self.0[species.index()] = score;
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Species, u32)> + '_ {
        Species::ALL.iter().map(|&species| (species, self.get(species)))
    }
}

impl fmt::Display for SpeciesScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (species, score)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{species}={score}")?;
        }
        Ok(())
    }
}

pub fn total_species_scores(tableau: &Tableau) -> SpeciesScores {
    let mut scores = SpeciesScores::default();
    for species in Species::ALL {
        scores.set(species, score_species(tableau, species));
    }
    scores
}

/// Sum of every species' best path; the raw value of a tableau.
pub fn raw_tableau_value(tableau: &Tableau) -> u32 {
    total_species_scores(tableau).total()
}
