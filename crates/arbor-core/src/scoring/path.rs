use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::coord::Coord;
use crate::model::rank::Rank;
use crate::model::species::Species;
use crate::model::tableau::Tableau;

/// Minimum length of a single-species path that earns the doubling bonus.
pub const MONO_BONUS_MIN_LEN: usize = 4;
pub const START_ON_ONE_BONUS: u32 = 1;
pub const END_ON_EIGHT_BONUS: u32 = 2;

/// Score of one path for `species`.
///
/// A path scores only when it has at least two cards and both endpoints are of
/// `species`. Base value is one point per card, doubled when every card is of
/// `species` and the path holds four or more cards, plus the rank-1 start and
/// rank-8 end bonuses.
pub fn score_path(path: &[Card], species: Species) -> u32 {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return 0;
    };
    if path.len() <= 1 || !first.is_species(species) || !last.is_species(species) {
        return 0;
    }

    let len = path.len() as u32;
    let mut score = len;
    if path.len() >= MONO_BONUS_MIN_LEN && path.iter().all(|card| card.is_species(species)) {
        score += len;
    }
    if first.rank == Rank::LOWEST {
        score += START_ON_ONE_BONUS;
    }
    if last.rank == Rank::HIGHEST {
        score += END_ON_EIGHT_BONUS;
    }
    score
}

struct Track {
    path: Vec<Card>,
    coord: Coord,
    used: CardSet,
}

/// Best-scoring path that begins at `start`.
///
/// Depth-first over an explicit stack. A step is allowed onto an orthogonal
/// neighbor holding an unused card of strictly higher rank. Every prefix is
/// scored because a longer single-species run can cross into a higher bonus
/// tier, so the walk never stops on a plateau.
pub fn best_path_score(tableau: &Tableau, start: Coord, species: Species) -> u32 {
    let mut stack = vec![Track {
        path: Vec::new(),
        coord: start,
        used: CardSet::EMPTY,
    }];
    let mut best = 0;

    while let Some(Track {
        mut path,
        coord,
        mut used,
    }) = stack.pop()
    {
        let Some(card) = tableau.get(coord) else {
            continue;
        };
        path.push(card);
        used.insert(card);

        best = best.max(score_path(&path, species));

        for next in coord.neighbors() {
            let Some(next_card) = tableau.get(next) else {
                continue;
            };
            if used.contains(next_card) || next_card.rank <= card.rank {
                continue;
            }
            stack.push(Track {
                path: path.clone(),
                coord: next,
                used,
            });
        }
    }

    best
}

/// Highest path score for `species` across every starting card of that species.
pub fn score_species(tableau: &Tableau, species: Species) -> u32 {
    tableau
        .cells_of(species)
        .map(|(coord, _)| best_path_score(tableau, coord, species))
        .max()
        .unwrap_or(0)
}
