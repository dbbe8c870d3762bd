//! End-of-game resolution of who may score each species.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::seat::Seat;
use crate::model::species::Species;
use crate::model::tableau::Tableau;
use crate::scoring::path::score_species;

/// Value of `hand` in `species` when competing against `rival`.
///
/// An 8 is worth nothing while the rival holds the 1 of the same species.
pub fn contested_value(hand: &Hand, rival: &Hand, species: Species) -> u32 {
    let rival_holds_one = rival.contains(Card::new(species, Rank::LOWEST));
    hand.iter()
        .filter(|card| card.is_species(species))
        .map(|card| {
            if card.rank == Rank::HIGHEST && rival_holds_one {
                0
            } else {
                card.rank.value() as u32
            }
        })
        .sum()
}

/// Which seats hold the right to score `species`. Ties share the right.
pub fn scoring_rights(hands: [&Hand; 2], species: Species) -> [bool; 2] {
    let first = contested_value(hands[0], hands[1], species);
    let second = contested_value(hands[1], hands[0], species);
    [first >= second, second >= first]
}

/// Final per-seat totals: each seat scores its best path in every species it
/// holds the right to.
pub fn final_scores(tableaus: [&Tableau; 2], hands: [&Hand; 2]) -> [u32; 2] {
    let mut totals = [0u32; 2];
    for species in Species::ALL {
        let rights = scoring_rights(hands, species);
        for seat in Seat::LOOP {
            if rights[seat.index()] {
                totals[seat.index()] += score_species(tableaus[seat.index()], species);
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::{contested_value, final_scores, scoring_rights};
    use crate::model::card::Card;
    use crate::model::coord::Coord;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::species::Species;
    use crate::model::tableau::Tableau;

    fn card(species: Species, rank: u8) -> Card {
        Card::new(species, Rank::from_value(rank).unwrap())
    }

    #[test]
    fn eight_is_neutralised_by_the_opposing_one() {
        let c = Species::Cassia;
        let holder = Hand::with_cards(vec![card(c, 8), card(c, 2)]);
        let rival = Hand::with_cards(vec![card(c, 1)]);
        assert_eq!(contested_value(&holder, &rival, c), 2);
        assert_eq!(contested_value(&holder, &Hand::new(), c), 10);
    }

    #[test]
    fn higher_sum_takes_the_right_and_ties_share_it() {
        let m = Species::Maple;
        let strong = Hand::with_cards(vec![card(m, 6)]);
        let weak = Hand::with_cards(vec![card(m, 3)]);
        assert_eq!(scoring_rights([&strong, &weak], m), [true, false]);
        assert_eq!(scoring_rights([&weak, &strong], m), [false, true]);
        assert_eq!(scoring_rights([&Hand::new(), &Hand::new()], m), [true, true]);
    }

    #[test]
    fn one_beats_eight_when_it_is_all_either_side_holds() {
        let w = Species::Willow;
        let eight = Hand::with_cards(vec![card(w, 8)]);
        let one = Hand::with_cards(vec![card(w, 1)]);
        assert_eq!(scoring_rights([&eight, &one], w), [false, true]);
    }

    #[test]
    fn final_scores_only_count_species_with_the_right() {
        let o = Species::Oak;
        let tableau = Tableau::from_cells([
            (Coord::new(0, 0), card(o, 2)),
            (Coord::new(1, 0), card(o, 5)),
        ])
        .unwrap();
        let empty = Tableau::new();
        let ours = Hand::new();
        let theirs = Hand::with_cards(vec![card(o, 7)]);
        assert_eq!(final_scores([&tableau, &empty], [&ours, &theirs]), [0, 0]);
        assert_eq!(final_scores([&tableau, &empty], [&theirs, &ours]), [2, 0]);
    }
}
