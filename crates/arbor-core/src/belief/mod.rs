//! Estimates about the opponent's hidden hand.
//!
//! - `combinations`: exhaustive and sampled index subsets over the unseen pool.
//! - `inference`: per-species scoring odds and single-card location odds.

mod combinations;
mod inference;

pub use combinations::{binomial, for_each_combination, for_each_sampled_combination};
pub use inference::{
    Estimate, InferenceConfig, ScoringOdds, card_in_opponent_hand_probability,
    scoring_probability, scoring_probability_with,
};
