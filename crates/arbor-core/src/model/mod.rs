pub mod card;
pub mod card_set;
pub mod coord;
pub mod deck;
pub mod hand;
pub mod rank;
pub mod seat;
pub mod species;
pub mod tableau;
