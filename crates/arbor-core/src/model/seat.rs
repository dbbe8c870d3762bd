use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the two sides at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    First = 0,
    Second = 1,
}

impl Seat {
    pub const LOOP: [Seat; 2] = [Seat::First, Seat::Second];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::First),
            1 => Some(Seat::Second),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::First => "First",
            Seat::Second => "Second",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::Seat;

    #[test]
    fn other_alternates() {
        assert_eq!(Seat::First.other(), Seat::Second);
        assert_eq!(Seat::Second.other().other(), Seat::Second);
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
    }
}
