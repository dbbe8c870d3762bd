use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Species {
    Jacaranda = 0,
    RoyalPoinciana = 1,
    Cassia = 2,
    Maple = 3,
    Oak = 4,
    Willow = 5,
}

impl Species {
    pub const ALL: [Species; 6] = [
        Species::Jacaranda,
        Species::RoyalPoinciana,
        Species::Cassia,
        Species::Maple,
        Species::Oak,
        Species::Willow,
    ];

    pub const COUNT: usize = 6;

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Species::Jacaranda),
            1 => Some(Species::RoyalPoinciana),
            2 => Some(Species::Cassia),
            3 => Some(Species::Maple),
            4 => Some(Species::Oak),
            5 => Some(Species::Willow),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn symbol(self) -> char {
        match self {
            Species::Jacaranda => 'J',
            Species::RoyalPoinciana => 'R',
            Species::Cassia => 'C',
            Species::Maple => 'M',
            Species::Oak => 'O',
            Species::Willow => 'W',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'J' => Some(Species::Jacaranda),
            'R' => Some(Species::RoyalPoinciana),
            'C' => Some(Species::Cassia),
            'M' => Some(Species::Maple),
            'O' => Some(Species::Oak),
            'W' => Some(Species::Willow),
            _ => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Species {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Species::from_symbol(symbol.to_ascii_uppercase()).ok_or(()),
            _ => Err(()),
        }
    }
}
