//! SIC division definitions and their one-hot columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of division indicator columns (`Division_B` through `Division_I`).
pub const DIVISION_INDICATOR_COUNT: usize = 8;

/// SIC divisions (10 divisions, lettered `A` to `J`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    /// A: Agriculture, Forestry, and Fishing
    Agriculture,

    /// B: Mining
    Mining,

    /// C: Construction
    Construction,

    /// D: Manufacturing
    Manufacturing,

    /// E: Transportation, Communications, Electric, Gas, and Sanitary Services
    Transportation,

    /// F: Wholesale Trade
    WholesaleTrade,

    /// G: Retail Trade
    RetailTrade,

    /// H: Finance, Insurance, and Real Estate
    Finance,

    /// I: Services
    Services,

    /// J: Public Administration
    PublicAdministration,
}

impl Division {
    /// Returns all divisions in letter order.
    pub const fn all() -> [Self; 10] {
        [
            Self::Agriculture,
            Self::Mining,
            Self::Construction,
            Self::Manufacturing,
            Self::Transportation,
            Self::WholesaleTrade,
            Self::RetailTrade,
            Self::Finance,
            Self::Services,
            Self::PublicAdministration,
        ]
    }

    /// Returns the divisions that own an indicator column, in column order.
    pub const fn encoded() -> [Self; DIVISION_INDICATOR_COUNT] {
        [
            Self::Mining,
            Self::Construction,
            Self::Manufacturing,
            Self::Transportation,
            Self::WholesaleTrade,
            Self::RetailTrade,
            Self::Finance,
            Self::Services,
        ]
    }

    /// Returns the division letter.
    pub const fn letter(&self) -> char {
        match self {
            Self::Agriculture => 'A',
            Self::Mining => 'B',
            Self::Construction => 'C',
            Self::Manufacturing => 'D',
            Self::Transportation => 'E',
            Self::WholesaleTrade => 'F',
            Self::RetailTrade => 'G',
            Self::Finance => 'H',
            Self::Services => 'I',
            Self::PublicAdministration => 'J',
        }
    }

    /// Returns the full division name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Agriculture => "Agriculture, Forestry, and Fishing",
            Self::Mining => "Mining",
            Self::Construction => "Construction",
            Self::Manufacturing => "Manufacturing",
            Self::Transportation => {
                "Transportation, Communications, Electric, Gas, and Sanitary Services"
            }
            Self::WholesaleTrade => "Wholesale Trade",
            Self::RetailTrade => "Retail Trade",
            Self::Finance => "Finance, Insurance, and Real Estate",
            Self::Services => "Services",
            Self::PublicAdministration => "Public Administration",
        }
    }

    /// Parse a division from its letter.
    ///
    /// Matching is exact: `"d"` or `" D"` are not divisions.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(Self::Agriculture),
            "B" => Some(Self::Mining),
            "C" => Some(Self::Construction),
            "D" => Some(Self::Manufacturing),
            "E" => Some(Self::Transportation),
            "F" => Some(Self::WholesaleTrade),
            "G" => Some(Self::RetailTrade),
            "H" => Some(Self::Finance),
            "I" => Some(Self::Services),
            "J" => Some(Self::PublicAdministration),
            _ => None,
        }
    }

    /// Position of this division among the indicator columns.
    ///
    /// `A` and `J` form the baseline and have no column.
    pub const fn indicator_index(&self) -> Option<usize> {
        match self {
            Self::Agriculture | Self::PublicAdministration => None,
            Self::Mining => Some(0),
            Self::Construction => Some(1),
            Self::Manufacturing => Some(2),
            Self::Transportation => Some(3),
            Self::WholesaleTrade => Some(4),
            Self::RetailTrade => Some(5),
            Self::Finance => Some(6),
            Self::Services => Some(7),
        }
    }

    /// Name of the indicator column for this division, if it has one.
    pub const fn indicator_column(&self) -> Option<&'static str> {
        match self {
            Self::Agriculture | Self::PublicAdministration => None,
            Self::Mining => Some("Division_B"),
            Self::Construction => Some("Division_C"),
            Self::Manufacturing => Some("Division_D"),
            Self::Transportation => Some("Division_E"),
            Self::WholesaleTrade => Some("Division_F"),
            Self::RetailTrade => Some("Division_G"),
            Self::Finance => Some("Division_H"),
            Self::Services => Some("Division_I"),
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
