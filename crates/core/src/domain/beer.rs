use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AromaTag, BarId, ItemId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeerColor {
    White,
    Blonde,
    Golden,
    Amber,
    Red,
    Brown,
    Black,
}

impl BeerColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Blonde => "blonde",
            Self::Golden => "golden",
            Self::Amber => "amber",
            Self::Red => "red",
            Self::Brown => "brown",
            Self::Black => "black",
        }
    }

    /// Human-readable label (FR).
    pub fn label(self) -> &'static str {
        match self {
            Self::White => "Blanche",
            Self::Blonde => "Blonde",
            Self::Golden => "Dorée",
            Self::Amber => "Ambrée",
            Self::Red => "Rousse",
            Self::Brown => "Brune",
            Self::Black => "Noire",
        }
    }
}

impl fmt::Display for BeerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeerColor {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "white" => Ok(Self::White),
            "blonde" => Ok(Self::Blonde),
            "golden" => Ok(Self::Golden),
            "amber" => Ok(Self::Amber),
            "red" => Ok(Self::Red),
            "brown" => Ok(Self::Brown),
            "black" => Ok(Self::Black),
            _ => Err(()),
        }
    }
}

/// Bitterness buckets answered in the quiz, mapped onto IBU ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bitterness {
    Faible,
    Moyenne,
    Forte,
}

impl Bitterness {
    pub fn matches_ibu(self, ibu: u32) -> bool {
        match self {
            Self::Faible => ibu <= 25,
            Self::Moyenne => ibu > 25 && ibu <= 50,
            Self::Forte => ibu > 50,
        }
    }
}

impl FromStr for Bitterness {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "faible" => Ok(Self::Faible),
            "moyenne" => Ok(Self::Moyenne),
            "forte" => Ok(Self::Forte),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingFormat {
    Pression,
    Bouteille,
}

impl ServingFormat {
    pub fn matches_tap(self, is_on_tap: bool) -> bool {
        match self {
            Self::Pression => is_on_tap,
            Self::Bouteille => !is_on_tap,
        }
    }
}

impl FromStr for ServingFormat {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pression" => Ok(Self::Pression),
            "bouteille" => Ok(Self::Bouteille),
            _ => Err(()),
        }
    }
}

/// A beer in a bar's catalog. ABV is stored times ten and prices in cents so
/// the persisted attributes stay integral.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    pub id: ItemId,
    pub bar_id: BarId,
    pub name: String,
    pub brewery: Option<String>,
    pub style: Option<String>,
    pub color: BeerColor,
    pub abv_x10: u32,
    pub ibu: Option<u32>,
    pub price: Option<u32>,
    pub is_on_tap: bool,
    pub is_available: bool,
    pub tags: Vec<AromaTag>,
}

impl Beer {
    /// ABV as a percentage, e.g. 4.5 for a stored 45.
    pub fn abv(&self) -> Decimal {
        Decimal::new(i64::from(self.abv_x10), 1)
    }

    /// Price in euros.
    pub fn price_euros(&self) -> Option<Decimal> {
        self.price.map(|cents| Decimal::new(i64::from(cents), 2))
    }

    pub fn tag_slugs(&self) -> BTreeSet<&str> {
        self.tags.iter().map(|tag| tag.slug.as_str()).collect()
    }
}
