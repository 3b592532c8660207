use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AromaTag, BarId, ItemId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WineColor {
    Red,
    White,
    Rose,
}

impl WineColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::White => "white",
            Self::Rose => "rose",
        }
    }

    /// Human-readable label (FR).
    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "Rouge",
            Self::White => "Blanc",
            Self::Rose => "Rosé",
        }
    }
}

impl fmt::Display for WineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WineColor {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "red" => Ok(Self::Red),
            "white" => Ok(Self::White),
            "rose" => Ok(Self::Rose),
            _ => Err(()),
        }
    }
}

/// Closed vocabulary of food pairings a wine can be tagged with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPairing {
    ViandeRouge,
    ViandeBlanche,
    Poisson,
    FruitsDeMer,
    Charcuterie,
    Fromage,
    Vegetarien,
    Dessert,
}

impl FoodPairing {
    pub const ALL: [FoodPairing; 8] = [
        Self::ViandeRouge,
        Self::ViandeBlanche,
        Self::Poisson,
        Self::FruitsDeMer,
        Self::Charcuterie,
        Self::Fromage,
        Self::Vegetarien,
        Self::Dessert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViandeRouge => "viande_rouge",
            Self::ViandeBlanche => "viande_blanche",
            Self::Poisson => "poisson",
            Self::FruitsDeMer => "fruits_de_mer",
            Self::Charcuterie => "charcuterie",
            Self::Fromage => "fromage",
            Self::Vegetarien => "vegetarien",
            Self::Dessert => "dessert",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ViandeRouge => "Viande rouge",
            Self::ViandeBlanche => "Viande blanche",
            Self::Poisson => "Poisson",
            Self::FruitsDeMer => "Fruits de mer",
            Self::Charcuterie => "Charcuterie",
            Self::Fromage => "Fromage",
            Self::Vegetarien => "Végétarien",
            Self::Dessert => "Dessert",
        }
    }

    /// Parse a free-form delimited list from an import file ("Fromage;
    /// viande rouge", "poisson, dessert") into known pairings, deduplicated
    /// in input order. Unknown parts are dropped.
    pub fn parse_list(value: &str) -> Vec<FoodPairing> {
        let mut found = Vec::new();
        for part in value.split([';', ',', '|']) {
            let slug = slugify(part);
            if slug.is_empty() {
                continue;
            }
            let matched = Self::ALL
                .into_iter()
                .find(|pairing| pairing.as_str() == slug || slugify(pairing.label()) == slug);
            if let Some(pairing) = matched {
                if !found.contains(&pairing) {
                    found.push(pairing);
                }
            }
        }
        found
    }
}

impl fmt::Display for FoodPairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodPairing {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|pairing| pairing.as_str() == value).ok_or(())
    }
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_separator = true;
    for character in value.trim().chars() {
        let folded = match character {
            'à' | 'â' | 'ä' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'î' | 'ï' => Some('i'),
            'ô' | 'ö' => Some('o'),
            'ù' | 'û' | 'ü' => Some('u'),
            'ç' => Some('c'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        };
        match folded {
            Some(c) => {
                slug.push(c);
                last_was_separator = false;
            }
            None if !last_was_separator => {
                slug.push('_');
                last_was_separator = true;
            }
            None => {}
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// A wine in a bar's catalog. Same integral storage conventions as
/// [`super::beer::Beer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wine {
    pub id: ItemId,
    pub bar_id: BarId,
    pub name: String,
    pub color: WineColor,
    pub grape: Option<String>,
    pub region: Option<String>,
    pub food_pairings: BTreeSet<FoodPairing>,
    pub abv_x10: u32,
    pub price: Option<u32>,
    pub is_available: bool,
    pub tags: Vec<AromaTag>,
}

impl Wine {
    /// ABV as a percentage, e.g. 12.5 for a stored 125.
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
