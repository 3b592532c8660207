//! Question catalog: the preference dimensions a bar can enable for its
//! recommendation quiz, their display metadata, and their scoring weights.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preferences::PreferenceAnswers;

/// The two product domains the quiz can recommend from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkKind {
    Beer,
    Wine,
}

impl DrinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beer => "beer",
            Self::Wine => "wine",
        }
    }
}

impl fmt::Display for DrinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    Bitterness,
    Color,
    Aromas,
    MaxAbv,
    Format,
    Style,
    Brewery,
    MaxPrice,
    Food,
    Grape,
    Region,
}

impl QuestionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bitterness => "bitterness",
            Self::Color => "color",
            Self::Aromas => "aromas",
            Self::MaxAbv => "max_abv",
            Self::Format => "format",
            Self::Style => "style",
            Self::Brewery => "brewery",
            Self::MaxPrice => "max_price",
            Self::Food => "food",
            Self::Grape => "grape",
            Self::Region => "region",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown question id `{0}`")]
pub struct UnknownQuestionId(pub String);

impl FromStr for QuestionId {
    type Err = UnknownQuestionId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bitterness" => Ok(Self::Bitterness),
            "color" => Ok(Self::Color),
            "aromas" => Ok(Self::Aromas),
            "max_abv" => Ok(Self::MaxAbv),
            "format" => Ok(Self::Format),
            "style" => Ok(Self::Style),
            "brewery" => Ok(Self::Brewery),
            "max_price" => Ok(Self::MaxPrice),
            "food" => Ok(Self::Food),
            "grape" => Ok(Self::Grape),
            "region" => Ok(Self::Region),
            other => Err(UnknownQuestionId(other.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QuestionDefinition {
    pub id: QuestionId,
    pub label: &'static str,
    pub description: &'static str,
    pub weight: f64,
}

const BEER_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        id: QuestionId::Bitterness,
        label: "Amertume",
        description: "Niveau d'amertume préféré",
        weight: 20.0,
    },
    QuestionDefinition {
        id: QuestionId::Color,
        label: "Couleur",
        description: "Couleurs de bière appréciées",
        weight: 15.0,
    },
    QuestionDefinition {
        id: QuestionId::Aromas,
        label: "Arômes",
        description: "Arômes qui vous plaisent",
        weight: 30.0,
    },
    QuestionDefinition {
        id: QuestionId::MaxAbv,
        label: "Degré d'alcool maximum",
        description: "Taux d'alcool souhaité",
        weight: 25.0,
    },
    QuestionDefinition {
        id: QuestionId::Format,
        label: "Format",
        description: "Pression ou bouteille",
        weight: 10.0,
    },
    QuestionDefinition {
        id: QuestionId::Style,
        label: "Style de bière",
        description: "Styles favoris",
        weight: 15.0,
    },
    QuestionDefinition {
        id: QuestionId::Brewery,
        label: "Brasserie",
        description: "Brasseries préférées",
        weight: 10.0,
    },
    QuestionDefinition {
        id: QuestionId::MaxPrice,
        label: "Budget maximum",
        description: "Prix maximal par bière",
        weight: 15.0,
    },
];

const WINE_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        id: QuestionId::Color,
        label: "Couleur",
        description: "Couleurs de vin appréciées",
        weight: 15.0,
    },
    QuestionDefinition {
        id: QuestionId::Aromas,
        label: "Arômes",
        description: "Arômes qui vous plaisent",
        weight: 30.0,
    },
    QuestionDefinition {
        id: QuestionId::Food,
        label: "Accord mets",
        description: "Plat à accompagner",
        weight: 25.0,
    },
    QuestionDefinition {
        id: QuestionId::Grape,
        label: "Cépage",
        description: "Cépages favoris",
        weight: 15.0,
    },
    QuestionDefinition {
        id: QuestionId::Region,
        label: "Région",
        description: "Régions viticoles préférées",
        weight: 10.0,
    },
    QuestionDefinition {
        id: QuestionId::MaxAbv,
        label: "Degré d'alcool maximum",
        description: "Taux d'alcool souhaité",
        weight: 20.0,
    },
    QuestionDefinition {
        id: QuestionId::MaxPrice,
        label: "Budget maximum",
        description: "Prix maximal par verre",
        weight: 15.0,
    },
];

/// Fallback question sets used when a bar has fewer than three valid
/// questions configured.
pub const BEER_DEFAULT: &[QuestionId] = &[
    QuestionId::Bitterness,
    QuestionId::Color,
    QuestionId::Aromas,
    QuestionId::MaxAbv,
    QuestionId::Format,
];

pub const WINE_DEFAULT: &[QuestionId] = &[
    QuestionId::Color,
    QuestionId::Food,
    QuestionId::Grape,
    QuestionId::Region,
    QuestionId::MaxAbv,
    QuestionId::MaxPrice,
];

/// Upper bound on how many questions a bar may enable.
pub const MAX_SELECTED: usize = 10;

/// Minimum number of valid configured questions before falling back to the
/// domain default set.
pub const MIN_SELECTED: usize = 3;

/// Ordered question definitions for one domain.
pub fn catalog(kind: DrinkKind) -> &'static [QuestionDefinition] {
    match kind {
        DrinkKind::Beer => BEER_QUESTIONS,
        DrinkKind::Wine => WINE_QUESTIONS,
    }
}

pub fn default_questions(kind: DrinkKind) -> &'static [QuestionId] {
    match kind {
        DrinkKind::Beer => BEER_DEFAULT,
        DrinkKind::Wine => WINE_DEFAULT,
    }
}

fn base_weight(kind: DrinkKind, id: QuestionId) -> Option<f64> {
    catalog(kind).iter().find(|question| question.id == id).map(|question| question.weight)
}

/// Sanitize a bar's configured question ids for one domain: keep ids that
/// exist in the domain catalog, dedupe preserving order, cap at
/// [`MAX_SELECTED`]. Falls back to the domain default set when fewer than
/// [`MIN_SELECTED`] valid ids remain.
pub fn normalize_selected<S: AsRef<str>>(configured: &[S], kind: DrinkKind) -> Vec<QuestionId> {
    let mut selected = Vec::new();
    for raw in configured {
        let Ok(id) = raw.as_ref().parse::<QuestionId>() else { continue };
        if base_weight(kind, id).is_some() && !selected.contains(&id) {
            selected.push(id);
        }
    }

    if selected.len() < MIN_SELECTED {
        return default_questions(kind).to_vec();
    }

    selected.truncate(MAX_SELECTED);
    selected
}

/// Restrict the selection to the questions the user actually answered with a
/// meaningful value for this request.
pub fn resolve_active_questions<P: PreferenceAnswers>(
    selected: &[QuestionId],
    preferences: &P,
) -> Vec<QuestionId> {
    selected.iter().copied().filter(|id| preferences.answers(*id)).collect()
}

/// Base weights of the active questions, rescaled so they sum to 100. Empty
/// when no active question carries weight in this domain.
pub fn normalized_weights(kind: DrinkKind, active: &[QuestionId]) -> HashMap<QuestionId, f64> {
    let active_weights: Vec<(QuestionId, f64)> = active
        .iter()
        .filter_map(|id| base_weight(kind, *id).map(|weight| (*id, weight)))
        .collect();

    let total: f64 = active_weights.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return HashMap::new();
    }

    active_weights.into_iter().map(|(id, weight)| (id, weight / total * 100.0)).collect()
}
