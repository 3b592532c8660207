//! Typed, sparse preference records built once at the request boundary and
//! passed immutably through the pipeline. A `None` field means the guest did
//! not answer that dimension.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::beer::{BeerColor, Bitterness, ServingFormat};
use crate::domain::wine::{FoodPairing, WineColor};
use crate::questions::QuestionId;

/// Sentinel a single-choice question uses for "no preference".
pub const ANY: &str = "any";

/// Decides whether a given question was answered with a meaningful value.
/// The rules are shape-specific: sets must be non-empty, single choices must
/// not be the [`ANY`] sentinel, numeric ceilings count as answered merely by
/// being present (zero included).
pub trait PreferenceAnswers {
    fn answers(&self, id: QuestionId) -> bool;
}

fn chosen(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|choice| !choice.is_empty() && *choice != ANY)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeerPreferences {
    pub bitterness: Option<Bitterness>,
    pub color: Option<BTreeSet<BeerColor>>,
    pub aromas: Option<BTreeSet<String>>,
    pub max_abv: Option<Decimal>,
    pub format: Option<ServingFormat>,
    pub style: Option<String>,
    pub brewery: Option<String>,
    pub max_price: Option<Decimal>,
}

impl BeerPreferences {
    /// Style choice, unless absent or "any".
    pub fn chosen_style(&self) -> Option<&str> {
        chosen(&self.style)
    }

    pub fn chosen_brewery(&self) -> Option<&str> {
        chosen(&self.brewery)
    }
}

impl PreferenceAnswers for BeerPreferences {
    fn answers(&self, id: QuestionId) -> bool {
        match id {
            QuestionId::Bitterness => self.bitterness.is_some(),
            QuestionId::Color => self.color.as_ref().is_some_and(|set| !set.is_empty()),
            QuestionId::Aromas => self.aromas.as_ref().is_some_and(|set| !set.is_empty()),
            QuestionId::MaxAbv => self.max_abv.is_some(),
            QuestionId::Format => self.format.is_some(),
            QuestionId::Style => self.chosen_style().is_some(),
            QuestionId::Brewery => self.chosen_brewery().is_some(),
            QuestionId::MaxPrice => self.max_price.is_some(),
            QuestionId::Food | QuestionId::Grape | QuestionId::Region => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinePreferences {
    pub color: Option<BTreeSet<WineColor>>,
    pub aromas: Option<BTreeSet<String>>,
    /// Answer key for the `food` question; the naming asymmetry is part of
    /// the quiz wire format.
    pub food_pairings: Option<BTreeSet<FoodPairing>>,
    pub grape: Option<String>,
    pub region: Option<String>,
    pub max_abv: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl WinePreferences {
    pub fn chosen_grape(&self) -> Option<&str> {
        chosen(&self.grape)
    }

    pub fn chosen_region(&self) -> Option<&str> {
        chosen(&self.region)
    }
}

impl PreferenceAnswers for WinePreferences {
    fn answers(&self, id: QuestionId) -> bool {
        match id {
            QuestionId::Color => self.color.as_ref().is_some_and(|set| !set.is_empty()),
            QuestionId::Aromas => self.aromas.as_ref().is_some_and(|set| !set.is_empty()),
            QuestionId::Food => {
                self.food_pairings.as_ref().is_some_and(|set| !set.is_empty())
            }
            QuestionId::Grape => self.chosen_grape().is_some(),
            QuestionId::Region => self.chosen_region().is_some(),
            QuestionId::MaxAbv => self.max_abv.is_some(),
            QuestionId::MaxPrice => self.max_price.is_some(),
            QuestionId::Bitterness
            | QuestionId::Format
            | QuestionId::Style
            | QuestionId::Brewery => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sets_and_any_sentinel_are_not_answers() {
        let preferences = BeerPreferences {
            aromas: Some(BTreeSet::new()),
            style: Some(ANY.to_owned()),
            brewery: Some(String::new()),
            ..BeerPreferences::default()
        };
        assert!(!preferences.answers(QuestionId::Aromas));
        assert!(!preferences.answers(QuestionId::Style));
        assert!(!preferences.answers(QuestionId::Brewery));
    }

    #[test]
    fn numeric_ceilings_answer_by_presence_even_at_zero() {
        let preferences =
            WinePreferences { max_price: Some(Decimal::ZERO), ..WinePreferences::default() };
        assert!(preferences.answers(QuestionId::MaxPrice));
        assert!(!preferences.answers(QuestionId::MaxAbv));
    }

    #[test]
    fn food_question_reads_the_food_pairings_answer() {
        let preferences = WinePreferences {
            food_pairings: Some([FoodPairing::Fromage].into()),
            ..WinePreferences::default()
        };
        assert!(preferences.answers(QuestionId::Food));
    }

    #[test]
    fn foreign_domain_questions_are_never_answered() {
        let preferences = BeerPreferences {
            bitterness: Some(Bitterness::Faible),
            ..BeerPreferences::default()
        };
        assert!(!preferences.answers(QuestionId::Grape));

        let wine = WinePreferences { max_abv: Some(Decimal::new(12, 0)), ..Default::default() };
        assert!(!wine.answers(QuestionId::Bitterness));
    }
}
