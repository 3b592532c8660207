use rust_decimal::Decimal;

use super::tolerance::Tolerances;
use super::{ceiling_eval, DimensionEval, DrinkDomain, MatchOutcome};
use crate::domain::beer::{Beer, ServingFormat};
use crate::domain::ItemId;
use crate::preferences::BeerPreferences;
use crate::questions::{DrinkKind, QuestionId};

pub struct BeerDomain;

impl DrinkDomain for BeerDomain {
    type Item = Beer;
    type Preferences = BeerPreferences;

    const KIND: DrinkKind = DrinkKind::Beer;
    const EXPLANATION_ORDER: &'static [QuestionId] = &[
        QuestionId::Aromas,
        QuestionId::MaxAbv,
        QuestionId::Bitterness,
        QuestionId::Color,
        QuestionId::Format,
        QuestionId::Style,
        QuestionId::Brewery,
        QuestionId::MaxPrice,
    ];
    const FALLBACK_EXPLANATION: &'static str = "Sélection basée sur le profil de la bière";

    fn item_id(item: &Beer) -> ItemId {
        item.id
    }

    fn is_available(item: &Beer) -> bool {
        item.is_available
    }

    fn abv(item: &Beer) -> Decimal {
        item.abv()
    }

    fn price_euros(item: &Beer) -> Option<Decimal> {
        item.price_euros()
    }

    fn max_abv(preferences: &BeerPreferences) -> Option<Decimal> {
        preferences.max_abv
    }

    fn max_price(preferences: &BeerPreferences) -> Option<Decimal> {
        preferences.max_price
    }

    fn evaluate(
        question: QuestionId,
        item: &Beer,
        preferences: &BeerPreferences,
        tolerances: &Tolerances,
    ) -> DimensionEval {
        match question {
            QuestionId::Aromas => match &preferences.aromas {
                Some(wanted) if !wanted.is_empty() => {
                    let slugs = item.tag_slugs();
                    let hits =
                        wanted.iter().filter(|slug| slugs.contains(slug.as_str())).count();
                    if hits > 0 {
                        DimensionEval::strict(hits as f64 / wanted.len() as f64)
                    } else {
                        DimensionEval::miss(0.0)
                    }
                }
                _ => DimensionEval::skipped(),
            },
            QuestionId::MaxAbv => match preferences.max_abv {
                Some(ceiling) => ceiling_eval(
                    item.abv(),
                    ceiling,
                    tolerances.is_abv_near_miss(item.abv(), ceiling),
                ),
                None => DimensionEval::skipped(),
            },
            QuestionId::Bitterness => match (preferences.bitterness, item.ibu) {
                (Some(bitterness), Some(ibu)) => {
                    if bitterness.matches_ibu(ibu) {
                        DimensionEval::strict(1.0)
                    } else {
                        DimensionEval::miss(0.0)
                    }
                }
                _ => DimensionEval::skipped(),
            },
            QuestionId::Format => match preferences.format {
                Some(format) => {
                    if format.matches_tap(item.is_on_tap) {
                        DimensionEval::strict(1.0)
                    } else {
                        DimensionEval::miss(0.0)
                    }
                }
                None => DimensionEval::skipped(),
            },
            QuestionId::Color => match &preferences.color {
                Some(wanted) if !wanted.is_empty() => {
                    if wanted.contains(&item.color) {
                        DimensionEval::strict(1.0)
                    } else {
                        DimensionEval::miss(0.0)
                    }
                }
                _ => DimensionEval::skipped(),
            },
            QuestionId::Style => match preferences.chosen_style() {
                Some(choice) => match &item.style {
                    Some(style) if style.eq_ignore_ascii_case(choice) => {
                        DimensionEval::strict(1.0)
                    }
                    _ => DimensionEval::miss(0.0),
                },
                None => DimensionEval::skipped(),
            },
            QuestionId::Brewery => match preferences.chosen_brewery() {
                Some(choice) => match &item.brewery {
                    Some(brewery) if brewery.eq_ignore_ascii_case(choice) => {
                        DimensionEval::strict(1.0)
                    }
                    _ => DimensionEval::miss(0.0),
                },
                None => DimensionEval::skipped(),
            },
            QuestionId::MaxPrice => match preferences.max_price {
                Some(ceiling) => match item.price_euros() {
                    Some(price) => ceiling_eval(
                        price,
                        ceiling,
                        tolerances.is_price_near_miss(price, ceiling),
                    ),
                    // No price on record: evaluated but unmatchable.
                    None => DimensionEval::miss(0.0),
                },
                None => DimensionEval::skipped(),
            },
            QuestionId::Food | QuestionId::Grape | QuestionId::Region => {
                DimensionEval::skipped()
            }
        }
    }

    fn fragment(
        question: QuestionId,
        item: &Beer,
        preferences: &BeerPreferences,
        tolerances: &Tolerances,
    ) -> Option<String> {
        let outcome = Self::evaluate(question, item, preferences, tolerances).outcome;
        match (question, outcome) {
            (QuestionId::Aromas, MatchOutcome::Strict) => {
                let wanted = preferences.aromas.as_ref()?;
                let names: Vec<&str> = item
                    .tags
                    .iter()
                    .filter(|tag| wanted.contains(&tag.slug))
                    .map(|tag| tag.name.as_str())
                    .collect();
                Some(format!("Correspond à vos arômes préférés : {}", names.join(", ")))
            }
            (QuestionId::MaxAbv, MatchOutcome::Strict) => {
                Some(format!("Taux d'alcool adapté ({}%)", item.abv().normalize()))
            }
            (QuestionId::MaxAbv, MatchOutcome::Near) => Some(format!(
                "Taux d'alcool légèrement au-dessus de votre seuil ({}%)",
                item.abv().normalize()
            )),
            (QuestionId::Bitterness, MatchOutcome::Strict) => {
                Some("Amertume correspondant à vos préférences".to_owned())
            }
            (QuestionId::Color, MatchOutcome::Strict) => Some(format!(
                "Couleur correspondant à vos préférences ({})",
                item.color.label()
            )),
            (QuestionId::Format, MatchOutcome::Strict) => match preferences.format? {
                ServingFormat::Pression => Some("Disponible à la pression".to_owned()),
                ServingFormat::Bouteille => Some("Disponible en bouteille".to_owned()),
            },
            (QuestionId::Style, MatchOutcome::Strict) => Some(format!(
                "Style correspondant à vos préférences ({})",
                item.style.as_deref()?
            )),
            (QuestionId::Brewery, MatchOutcome::Strict) => Some(format!(
                "Brasserie correspondant à vos préférences ({})",
                item.brewery.as_deref()?
            )),
            (QuestionId::MaxPrice, MatchOutcome::Strict) => Some(format!(
                "Prix adapté à votre budget (≤ {}€)",
                preferences.max_price?.normalize()
            )),
            (QuestionId::MaxPrice, MatchOutcome::Near) => Some(format!(
                "Prix légèrement au-dessus de votre budget ({}€)",
                item.price_euros()?.normalize()
            )),
            _ => None,
        }
    }
}
