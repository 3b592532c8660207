use rust_decimal::Decimal;

use super::tolerance::Tolerances;
use super::{ceiling_eval, DimensionEval, DrinkDomain, MatchOutcome};
use crate::domain::wine::Wine;
use crate::domain::ItemId;
use crate::preferences::WinePreferences;
use crate::questions::{DrinkKind, QuestionId};

pub struct WineDomain;

impl DrinkDomain for WineDomain {
    type Item = Wine;
    type Preferences = WinePreferences;

    const KIND: DrinkKind = DrinkKind::Wine;
    const EXPLANATION_ORDER: &'static [QuestionId] = &[
        QuestionId::Aromas,
        QuestionId::Food,
        QuestionId::MaxAbv,
        QuestionId::Color,
        QuestionId::Grape,
        QuestionId::Region,
        QuestionId::MaxPrice,
    ];
    const FALLBACK_EXPLANATION: &'static str = "Sélection basée sur le profil du vin";

    fn item_id(item: &Wine) -> ItemId {
        item.id
    }

    fn is_available(item: &Wine) -> bool {
        item.is_available
    }

    fn abv(item: &Wine) -> Decimal {
        item.abv()
    }

    fn price_euros(item: &Wine) -> Option<Decimal> {
        item.price_euros()
    }

    fn max_abv(preferences: &WinePreferences) -> Option<Decimal> {
        preferences.max_abv
    }

    fn max_price(preferences: &WinePreferences) -> Option<Decimal> {
        preferences.max_price
    }

    fn evaluate(
        question: QuestionId,
        item: &Wine,
        preferences: &WinePreferences,
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
            QuestionId::Food => match &preferences.food_pairings {
                Some(wanted) if !wanted.is_empty() => {
                    let hits =
                        wanted.iter().filter(|pairing| item.food_pairings.contains(pairing)).count();
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
            QuestionId::Grape => match preferences.chosen_grape() {
                Some(choice) => match &item.grape {
                    Some(grape) if grape.eq_ignore_ascii_case(choice) => {
                        DimensionEval::strict(1.0)
                    }
                    _ => DimensionEval::miss(0.0),
                },
                None => DimensionEval::skipped(),
            },
            QuestionId::Region => match preferences.chosen_region() {
                Some(choice) => match &item.region {
                    Some(region) if region.eq_ignore_ascii_case(choice) => {
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
                    None => DimensionEval::miss(0.0),
                },
                None => DimensionEval::skipped(),
            },
            QuestionId::Bitterness
            | QuestionId::Format
            | QuestionId::Style
            | QuestionId::Brewery => DimensionEval::skipped(),
        }
    }

    fn fragment(
        question: QuestionId,
        item: &Wine,
        preferences: &WinePreferences,
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
            (QuestionId::Food, MatchOutcome::Strict) => {
                Some("Accord recommandé avec votre plat".to_owned())
            }
            (QuestionId::MaxAbv, MatchOutcome::Strict) => {
                Some(format!("Taux d'alcool adapté ({}%)", item.abv().normalize()))
            }
            (QuestionId::MaxAbv, MatchOutcome::Near) => Some(format!(
                "Taux d'alcool légèrement au-dessus de votre seuil ({}%)",
                item.abv().normalize()
            )),
            (QuestionId::Color, MatchOutcome::Strict) => Some(format!(
                "Couleur correspondant à vos préférences ({})",
                item.color.label()
            )),
            (QuestionId::Grape, MatchOutcome::Strict) => Some(format!(
                "Cépage correspondant à vos préférences ({})",
                item.grape.as_deref()?
            )),
            (QuestionId::Region, MatchOutcome::Strict) => Some(format!(
                "Région correspondant à vos préférences ({})",
                item.region.as_deref()?
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

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::wine::{FoodPairing, WineColor};
    use crate::domain::{AromaTag, BarId};
    use crate::engine::Recommender;

    fn wine(id: i64, price: Option<u32>) -> Wine {
        Wine {
            id: ItemId(id),
            bar_id: BarId(1),
            name: "Côtes du Rhône".to_owned(),
            color: WineColor::Red,
            grape: Some("Syrah".to_owned()),
            region: Some("Rhône".to_owned()),
            food_pairings: BTreeSet::from([FoodPairing::ViandeRouge, FoodPairing::Fromage]),
            abv_x10: 130,
            price,
            is_available: true,
            tags: vec![AromaTag::new("fruits_rouges", "Fruits rouges")],
        }
    }

    #[test]
    fn food_overlap_is_proportional_to_the_answer() {
        let preferences = WinePreferences {
            food_pairings: Some(BTreeSet::from([
                FoodPairing::ViandeRouge,
                FoodPairing::Poisson,
            ])),
            ..WinePreferences::default()
        };
        let eval = WineDomain::evaluate(
            QuestionId::Food,
            &wine(1, Some(550)),
            &preferences,
            &Tolerances::default(),
        );
        assert_eq!(eval.outcome, MatchOutcome::Strict);
        assert!((eval.factor - 0.5).abs() < 1e-9);
    }

    #[test]
    fn sole_near_miss_on_price_is_rejected_by_the_quality_gate() {
        // 5.50 € wine against a 5 € budget: inside the tolerance window, so
        // hard limits pass, but a lone near-miss is not good enough.
        let preferences = WinePreferences {
            max_price: Some(Decimal::new(5, 0)),
            ..WinePreferences::default()
        };
        let active = [QuestionId::MaxPrice];
        let engine = Recommender::<WineDomain>::default();
        let bottle = wine(1, Some(550));

        assert!(engine.passes_hard_limits(&bottle, &preferences));
        let quality = engine.match_quality(&bottle, &preferences, &active);
        assert_eq!(quality.strict, 0.0);
        assert!(quality.near > 0.0);
        assert!(!engine.passes_overall_threshold(&bottle, &preferences, &active));
        assert!(engine.recommend(&[bottle], &preferences, &active).is_empty());
    }

    #[test]
    fn price_over_the_tolerance_window_fails_hard_limits() {
        let preferences = WinePreferences {
            max_price: Some(Decimal::new(5, 0)),
            ..WinePreferences::default()
        };
        let engine = Recommender::<WineDomain>::default();
        assert!(engine.passes_hard_limits(&wine(1, Some(550)), &preferences));
        assert!(!engine.passes_hard_limits(&wine(2, Some(551)), &preferences));
        // An unpriced wine cannot honor a positive budget ceiling.
        assert!(!engine.passes_hard_limits(&wine(3, None), &preferences));
    }

    #[test]
    fn near_miss_alongside_strict_matches_survives_the_gate() {
        // Budget near-miss plus strict color and food matches: the weighted
        // ratio is (15 + 25 + 0.5 * 15) / 55 ≈ 0.86 — still under 0.9, so
        // the gate rejects; dropping the near weight to zero would too.
        let preferences = WinePreferences {
            color: Some(BTreeSet::from([WineColor::Red])),
            food_pairings: Some(BTreeSet::from([FoodPairing::Fromage])),
            max_price: Some(Decimal::new(5, 0)),
            ..WinePreferences::default()
        };
        let active = [QuestionId::Color, QuestionId::Food, QuestionId::MaxPrice];
        let engine = Recommender::<WineDomain>::default();
        let bottle = wine(1, Some(550));

        let quality = engine.match_quality(&bottle, &preferences, &active);
        assert!(quality.strict > 0.0);
        assert!(quality.near > 0.0);
        let ratio = quality.ratio(0.5).unwrap();
        assert!((ratio - (15.0 + 25.0 + 7.5) / 55.0).abs() < 1e-9);
        assert!(!engine.passes_overall_threshold(&bottle, &preferences, &active));
    }

    #[test]
    fn null_price_counts_against_quality_when_budget_is_active() {
        let preferences = WinePreferences {
            color: Some(BTreeSet::from([WineColor::Red])),
            max_price: Some(Decimal::ZERO),
            ..WinePreferences::default()
        };
        let active = [QuestionId::Color, QuestionId::MaxPrice];
        let engine = Recommender::<WineDomain>::default();
        let quality = engine.match_quality(&wine(1, None), &preferences, &active);
        // Both dimensions count toward the total, only color earns credit.
        assert_eq!(quality.total, 100.0);
        assert_eq!(quality.strict, 50.0);
    }

    #[test]
    fn explanation_mentions_near_missed_budget() {
        let preferences = WinePreferences {
            color: Some(BTreeSet::from([WineColor::Red])),
            max_price: Some(Decimal::new(5, 0)),
            ..WinePreferences::default()
        };
        let active = [QuestionId::Color, QuestionId::MaxPrice];
        let engine = Recommender::<WineDomain>::default();

        assert_eq!(
            engine.explain(&wine(1, Some(550)), &preferences, &active),
            "Couleur correspondant à vos préférences (Rouge). \
             Prix légèrement au-dessus de votre budget (5.5€)."
        );
    }

    #[test]
    fn grape_and_region_match_case_insensitively() {
        let preferences = WinePreferences {
            grape: Some("syrah".to_owned()),
            region: Some("RHÔNE".to_owned()),
            ..WinePreferences::default()
        };
        let tolerances = Tolerances::default();
        let bottle = wine(1, Some(550));
        assert_eq!(
            WineDomain::evaluate(QuestionId::Grape, &bottle, &preferences, &tolerances).outcome,
            MatchOutcome::Strict
        );
        // ASCII folding does not cover the accented capital.
        assert_eq!(
            WineDomain::evaluate(QuestionId::Region, &bottle, &preferences, &tolerances).outcome,
            MatchOutcome::Miss
        );
    }
}
