//! The recommendation pipeline, generic over the drink domain: availability
//! filter, hard-limit filter, quality gate, weighted scorer and explainer.
//! A single `Recommender` instance serves any number of requests; the whole
//! pipeline is a pure function of (catalog snapshot, preferences).

pub mod beer;
pub mod tolerance;
pub mod wine;

use std::cmp::Ordering;
use std::marker::PhantomData;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::domain::ItemId;
use crate::preferences::PreferenceAnswers;
use crate::questions::{self, DrinkKind, QuestionId};

pub use beer::BeerDomain;
pub use tolerance::Tolerances;
pub use wine::WineDomain;

/// Score factor applied when an item exceeds a numeric ceiling: a fixed
/// penalty, not scaled by how far over the item is.
pub(crate) const CEILING_PENALTY: f64 = -0.8;

/// How one active preference dimension relates to one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Exact or within-limit match; earns the full normalized weight in the
    /// quality gate.
    Strict,
    /// Over a numeric ceiling but inside the tolerance window; earns reduced
    /// credit and can never carry an item alone.
    Near,
    /// Evaluated and not matched.
    Miss,
    /// Not evaluable for this item (e.g. bitterness with no IBU on record);
    /// excluded from the quality total.
    Skipped,
}

/// Outcome of evaluating one dimension: the quality classification plus the
/// factor the scorer multiplies into the dimension's normalized weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimensionEval {
    pub outcome: MatchOutcome,
    pub factor: f64,
}

impl DimensionEval {
    pub fn strict(factor: f64) -> Self {
        Self { outcome: MatchOutcome::Strict, factor }
    }

    pub fn near(factor: f64) -> Self {
        Self { outcome: MatchOutcome::Near, factor }
    }

    pub fn miss(factor: f64) -> Self {
        Self { outcome: MatchOutcome::Miss, factor }
    }

    pub fn skipped() -> Self {
        Self { outcome: MatchOutcome::Skipped, factor: 0.0 }
    }
}

/// Shared evaluation for the two numeric ceiling dimensions. Under the
/// ceiling the reward grows proportionally toward it and never exceeds the
/// full weight; over it the fixed penalty applies, with the tolerance window
/// deciding between a near-miss and a plain miss.
pub(crate) fn ceiling_eval(value: Decimal, ceiling: Decimal, near_miss: bool) -> DimensionEval {
    if value <= ceiling {
        let reward = (value / ceiling.max(Decimal::ONE)).to_f64().unwrap_or(0.0);
        DimensionEval::strict(reward)
    } else if near_miss {
        DimensionEval::near(CEILING_PENALTY)
    } else {
        DimensionEval::miss(CEILING_PENALTY)
    }
}

/// Strategy seam between the generic pipeline and a concrete drink domain.
pub trait DrinkDomain {
    type Item: Clone;
    type Preferences: PreferenceAnswers;

    const KIND: DrinkKind;
    /// Fixed order explanation fragments appear in.
    const EXPLANATION_ORDER: &'static [QuestionId];
    /// Sentence used when no dimension produced a fragment.
    const FALLBACK_EXPLANATION: &'static str;

    fn item_id(item: &Self::Item) -> ItemId;
    fn is_available(item: &Self::Item) -> bool;
    fn abv(item: &Self::Item) -> Decimal;
    fn price_euros(item: &Self::Item) -> Option<Decimal>;
    fn max_abv(preferences: &Self::Preferences) -> Option<Decimal>;
    fn max_price(preferences: &Self::Preferences) -> Option<Decimal>;

    /// Evaluate one dimension of one item. Only called for questions that
    /// belong to this domain and are active for the request.
    fn evaluate(
        question: QuestionId,
        item: &Self::Item,
        preferences: &Self::Preferences,
        tolerances: &Tolerances,
    ) -> DimensionEval;

    /// Localized justification for one dimension, when it matched (or
    /// near-missed a numeric ceiling). Must agree with [`Self::evaluate`].
    fn fragment(
        question: QuestionId,
        item: &Self::Item,
        preferences: &Self::Preferences,
        tolerances: &Tolerances,
    ) -> Option<String>;
}

/// Aggregate match quality of one item across the active dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatchQuality {
    pub strict: f64,
    pub near: f64,
    pub total: f64,
}

impl MatchQuality {
    /// Ratio of earned credit to evaluated weight, with near-misses counted
    /// at `near_weight`. `None` when nothing was evaluated.
    pub fn ratio(&self, near_weight: f64) -> Option<f64> {
        if self.total == 0.0 {
            return None;
        }
        Some((self.strict + self.near * near_weight) / self.total)
    }
}

pub struct Recommender<D: DrinkDomain> {
    config: EngineConfig,
    tolerances: Tolerances,
    _domain: PhantomData<D>,
}

impl<D: DrinkDomain> Default for Recommender<D> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<D: DrinkDomain> Recommender<D> {
    pub fn new(config: EngineConfig) -> Self {
        let tolerances = config.tolerances();
        Self { config, tolerances, _domain: PhantomData }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Run the full pipeline over a catalog snapshot and return the top
    /// matches, best first. Empty output means "no good match", never an
    /// error.
    pub fn recommend(
        &self,
        catalog: &[D::Item],
        preferences: &D::Preferences,
        active: &[QuestionId],
    ) -> Vec<D::Item> {
        let available: Vec<&D::Item> =
            catalog.iter().filter(|item| D::is_available(item)).collect();
        if available.is_empty() {
            return Vec::new();
        }

        let within_limits: Vec<&D::Item> = available
            .into_iter()
            .filter(|item| self.passes_hard_limits(item, preferences))
            .collect();
        if within_limits.is_empty() {
            tracing::debug!(kind = %D::KIND, "all candidates rejected by hard limits");
            return Vec::new();
        }

        let candidates: Vec<&D::Item> = within_limits
            .into_iter()
            .filter(|item| self.passes_overall_threshold(item, preferences, active))
            .collect();
        if candidates.is_empty() {
            tracing::debug!(kind = %D::KIND, "all candidates rejected by the quality gate");
            return Vec::new();
        }

        let mut scored: Vec<(f64, &D::Item)> = candidates
            .into_iter()
            .map(|item| (self.score(item, preferences, active), item))
            .collect();
        // Stable sort: catalog order breaks exact score ties.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        tracing::debug!(
            kind = %D::KIND,
            candidates = scored.len(),
            returned = scored.len().min(self.config.max_results),
            "scored recommendation candidates"
        );

        scored.into_iter().take(self.config.max_results).map(|(_, item)| item.clone()).collect()
    }

    /// Non-negotiable ceiling check, applied before any scoring. A ceiling
    /// only binds when answered with a positive value; the price ceiling
    /// additionally rejects items with no price on record.
    pub fn passes_hard_limits(&self, item: &D::Item, preferences: &D::Preferences) -> bool {
        if let Some(ceiling) = D::max_abv(preferences) {
            if ceiling > Decimal::ZERO && D::abv(item) > self.tolerances.max_allowed_abv(ceiling) {
                return false;
            }
        }

        if let Some(ceiling) = D::max_price(preferences) {
            if ceiling > Decimal::ZERO {
                let Some(price) = D::price_euros(item) else { return false };
                if price > self.tolerances.max_allowed_price(ceiling) {
                    return false;
                }
            }
        }

        true
    }

    /// Classify every active dimension for one item.
    pub fn match_quality(
        &self,
        item: &D::Item,
        preferences: &D::Preferences,
        active: &[QuestionId],
    ) -> MatchQuality {
        let weights = questions::normalized_weights(D::KIND, active);
        let mut quality = MatchQuality::default();

        for question in active {
            let Some(weight) = weights.get(question).copied() else { continue };
            match D::evaluate(*question, item, preferences, &self.tolerances).outcome {
                MatchOutcome::Strict => {
                    quality.strict += weight;
                    quality.total += weight;
                }
                MatchOutcome::Near => {
                    quality.near += weight;
                    quality.total += weight;
                }
                MatchOutcome::Miss => quality.total += weight,
                MatchOutcome::Skipped => {}
            }
        }

        quality
    }

    /// Quality gate: an item passes when nothing was evaluated, fails when
    /// its only credit is near-misses, and otherwise needs a credit ratio of
    /// at least the configured threshold.
    pub fn passes_overall_threshold(
        &self,
        item: &D::Item,
        preferences: &D::Preferences,
        active: &[QuestionId],
    ) -> bool {
        let quality = self.match_quality(item, preferences, active);
        let Some(ratio) = quality.ratio(self.config.near_weight) else {
            return true;
        };
        if quality.strict <= 0.0 && quality.near > 0.0 {
            return false;
        }
        ratio >= self.config.quality_threshold
    }

    /// Continuous weighted score across the active dimensions, clamped at
    /// zero.
    pub fn score(
        &self,
        item: &D::Item,
        preferences: &D::Preferences,
        active: &[QuestionId],
    ) -> f64 {
        let weights = questions::normalized_weights(D::KIND, active);
        let mut score = 0.0;

        for question in active {
            let Some(weight) = weights.get(question).copied() else { continue };
            if weight <= 0.0 {
                continue;
            }
            score += weight * D::evaluate(*question, item, preferences, &self.tolerances).factor;
        }

        score.max(0.0)
    }

    /// Human-readable justification for one recommended item. Re-derives the
    /// per-dimension outcomes through the same evaluation the gate and the
    /// scorer use, so the prose never contradicts the ranking.
    pub fn explain(
        &self,
        item: &D::Item,
        preferences: &D::Preferences,
        active: &[QuestionId],
    ) -> String {
        let fragments: Vec<String> = D::EXPLANATION_ORDER
            .iter()
            .filter(|question| active.contains(question))
            .filter_map(|question| D::fragment(*question, item, preferences, &self.tolerances))
            .collect();

        if fragments.is_empty() {
            return D::FALLBACK_EXPLANATION.to_owned();
        }

        format!("{}.", fragments.join(". "))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::beer::{Beer, BeerColor};
    use crate::domain::{AromaTag, BarId};
    use crate::preferences::BeerPreferences;

    fn beer(id: i64, abv_x10: u32, price: Option<u32>) -> Beer {
        Beer {
            id: ItemId(id),
            bar_id: BarId(1),
            name: format!("Bière {id}"),
            brewery: None,
            style: None,
            color: BeerColor::Amber,
            abv_x10,
            ibu: None,
            price,
            is_on_tap: true,
            is_available: true,
            tags: vec![AromaTag::new("agrumes", "Agrumes")],
        }
    }

    fn engine() -> Recommender<BeerDomain> {
        Recommender::default()
    }

    #[test]
    fn scores_never_go_below_zero() {
        // Both ceilings violated: two fixed penalties and nothing earned.
        let preferences = BeerPreferences {
            max_abv: Some(Decimal::new(4, 0)),
            max_price: Some(Decimal::new(2, 0)),
            ..BeerPreferences::default()
        };
        let active = [QuestionId::MaxAbv, QuestionId::MaxPrice];
        let score = engine().score(&beer(1, 90, Some(900)), &preferences, &active);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn empty_catalog_short_circuits_to_an_empty_list() {
        let preferences = BeerPreferences::default();
        assert!(engine().recommend(&[], &preferences, &[]).is_empty());

        let mut unavailable = beer(1, 50, Some(500));
        unavailable.is_available = false;
        assert!(engine().recommend(&[unavailable], &preferences, &[]).is_empty());
    }

    #[test]
    fn no_active_questions_passes_everything_through_catalog_order() {
        let catalog = vec![beer(1, 50, None), beer(2, 60, None), beer(3, 70, None)];
        let ranked = engine().recommend(&catalog, &BeerPreferences::default(), &[]);
        // All scores are zero; the stable sort keeps catalog order.
        assert_eq!(
            ranked.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![ItemId(1), ItemId(2), ItemId(3)]
        );
    }

    #[test]
    fn at_most_the_configured_number_of_items_is_returned() {
        let catalog: Vec<Beer> = (1..=5).map(|id| beer(id, 50, Some(500))).collect();
        let preferences = BeerPreferences {
            aromas: Some(BTreeSet::from(["agrumes".to_owned()])),
            ..BeerPreferences::default()
        };
        let ranked = engine().recommend(&catalog, &preferences, &[QuestionId::Aromas]);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].id, ItemId(1));
    }

    #[test]
    fn applied_weight_never_exceeds_one_hundred() {
        // max_abv applies (strict), bitterness is skipped for lack of IBU:
        // the achievable score tops out below 100.
        let preferences = BeerPreferences {
            bitterness: Some(crate::domain::beer::Bitterness::Faible),
            max_abv: Some(Decimal::new(5, 0)),
            ..BeerPreferences::default()
        };
        let active = [QuestionId::Bitterness, QuestionId::MaxAbv];
        let score = engine().score(&beer(1, 50, None), &preferences, &active);
        let abv_weight = questions::normalized_weights(DrinkKind::Beer, &active)
            [&QuestionId::MaxAbv];
        assert!((score - abv_weight).abs() < 1e-9);
        assert!(score <= 100.0);
    }

    #[test]
    fn quality_gate_passes_when_nothing_was_evaluated() {
        let preferences = BeerPreferences {
            bitterness: Some(crate::domain::beer::Bitterness::Faible),
            ..BeerPreferences::default()
        };
        // Bitterness is active but skipped (no IBU): total stays zero.
        let item = beer(1, 50, None);
        assert!(engine().passes_overall_threshold(
            &item,
            &preferences,
            &[QuestionId::Bitterness]
        ));
    }

    #[test]
    fn hard_limit_boundary_is_inclusive() {
        let preferences = BeerPreferences {
            max_abv: Some(Decimal::new(7, 0)),
            ..BeerPreferences::default()
        };
        // 7.7 sits exactly on ceiling * 1.10.
        assert!(engine().passes_hard_limits(&beer(1, 77, None), &preferences));
        assert!(!engine().passes_hard_limits(&beer(2, 78, None), &preferences));
    }

    #[test]
    fn zero_ceilings_do_not_hard_limit() {
        let preferences = BeerPreferences {
            max_abv: Some(Decimal::ZERO),
            max_price: Some(Decimal::ZERO),
            ..BeerPreferences::default()
        };
        assert!(engine().passes_hard_limits(&beer(1, 90, None), &preferences));
    }
}
