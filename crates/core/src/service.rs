//! Request-level orchestration: sanitize the bar's question selection, type
//! the raw answers, resolve the active questions, run the pipeline and pair
//! every returned item with its explanation plus the analytics event the
//! caller persists.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::domain::bar::Bar;
use crate::domain::beer::Beer;
use crate::domain::event::RecommendationEvent;
use crate::domain::wine::Wine;
use crate::engine::{BeerDomain, DrinkDomain, Recommender, WineDomain};
use crate::errors::PreferenceError;
use crate::input;
use crate::questions::{self, DrinkKind, QuestionId};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommended<T> {
    pub item: T,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationOutcome<T> {
    /// Ranked items, best first, each with its justification.
    pub recommendations: Vec<Recommended<T>>,
    /// Questions that actually influenced this request.
    pub active_questions: Vec<QuestionId>,
    /// Analytics record of what was shown.
    pub event: RecommendationEvent,
}

#[derive(Clone, Debug, Default)]
pub struct RecommendationService {
    config: EngineConfig,
}

impl RecommendationService {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn recommend_beers(
        &self,
        bar: &Bar,
        catalog: &[Beer],
        answers: &Map<String, Value>,
    ) -> Result<RecommendationOutcome<Beer>, PreferenceError> {
        let selected = bar.selected_questions(DrinkKind::Beer);
        let preferences = input::parse_beer_preferences(answers, &selected)?;
        Ok(self.run::<BeerDomain>(bar, catalog, &preferences, &selected))
    }

    pub fn recommend_wines(
        &self,
        bar: &Bar,
        catalog: &[Wine],
        answers: &Map<String, Value>,
    ) -> Result<RecommendationOutcome<Wine>, PreferenceError> {
        let selected = bar.selected_questions(DrinkKind::Wine);
        let preferences = input::parse_wine_preferences(answers, &selected)?;
        Ok(self.run::<WineDomain>(bar, catalog, &preferences, &selected))
    }

    fn run<D: DrinkDomain>(
        &self,
        bar: &Bar,
        catalog: &[D::Item],
        preferences: &D::Preferences,
        selected: &[QuestionId],
    ) -> RecommendationOutcome<D::Item> {
        let active = questions::resolve_active_questions(selected, preferences);
        let engine = Recommender::<D>::new(self.config.clone());
        let items = engine.recommend(catalog, preferences, &active);

        let event = RecommendationEvent {
            bar_id: bar.id,
            drink_type: D::KIND,
            item_ids: items.iter().map(D::item_id).collect(),
            created_at: Utc::now(),
        };

        let recommendations = items
            .into_iter()
            .map(|item| {
                let explanation = engine.explain(&item, preferences, &active);
                Recommended { item, explanation }
            })
            .collect();

        RecommendationOutcome { recommendations, active_questions: active, event }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::beer::BeerColor;
    use crate::domain::{AromaTag, BarId, ItemId};

    fn bar() -> Bar {
        Bar {
            id: BarId(1),
            name: "Le Comptoir".to_owned(),
            slug: "le-comptoir".to_owned(),
            offers_beer: true,
            offers_wine: false,
            recommendation_questions: vec![
                "aromas".to_owned(),
                "max_abv".to_owned(),
                "format".to_owned(),
            ],
            recommendation_questions_wine: Vec::new(),
        }
    }

    fn beer(id: i64, abv_x10: u32, on_tap: bool, tags: &[(&str, &str)]) -> Beer {
        Beer {
            id: ItemId(id),
            bar_id: BarId(1),
            name: format!("Bière {id}"),
            brewery: None,
            style: None,
            color: BeerColor::Blonde,
            abv_x10,
            ibu: None,
            price: Some(650),
            is_on_tap: on_tap,
            is_available: true,
            tags: tags.iter().map(|(slug, name)| AromaTag::new(*slug, *name)).collect(),
        }
    }

    fn answers() -> Map<String, Value> {
        json!({
            "aromas": ["agrumes"],
            "max_abv": 7,
            "format": "pression",
        })
        .as_object()
        .cloned()
        .expect("object payload")
    }

    #[test]
    fn end_to_end_beer_request_produces_ranked_items_and_event() {
        let catalog = vec![
            beer(2, 55, false, &[("torrefie", "Torréfié")]),
            beer(1, 65, true, &[("agrumes", "Agrumes"), ("fruits", "Fruits")]),
        ];
        let service = RecommendationService::default();
        let outcome = service.recommend_beers(&bar(), &catalog, &answers()).expect("valid");

        assert_eq!(
            outcome.active_questions,
            vec![QuestionId::Aromas, QuestionId::MaxAbv, QuestionId::Format]
        );
        assert_eq!(outcome.recommendations.len(), 1);
        assert_eq!(outcome.recommendations[0].item.id, ItemId(1));
        assert!(outcome.recommendations[0]
            .explanation
            .starts_with("Correspond à vos arômes préférés : Agrumes"));
        assert_eq!(outcome.event.bar_id, BarId(1));
        assert_eq!(outcome.event.drink_type, DrinkKind::Beer);
        assert_eq!(outcome.event.item_ids, vec![ItemId(1)]);
    }

    #[test]
    fn identical_requests_yield_identical_rankings() {
        let catalog = vec![
            beer(1, 65, true, &[("agrumes", "Agrumes")]),
            beer(2, 60, true, &[("agrumes", "Agrumes")]),
            beer(3, 55, true, &[("agrumes", "Agrumes")]),
        ];
        let service = RecommendationService::default();
        let first = service.recommend_beers(&bar(), &catalog, &answers()).expect("valid");
        let second = service.recommend_beers(&bar(), &catalog, &answers()).expect("valid");

        let ids = |outcome: &RecommendationOutcome<Beer>| {
            outcome.recommendations.iter().map(|r| r.item.id).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), vec![ItemId(1), ItemId(2), ItemId(3)]);
    }

    #[test]
    fn unavailable_catalog_yields_an_empty_outcome() {
        let mut hidden = beer(1, 65, true, &[("agrumes", "Agrumes")]);
        hidden.is_available = false;
        let service = RecommendationService::default();
        let outcome =
            service.recommend_beers(&bar(), &[hidden], &answers()).expect("valid");

        assert!(outcome.recommendations.is_empty());
        assert!(outcome.event.item_ids.is_empty());
    }

    #[test]
    fn malformed_answers_surface_as_preference_errors() {
        let raw = json!({ "aromas": "agrumes" }).as_object().cloned().expect("object");
        let service = RecommendationService::default();
        assert!(service.recommend_beers(&bar(), &[], &raw).is_err());
    }
}
