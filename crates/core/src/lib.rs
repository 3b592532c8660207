//! Core recommendation engine for the sommelier quiz: a pure, rule-based
//! pipeline matching a bar's beverage catalog against a guest's quiz answers.
//! Storage, HTTP and billing live in collaborating services; this crate only
//! turns (catalog snapshot, answers) into a ranked, explained top-3.

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod input;
pub mod preferences;
pub mod questions;
pub mod service;

pub use config::{ConfigError, EngineConfig};
pub use domain::bar::Bar;
pub use domain::beer::{Beer, BeerColor, Bitterness, ServingFormat};
pub use domain::event::{popularity, RecommendationEvent};
pub use domain::wine::{FoodPairing, Wine, WineColor};
pub use domain::{AromaTag, BarId, ItemId};
pub use engine::{
    BeerDomain, DimensionEval, DrinkDomain, MatchOutcome, MatchQuality, Recommender, Tolerances,
    WineDomain,
};
pub use errors::PreferenceError;
pub use preferences::{BeerPreferences, PreferenceAnswers, WinePreferences, ANY};
pub use questions::{
    catalog, default_questions, normalize_selected, normalized_weights,
    resolve_active_questions, DrinkKind, QuestionDefinition, QuestionId,
};
pub use service::{RecommendationOutcome, RecommendationService, Recommended};
