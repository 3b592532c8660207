use serde::{Deserialize, Serialize};

use super::BarId;
use crate::questions::{self, DrinkKind, QuestionId};

/// Tenant settings the engine needs: which drink domains the bar offers and
/// which quiz questions it enabled per domain. Configured ids are kept as raw
/// strings since they come from persisted settings and may be stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub id: BarId,
    pub name: String,
    pub slug: String,
    pub offers_beer: bool,
    pub offers_wine: bool,
    #[serde(default)]
    pub recommendation_questions: Vec<String>,
    #[serde(default)]
    pub recommendation_questions_wine: Vec<String>,
}

impl Bar {
    /// Sanitized question selection for one domain.
    pub fn selected_questions(&self, kind: DrinkKind) -> Vec<QuestionId> {
        let configured = match kind {
            DrinkKind::Beer => &self.recommendation_questions,
            DrinkKind::Wine => &self.recommendation_questions_wine,
        };
        questions::normalize_selected(configured, kind)
    }

    /// Drink domains the quiz can offer, given whether each catalog actually
    /// has items. Degrades to beer when nothing qualifies so the quiz always
    /// has a tab to show.
    pub fn available_drink_types(&self, has_beers: bool, has_wines: bool) -> Vec<DrinkKind> {
        let mut kinds = Vec::new();
        if self.offers_beer && has_beers {
            kinds.push(DrinkKind::Beer);
        }
        if self.offers_wine && has_wines {
            kinds.push(DrinkKind::Wine);
        }
        if kinds.is_empty() {
            kinds.push(DrinkKind::Beer);
        }
        kinds
    }
}
