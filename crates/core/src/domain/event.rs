use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BarId, ItemId};
use crate::questions::DrinkKind;

/// Analytics record emitted for every recommendation served: which items were
/// shown to a guest. Persistence belongs to the caller; the engine only
/// produces and folds these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEvent {
    pub bar_id: BarId,
    pub drink_type: DrinkKind,
    pub item_ids: Vec<ItemId>,
    pub created_at: DateTime<Utc>,
}

/// Count how often each item was shown for one bar and domain since the
/// given instant. Drives the popularity badges on the public menu.
pub fn popularity(
    events: &[RecommendationEvent],
    bar_id: BarId,
    drink_type: DrinkKind,
    since: DateTime<Utc>,
) -> HashMap<ItemId, u32> {
    let mut counts = HashMap::new();
    for event in events {
        if event.bar_id != bar_id || event.drink_type != drink_type || event.created_at < since {
            continue;
        }
        for id in &event.item_ids {
            *counts.entry(*id).or_insert(0) += 1;
        }
    }
    counts
}
