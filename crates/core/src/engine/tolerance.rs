//! The one tolerance formula shared by the hard-limit filter, the quality
//! gate's near-miss detection and the explainer. Keeping it in a single
//! place is what guarantees the three stages agree on which items are
//! "just over" a ceiling.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tolerances {
    /// Relative slack on any ceiling.
    pub ratio: Decimal,
    /// Absolute floor for the ABV slack, percentage points.
    pub abv_abs: Decimal,
    /// Absolute floor for the price slack, currency units.
    pub price_abs: Decimal,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            ratio: Decimal::new(1, 1),      // 0.10
            abv_abs: Decimal::new(5, 1),    // 0.5
            price_abs: Decimal::new(5, 1),  // 0.5
        }
    }
}

impl Tolerances {
    /// Build from f64 configuration values, falling back to the defaults for
    /// anything a `Decimal` cannot represent.
    pub fn from_f64(ratio: f64, abv_abs: f64, price_abs: f64) -> Self {
        let defaults = Self::default();
        Self {
            ratio: Decimal::from_f64(ratio).unwrap_or(defaults.ratio),
            abv_abs: Decimal::from_f64(abv_abs).unwrap_or(defaults.abv_abs),
            price_abs: Decimal::from_f64(price_abs).unwrap_or(defaults.price_abs),
        }
    }

    /// `ceiling + max(ceiling * ratio, absolute)` — the largest value still
    /// allowed through the hard-limit filter.
    fn max_allowed(&self, ceiling: Decimal, absolute: Decimal) -> Decimal {
        ceiling + (ceiling * self.ratio).max(absolute)
    }

    pub fn max_allowed_abv(&self, ceiling: Decimal) -> Decimal {
        self.max_allowed(ceiling, self.abv_abs)
    }

    pub fn max_allowed_price(&self, ceiling: Decimal) -> Decimal {
        self.max_allowed(ceiling, self.price_abs)
    }

    fn is_near_miss(&self, value: Decimal, ceiling: Decimal, absolute: Decimal) -> bool {
        if ceiling <= Decimal::ZERO {
            return false;
        }
        value > ceiling && value <= self.max_allowed(ceiling, absolute)
    }

    /// The value exceeds the ceiling but stays inside the tolerance window.
    pub fn is_abv_near_miss(&self, value: Decimal, ceiling: Decimal) -> bool {
        self.is_near_miss(value, ceiling, self.abv_abs)
    }

    pub fn is_price_near_miss(&self, value: Decimal, ceiling: Decimal) -> bool {
        self.is_near_miss(value, ceiling, self.price_abs)
    }
}
