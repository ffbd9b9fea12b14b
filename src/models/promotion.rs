//! Length-of-stay promotions and the unit/period mapping tables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Promotion from promotions
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub min_nights: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` applies regardless of tariff period.
    #[serde(default)]
    pub tariff_period_id: Option<Uuid>,
}

impl Promotion {
    pub fn matches_period(&self, period_id: Option<Uuid>) -> bool {
        match self.tariff_period_id {
            None => true,
            Some(scope) => Some(scope) == period_id,
        }
    }
}

/// Link restricting a promotion to a unit, from promotion_units
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PromotionUnit {
    pub promotion_id: Uuid,
    pub unit_id: Uuid,
}

/// Unit not offered during a tariff period, from period_excluded_units
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PeriodExclusion {
    pub tariff_period_id: Uuid,
    pub unit_id: Uuid,
}
