//! Optional add-on services and their prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Additional service from additional_services
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AdditionalService {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub requires_children_pricing: bool,
}

/// Service price from service_prices
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ServicePrice {
    pub service_id: Uuid,
    pub tariff_period_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub adult_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub child_price: Option<Decimal>,
    /// `None` in the store means per-day pricing.
    #[serde(default)]
    pub per_day: Option<bool>,
}

impl ServicePrice {
    /// Children pay the adult price unless a child price is set.
    pub fn effective_child_price(&self) -> Decimal {
        self.child_price.unwrap_or(self.adult_price)
    }

    pub fn is_per_day(&self) -> bool {
        self.per_day.unwrap_or(true)
    }
}
