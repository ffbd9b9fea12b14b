//! Price grid completeness.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{AccommodationUnit, TariffPeriod, UnitPrice};

/// A unit with no nightly price under a tariff period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceGap {
    pub unit_id: Uuid,
    pub unit_name: String,
    pub tariff_period_id: Uuid,
    pub period_name: String,
}

/// List every (unit, period) pair without a price, in unit then period order.
pub fn missing_unit_prices(
    units: &[AccommodationUnit],
    periods: &[TariffPeriod],
    prices: &[UnitPrice],
) -> Vec<PriceGap> {
    units
        .iter()
        .flat_map(|unit| {
            periods
                .iter()
                .filter(move |period| {
                    !prices
                        .iter()
                        .any(|p| p.unit_id == unit.id && p.tariff_period_id == period.id)
                })
                .map(move |period| PriceGap {
                    unit_id: unit.id,
                    unit_name: unit.name.clone(),
                    tariff_period_id: period.id,
                    period_name: period.name.clone(),
                })
        })
        .collect()
}
