//! Request DTOs for pricing and quote API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::cache::CacheScope;
use crate::models::{BedType, Promotion, ServicePrice, TariffPeriod, UnitPrice};

/// Request to price a stay for one unit
#[derive(Debug, Deserialize)]
pub struct StayPriceRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub unit_id: Uuid,
    pub unit_prices: Vec<UnitPrice>,
    pub tariff_periods: Vec<TariffPeriod>,
}

/// Request to pick the best promotion for a stay length
#[derive(Debug, Deserialize)]
pub struct PromotionRequest {
    pub nights: u32,
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub tariff_period_id: Option<Uuid>,
}

/// Request to price an additional service
#[derive(Debug, Deserialize)]
pub struct ServicePriceRequest {
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    pub days: u32,
    pub price: ServicePrice,
}

/// Bed layout as asked by the guest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedPreference {
    Double,
    Single,
    #[default]
    Any,
}

impl BedPreference {
    pub fn bed_type(self) -> Option<BedType> {
        match self {
            BedPreference::Double => Some(BedType::Matrimonial),
            BedPreference::Single => Some(BedType::Simple),
            BedPreference::Any => None,
        }
    }
}

/// Availability search
#[derive(Debug, Deserialize)]
pub struct UnitSearchRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub pets: bool,
    #[serde(default)]
    pub bed_type: BedPreference,
}

/// Request to compose an availability message for chosen units
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuoteRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    pub unit_ids: Vec<Uuid>,
}

/// A service the guest wants, with how many people take it
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSelection {
    pub service_id: Uuid,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

/// Request to compose a reservation summary
#[derive(Debug, Deserialize)]
pub struct ReservationQuoteRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    pub unit_ids: Vec<Uuid>,
    #[serde(default)]
    pub services: Vec<ServiceSelection>,
}

/// New content for a message template
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    pub content: String,
}

/// Query for the cache invalidation endpoint; no scope drops everything
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateCacheRequest {
    #[serde(default)]
    pub scope: CacheScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bed_preference_mapping() {
        assert_eq!(BedPreference::Double.bed_type(), Some(BedType::Matrimonial));
        assert_eq!(BedPreference::Single.bed_type(), Some(BedType::Simple));
        assert_eq!(BedPreference::Any.bed_type(), None);
    }

    #[test]
    fn test_unit_search_defaults() {
        let req: UnitSearchRequest = serde_json::from_str(
            r#"{"check_in": "2024-01-10", "check_out": "2024-01-12", "adults": 2}"#,
        )
        .unwrap();
        assert_eq!(req.children, 0);
        assert!(!req.pets);
        assert_eq!(req.bed_type, BedPreference::Any);

        let req: UnitSearchRequest = serde_json::from_str(
            r#"{"check_in": "2024-01-10", "check_out": "2024-01-12", "adults": 2, "bed_type": "double"}"#,
        )
        .unwrap();
        assert_eq!(req.bed_type, BedPreference::Double);
    }
}
