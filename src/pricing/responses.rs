//! Response DTOs for pricing and quote API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::messages::quote::{AvailabilityQuote, ReservationQuote};
use crate::models::{AccommodationUnit, BedType};

use super::calculators::PeriodBreakdown;
use super::money::format_currency;

/// Money value for JSON responses, with its display form
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub formatted: String,
}

impl From<Decimal> for MoneyResponse {
    fn from(amount: Decimal) -> Self {
        Self {
            amount,
            formatted: format_currency(amount),
        }
    }
}

/// Response for stay pricing
#[derive(Debug, Serialize)]
pub struct StayPriceResponse {
    pub total: MoneyResponse,
    /// Length of the stay
    pub nights: i64,
    /// Nights that found a period and a unit price
    pub priced_nights: u32,
    pub breakdown: Vec<PeriodBreakdown>,
}

/// Response for promotion selection; `promotion` is null when none applies
#[derive(Debug, Serialize)]
pub struct PromotionResponse {
    pub promotion: Option<AppliedPromotionResponse>,
}

#[derive(Debug, Serialize)]
pub struct AppliedPromotionResponse {
    pub promotion_id: Uuid,
    pub min_nights: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    pub description: String,
}

/// Response for service pricing
#[derive(Debug, Serialize)]
pub struct ServicePriceResponse {
    pub total: MoneyResponse,
    pub per_day: bool,
}

/// A unit matching an availability search
#[derive(Debug, Serialize)]
pub struct UnitSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub max_capacity: i32,
    pub bed_type: BedType,
}

impl From<AccommodationUnit> for UnitSummary {
    fn from(unit: AccommodationUnit) -> Self {
        Self {
            id: unit.id,
            name: unit.name,
            description: unit.description,
            max_capacity: unit.max_capacity,
            bed_type: unit.bed_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnitSearchResponse {
    pub units: Vec<UnitSummary>,
}

/// Composed availability message
#[derive(Debug, Serialize)]
pub struct AvailabilityMessageResponse {
    pub message: String,
    pub whatsapp_link: String,
    pub quote: AvailabilityQuote,
}

/// Composed reservation summary
#[derive(Debug, Serialize)]
pub struct ReservationMessageResponse {
    pub message: String,
    pub whatsapp_link: String,
    pub total: MoneyResponse,
    pub deposit: MoneyResponse,
    pub quote: ReservationQuote,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_response_carries_display_form() {
        let money = MoneyResponse::from(dec!(12500.5));
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "12500.5");
        assert_eq!(json["formatted"], "$12.500,5");
    }
}
