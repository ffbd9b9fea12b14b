//! Core pricing calculation functions.
//!
//! Pure functions for stay, promotion and service pricing - no database access.
//! Amounts are never rounded here; rounding happens only when formatting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::models::{Promotion, ServicePrice, TariffPeriod, UnitPrice};

use super::periods::PeriodResolver;

/// Longest stay the calculators accept, in nights.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    StayTooLong {
        nights: i64,
        max: i64,
    },
    /// An amount left the representable decimal range.
    Overflow,
}

impl PricingError {
    /// Structured context for error responses
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            PricingError::InvalidRange { check_in, check_out } => Some(serde_json::json!({
                "check_in": check_in,
                "check_out": check_out,
            })),
            PricingError::StayTooLong { nights, max } => Some(serde_json::json!({
                "nights": nights,
                "max_nights": max,
            })),
            PricingError::Overflow => None,
        }
    }
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidRange { check_in, check_out } => write!(
                f,
                "Check-out {} must be after check-in {}",
                check_out, check_in
            ),
            PricingError::StayTooLong { nights, max } => {
                write!(f, "Stay of {} nights exceeds the maximum of {}", nights, max)
            }
            PricingError::Overflow => write!(f, "Amount is too large to calculate"),
        }
    }
}

impl std::error::Error for PricingError {}

fn checked(amount: Option<Decimal>) -> Result<Decimal, PricingError> {
    amount.ok_or(PricingError::Overflow)
}

/// Reject stays longer than `MAX_STAY_NIGHTS`.
pub fn check_stay_length(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), PricingError> {
    let nights = (check_out - check_in).num_days();
    if nights > MAX_STAY_NIGHTS {
        return Err(PricingError::StayTooLong {
            nights,
            max: MAX_STAY_NIGHTS,
        });
    }
    Ok(())
}

/// Nights spent under one tariff period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBreakdown {
    pub period_name: String,
    pub nights: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
}

/// Result of stay price calculation
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StayPrice {
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub breakdown: Vec<PeriodBreakdown>,
}

impl StayPrice {
    /// Nights that found both a period and a unit price.
    pub fn priced_nights(&self) -> u32 {
        self.breakdown.iter().map(|b| b.nights).sum()
    }
}

/// Calculate the price of a stay for one unit, night by night.
///
/// Each night is priced under the period that governs it. Nights outside every
/// period, or under a period the unit has no price for, contribute nothing.
/// Breakdown rows accumulate per period name whether or not the nights are
/// contiguous, in order of first appearance.
///
/// A stay whose check-out equals its check-in costs nothing; a check-out before
/// check-in is an `InvalidRange`. Stays over `MAX_STAY_NIGHTS` and totals
/// outside the decimal range are errors too.
pub fn calculate_stay_price(
    check_in: NaiveDate,
    check_out: NaiveDate,
    unit_id: Uuid,
    unit_prices: &[UnitPrice],
    periods: &[TariffPeriod],
) -> Result<StayPrice, PricingError> {
    if check_out < check_in {
        return Err(PricingError::InvalidRange { check_in, check_out });
    }
    check_stay_length(check_in, check_out)?;

    let resolver = PeriodResolver::new(periods);
    let mut stay = StayPrice::default();

    for (_, period) in resolver.resolve_stay(check_in, check_out) {
        let Some(period) = period else {
            continue;
        };

        // First matching row is authoritative
        let Some(price) = unit_prices
            .iter()
            .find(|up| up.unit_id == unit_id && up.tariff_period_id == period.id)
        else {
            continue;
        };

        match stay
            .breakdown
            .iter_mut()
            .find(|b| b.period_name == period.name)
        {
            Some(row) => {
                row.nights += 1;
                row.subtotal = checked(row.subtotal.checked_add(price.price_per_night))?;
            }
            None => stay.breakdown.push(PeriodBreakdown {
                period_name: period.name.clone(),
                nights: 1,
                price_per_night: price.price_per_night,
                subtotal: price.price_per_night,
            }),
        }

        stay.total = checked(stay.total.checked_add(price.price_per_night))?;
    }

    Ok(stay)
}

/// Promotion selected for a stay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedPromotion {
    pub promotion_id: Uuid,
    pub min_nights: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    pub description: String,
}

/// Select the best promotion unlocked by a stay of `nights` nights.
///
/// Candidates need `nights >= min_nights` and either no period scope or a scope
/// equal to `period_id`. The greatest discount wins; on ties the first one
/// encountered is kept.
pub fn calculate_promotion(
    nights: u32,
    promotions: &[Promotion],
    period_id: Option<Uuid>,
) -> Option<AppliedPromotion> {
    let best = promotions
        .iter()
        .filter(|p| i64::from(nights) >= i64::from(p.min_nights) && p.matches_period(period_id))
        .fold(None::<&Promotion>, |best, current| match best {
            Some(b) if current.discount_percentage <= b.discount_percentage => Some(b),
            _ => Some(current),
        })?;

    Some(AppliedPromotion {
        promotion_id: best.id,
        min_nights: best.min_nights,
        percentage: best.discount_percentage,
        description: promotion_description(best),
    })
}

/// Human-readable promotion text; the stored description takes precedence.
pub fn promotion_description(promotion: &Promotion) -> String {
    match promotion.description.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!(
            "{} noches o más: {}% de descuento",
            promotion.min_nights,
            promotion.discount_percentage.normalize()
        ),
    }
}

/// `amount * (1 - percentage / 100)`
pub fn apply_discount(amount: Decimal, percentage: Decimal) -> Result<Decimal, PricingError> {
    let factor = checked(Decimal::ONE.checked_sub(percentage / Decimal::ONE_HUNDRED))?;
    checked(amount.checked_mul(factor))
}

/// `total * percentage / 100`
pub fn calculate_deposit(total: Decimal, percentage: Decimal) -> Result<Decimal, PricingError> {
    let deposit = checked(total.checked_mul(percentage))?;
    Ok(deposit / Decimal::ONE_HUNDRED)
}

/// Cost of a service for a group of guests.
///
/// `(adults * adult_price + children * child_price) * days` for per-day
/// services, without the `days` factor otherwise. The caller chooses `days`.
pub fn calculate_service_price(
    adults: u32,
    children: u32,
    days: u32,
    price: &ServicePrice,
) -> Result<Decimal, PricingError> {
    let adult_total = checked(Decimal::from(adults).checked_mul(price.adult_price))?;
    let child_total = checked(Decimal::from(children).checked_mul(price.effective_child_price()))?;
    let daily_total = checked(adult_total.checked_add(child_total))?;

    if price.is_per_day() {
        checked(daily_total.checked_mul(Decimal::from(days)))
    } else {
        Ok(daily_total)
    }
}
