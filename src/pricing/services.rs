//! Pricing service functions with database access.
//!
//! These load a catalog snapshot from the store (through the cache where it
//! helps) and hand it to the pure builders in `quotes`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::error::{AppError, Result};
use crate::messages::quote::{AvailabilityQuote, Guests, ReservationQuote};
use crate::models::{AccommodationUnit, TariffPeriod};

use super::grid::{missing_unit_prices, PriceGap};
use super::quotes::{
    build_availability_quote, build_reservation_quote, offered_units, stay_details,
    PricingCatalog,
};
use super::requests::{AvailabilityQuoteRequest, ReservationQuoteRequest, UnitSearchRequest};

/// Tariff periods, served from the cache when warm.
pub async fn cached_periods(pool: &PgPool, cache: &AppCache) -> Result<Arc<Vec<TariffPeriod>>> {
    if let Some(periods) = cache.periods.get(AppCache::PERIODS_KEY).await {
        debug!("Tariff periods served from cache");
        return Ok(periods);
    }

    debug!("Tariff periods cache miss");
    let seen = cache.period_generation();
    let periods = Arc::new(db::list_tariff_periods(pool).await?);
    cache.insert_periods(periods.clone(), seen).await;
    Ok(periods)
}

fn guests(adults: u32, children: u32) -> Result<Guests> {
    let guests = Guests { adults, children };
    if guests.total() == 0 {
        return Err(AppError::Validation("At least one guest is required".to_string()));
    }
    Ok(guests)
}

/// Units able to host the group for the whole stay.
///
/// Capacity, children, pets and bed layout are filtered by the store; units
/// excluded from a period governing any night are dropped afterwards.
pub async fn find_available_units(
    pool: &PgPool,
    cache: &AppCache,
    query: &UnitSearchRequest,
) -> Result<Vec<AccommodationUnit>> {
    let guests = guests(query.adults, query.children)?;
    let stay = stay_details(query.check_in, query.check_out, guests)?;
    let total_guests = i32::try_from(guests.total())
        .map_err(|_| AppError::Validation("Too many guests".to_string()))?;

    let (units, exclusions, periods) = tokio::try_join!(
        db::search_units(
            pool,
            total_guests,
            guests.children > 0,
            query.pets,
            query.bed_type.bed_type(),
        ),
        db::list_period_exclusions(pool),
        cached_periods(pool, cache),
    )?;

    let catalog = PricingCatalog {
        periods: (*periods).clone(),
        units,
        exclusions,
        ..Default::default()
    };
    let available: Vec<AccommodationUnit> = offered_units(&catalog, &stay)
        .into_iter()
        .cloned()
        .collect();

    debug!(
        "Availability search for {} guests found {} units",
        guests.total(),
        available.len()
    );
    Ok(available)
}

/// Load everything needed to quote the given units.
pub async fn load_catalog(pool: &PgPool, cache: &AppCache, unit_ids: &[Uuid]) -> Result<PricingCatalog> {
    if unit_ids.is_empty() {
        return Err(AppError::Validation("Select at least one unit".to_string()));
    }

    let (units, unit_prices, services, service_prices, promotions, promotion_units, exclusions, periods) =
        tokio::try_join!(
            db::get_units_by_ids(pool, unit_ids),
            db::list_unit_prices(pool, Some(unit_ids)),
            db::list_services(pool),
            db::list_service_prices(pool),
            db::list_promotions(pool),
            db::list_promotion_units(pool),
            db::list_period_exclusions(pool),
            cached_periods(pool, cache),
        )?;

    if units.is_empty() {
        return Err(AppError::NotFound);
    }
    if units.len() < unit_ids.len() {
        warn!(
            "Quote requested {} units but only {} exist",
            unit_ids.len(),
            units.len()
        );
    }

    Ok(PricingCatalog {
        periods: (*periods).clone(),
        units,
        unit_prices,
        services,
        service_prices,
        promotions,
        promotion_units,
        exclusions,
    })
}

pub async fn availability_quote(
    pool: &PgPool,
    cache: &AppCache,
    request: &AvailabilityQuoteRequest,
    default_deposit: Decimal,
) -> Result<AvailabilityQuote> {
    let stay = stay_details(
        request.check_in,
        request.check_out,
        guests(request.adults, request.children)?,
    )?;
    let catalog = load_catalog(pool, cache, &request.unit_ids).await?;

    Ok(build_availability_quote(&catalog, stay, default_deposit)?)
}

pub async fn reservation_quote(
    pool: &PgPool,
    cache: &AppCache,
    request: &ReservationQuoteRequest,
    default_deposit: Decimal,
) -> Result<ReservationQuote> {
    let stay = stay_details(
        request.check_in,
        request.check_out,
        guests(request.adults, request.children)?,
    )?;
    let catalog = load_catalog(pool, cache, &request.unit_ids).await?;

    Ok(build_reservation_quote(
        &catalog,
        stay,
        &request.services,
        default_deposit,
    )?)
}

/// Every unit and period pair lacking a nightly price.
pub async fn price_grid_gaps(pool: &PgPool, cache: &AppCache) -> Result<Vec<PriceGap>> {
    let (units, prices, periods) = tokio::try_join!(
        db::list_units(pool),
        db::list_unit_prices(pool, None),
        cached_periods(pool, cache),
    )?;

    let gaps = missing_unit_prices(&units, &periods, &prices);
    for gap in &gaps {
        warn!(
            "Unit {} has no price for period {}",
            gap.unit_name, gap.period_name
        );
    }
    Ok(gaps)
}
