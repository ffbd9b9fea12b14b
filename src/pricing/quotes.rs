//! Assembly of availability and reservation quotes from a catalog snapshot.
//!
//! Pure functions over data already loaded from the store; see
//! `services` for the loading side.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

use crate::messages::quote::{
    AvailabilityQuote, AvailableUnit, Guests, PromotionBanner, ReservationQuote,
    ReservationService, ReservationUnit, ServiceOffer, StayDetails, UnitDiscount,
};
use crate::models::{
    AccommodationUnit, AdditionalService, PeriodExclusion, Promotion, PromotionUnit, ServicePrice,
    TariffPeriod, UnitPrice,
};

use super::calculators::{
    apply_discount, calculate_deposit, calculate_promotion, calculate_service_price,
    calculate_stay_price, check_stay_length, promotion_description, PricingError,
};
use super::periods::PeriodResolver;
use super::requests::ServiceSelection;

/// Everything needed to quote a stay, as read from the store.
#[derive(Debug, Clone, Default)]
pub struct PricingCatalog {
    pub periods: Vec<TariffPeriod>,
    pub units: Vec<AccommodationUnit>,
    pub unit_prices: Vec<UnitPrice>,
    pub services: Vec<AdditionalService>,
    pub service_prices: Vec<ServicePrice>,
    pub promotions: Vec<Promotion>,
    pub promotion_units: Vec<PromotionUnit>,
    pub exclusions: Vec<PeriodExclusion>,
}

impl PricingCatalog {
    /// Promotions valid for a unit. A promotion without unit links applies to
    /// every unit.
    pub fn promotions_for_unit(&self, unit_id: Uuid) -> Vec<Promotion> {
        self.promotions
            .iter()
            .filter(|p| {
                let mut links = self
                    .promotion_units
                    .iter()
                    .filter(|link| link.promotion_id == p.id)
                    .peekable();
                links.peek().is_none() || links.any(|link| link.unit_id == unit_id)
            })
            .cloned()
            .collect()
    }

    pub fn is_excluded(&self, unit_id: Uuid, period_id: Uuid) -> bool {
        self.exclusions
            .iter()
            .any(|e| e.unit_id == unit_id && e.tariff_period_id == period_id)
    }

    /// Price row for the given period, else the service's first row.
    pub fn service_price_for(&self, service_id: Uuid, period_id: Option<Uuid>) -> Option<&ServicePrice> {
        let mut rows = self.service_prices.iter().filter(|p| p.service_id == service_id);
        let first = rows.clone().next();
        rows.find(|p| Some(p.tariff_period_id) == period_id).or(first)
    }
}

/// Validate the stay range and count its nights. Quotes need at least one
/// night and no more than `MAX_STAY_NIGHTS`.
pub fn stay_details(
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: Guests,
) -> Result<StayDetails, PricingError> {
    let nights = (check_out - check_in).num_days();
    if nights < 1 {
        return Err(PricingError::InvalidRange { check_in, check_out });
    }
    check_stay_length(check_in, check_out)?;

    Ok(StayDetails {
        check_in,
        check_out,
        nights: nights as u32,
        guests,
    })
}

/// Context shared by both quote builders
struct StayContext<'a> {
    resolver: PeriodResolver<'a>,
    check_in_period: Option<&'a TariffPeriod>,
    governing: HashSet<Uuid>,
}

impl<'a> StayContext<'a> {
    fn new(catalog: &'a PricingCatalog, stay: &StayDetails) -> Self {
        let resolver = PeriodResolver::new(&catalog.periods);
        let check_in_period = resolver.resolve(stay.check_in);
        let governing = resolver
            .resolve_stay(stay.check_in, stay.check_out)
            .into_iter()
            .filter_map(|(_, p)| p.map(|p| p.id))
            .collect();

        Self {
            resolver,
            check_in_period,
            governing,
        }
    }

    fn period_id(&self) -> Option<Uuid> {
        self.check_in_period.map(|p| p.id)
    }

    fn deposit_percentage(&self, default: Decimal) -> Decimal {
        self.check_in_period
            .map(|p| p.deposit_percentage)
            .unwrap_or(default)
    }
}

/// Units not excluded from any period governing a night of the stay.
pub fn offered_units<'a>(catalog: &'a PricingCatalog, stay: &StayDetails) -> Vec<&'a AccommodationUnit> {
    let ctx = StayContext::new(catalog, stay);
    offered_in(catalog, &ctx)
}

fn offered_in<'a>(catalog: &'a PricingCatalog, ctx: &StayContext<'_>) -> Vec<&'a AccommodationUnit> {
    catalog
        .units
        .iter()
        .filter(|unit| {
            let excluded = ctx
                .governing
                .iter()
                .any(|period_id| catalog.is_excluded(unit.id, *period_id));
            if excluded {
                tracing::debug!("Unit {} excluded for this stay", unit.name);
            }
            !excluded
        })
        .collect()
}

/// Stay total for a unit, warning when some nights had no price.
fn priced_stay(
    catalog: &PricingCatalog,
    ctx: &StayContext<'_>,
    unit: &AccommodationUnit,
    stay: &StayDetails,
) -> Result<Decimal, PricingError> {
    let price = calculate_stay_price(
        stay.check_in,
        stay.check_out,
        unit.id,
        &catalog.unit_prices,
        &catalog.periods,
    )?;

    if price.priced_nights() < stay.nights {
        let unpriced: Vec<String> = ctx
            .resolver
            .resolve_stay(stay.check_in, stay.check_out)
            .into_iter()
            .filter(|(_, period)| {
                period.map_or(true, |p| {
                    !catalog
                        .unit_prices
                        .iter()
                        .any(|up| up.unit_id == unit.id && up.tariff_period_id == p.id)
                })
            })
            .map(|(night, _)| night.to_string())
            .collect();
        tracing::warn!(
            "Unit {} has no price for nights {:?}; they are quoted at zero",
            unit.name,
            unpriced
        );
    }

    Ok(price.total)
}

/// Promotions unlocked by the stay for at least one offered unit, lowest
/// threshold first.
pub fn qualifying_promotions(catalog: &PricingCatalog, stay: &StayDetails) -> Vec<PromotionBanner> {
    let ctx = StayContext::new(catalog, stay);
    let offered = offered_in(catalog, &ctx);
    banners_for(catalog, &ctx, &offered, stay)
}

fn banners_for(
    catalog: &PricingCatalog,
    ctx: &StayContext<'_>,
    offered: &[&AccommodationUnit],
    stay: &StayDetails,
) -> Vec<PromotionBanner> {
    let period_id = ctx.period_id();
    let reaches_offered_unit = |promotion: &Promotion| {
        offered.iter().any(|unit| {
            catalog
                .promotions_for_unit(unit.id)
                .iter()
                .any(|p| p.id == promotion.id)
        })
    };

    let mut banners: Vec<PromotionBanner> = catalog
        .promotions
        .iter()
        .filter(|p| i64::from(stay.nights) >= i64::from(p.min_nights) && p.matches_period(period_id))
        .filter(|p| reaches_offered_unit(p))
        .map(|p| PromotionBanner {
            min_nights: p.min_nights,
            percentage: p.discount_percentage,
            description: promotion_description(p),
        })
        .collect();
    banners.sort_by_key(|b| b.min_nights);
    banners
}

pub fn build_availability_quote(
    catalog: &PricingCatalog,
    stay: StayDetails,
    default_deposit: Decimal,
) -> Result<AvailabilityQuote, PricingError> {
    let ctx = StayContext::new(catalog, &stay);
    let nights = Decimal::from(stay.nights);

    let offered = offered_in(catalog, &ctx);

    let mut units = Vec::new();
    for unit in &offered {
        let total = priced_stay(catalog, &ctx, unit, &stay)?;
        let price_per_night = total / nights;
        let promotion = calculate_promotion(
            stay.nights,
            &catalog.promotions_for_unit(unit.id),
            ctx.period_id(),
        );
        let discount = match promotion {
            Some(p) => Some(UnitDiscount {
                percentage: p.percentage,
                price_per_night: apply_discount(price_per_night, p.percentage)?,
            }),
            None => None,
        };

        units.push(AvailableUnit {
            name: unit.name.clone(),
            price_per_night,
            discount,
        });
    }

    let services = catalog
        .services
        .iter()
        .filter_map(|service| {
            let price = catalog.service_price_for(service.id, ctx.period_id())?;
            Some(ServiceOffer {
                name: service.name.clone(),
                description: service.description.clone(),
                adult_price: price.adult_price,
                child_price: price.child_price,
                per_day: price.is_per_day(),
            })
        })
        .collect();

    Ok(AvailabilityQuote {
        promotions: banners_for(catalog, &ctx, &offered, &stay),
        units,
        services,
        deposit_percentage: ctx.deposit_percentage(default_deposit),
        stay,
    })
}

pub fn build_reservation_quote(
    catalog: &PricingCatalog,
    stay: StayDetails,
    selections: &[ServiceSelection],
    default_deposit: Decimal,
) -> Result<ReservationQuote, PricingError> {
    let ctx = StayContext::new(catalog, &stay);
    let nights = Decimal::from(stay.nights);

    let mut units = Vec::new();
    for unit in offered_in(catalog, &ctx) {
        let total = priced_stay(catalog, &ctx, unit, &stay)?;
        let promotion = calculate_promotion(
            stay.nights,
            &catalog.promotions_for_unit(unit.id),
            ctx.period_id(),
        );

        units.push(ReservationUnit {
            name: unit.name.clone(),
            nights: stay.nights,
            price_per_night: total / nights,
            subtotal: match &promotion {
                Some(p) => apply_discount(total, p.percentage)?,
                None => total,
            },
            discount_percentage: promotion.map(|p| p.percentage),
        });
    }

    let mut services = Vec::new();
    for selection in selections {
        let Some(service) = catalog.services.iter().find(|s| s.id == selection.service_id) else {
            tracing::warn!("Unknown service {} in reservation", selection.service_id);
            continue;
        };
        let Some(price) = catalog.service_price_for(service.id, ctx.period_id()) else {
            tracing::warn!("Service {} has no price; left out of the reservation", service.name);
            continue;
        };

        let days = if price.is_per_day() { stay.nights } else { 1 };
        services.push(ReservationService {
            name: service.name.clone(),
            adults: selection.adults,
            children: selection.children,
            days,
            price_per_person: price.adult_price,
            subtotal: calculate_service_price(selection.adults, selection.children, days, price)?,
        });
    }

    let total = units
        .iter()
        .map(|u| u.subtotal)
        .chain(services.iter().map(|s| s.subtotal))
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or(PricingError::Overflow)?;
    let deposit_percentage = ctx.deposit_percentage(default_deposit);

    Ok(ReservationQuote {
        stay,
        units,
        services,
        total,
        deposit_percentage,
        deposit: calculate_deposit(total, deposit_percentage)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BedType, Degree};
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn unit(name: &str) -> AccommodationUnit {
        AccommodationUnit {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            min_capacity: 1,
            max_capacity: 4,
            allows_children: true,
            allows_pets: false,
            bed_type: BedType::Combinable,
        }
    }

    fn period(name: &str, start: &str, end: &str, deposit: Decimal) -> TariffPeriod {
        TariffPeriod {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_date: date(start),
            end_date: date(end),
            degree: Degree::First,
            deposit_percentage: deposit,
        }
    }

    fn promotion(min_nights: i32, pct: Decimal) -> Promotion {
        Promotion {
            id: Uuid::new_v4(),
            min_nights,
            discount_percentage: pct,
            description: None,
            tariff_period_id: None,
        }
    }

    /// Two units priced 1000 and 1500 per night in January, one breakfast
    /// service at 100/50 per day, one flat transfer at 300.
    fn catalog() -> PricingCatalog {
        let january = period("Enero", "2024-01-01", "2024-01-31", dec!(30));
        let lake = unit("Cabaña Lago");
        let forest = unit("Suite Bosque");
        let breakfast = AdditionalService {
            id: Uuid::new_v4(),
            name: "Desayuno".to_string(),
            description: Some("Buffet".to_string()),
            requires_children_pricing: true,
        };
        let transfer = AdditionalService {
            id: Uuid::new_v4(),
            name: "Traslado".to_string(),
            description: None,
            requires_children_pricing: false,
        };

        PricingCatalog {
            unit_prices: vec![
                UnitPrice {
                    unit_id: lake.id,
                    tariff_period_id: january.id,
                    price_per_night: dec!(1000),
                },
                UnitPrice {
                    unit_id: forest.id,
                    tariff_period_id: january.id,
                    price_per_night: dec!(1500),
                },
            ],
            service_prices: vec![
                ServicePrice {
                    service_id: breakfast.id,
                    tariff_period_id: january.id,
                    adult_price: dec!(100),
                    child_price: Some(dec!(50)),
                    per_day: Some(true),
                },
                ServicePrice {
                    service_id: transfer.id,
                    tariff_period_id: january.id,
                    adult_price: dec!(300),
                    child_price: None,
                    per_day: Some(false),
                },
            ],
            periods: vec![january],
            units: vec![lake, forest],
            services: vec![breakfast, transfer],
            ..Default::default()
        }
    }

    fn stay(adults: u32, children: u32) -> StayDetails {
        stay_details(
            date("2024-01-10"),
            date("2024-01-13"),
            Guests { adults, children },
        )
        .unwrap()
    }

    #[test]
    fn test_stay_details_requires_a_night() {
        let guests = Guests { adults: 2, children: 0 };
        assert!(stay_details(date("2024-01-10"), date("2024-01-10"), guests).is_err());
        assert!(stay_details(date("2024-01-10"), date("2024-01-08"), guests).is_err());
        assert_eq!(
            stay_details(date("2024-01-10"), date("2024-01-13"), guests)
                .unwrap()
                .nights,
            3
        );
    }

    #[test]
    fn test_availability_quote_without_promotions() {
        let quote = build_availability_quote(&catalog(), stay(2, 0), dec!(50)).unwrap();

        assert!(quote.promotions.is_empty());
        assert_eq!(quote.units.len(), 2);
        assert_eq!(quote.units[0].price_per_night, dec!(1000));
        assert!(quote.units[0].discount.is_none());
        assert_eq!(quote.services.len(), 2);
        assert_eq!(quote.services[0].child_price, Some(dec!(50)));
        assert!(quote.services[0].per_day);
        assert!(!quote.services[1].per_day);
        // Deposit from the check-in period, not the default
        assert_eq!(quote.deposit_percentage, dec!(30));
    }

    #[test]
    fn test_availability_quote_applies_best_promotion() {
        let mut catalog = catalog();
        catalog.promotions = vec![promotion(3, dec!(10)), promotion(7, dec!(20))];

        let quote = build_availability_quote(&catalog, stay(2, 0), dec!(50)).unwrap();

        assert_eq!(quote.promotions.len(), 1);
        assert_eq!(quote.promotions[0].percentage, dec!(10));
        let discount = quote.units[0].discount.as_ref().unwrap();
        assert_eq!(discount.percentage, dec!(10));
        assert_eq!(discount.price_per_night, dec!(900));
    }

    #[test]
    fn test_promotion_linked_to_units_only_applies_to_them() {
        let mut catalog = catalog();
        let promo = promotion(2, dec!(15));
        catalog.promotion_units = vec![PromotionUnit {
            promotion_id: promo.id,
            unit_id: catalog.units[1].id,
        }];
        catalog.promotions = vec![promo];

        let quote = build_availability_quote(&catalog, stay(2, 0), dec!(50)).unwrap();
        assert!(quote.units[0].discount.is_none());
        assert_eq!(
            quote.units[1].discount.as_ref().unwrap().price_per_night,
            dec!(1275)
        );
    }

    #[test]
    fn test_banner_hidden_when_linked_unit_not_offered() {
        let mut catalog = catalog();
        catalog.units.truncate(1);
        let promo = promotion(2, dec!(25));
        catalog.promotion_units = vec![PromotionUnit {
            promotion_id: promo.id,
            unit_id: Uuid::new_v4(),
        }];
        catalog.promotions = vec![promo, promotion(3, dec!(5))];

        let quote = build_availability_quote(&catalog, stay(2, 0), dec!(50)).unwrap();

        assert_eq!(quote.promotions.len(), 1);
        assert_eq!(quote.promotions[0].percentage, dec!(5));
        assert_eq!(quote.units[0].discount.as_ref().unwrap().percentage, dec!(5));
        assert_eq!(qualifying_promotions(&catalog, &quote.stay), quote.promotions);
    }

    #[test]
    fn test_banner_hidden_when_linked_unit_excluded() {
        let mut catalog = catalog();
        let promo = promotion(2, dec!(25));
        catalog.promotion_units = vec![PromotionUnit {
            promotion_id: promo.id,
            unit_id: catalog.units[0].id,
        }];
        catalog.exclusions = vec![PeriodExclusion {
            tariff_period_id: catalog.periods[0].id,
            unit_id: catalog.units[0].id,
        }];
        catalog.promotions = vec![promo];

        let quote = build_availability_quote(&catalog, stay(2, 0), dec!(50)).unwrap();
        assert!(quote.promotions.is_empty());
        assert!(quote.units.iter().all(|u| u.discount.is_none()));
    }

    #[test]
    fn test_stay_details_rejects_overlong_stay() {
        let guests = Guests { adults: 2, children: 0 };
        assert!(matches!(
            stay_details(date("0001-01-01"), date("9999-12-31"), guests),
            Err(PricingError::StayTooLong { .. })
        ));
    }

    #[test]
    fn test_reservation_overflow_is_an_error() {
        let mut catalog = catalog();
        catalog.service_prices[0].adult_price = Decimal::MAX;
        let selections = vec![ServiceSelection {
            service_id: catalog.services[0].id,
            adults: 2,
            children: 0,
        }];

        let result = build_reservation_quote(&catalog, stay(2, 0), &selections, dec!(50));
        assert_eq!(result.unwrap_err(), PricingError::Overflow);
    }

    #[test]
    fn test_excluded_unit_is_not_offered() {
        let mut catalog = catalog();
        catalog.exclusions = vec![PeriodExclusion {
            tariff_period_id: catalog.periods[0].id,
            unit_id: catalog.units[0].id,
        }];

        let quote = build_availability_quote(&catalog, stay(2, 0), dec!(50)).unwrap();
        assert_eq!(quote.units.len(), 1);
        assert_eq!(quote.units[0].name, "Suite Bosque");
    }

    #[test]
    fn test_default_deposit_when_check_in_uncovered() {
        let mut catalog = catalog();
        catalog.periods.clear();

        let quote = build_availability_quote(&catalog, stay(2, 0), dec!(50)).unwrap();
        assert_eq!(quote.deposit_percentage, dec!(50));
        assert_eq!(quote.units[0].price_per_night, dec!(0));
    }

    #[test]
    fn test_reservation_quote_totals() {
        let mut catalog = catalog();
        catalog.promotions = vec![promotion(3, dec!(10))];
        let selections = vec![
            ServiceSelection {
                service_id: catalog.services[0].id,
                adults: 2,
                children: 1,
            },
            ServiceSelection {
                service_id: catalog.services[1].id,
                adults: 2,
                children: 0,
            },
            ServiceSelection {
                service_id: Uuid::new_v4(),
                adults: 1,
                children: 0,
            },
        ];

        let quote = build_reservation_quote(&catalog, stay(2, 1), &selections, dec!(50)).unwrap();

        assert_eq!(quote.units.len(), 2);
        assert_eq!(quote.units[0].price_per_night, dec!(1000));
        assert_eq!(quote.units[0].subtotal, dec!(2700));
        assert_eq!(quote.units[0].discount_percentage, Some(dec!(10)));
        assert_eq!(quote.units[1].subtotal, dec!(4050));

        // Unknown service skipped
        assert_eq!(quote.services.len(), 2);
        // (2*100 + 1*50) * 3 nights
        assert_eq!(quote.services[0].days, 3);
        assert_eq!(quote.services[0].subtotal, dec!(750));
        assert_eq!(quote.services[0].price_per_person, dec!(100));
        // Flat: 2*300 once
        assert_eq!(quote.services[1].days, 1);
        assert_eq!(quote.services[1].subtotal, dec!(600));

        assert_eq!(quote.total, dec!(8100));
        assert_eq!(quote.deposit_percentage, dec!(30));
        assert_eq!(quote.deposit, dec!(2430));
    }

    #[test]
    fn test_service_price_prefers_check_in_period() {
        let mut catalog = catalog();
        let service_id = catalog.services[0].id;
        let other = Uuid::new_v4();
        catalog.service_prices.insert(
            0,
            ServicePrice {
                service_id,
                tariff_period_id: other,
                adult_price: dec!(999),
                child_price: None,
                per_day: None,
            },
        );

        let january = catalog.periods[0].id;
        assert_eq!(
            catalog.service_price_for(service_id, Some(january)).unwrap().adult_price,
            dec!(100)
        );
        // Falls back to the first row
        assert_eq!(
            catalog.service_price_for(service_id, None).unwrap().adult_price,
            dec!(999)
        );
    }
}
